//! SAT building blocks: variables, CNF clauses, cardinality encodings,
//! and the external oracle adapter

pub mod cardinality;
pub mod cnf;
pub mod oracle;
pub mod variables;

pub use cnf::{Clause, CnfFormula};
pub use oracle::{DecisionOracle, OracleError, OracleVerdict, SatOracle};
pub use variables::VariableAllocator;
