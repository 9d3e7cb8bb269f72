//! The reduction-and-search engine: placement enumeration, symmetry
//! grouping, collision indexing, the iterative coverage search, and
//! solution reconstruction

pub mod collision;
pub mod placement;
pub mod problem;
pub mod solution;
pub mod symmetry;
pub mod validator;

pub use placement::Placement;
pub use problem::{CoverProblem, EncodingStatistics, SolveParameters};
pub use solution::{Solution, SolveOutcome, SolveWarning};
pub use symmetry::{SolveElement, SymmetryGroup};
pub use validator::SolutionValidator;
