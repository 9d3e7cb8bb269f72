//! CNF clause representation and DIMACS serialization

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<i32>, // Positive for variable, negative for negation
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    /// Create a unit clause (single literal)
    pub fn unit(literal: i32) -> Self {
        Self {
            literals: vec![literal],
        }
    }

    /// Create a binary clause (two literals)
    pub fn binary(lit1: i32, lit2: i32) -> Self {
        Self {
            literals: vec![lit1, lit2],
        }
    }

    /// Check if clause is empty (unsatisfiable)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Check if clause is unit
    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }
}

/// A complete CNF instance: clause list plus declared variable count
#[derive(Debug, Clone)]
pub struct CnfFormula {
    pub clauses: Vec<Clause>,
    pub variable_count: usize,
}

impl CnfFormula {
    pub fn new(clauses: Vec<Clause>, variable_count: usize) -> Self {
        Self {
            clauses,
            variable_count,
        }
    }

    /// Serialize to DIMACS text: `p cnf <vars> <clauses>` header, then one
    /// line per clause, space-separated literals with a trailing `0`.
    ///
    /// Empty clauses are unreachable given a correct encoding; if one is
    /// present it is skipped rather than written (an empty DIMACS line
    /// would make the instance trivially unsatisfiable) and the number of
    /// skipped clauses is reported so the caller can surface a warning.
    pub fn to_dimacs(&self) -> (String, usize) {
        let written: Vec<&Clause> = self.clauses.iter().filter(|c| !c.is_empty()).collect();
        let skipped = self.clauses.len() - written.len();

        let mut out = String::with_capacity(16 + written.len() * 8);
        out.push_str(&format!("p cnf {} {}\n", self.variable_count, written.len()));
        for clause in written {
            for &literal in &clause.literals {
                out.push_str(&format!("{} ", literal));
            }
            out.push_str("0\n");
        }

        (out, skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clause_creation() {
        let clause = Clause::new(vec![1, -2, 3]);
        assert_eq!(clause.literals, vec![1, -2, 3]);
        assert!(!clause.is_empty());
        assert!(!clause.is_unit());

        let unit_clause = Clause::unit(5);
        assert!(unit_clause.is_unit());
        assert_eq!(unit_clause.literals, vec![5]);

        let binary_clause = Clause::binary(-1, 4);
        assert_eq!(binary_clause.literals, vec![-1, 4]);
    }

    #[test]
    fn test_dimacs_format() {
        let formula = CnfFormula::new(vec![Clause::new(vec![1, -2]), Clause::unit(3)], 3);

        let (text, skipped) = formula.to_dimacs();
        assert_eq!(skipped, 0);
        assert_eq!(text, "p cnf 3 2\n1 -2 0\n3 0\n");
    }

    #[test]
    fn test_dimacs_skips_empty_clauses() {
        let formula = CnfFormula::new(
            vec![Clause::unit(1), Clause::new(vec![]), Clause::unit(-2)],
            2,
        );

        let (text, skipped) = formula.to_dimacs();
        assert_eq!(skipped, 1);
        // Header counts only the clauses actually written
        assert!(text.starts_with("p cnf 2 2\n"));
        assert!(!text.contains("\n0\n"));
    }
}
