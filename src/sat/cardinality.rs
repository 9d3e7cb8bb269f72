//! Sequential-counter cardinality encodings
//!
//! Translates "at most k" / "at least k" constraints over a set of
//! variables into CNF clauses, allocating auxiliary counter variables as
//! needed. Both encoders return the number of auxiliary variables they
//! consumed so callers can track the running variable high-water mark.

use super::cnf::Clause;
use super::variables::VariableAllocator;

/// Encode "at most `k` of `vars` are true" into `clauses`.
///
/// Uses the sequential-counter (Sinz) encoding: an `n x k` matrix of
/// auxiliary variables `s[i][j]` meaning "at least j+1 of the first i+1
/// variables are true". Returns the number of auxiliary variables
/// allocated.
pub fn encode_at_most_k(
    vars: &[i32],
    k: usize,
    alloc: &mut VariableAllocator,
    clauses: &mut Vec<Clause>,
) -> usize {
    let n = vars.len();

    if k == 0 {
        // No variable may be true
        for &var in vars {
            clauses.push(Clause::unit(-var));
        }
        return 0;
    }
    if k >= n || n <= 1 {
        return 0; // Trivially satisfied
    }

    // s[i][j] = first + i*k + j
    let first = alloc.fresh_block(n * k);
    let s = |i: usize, j: usize| first + (i * k + j) as i32;

    // Base row: the counter for the first variable
    clauses.push(Clause::binary(-vars[0], s(0, 0)));
    for j in 1..k {
        clauses.push(Clause::unit(-s(0, j)));
    }

    // Recursive rows: propagate and increment the counter
    for i in 1..n {
        clauses.push(Clause::binary(-vars[i], s(i, 0)));
        clauses.push(Clause::binary(-s(i - 1, 0), s(i, 0)));
        for j in 1..k {
            clauses.push(Clause::new(vec![-vars[i], -s(i - 1, j - 1), s(i, j)]));
            clauses.push(Clause::binary(-s(i - 1, j), s(i, j)));
        }
        // Overflow: variable i cannot be true once the counter reached k
        clauses.push(Clause::binary(-vars[i], -s(i - 1, k - 1)));
    }

    n * k
}

/// Encode "at least `k` of `vars` are true" into `clauses`.
///
/// Reduces to [`encode_at_most_k`] over per-variable complements:
/// at least k of n true is at most n-k of n false. Returns the number of
/// auxiliary variables allocated.
pub fn encode_at_least_k(
    vars: &[i32],
    k: usize,
    alloc: &mut VariableAllocator,
    clauses: &mut Vec<Clause>,
) -> usize {
    let n = vars.len();

    if k == 0 {
        return 0; // Trivially satisfied
    }
    if k > n {
        // Unsatisfiable by construction
        let var = alloc.fresh();
        clauses.push(Clause::unit(var));
        clauses.push(Clause::unit(-var));
        return 1;
    }
    if k == n {
        for &var in vars {
            clauses.push(Clause::unit(var));
        }
        return 0;
    }

    // complement[i] <=> !vars[i]
    let mut complements = Vec::with_capacity(n);
    for &var in vars {
        let temp = alloc.fresh();
        clauses.push(Clause::binary(temp, var));
        clauses.push(Clause::binary(-temp, -var));
        complements.push(temp);
    }

    n + encode_at_most_k(&complements, n - k, alloc, clauses)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Check whether some assignment over variables 1..=total satisfies all
    /// clauses while agreeing with `fixed` on the listed variables.
    fn exists_satisfying(clauses: &[Clause], total: usize, fixed: &[(i32, bool)]) -> bool {
        assert!(total <= 20, "exhaustive check limited to 20 variables");
        'assignments: for mask in 0u32..(1u32 << total) {
            let value = |literal: i32| -> bool {
                let bit = (mask >> (literal.abs() - 1)) & 1 == 1;
                if literal > 0 {
                    bit
                } else {
                    !bit
                }
            };
            for &(var, want) in fixed {
                if value(var) != want {
                    continue 'assignments;
                }
            }
            if clauses
                .iter()
                .all(|clause| clause.literals.iter().any(|&l| value(l)))
            {
                return true;
            }
        }
        false
    }

    fn fix_pattern(vars: &[i32], pattern: u32) -> Vec<(i32, bool)> {
        vars.iter()
            .enumerate()
            .map(|(i, &v)| (v, (pattern >> i) & 1 == 1))
            .collect()
    }

    #[test]
    fn test_at_most_one_accepts_up_to_one_true() {
        let mut alloc = VariableAllocator::new();
        let vars: Vec<i32> = (0..3).map(|_| alloc.fresh()).collect();

        let mut clauses = Vec::new();
        let aux = encode_at_most_k(&vars, 1, &mut alloc, &mut clauses);
        assert_eq!(aux, 3);

        for pattern in 0u32..8 {
            let fixed = fix_pattern(&vars, pattern);
            let true_count = pattern.count_ones();
            let satisfiable = exists_satisfying(&clauses, alloc.count(), &fixed);
            assert_eq!(
                satisfiable,
                true_count <= 1,
                "pattern {:03b} with {} true variables",
                pattern,
                true_count
            );
        }
    }

    #[test]
    fn test_at_most_k_boundary() {
        let mut alloc = VariableAllocator::new();
        let vars: Vec<i32> = (0..4).map(|_| alloc.fresh()).collect();

        let mut clauses = Vec::new();
        encode_at_most_k(&vars, 2, &mut alloc, &mut clauses);

        for pattern in 0u32..16 {
            let fixed = fix_pattern(&vars, pattern);
            let satisfiable = exists_satisfying(&clauses, alloc.count(), &fixed);
            assert_eq!(satisfiable, pattern.count_ones() <= 2, "pattern {:04b}", pattern);
        }
    }

    #[test]
    fn test_at_least_k_boundary() {
        let mut alloc = VariableAllocator::new();
        let vars: Vec<i32> = (0..4).map(|_| alloc.fresh()).collect();

        let mut clauses = Vec::new();
        encode_at_least_k(&vars, 2, &mut alloc, &mut clauses);

        for pattern in 0u32..16 {
            let fixed = fix_pattern(&vars, pattern);
            let satisfiable = exists_satisfying(&clauses, alloc.count(), &fixed);
            assert_eq!(satisfiable, pattern.count_ones() >= 2, "pattern {:04b}", pattern);
        }
    }

    #[test]
    fn test_exactly_k_satisfies_both_encodings() {
        let mut alloc = VariableAllocator::new();
        let vars: Vec<i32> = (0..3).map(|_| alloc.fresh()).collect();

        let mut clauses = Vec::new();
        encode_at_most_k(&vars, 2, &mut alloc, &mut clauses);
        encode_at_least_k(&vars, 2, &mut alloc, &mut clauses);

        for pattern in 0u32..8 {
            let fixed = fix_pattern(&vars, pattern);
            let satisfiable = exists_satisfying(&clauses, alloc.count(), &fixed);
            assert_eq!(satisfiable, pattern.count_ones() == 2, "pattern {:03b}", pattern);
        }
    }

    #[test]
    fn test_at_most_zero_forces_all_false() {
        let mut alloc = VariableAllocator::new();
        let vars: Vec<i32> = (0..3).map(|_| alloc.fresh()).collect();

        let mut clauses = Vec::new();
        let aux = encode_at_most_k(&vars, 0, &mut alloc, &mut clauses);

        assert_eq!(aux, 0);
        assert_eq!(clauses.len(), 3);
        assert!(clauses.iter().all(|c| c.is_unit() && c.literals[0] < 0));
    }

    #[test]
    fn test_at_most_k_trivial_cases() {
        let mut alloc = VariableAllocator::new();
        let vars: Vec<i32> = (0..3).map(|_| alloc.fresh()).collect();

        let mut clauses = Vec::new();
        assert_eq!(encode_at_most_k(&vars, 3, &mut alloc, &mut clauses), 0);
        assert_eq!(encode_at_most_k(&vars, 5, &mut alloc, &mut clauses), 0);
        assert_eq!(encode_at_most_k(&vars[..1], 1, &mut alloc, &mut clauses), 0);
        assert!(clauses.is_empty());
    }

    #[test]
    fn test_at_least_more_than_n_is_unsatisfiable() {
        let mut alloc = VariableAllocator::new();
        let vars: Vec<i32> = (0..2).map(|_| alloc.fresh()).collect();

        let mut clauses = Vec::new();
        let aux = encode_at_least_k(&vars, 3, &mut alloc, &mut clauses);

        assert_eq!(aux, 1);
        assert!(!exists_satisfying(&clauses, alloc.count(), &[]));
    }

    #[test]
    fn test_at_least_n_forces_all_true() {
        let mut alloc = VariableAllocator::new();
        let vars: Vec<i32> = (0..3).map(|_| alloc.fresh()).collect();

        let mut clauses = Vec::new();
        let aux = encode_at_least_k(&vars, 3, &mut alloc, &mut clauses);

        assert_eq!(aux, 0);
        assert_eq!(clauses.len(), 3);
        assert!(clauses.iter().all(|c| c.is_unit() && c.literals[0] > 0));
    }
}
