//! The cover problem driver: CNF construction and the iterative
//! maximum-coverage search loop

use super::collision::CollisionIndex;
use super::placement::enumerate_placements;
use super::solution::{reconstruct_placements, Solution, SolveOutcome, SolveWarning};
use super::symmetry::{group_placements, SolveElement};
use crate::board::{io, Board, Shape};
use crate::config::{Settings, SymmetryMode};
use crate::sat::cardinality::{encode_at_least_k, encode_at_most_k};
use crate::sat::{Clause, CnfFormula, DecisionOracle, OracleVerdict, VariableAllocator};
use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Everything one solve call needs; assembled fresh per invocation
#[derive(Debug, Clone)]
pub struct SolveParameters {
    pub board: Board,
    pub shapes: Vec<Shape>,
    pub symmetry_mode: SymmetryMode,
    pub soft_policy: bool,
}

impl SolveParameters {
    /// Load board and catalog files referenced by the settings, applying
    /// the enabled-shapes filter
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let board = io::load_board_from_file(&settings.board.layout_file)
            .context("Failed to load board layout")?;

        let mut shapes = io::load_catalog_from_file(&settings.shapes.catalog_file)
            .context("Failed to load shape catalog")?;

        if let Some(enabled) = &settings.shapes.enabled {
            for name in enabled {
                if !shapes.iter().any(|s| s.name() == name) {
                    anyhow::bail!("Enabled shape '{}' not found in catalog", name);
                }
            }
            shapes.retain(|shape| enabled.iter().any(|name| name == shape.name()));
        }

        Ok(Self {
            board,
            shapes,
            symmetry_mode: settings.symmetry.mode,
            soft_policy: settings.symmetry.soft_policy,
        })
    }
}

/// A maximum-coverage packing problem over one board and shape catalog
pub struct CoverProblem {
    params: SolveParameters,
}

/// Phase A output: shared by every search iteration
struct PreparedProblem {
    placement_count: usize,
    elements: Vec<SolveElement>,
    index: CollisionIndex,
    base_clauses: Vec<Clause>,
    base_variable_count: usize,
    warnings: Vec<SolveWarning>,
    discarded: usize,
}

impl CoverProblem {
    pub fn new(params: SolveParameters) -> Self {
        Self { params }
    }

    pub fn board(&self) -> &Board {
        &self.params.board
    }

    /// Phase A: enumerate, group, index collisions, and encode the
    /// collision clauses shared by every coverage target
    fn prepare(&self) -> PreparedProblem {
        let board = &self.params.board;

        let placements = enumerate_placements(board, &self.params.shapes);
        let placement_count = placements.len();

        let mut alloc = VariableAllocator::new();
        let grouping = group_placements(
            board,
            placements,
            self.params.symmetry_mode,
            self.params.soft_policy,
            &mut alloc,
        );

        let index = CollisionIndex::build(board, &grouping.elements);

        let mut base_clauses = Vec::new();
        for bucket in index.contested() {
            encode_at_most_k(bucket, 1, &mut alloc, &mut base_clauses);
        }

        PreparedProblem {
            placement_count,
            elements: grouping.elements,
            index,
            base_clauses,
            base_variable_count: alloc.count(),
            warnings: grouping.warnings,
            discarded: grouping.discarded,
        }
    }

    /// Solve without external cancellation
    pub fn solve(&self, oracle: &dyn DecisionOracle) -> SolveOutcome {
        let cancel = AtomicBool::new(false);
        self.solve_cancellable(oracle, &cancel)
    }

    /// Phase B: iterate coverage targets downward, invoking the oracle on
    /// a freshly assembled CNF instance per target. The cancel flag is
    /// checked between iterations so a long search can be aborted.
    pub fn solve_cancellable(&self, oracle: &dyn DecisionOracle, cancel: &AtomicBool) -> SolveOutcome {
        let start = Instant::now();
        let board = &self.params.board;

        let prepared = self.prepare();
        let mut warnings = prepared.warnings.clone();

        if prepared.placement_count == 0 {
            return SolveOutcome::failure(
                "No placements possible: no enabled shape fits anywhere on the board",
                warnings,
                start.elapsed(),
            );
        }
        if prepared.elements.is_empty() {
            return SolveOutcome::failure(
                "Symmetry grouping produced no decision elements",
                warnings,
                start.elapsed(),
            );
        }

        let usable = board.usable_cells();
        let step = coverage_step(&self.params.shapes);
        let mut target = usable / step * step;

        loop {
            if cancel.load(Ordering::Relaxed) {
                return SolveOutcome::failure("Solve cancelled", warnings, start.elapsed());
            }

            let (formula, skipped) = self.assemble_formula(&prepared, target);
            if skipped > 0 {
                eprintln!(
                    "Warning: skipped {} empty clauses at target {} (encoder defect?)",
                    skipped, target
                );
                warnings.push(SolveWarning::EmptyClausesSkipped { count: skipped });
            }

            println!(
                "Trying coverage target {} of {} usable cells ({} variables, {} clauses)",
                target,
                usable,
                formula.variable_count,
                formula.clauses.len()
            );

            match oracle.decide(&formula) {
                Ok(OracleVerdict::Satisfiable(true_vars)) => {
                    let placements = reconstruct_placements(&prepared.elements, &true_vars);
                    let solution = Solution::new(
                        placements,
                        target,
                        board.width,
                        board.height,
                        start.elapsed(),
                    );
                    return SolveOutcome {
                        success: true,
                        message: format!("Covered {} of {} usable cells", target, usable),
                        coverage: target,
                        solution: Some(solution),
                        warnings,
                        solve_time: start.elapsed(),
                    };
                }
                Ok(OracleVerdict::Unsatisfiable) => {
                    println!("Target {} is unsatisfiable", target);
                }
                Err(e) => {
                    // Recoverable: treated like UNSAT for this iteration
                    eprintln!("SAT oracle gave no answer for target {}: {}", target, e);
                }
            }

            if target == 0 {
                return SolveOutcome::failure(
                    "No solution found: search exhausted at coverage target 0",
                    warnings,
                    start.elapsed(),
                );
            }
            target = target.saturating_sub(step);
        }
    }

    /// Clone the base clause set and extend it with the per-cell coverage
    /// indicators and the at-least-target constraint for one iteration.
    /// Returns the formula and the number of empty clauses it contains.
    fn assemble_formula(&self, prepared: &PreparedProblem, target: usize) -> (CnfFormula, usize) {
        let board = &self.params.board;
        let mut alloc = VariableAllocator::with_high_water(prepared.base_variable_count);
        let mut clauses = prepared.base_clauses.clone();

        let mut cell_vars = Vec::with_capacity(board.usable_cells());
        for cell in board.free_cells() {
            let covered = alloc.fresh();
            let bucket = prepared.index.bucket(cell);
            if bucket.is_empty() {
                // Nothing can ever cover this cell
                clauses.push(Clause::unit(-covered));
            } else {
                let mut link = Vec::with_capacity(bucket.len() + 1);
                link.push(-covered);
                link.extend_from_slice(bucket);
                clauses.push(Clause::new(link));
                for &element in bucket {
                    clauses.push(Clause::binary(-element, covered));
                }
            }
            cell_vars.push(covered);
        }

        encode_at_least_k(&cell_vars, target, &mut alloc, &mut clauses);

        let skipped = clauses.iter().filter(|c| c.is_empty()).count();
        (CnfFormula::new(clauses, alloc.count()), skipped)
    }

    /// Statistics over the shared encoding (Phase A), without invoking
    /// the oracle
    pub fn analyze(&self) -> EncodingStatistics {
        let prepared = self.prepare();
        let board = &self.params.board;
        let usable = board.usable_cells();
        let step = coverage_step(&self.params.shapes);

        EncodingStatistics {
            board_width: board.width,
            board_height: board.height,
            usable_cells: usable,
            placement_count: prepared.placement_count,
            element_count: prepared.elements.len(),
            group_count: prepared
                .elements
                .iter()
                .filter(|e| matches!(e, SolveElement::Group(_)))
                .count(),
            discarded_placements: prepared.discarded,
            contested_cells: prepared.index.contested_count(),
            base_clauses: prepared.base_clauses.len(),
            base_variables: prepared.base_variable_count,
            coverage_step: step,
            initial_target: usable / step * step,
            warnings: prepared.warnings,
        }
    }
}

/// Search step: the gcd of the enabled shapes' cell counts. Any reachable
/// coverage is a sum of shape areas, so intermediate targets cannot be
/// satisfied and are skipped. Minimum 1.
fn coverage_step(shapes: &[Shape]) -> usize {
    shapes
        .iter()
        .map(|shape| shape.cell_count())
        .fold(0, gcd)
        .max(1)
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Statistics about the shared portion of the encoding
#[derive(Debug, Clone)]
pub struct EncodingStatistics {
    pub board_width: usize,
    pub board_height: usize,
    pub usable_cells: usize,
    pub placement_count: usize,
    pub element_count: usize,
    pub group_count: usize,
    pub discarded_placements: usize,
    pub contested_cells: usize,
    pub base_clauses: usize,
    pub base_variables: usize,
    pub coverage_step: usize,
    pub initial_target: usize,
    pub warnings: Vec<SolveWarning>,
}

impl std::fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Encoding Statistics:")?;
        writeln!(f, "  Board: {}x{}", self.board_width, self.board_height)?;
        writeln!(f, "  Usable cells: {}", self.usable_cells)?;
        writeln!(f, "  Placements: {}", self.placement_count)?;
        writeln!(
            f,
            "  Decision elements: {} ({} symmetry groups)",
            self.element_count, self.group_count
        )?;
        if self.discarded_placements > 0 {
            writeln!(f, "  Discarded placements: {}", self.discarded_placements)?;
        }
        writeln!(f, "  Contested cells: {}", self.contested_cells)?;
        writeln!(f, "  Base clauses: {}", self.base_clauses)?;
        writeln!(f, "  Base variables: {}", self.base_variables)?;
        writeln!(f, "  Coverage step: {}", self.coverage_step)?;
        writeln!(f, "  Initial target: {}", self.initial_target)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::io::pattern_to_grid;
    use crate::sat::OracleError;

    fn shape(name: &str, pattern: &[&str]) -> Shape {
        let rows: Vec<String> = pattern.iter().map(|s| s.to_string()).collect();
        Shape::new(name.to_string(), pattern_to_grid(&rows).unwrap()).unwrap()
    }

    fn params(board: Board, shapes: Vec<Shape>, mode: SymmetryMode) -> SolveParameters {
        SolveParameters {
            board,
            shapes,
            symmetry_mode: mode,
            soft_policy: false,
        }
    }

    /// Exhaustive assignment enumeration standing in for the external
    /// solver; only viable for tiny instances.
    struct BruteForceOracle;

    impl DecisionOracle for BruteForceOracle {
        fn decide(&self, formula: &CnfFormula) -> Result<OracleVerdict, OracleError> {
            let n = formula.variable_count;
            assert!(n <= 20, "brute-force oracle limited to 20 variables, got {}", n);
            for mask in 0u32..(1u32 << n) {
                let value = |literal: i32| -> bool {
                    let bit = (mask >> (literal.abs() - 1)) & 1 == 1;
                    if literal > 0 {
                        bit
                    } else {
                        !bit
                    }
                };
                let satisfied = formula
                    .clauses
                    .iter()
                    .all(|clause| clause.literals.iter().any(|&l| value(l)));
                if satisfied {
                    let true_vars = (1..=n as i32).filter(|&v| value(v)).collect();
                    return Ok(OracleVerdict::Satisfiable(true_vars));
                }
            }
            Ok(OracleVerdict::Unsatisfiable)
        }
    }

    struct AlwaysUnsatOracle;

    impl DecisionOracle for AlwaysUnsatOracle {
        fn decide(&self, _formula: &CnfFormula) -> Result<OracleVerdict, OracleError> {
            Ok(OracleVerdict::Unsatisfiable)
        }
    }

    struct UnavailableOracle;

    impl DecisionOracle for UnavailableOracle {
        fn decide(&self, _formula: &CnfFormula) -> Result<OracleVerdict, OracleError> {
            Err(OracleError::Unavailable("missing".into()))
        }
    }

    #[test]
    fn test_full_cover_of_open_board() {
        // 2x2 board, 1x1 shape: every cell gets its own placement
        let board = Board::new(2, 2).unwrap();
        let problem = CoverProblem::new(params(board, vec![shape("dot", &["x"])], SymmetryMode::None));

        let outcome = problem.solve(&BruteForceOracle);
        assert!(outcome.success, "{}", outcome.message);
        assert_eq!(outcome.coverage, 4);

        let solution = outcome.solution.unwrap();
        assert_eq!(solution.placements.len(), 4);
        assert_eq!(solution.covered_count(), 4);
    }

    #[test]
    fn test_blocked_cell_is_never_covered() {
        let mut board = Board::new(3, 3).unwrap();
        board.block(1, 1).unwrap();
        let center = board.index(1, 1);
        let problem = CoverProblem::new(params(board, vec![shape("dot", &["x"])], SymmetryMode::None));

        let outcome = problem.solve(&BruteForceOracle);
        assert!(outcome.success, "{}", outcome.message);
        assert_eq!(outcome.coverage, 8);

        let solution = outcome.solution.unwrap();
        assert!(solution
            .placements
            .iter()
            .all(|p| !p.cells.contains(&center)));
    }

    #[test]
    fn test_symmetry_reduces_decision_variables() {
        // Scenario: 4x4 board, 2x2 square, 180 degree symmetry
        let board = Board::new(4, 4).unwrap();
        let problem = CoverProblem::new(params(
            board,
            vec![shape("square", &["oo", "oo"])],
            SymmetryMode::Rotational180,
        ));

        let stats = problem.analyze();
        assert_eq!(stats.placement_count, 9);
        assert!(stats.element_count < stats.placement_count);
        assert_eq!(stats.group_count, 4);
    }

    #[test]
    fn test_no_placements_fails_without_oracle() {
        let board = Board::new(2, 2).unwrap();
        let problem = CoverProblem::new(params(
            board,
            vec![shape("wide", &["iiiii"])],
            SymmetryMode::None,
        ));

        struct PanickingOracle;
        impl DecisionOracle for PanickingOracle {
            fn decide(&self, _formula: &CnfFormula) -> Result<OracleVerdict, OracleError> {
                panic!("oracle must not be invoked when nothing fits");
            }
        }

        let outcome = problem.solve(&PanickingOracle);
        assert!(!outcome.success);
        assert!(outcome.message.contains("No placements"));
    }

    #[test]
    fn test_hard_policy_can_empty_the_problem() {
        // The lone orbit is inconsistent; hard policy discards it and the
        // solve fails before any oracle call
        let board = Board::new(3, 1).unwrap();
        let problem = CoverProblem::new(params(
            board,
            vec![shape("bar", &["ii"])],
            SymmetryMode::Rotational180,
        ));

        let outcome = problem.solve(&AlwaysUnsatOracle);
        assert!(!outcome.success);
        assert!(outcome.message.contains("no decision elements"));
        assert!(matches!(
            outcome.warnings[0],
            SolveWarning::OrbitDiscarded { .. }
        ));
    }

    #[test]
    fn test_exhausted_search_reports_failure() {
        let board = Board::new(2, 1).unwrap();
        let problem = CoverProblem::new(params(board, vec![shape("dot", &["x"])], SymmetryMode::None));

        let outcome = problem.solve(&AlwaysUnsatOracle);
        assert!(!outcome.success);
        assert!(outcome.message.contains("No solution found"));
    }

    #[test]
    fn test_unavailable_oracle_is_recoverable() {
        let board = Board::new(2, 1).unwrap();
        let problem = CoverProblem::new(params(board, vec![shape("dot", &["x"])], SymmetryMode::None));

        // Same downgrade path as UNSAT: decrement until 0, then fail
        let outcome = problem.solve(&UnavailableOracle);
        assert!(!outcome.success);
        assert!(outcome.message.contains("No solution found"));
    }

    #[test]
    fn test_cancellation_between_iterations() {
        let board = Board::new(2, 2).unwrap();
        let problem = CoverProblem::new(params(board, vec![shape("dot", &["x"])], SymmetryMode::None));

        let cancel = AtomicBool::new(true);
        let outcome = problem.solve_cancellable(&BruteForceOracle, &cancel);
        assert!(!outcome.success);
        assert!(outcome.message.contains("cancelled"));
    }

    #[test]
    fn test_coverage_step_is_gcd_of_areas() {
        let shapes = vec![shape("square", &["oo", "oo"]), shape("hex", &["hhh", "hhh"])];
        assert_eq!(coverage_step(&shapes), 2);
        assert_eq!(coverage_step(&[shape("dot", &["x"])]), 1);
        assert_eq!(coverage_step(&[]), 1);
    }

    #[test]
    fn test_initial_target_is_step_multiple() {
        // 3x3 usable 9, square area 4: initial target 8
        let board = Board::new(3, 3).unwrap();
        let problem = CoverProblem::new(params(
            board,
            vec![shape("square", &["oo", "oo"])],
            SymmetryMode::None,
        ));

        let stats = problem.analyze();
        assert_eq!(stats.coverage_step, 4);
        assert_eq!(stats.initial_target, 8);
    }

    #[test]
    fn test_partial_cover_found_by_stepping_down() {
        // 3x1 row with a 1x2 bar: full coverage 3 is impossible (step 2,
        // initial target 2), one bar covering 2 cells is the optimum
        let board = Board::new(3, 1).unwrap();
        let problem = CoverProblem::new(params(board, vec![shape("bar", &["ii"])], SymmetryMode::None));

        let outcome = problem.solve(&BruteForceOracle);
        assert!(outcome.success, "{}", outcome.message);
        assert_eq!(outcome.coverage, 2);
        let solution = outcome.solution.unwrap();
        assert_eq!(solution.placements.len(), 1);
    }
}
