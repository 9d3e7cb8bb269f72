//! Independent validation of returned solutions
//!
//! Re-checks a solution against the data-model invariants without
//! trusting the encoding: every covered cell in bounds and unblocked,
//! cells consistent with each placement's rotation grid and offset,
//! placements pairwise disjoint, and the claimed coverage actually
//! reached.

use super::solution::Solution;
use crate::board::Board;
use itertools::Itertools;
use rayon::prelude::*;

/// Validates solutions against a board
pub struct SolutionValidator {
    board: Board,
}

/// Result of solution validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error_message: Option<String>,
    pub placements_checked: usize,
    pub covered_cells: usize,
}

impl SolutionValidator {
    pub fn new(board: Board) -> Self {
        Self { board }
    }

    pub fn validate(&self, solution: &Solution) -> ValidationResult {
        let board = &self.board;

        // Per-placement checks are independent; scan them in parallel
        let placement_error: Option<String> = solution
            .placements
            .par_iter()
            .find_map_any(|placement| {
                let mut expected: Vec<usize> = placement
                    .grid
                    .occupied()
                    .map(|(r, c, _)| {
                        let (row, col) = (placement.row + r, placement.col + c);
                        if !board.in_bounds(row, col) {
                            return usize::MAX;
                        }
                        board.index(row, col)
                    })
                    .collect();
                expected.sort_unstable();

                if expected.contains(&usize::MAX) {
                    return Some(format!(
                        "Placement {} extends outside the {}x{} board",
                        placement.id, board.height, board.width
                    ));
                }
                if expected != placement.cells {
                    return Some(format!(
                        "Placement {} covered cells do not match its grid and offset",
                        placement.id
                    ));
                }
                if let Some(&cell) = placement.cells.iter().find(|&&c| board.is_blocked_index(c)) {
                    return Some(format!(
                        "Placement {} covers blocked cell {}",
                        placement.id, cell
                    ));
                }
                None
            });

        if let Some(message) = placement_error {
            return self.invalid(solution, message);
        }

        // Overlap: any shared cell between two placements
        for (a, b) in solution.placements.iter().tuple_combinations() {
            if overlaps(&a.cells, &b.cells) {
                return self.invalid(
                    solution,
                    format!("Placements {} and {} overlap", a.id, b.id),
                );
            }
        }

        let covered = solution.covered_count();
        if covered < solution.coverage {
            return self.invalid(
                solution,
                format!(
                    "Solution covers {} cells but claims coverage {}",
                    covered, solution.coverage
                ),
            );
        }

        ValidationResult {
            is_valid: true,
            error_message: None,
            placements_checked: solution.placements.len(),
            covered_cells: covered,
        }
    }

    fn invalid(&self, solution: &Solution, message: String) -> ValidationResult {
        ValidationResult {
            is_valid: false,
            error_message: Some(message),
            placements_checked: solution.placements.len(),
            covered_cells: solution.covered_count(),
        }
    }
}

/// Both slices are sorted ascending; merge-walk for a common element
fn overlaps(a: &[usize], b: &[usize]) -> bool {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => return true,
        }
    }
    false
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Validation Result:")?;
        writeln!(f, "  Valid: {}", self.is_valid)?;
        writeln!(f, "  Placements checked: {}", self.placements_checked)?;
        writeln!(f, "  Covered cells: {}", self.covered_cells)?;
        if let Some(message) = &self.error_message {
            writeln!(f, "  Error: {}", message)?;
        }
        Ok(())
    }
}
