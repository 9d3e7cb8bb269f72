//! Solution representation and reconstruction from a satisfying assignment

use super::placement::Placement;
use super::symmetry::SolveElement;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// A non-overlapping arrangement of shape instances on the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub placements: Vec<Placement>,
    /// The coverage target the satisfying assignment was found for
    pub coverage: usize,
    pub board_width: usize,
    pub board_height: usize,
    #[serde(skip)]
    pub solve_time: Duration,
}

impl Solution {
    pub fn new(
        placements: Vec<Placement>,
        coverage: usize,
        board_width: usize,
        board_height: usize,
        solve_time: Duration,
    ) -> Self {
        Self {
            placements,
            coverage,
            board_width,
            board_height,
            solve_time,
        }
    }

    /// Number of distinct board cells covered by the placements
    pub fn covered_count(&self) -> usize {
        let mut cells: Vec<usize> = self
            .placements
            .iter()
            .flat_map(|p| p.cells.iter().copied())
            .collect();
        cells.sort_unstable();
        cells.dedup();
        cells.len()
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Save as JSON to a file
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Structured diagnostics carried in the solve outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveWarning {
    /// An inconsistent symmetry orbit was split into independent
    /// placements (soft policy): the symmetry is not enforced for them
    OrbitSplit { placement_ids: Vec<usize> },
    /// An inconsistent symmetry orbit was discarded entirely (hard
    /// policy): its placements are unreachable in any solution
    OrbitDiscarded { placement_ids: Vec<usize> },
    /// Empty clauses were skipped during DIMACS serialization; indicates
    /// an encoder defect if it ever appears
    EmptyClausesSkipped { count: usize },
}

impl std::fmt::Display for SolveWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveWarning::OrbitSplit { placement_ids } => write!(
                f,
                "Inconsistent symmetry orbit split into {} independent placements (ids {:?})",
                placement_ids.len(),
                placement_ids
            ),
            SolveWarning::OrbitDiscarded { placement_ids } => write!(
                f,
                "Inconsistent symmetry orbit discarded, {} placements unreachable (ids {:?})",
                placement_ids.len(),
                placement_ids
            ),
            SolveWarning::EmptyClausesSkipped { count } => {
                write!(f, "Skipped {} empty clauses during serialization", count)
            }
        }
    }
}

/// Final result of one solve call. Failures are values, not errors: the
/// message says what stopped the search.
#[derive(Debug)]
pub struct SolveOutcome {
    pub success: bool,
    pub message: String,
    pub coverage: usize,
    pub solution: Option<Solution>,
    pub warnings: Vec<SolveWarning>,
    pub solve_time: Duration,
}

impl SolveOutcome {
    pub fn failure(message: impl Into<String>, warnings: Vec<SolveWarning>, solve_time: Duration) -> Self {
        Self {
            success: false,
            message: message.into(),
            coverage: 0,
            solution: None,
            warnings,
            solve_time,
        }
    }
}

/// Expand the oracle's true decision variables back into placements.
///
/// Variables without a map entry are auxiliary (sequential-counter or
/// cell-link variables) and are silently ignored.
pub fn reconstruct_placements(elements: &[SolveElement], true_vars: &[i32]) -> Vec<Placement> {
    let by_variable: HashMap<i32, &SolveElement> = elements
        .iter()
        .map(|element| (element.variable(), element))
        .collect();

    let mut placements = Vec::new();
    for &variable in true_vars {
        if let Some(element) = by_variable.get(&variable) {
            placements.extend(element.placements().iter().cloned());
        }
    }
    placements
}
