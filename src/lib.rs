//! Maximum-Coverage Shape Packing via SAT
//!
//! This library packs polyomino-like shapes onto a rectangular board with
//! blocked cells, maximizing covered area. The problem is reduced to CNF
//! and decided by an external SAT solver spoken to over the DIMACS text
//! protocol.

pub mod board;
pub mod config;
pub mod cover;
pub mod sat;
pub mod utils;

pub use config::Settings;
pub use cover::{CoverProblem, SolveOutcome, SolveParameters};

use anyhow::Result;
use sat::{oracle, SatOracle};

/// Main entry point: load the inputs referenced by the settings and run
/// the iterative coverage search against the configured oracle
pub fn solve_cover(settings: &Settings) -> Result<SolveOutcome> {
    let params = SolveParameters::from_settings(settings)?;
    let oracle = SatOracle::new(
        oracle::resolve_binary(settings.oracle.binary.clone()),
        settings.oracle.args.clone(),
        settings.oracle.timeout(),
    );
    let problem = CoverProblem::new(params);
    Ok(problem.solve(&oracle))
}
