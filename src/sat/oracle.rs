//! External SAT oracle adapter
//!
//! The solving procedure is an opaque external process consumed over the
//! DIMACS text protocol: the full CNF instance is written to the child's
//! standard input, the stream is closed to signal end-of-input, and the
//! verdict is parsed from the `s` / `v` lines on its standard output.

use super::cnf::CnfFormula;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Environment variable overriding the configured solver binary path
pub const ORACLE_PATH_ENV: &str = "POLYCOVER_ORACLE";

/// Errors from one oracle invocation.
///
/// All of these are recoverable at the search level: the driver treats a
/// failed invocation like an UNSAT answer for that iteration and moves on
/// to the next coverage target.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("solver binary not found: {0}")]
    Unavailable(PathBuf),
    #[error("solver process error: {0}")]
    Io(#[from] std::io::Error),
    #[error("solver output contained no verdict line")]
    Malformed,
    #[error("solver timed out after {secs:.1}s and was killed", secs = .0.as_secs_f64())]
    Timeout(Duration),
}

/// Answer from a successful oracle invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleVerdict {
    /// Satisfiable, with the list of variables assigned true
    Satisfiable(Vec<i32>),
    Unsatisfiable,
}

/// An opaque satisfiability decision procedure.
///
/// The production implementation is [`SatOracle`]; tests substitute
/// exhaustive stubs through this seam.
pub trait DecisionOracle {
    fn decide(&self, formula: &CnfFormula) -> Result<OracleVerdict, OracleError>;
}

/// Drives an external SAT solver child process
pub struct SatOracle {
    binary: PathBuf,
    args: Vec<String>,
    timeout: Option<Duration>,
}

/// Resolve the solver binary: the `POLYCOVER_ORACLE` environment variable
/// wins over the configured path.
pub fn resolve_binary(configured: PathBuf) -> PathBuf {
    match std::env::var(ORACLE_PATH_ENV) {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => configured,
    }
}

impl SatOracle {
    pub fn new(binary: PathBuf, args: Vec<String>, timeout: Option<Duration>) -> Self {
        Self {
            binary,
            args,
            timeout,
        }
    }

    pub fn binary(&self) -> &PathBuf {
        &self.binary
    }

    /// Run the child process on one DIMACS instance and parse its answer
    fn run(&self, dimacs: &str) -> Result<OracleVerdict, OracleError> {
        let mut child = Command::new(&self.binary)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    OracleError::Unavailable(self.binary.clone())
                } else {
                    OracleError::Io(e)
                }
            })?;

        // Drain stdout and stderr concurrently with process execution so a
        // chatty solver cannot deadlock on a full pipe buffer.
        let mut stdout = child.stdout.take().expect("stdout was piped");
        let stdout_thread = thread::spawn(move || {
            let mut buf = String::new();
            let _ = stdout.read_to_string(&mut buf);
            buf
        });
        let mut stderr = child.stderr.take().expect("stderr was piped");
        let stderr_thread = thread::spawn(move || {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf);
            buf
        });

        // Feed the instance, then close stdin to signal end-of-input. A
        // solver that rejects the instance may close the pipe early; the
        // verdict parse below is what decides the outcome.
        {
            let mut stdin = child.stdin.take().expect("stdin was piped");
            let _ = stdin.write_all(dimacs.as_bytes());
        }

        // Await process exit, killing the child on timeout
        let start = Instant::now();
        loop {
            if child.try_wait()?.is_some() {
                break;
            }
            if let Some(timeout) = self.timeout {
                if start.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(OracleError::Timeout(timeout));
                }
            }
            thread::sleep(Duration::from_millis(10));
        }

        let output = stdout_thread.join().unwrap_or_default();
        let _ = stderr_thread.join();

        parse_solver_output(&output)
    }
}

impl DecisionOracle for SatOracle {
    fn decide(&self, formula: &CnfFormula) -> Result<OracleVerdict, OracleError> {
        let (dimacs, _) = formula.to_dimacs();
        self.run(&dimacs)
    }
}

/// Parse solver stdout: an `s SATISFIABLE` / `s UNSATISFIABLE` verdict
/// line, and for satisfiable instances `v ` lines listing the assignment.
/// Only positive literals are retained; the trailing `0` is ignored.
fn parse_solver_output(output: &str) -> Result<OracleVerdict, OracleError> {
    let mut satisfiable = None;
    let mut true_vars = Vec::new();

    for line in output.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("s ") {
            // Checked first: "UNSATISFIABLE" contains "SATISFIABLE"
            if rest.contains("UNSATISFIABLE") {
                satisfiable = Some(false);
            } else if rest.contains("SATISFIABLE") {
                satisfiable = Some(true);
            }
        } else if let Some(rest) = line.strip_prefix("v ") {
            for token in rest.split_whitespace() {
                if let Ok(literal) = token.parse::<i32>() {
                    if literal > 0 {
                        true_vars.push(literal);
                    }
                }
            }
        }
    }

    match satisfiable {
        Some(true) => Ok(OracleVerdict::Satisfiable(true_vars)),
        Some(false) => Ok(OracleVerdict::Unsatisfiable),
        None => Err(OracleError::Malformed),
    }
}
