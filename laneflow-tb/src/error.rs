//! Testbench errors.

use laneflow::{ConfigError, InvariantError};
use thiserror::Error;

/// Failure detected by the testbench.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum TbError {
    #[error("invalid queue configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("{name} probability {value} is outside [0, 1]")]
    Probability { name: &'static str, value: f64 },
    #[error("cycle {cycle}: {source}")]
    Invariant { cycle: usize, source: InvariantError },
    #[error("cycle {cycle}: expected element {expected}, found {found}")]
    Mismatch { cycle: usize, expected: u64, found: u64 },
    #[error("cycle {cycle}: {what}")]
    FlowControl { cycle: usize, what: String },
}
