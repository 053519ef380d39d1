//! Errors.

use thiserror::Error;

/// Rejected construction-time parameters.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("a lane-positioned queue needs at least one lane")]
    ZeroLanes,
    #[error("a lane-positioned queue needs at least one row")]
    ZeroRows,
    #[error("{rows} rows are too few, at least {min} are required")]
    TooFewRows { rows: usize, min: usize },
    #[error("{rows} rows cannot be grouped into row pairs")]
    OddRows { rows: usize },
}

/// Broken internal invariant. This is a design defect, never an expected run-time condition.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantError {
    #[error("occupancy mismatch: used ({used}) + free ({free}) != capacity ({capacity})")]
    Capacity { used: usize, free: usize, capacity: usize },
    #[error("position mismatch: used ({used}) disagrees with cursor distance ({distance}) of capacity {capacity}")]
    Position { used: usize, distance: usize, capacity: usize },
}
