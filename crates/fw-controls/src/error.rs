//! Error types for controller operations.

use thiserror::Error;

/// Result type for controller operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur when configuring controllers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Linguistic label not recognized.
    #[error("Unknown linguistic set: {label}")]
    UnknownSet { label: String },

    /// Rule table entry outside the normalized output range.
    #[error("Rule ({row}, {col}) has output {value} outside [-1, 1]")]
    RuleOutOfRange { row: usize, col: usize, value: f64 },
}
