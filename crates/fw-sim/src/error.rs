//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered during a simulation run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Run cancelled at step {step}")]
    Cancelled { step: usize },

    #[error("Run exceeded its deadline at step {step}")]
    TimedOut { step: usize },
}

pub type SimResult<T> = Result<T, SimError>;
