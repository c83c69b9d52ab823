//! Error types for the fw-app service layer.

/// Application error type that wraps errors from the backend crates.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Run cancelled at step {step}")]
    Cancelled { step: usize },

    #[error("Run timed out at step {step}")]
    TimedOut { step: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for fw-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<fw_protocol::ProtocolError> for AppError {
    fn from(err: fw_protocol::ProtocolError) -> Self {
        match err {
            fw_protocol::ProtocolError::Io(io) => AppError::Io(io),
            other => AppError::Protocol(other.to_string()),
        }
    }
}

impl From<fw_sim::SimError> for AppError {
    fn from(err: fw_sim::SimError) -> Self {
        match err {
            fw_sim::SimError::Cancelled { step } => AppError::Cancelled { step },
            fw_sim::SimError::TimedOut { step } => AppError::TimedOut { step },
            other => AppError::Simulation(other.to_string()),
        }
    }
}

impl From<fw_core::FwError> for AppError {
    fn from(err: fw_core::FwError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}
