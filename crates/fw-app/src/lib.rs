//! Shared application service layer for the flywheel simulator.
//!
//! This crate gives the CLI and any message-driven host one entry point for
//! running simulations, answering protocol requests, sweeping gains, and
//! exporting trajectories.

pub mod error;
pub mod export;
pub mod progress;
pub mod run_service;
pub mod sweep;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use export::{series_to_csv, write_csv};
pub use progress::{RunProgressEvent, RunStage};
pub use run_service::{
    RunOptions, RunResponse, handle_message, handle_request, run, run_with_progress,
};
pub use sweep::{SweepDefinition, SweepGain, SweepPoint, run_sweep};
