//! Fixed-step simulation of a flywheel under closed-loop control.
//!
//! Provides:
//! - Flywheel plant with viscous damping and a constant disturbance torque
//! - Forward-Euler stepping at a fixed `dt`
//! - Dwell-time settling detection
//! - Single (PID) and comparison (PID vs fuzzy) run modes
//! - Per-step cancellation and deadline checks

pub mod cancel;
pub mod error;
pub mod params;
pub mod plant;
pub mod series;
pub mod settling;
pub mod sim;
pub mod stats;

// Re-exports for public API
pub use cancel::{CancelToken, RunLimits};
pub use error::{SimError, SimResult};
pub use params::{RunMode, SimulationParameters};
pub use plant::{Flywheel, PlantState};
pub use series::{SampleSeries, Trajectory};
pub use settling::{SettlingDetector, SettlingPhase};
pub use sim::{
    SimOptions, SimProgress, SimulationOutput, run_simulation, run_simulation_with_progress,
};
pub use stats::{AbsIntegral, RunStatistics};
