//! fw-core: stable foundation for the flywheel control workbench.
//!
//! Contains:
//! - units (uom SI types + constructors for the rotational plant)
//! - numeric (Real + float helpers: floor, symmetric clamp, rounding)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{FwError, FwResult};
pub use numeric::*;
pub use units::*;
