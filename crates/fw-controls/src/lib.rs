//! Controllers for the flywheel control workbench.
//!
//! This crate holds the two feedback laws exercised against the rotational
//! plant. Both compute an unsaturated torque command from a setpoint and the
//! measured angular velocity; saturation to the actuator limit is applied by
//! the caller with [`saturate`].
//!
//! # Controllers
//!
//! - **PID**: proportional, integral and backward-difference derivative terms
//!   with no anti-windup.
//! - **Fuzzy**: Mamdani-style inference over five triangular linguistic sets,
//!   a 5×5 singleton rule table, min-based firing and weighted-average
//!   defuzzification.
//!
//! # Design Principles
//!
//! - **Pure updates**: `update` takes the previous state by reference and
//!   returns the next state alongside the output, so one run never observes
//!   another run's state.
//! - **Static tables**: membership peaks and the default rule table are
//!   immutable and shared read-only.

pub mod controller;
pub mod error;
pub mod fuzzy;
pub mod membership;
pub mod rules;

pub use controller::{PidController, PidGains, PidState, saturate};
pub use error::{ControlError, ControlResult};
pub use fuzzy::{FuzzyController, FuzzyState, RuleActivation, defuzzify, fired_rules, infer};
pub use membership::{LinguisticSet, Memberships, fuzzify, membership};
pub use rules::{DEFAULT_RULES, RuleTable};
