//! Run statistics.

use serde::{Deserialize, Serialize};

/// Running integral of a magnitude, `∫|x| dt` by rectangles.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AbsIntegral {
    sum: f64,
}

impl AbsIntegral {
    #[inline]
    pub fn add(&mut self, value: f64, dt: f64) {
        self.sum += value.abs() * dt;
    }

    pub fn value(&self) -> f64 {
        self.sum
    }
}

/// Summary of one controller's run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Start of the qualifying dwell, `None` if the run never settled or
    /// settling was not tracked.
    pub settling_time: Option<f64>,
    /// Setpoint minus final angular velocity.
    pub steady_state_error: f64,
    /// `∫|setpoint - ω| dt` accumulated during the loop.
    pub integral_error: f64,
    /// `∫|τ| dt` over the recorded torques; single-mode only.
    pub integral_tau_abs: Option<f64>,
}

/// Setpoint minus the last sample; the setpoint itself for an empty series.
pub fn steady_state_error(setpoint: f64, omega: &[f64]) -> f64 {
    setpoint - omega.last().copied().unwrap_or(0.0)
}

/// Sum of `|τ|` over every recorded sample, times `dt`.
pub fn integral_abs(values: &[f64], dt: f64) -> f64 {
    values.iter().map(|v| v.abs()).sum::<f64>() * dt
}
