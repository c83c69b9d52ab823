//! Per-run parameter set.

use fw_controls::PidGains;
use serde::{Deserialize, Serialize};

/// Which controllers a run exercises.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// PID only, with settling detection and early exit.
    #[default]
    Single,
    /// PID and fuzzy side by side over a fixed horizon.
    Comparison,
}

impl RunMode {
    pub fn label(&self) -> &'static str {
        match self {
            RunMode::Single => "single",
            RunMode::Comparison => "comparison",
        }
    }
}

/// Fully resolved parameters for one run. Defaults produce a zero-torque run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Flywheel mass (kg)
    pub mass: f64,
    /// Flywheel radius (m)
    pub radius: f64,
    /// Target angular velocity (rad/s)
    pub omega_set: f64,
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// Viscous damping coefficient (N·m·s/rad)
    pub b: f64,
    /// Constant external torque (N·m)
    pub disturbance: f64,
    /// Actuator torque limit (N·m)
    pub max_torque: f64,
    pub mode: RunMode,
}

impl SimulationParameters {
    pub fn gains(&self) -> PidGains {
        PidGains::new(self.kp, self.ki, self.kd)
    }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            mass: 1.0,
            radius: 0.5,
            omega_set: 0.0,
            kp: 0.0,
            ki: 0.0,
            kd: 0.0,
            b: 0.0,
            disturbance: 0.0,
            max_torque: 0.5,
            mode: RunMode::Single,
        }
    }
}
