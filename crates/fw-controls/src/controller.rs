//! PID controller block.
//!
//! Discrete PID with:
//! - Rectangular (forward) integral accumulation
//! - Backward-difference derivative on the error
//! - No anti-windup and no internal output clamp
//!
//! The derivative uses the previous error, which starts at zero. The first
//! update after a step in setpoint therefore produces a spike of
//! `kd * error / dt`.

use fw_core::clamp_symmetric;
use serde::{Deserialize, Serialize};

/// PID gains.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidGains {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain.
    pub ki: f64,
    /// Derivative gain.
    pub kd: f64,
}

impl PidGains {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }
}

/// PID controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PidController {
    pub gains: PidGains,
}

impl PidController {
    /// Create a new PID controller. All-zero gains give a zero command.
    pub fn new(gains: PidGains) -> Self {
        Self { gains }
    }

    /// Compute the unsaturated torque command.
    ///
    /// # Arguments
    ///
    /// * `state` - Controller state from the previous step
    /// * `pv` - Process variable (measured angular velocity)
    /// * `sp` - Setpoint
    /// * `dt` - Step size (seconds)
    ///
    /// # Returns
    ///
    /// Updated state and raw output.
    pub fn update(&self, state: &PidState, pv: f64, sp: f64, dt: f64) -> (PidState, f64) {
        let error = sp - pv;

        let integral = state.integral + error * dt;
        let derivative = (error - state.prev_error) / dt;

        let output = self.gains.kp * error + self.gains.ki * integral + self.gains.kd * derivative;

        let new_state = PidState {
            integral,
            prev_error: error,
        };

        (new_state, output)
    }
}

/// PID controller state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidState {
    /// Integral accumulator.
    pub integral: f64,
    /// Error seen on the previous update.
    pub prev_error: f64,
}

/// Clamp a torque command to the actuator limit `[-limit, limit]`.
pub fn saturate(command: f64, limit: f64) -> f64 {
    clamp_symmetric(command, limit)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn saturated_command_within_limit(
            kp in -100.0_f64..100.0,
            kd in -10.0_f64..10.0,
            pv in -50.0_f64..50.0,
            sp in -50.0_f64..50.0,
            limit in 0.01_f64..10.0,
        ) {
            let pid = PidController::new(PidGains::new(kp, 0.0, kd));
            let (_, raw) = pid.update(&PidState::default(), pv, sp, 0.001);
            let tau = saturate(raw, limit);
            prop_assert!(tau >= -limit && tau <= limit);
        }
    }
}
