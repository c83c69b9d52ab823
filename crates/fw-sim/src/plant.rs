//! Flywheel dynamics.

use fw_core::{Length, Mass, Torque, disc_inertia, floor_positive, kg_m2_value, nm_value};

/// Smallest moment of inertia used as a divisor (kg·m²).
pub const DEFAULT_INERTIA_FLOOR: f64 = 1e-6;

/// State of the flywheel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlantState {
    /// Angular velocity (rad/s)
    pub omega_rad_s: f64,
    /// Elapsed simulated time (s)
    pub time_s: f64,
}

/// Solid-disc flywheel with viscous damping and a constant disturbance.
///
/// ```text
/// I * dω/dt = τ - b·ω - τ_d
/// ```
///
/// where:
/// - I is the moment of inertia (kg·m²), floored to stay a safe divisor
/// - τ is the applied (already saturated) control torque
/// - b is the viscous damping coefficient (N·m·s/rad)
/// - τ_d is the external disturbance torque (N·m)
#[derive(Clone, Debug, PartialEq)]
pub struct Flywheel {
    /// Moment of inertia (kg·m²)
    pub inertia: f64,
    /// Viscous damping coefficient (N·m·s/rad)
    pub damping: f64,
    /// Constant disturbance torque (N·m)
    pub disturbance: f64,
}

impl Flywheel {
    /// Create a flywheel from a raw inertia, flooring it at `inertia_floor`.
    pub fn new(inertia: f64, damping: f64, disturbance: f64, inertia_floor: f64) -> Self {
        Self {
            inertia: floor_positive(inertia, inertia_floor),
            damping,
            disturbance,
        }
    }

    /// Solid disc of `mass` and `radius`: `I = 0.5·m·r²`.
    ///
    /// Zero mass or radius never yields a zero divisor; the inertia is
    /// floored at `inertia_floor`.
    pub fn from_disc(
        mass: Mass,
        radius: Length,
        damping: f64,
        disturbance: Torque,
        inertia_floor: f64,
    ) -> Self {
        let inertia = kg_m2_value(disc_inertia(mass, radius));
        Self::new(inertia, damping, nm_value(disturbance), inertia_floor)
    }

    /// Angular acceleration dω/dt (rad/s²) for applied torque `tau`.
    pub fn angular_acceleration(&self, tau: f64, omega: f64) -> f64 {
        (tau - self.damping * omega - self.disturbance) / self.inertia
    }

    /// Explicit Euler step of size `dt`.
    pub fn advance(&self, state: &PlantState, tau: f64, dt: f64) -> PlantState {
        let domega = self.angular_acceleration(tau, state.omega_rad_s);
        PlantState {
            omega_rad_s: state.omega_rad_s + domega * dt,
            time_s: state.time_s + dt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fw_core::{kg, m, nm};

    #[test]
    fn reference_disc_inertia() {
        let wheel = Flywheel::from_disc(kg(1.0), m(0.5), 0.0, nm(0.0), DEFAULT_INERTIA_FLOOR);
        assert_eq!(wheel.inertia, 0.125);
    }

    #[test]
    fn zero_mass_is_floored() {
        let wheel = Flywheel::from_disc(kg(0.0), m(0.5), 0.0, nm(0.0), DEFAULT_INERTIA_FLOOR);
        assert_eq!(wheel.inertia, DEFAULT_INERTIA_FLOOR);

        let next = wheel.advance(&PlantState::default(), 0.5, 0.001);
        assert!(next.omega_rad_s.is_finite());
    }

    #[test]
    fn reference_first_step() {
        let wheel = Flywheel::from_disc(kg(1.0), m(0.5), 0.0, nm(0.0), DEFAULT_INERTIA_FLOOR);
        assert_eq!(wheel.angular_acceleration(0.5, 0.0), 4.0);

        let next = wheel.advance(&PlantState::default(), 0.5, 0.001);
        assert_eq!(next.omega_rad_s, 0.004);
        assert_eq!(next.time_s, 0.001);
    }

    #[test]
    fn damping_opposes_motion() {
        let wheel = Flywheel::new(1.0, 0.5, 0.0, DEFAULT_INERTIA_FLOOR);
        assert!(wheel.angular_acceleration(0.0, 10.0) < 0.0);
        assert!(wheel.angular_acceleration(0.0, -10.0) > 0.0);
    }

    #[test]
    fn disturbance_decelerates_idle_wheel() {
        let wheel = Flywheel::from_disc(kg(2.0), m(1.0), 0.0, nm(0.1), DEFAULT_INERTIA_FLOOR);
        // I = 1.0, net torque = -0.1
        assert!((wheel.angular_acceleration(0.0, 0.0) + 0.1).abs() < 1e-12);
    }

    #[test]
    fn balanced_torque_holds_speed() {
        let wheel = Flywheel::new(0.2, 0.1, 0.05, DEFAULT_INERTIA_FLOOR);
        // tau = b·ω + τ_d at ω = 2
        let state = PlantState {
            omega_rad_s: 2.0,
            time_s: 0.0,
        };
        let next = wheel.advance(&state, 0.25, 0.001);
        assert!((next.omega_rad_s - 2.0).abs() < 1e-12);
    }
}
