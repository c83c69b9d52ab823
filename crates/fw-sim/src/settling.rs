//! Dwell-time settling detection.
//!
//! A signal has settled once it has stayed inside a symmetric band around the
//! setpoint for a continuous dwell. Leaving the band resets the dwell timer.
//! The settling time reported is the start of the qualifying dwell.

/// Relative half-width of the tolerance band.
pub const RELATIVE_TOLERANCE: f64 = 0.01;
/// Lower bound on the band half-width, for setpoints near zero.
pub const MIN_TOLERANCE: f64 = 0.01;
/// Default dwell required inside the band (s).
pub const DEFAULT_DWELL_S: f64 = 10.0;

/// Detector state after an observation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SettlingPhase {
    OutsideBand,
    InsideBand { dwell_s: f64 },
    /// Entered the band at `settling_time_s` and stayed for the full dwell.
    Settled { settling_time_s: f64 },
}

#[derive(Clone, Debug)]
pub struct SettlingDetector {
    lower: f64,
    upper: f64,
    dwell_required_s: f64,
    dwell_s: f64,
    settled_at: Option<f64>,
}

impl SettlingDetector {
    /// Band of `±max(1% |setpoint|, 0.01)` around `setpoint`.
    pub fn new(setpoint: f64, dwell_required_s: f64) -> Self {
        let tolerance = (RELATIVE_TOLERANCE * setpoint.abs()).max(MIN_TOLERANCE);
        Self {
            lower: setpoint - tolerance,
            upper: setpoint + tolerance,
            dwell_required_s,
            dwell_s: 0.0,
            settled_at: None,
        }
    }

    pub fn band(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }

    pub fn settling_time(&self) -> Option<f64> {
        self.settled_at
    }

    /// Record `omega` at simulated `time_s` after a step of `dt`.
    ///
    /// Once settled, further observations are ignored.
    pub fn observe(&mut self, omega: f64, time_s: f64, dt: f64) -> SettlingPhase {
        if let Some(settling_time_s) = self.settled_at {
            return SettlingPhase::Settled { settling_time_s };
        }

        if self.lower <= omega && omega <= self.upper {
            self.dwell_s += dt;
            if self.dwell_s >= self.dwell_required_s {
                let settling_time_s = time_s - self.dwell_s;
                self.settled_at = Some(settling_time_s);
                return SettlingPhase::Settled { settling_time_s };
            }
            SettlingPhase::InsideBand {
                dwell_s: self.dwell_s,
            }
        } else {
            self.dwell_s = 0.0;
            SettlingPhase::OutsideBand
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_has_minimum_width() {
        let det = SettlingDetector::new(0.0, DEFAULT_DWELL_S);
        assert_eq!(det.band(), (-0.01, 0.01));

        let det = SettlingDetector::new(-200.0, DEFAULT_DWELL_S);
        assert_eq!(det.band(), (-202.0, -198.0));
    }

    #[test]
    fn settles_after_dwell() {
        let mut det = SettlingDetector::new(1.0, 0.45);
        let dt = 0.1;
        let mut t = 0.0;
        let mut phase = SettlingPhase::OutsideBand;

        // 2 samples outside, then inside for good
        for omega in [0.5, 0.9, 1.0, 1.0, 1.0, 1.0, 1.0] {
            t += dt;
            phase = det.observe(omega, t, dt);
            if matches!(phase, SettlingPhase::Settled { .. }) {
                break;
            }
        }

        match phase {
            SettlingPhase::Settled { settling_time_s } => {
                assert!((settling_time_s - 0.2).abs() < 1e-9);
            }
            other => panic!("expected settled, got {other:?}"),
        }
    }

    #[test]
    fn excursion_resets_dwell() {
        let mut det = SettlingDetector::new(1.0, 0.3);
        let dt = 0.1;
        assert!(matches!(det.observe(1.0, 0.1, dt), SettlingPhase::InsideBand { .. }));
        assert!(matches!(det.observe(1.0, 0.2, dt), SettlingPhase::InsideBand { .. }));
        assert_eq!(det.observe(1.5, 0.3, dt), SettlingPhase::OutsideBand);

        match det.observe(1.0, 0.4, dt) {
            SettlingPhase::InsideBand { dwell_s } => assert!((dwell_s - 0.1).abs() < 1e-12),
            other => panic!("expected inside band, got {other:?}"),
        }
        assert_eq!(det.settling_time(), None);
    }

    #[test]
    fn band_edges_are_inside() {
        let mut det = SettlingDetector::new(0.0, 1.0);
        assert!(matches!(det.observe(0.01, 0.1, 0.1), SettlingPhase::InsideBand { .. }));
        assert!(matches!(det.observe(-0.01, 0.2, 0.1), SettlingPhase::InsideBand { .. }));
    }

    #[test]
    fn nan_is_outside() {
        let mut det = SettlingDetector::new(0.0, 1.0);
        assert_eq!(det.observe(f64::NAN, 0.1, 0.1), SettlingPhase::OutsideBand);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn settles_at_start_of_first_full_dwell(inside in prop::collection::vec(any::<bool>(), 0..40)) {
            // Unit steps keep the timer arithmetic exact
            let mut det = SettlingDetector::new(1.0, 3.0);
            let mut run = 0;
            let mut expected = None;
            for (k, &is_in) in inside.iter().enumerate() {
                run = if is_in { run + 1 } else { 0 };
                if run == 3 && expected.is_none() {
                    expected = Some((k + 1 - 3) as f64);
                }
                let omega = if is_in { 1.0 } else { 2.0 };
                det.observe(omega, (k + 1) as f64, 1.0);
            }
            prop_assert_eq!(det.settling_time(), expected);
        }
    }
}
