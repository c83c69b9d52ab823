//! Recorded trajectories.

use serde::{Deserialize, Serialize};

/// Angular velocity and applied torque of one controlled plant.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub omega: Vec<f64>,
    pub tau: Vec<f64>,
}

impl Trajectory {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            omega: Vec::with_capacity(capacity),
            tau: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, omega: f64, tau: f64) {
        self.omega.push(omega);
        self.tau.push(tau);
    }

    pub fn len(&self) -> usize {
        self.omega.len()
    }

    pub fn is_empty(&self) -> bool {
        self.omega.is_empty()
    }

    /// Angular velocity at the last recorded sample.
    pub fn final_omega(&self) -> Option<f64> {
        self.omega.last().copied()
    }
}

/// Time base plus the PID trajectory and, in comparison runs, the fuzzy one.
///
/// Every push appends to all sequences, so they always share one length.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleSeries {
    /// Sample times (s), rounded to the millisecond.
    pub time: Vec<f64>,
    pub pid: Trajectory,
    pub fuzzy: Option<Trajectory>,
}

impl SampleSeries {
    pub fn single(capacity: usize) -> Self {
        Self {
            time: Vec::with_capacity(capacity),
            pid: Trajectory::with_capacity(capacity),
            fuzzy: None,
        }
    }

    pub fn comparison(capacity: usize) -> Self {
        Self {
            fuzzy: Some(Trajectory::with_capacity(capacity)),
            ..Self::single(capacity)
        }
    }

    /// Append one PID sample. Only valid on a single-controller series.
    pub fn push(&mut self, time: f64, omega: f64, tau: f64) {
        debug_assert!(self.fuzzy.is_none());
        self.time.push(time);
        self.pid.push(omega, tau);
    }

    /// Append one sample for both controllers. On a single-controller series
    /// the fuzzy sample is dropped.
    pub fn push_pair(&mut self, time: f64, pid: (f64, f64), fuzzy: (f64, f64)) {
        self.time.push(time);
        self.pid.push(pid.0, pid.1);
        if let Some(traj) = self.fuzzy.as_mut() {
            traj.push(fuzzy.0, fuzzy.1);
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}
