//! Parallel gain sweeps.
//!
//! One gain is varied over linearly spaced points while every other
//! parameter stays fixed. Each point is an independent run with its own
//! controller and plant state, so points are simulated in parallel.

use std::fmt;
use std::str::FromStr;

use fw_core::ensure_finite;
use fw_sim::{RunStatistics, SimulationParameters, run_simulation_with_progress};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::run_service::RunOptions;

/// Which PID gain a sweep varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepGain {
    Kp,
    Ki,
    Kd,
}

impl SweepGain {
    /// Copy of `base` with this gain replaced by `value`.
    pub fn apply(self, base: &SimulationParameters, value: f64) -> SimulationParameters {
        let mut params = base.clone();
        match self {
            SweepGain::Kp => params.kp = value,
            SweepGain::Ki => params.ki = value,
            SweepGain::Kd => params.kd = value,
        }
        params
    }
}

impl fmt::Display for SweepGain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Kp => "Kp",
            Self::Ki => "Ki",
            Self::Kd => "Kd",
        })
    }
}

impl FromStr for SweepGain {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kp" => Ok(Self::Kp),
            "ki" => Ok(Self::Ki),
            "kd" => Ok(Self::Kd),
            other => Err(AppError::InvalidInput(format!("unknown gain '{other}'"))),
        }
    }
}

/// Definition of a single gain sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepDefinition {
    pub gain: SweepGain,
    pub start: f64,
    pub end: f64,
    pub num_points: usize,
}

impl SweepDefinition {
    pub fn new(gain: SweepGain, start: f64, end: f64, num_points: usize) -> AppResult<Self> {
        ensure_finite(start, "sweep start")?;
        ensure_finite(end, "sweep end")?;

        if num_points < 2 {
            return Err(AppError::InvalidInput(
                "Sweep must have at least 2 points".to_string(),
            ));
        }

        if (start - end).abs() < 1e-12 {
            return Err(AppError::InvalidInput(
                "Start and end values must be different".to_string(),
            ));
        }

        Ok(Self {
            gain,
            start,
            end,
            num_points,
        })
    }

    /// Uniformly spaced values, ending exactly on `end`.
    pub fn generate_points(&self) -> Vec<f64> {
        let delta = (self.end - self.start) / (self.num_points - 1) as f64;
        let mut points: Vec<f64> = (0..self.num_points)
            .map(|i| self.start + i as f64 * delta)
            .collect();
        points[self.num_points - 1] = self.end;
        points
    }
}

impl fmt::Display for SweepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sweep {} from {} to {} ({} points)",
            self.gain, self.start, self.end, self.num_points
        )
    }
}

/// Outcome of one sweep point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub value: f64,
    pub steps: usize,
    pub stats: RunStatistics,
    pub fuzzy_stats: Option<RunStatistics>,
}

/// Run every point of `sweep` against `base`, in point order.
///
/// Stops at the first failing point (cancellation or timeout).
pub fn run_sweep(
    base: &SimulationParameters,
    sweep: &SweepDefinition,
    options: &RunOptions,
) -> AppResult<Vec<SweepPoint>> {
    let limits = options.limits();
    debug!(%sweep, mode = base.mode.label(), "starting sweep");

    sweep
        .generate_points()
        .into_par_iter()
        .map(|value| -> AppResult<SweepPoint> {
            let params = sweep.gain.apply(base, value);
            let output = run_simulation_with_progress(&params, &options.sim, &limits, None)?;
            Ok(SweepPoint {
                value,
                steps: output.steps,
                stats: output.stats,
                fuzzy_stats: output.fuzzy_stats,
            })
        })
        .collect()
}
