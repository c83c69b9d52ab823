//! Simulation runner and result recording.

use fw_controls::{FuzzyController, FuzzyState, PidController, PidState, saturate};
use fw_core::{kg, m, nm, round_to};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cancel::RunLimits;
use crate::error::{SimError, SimResult};
use crate::params::{RunMode, SimulationParameters};
use crate::plant::{DEFAULT_INERTIA_FLOOR, Flywheel, PlantState};
use crate::series::SampleSeries;
use crate::settling::{DEFAULT_DWELL_S, SettlingDetector, SettlingPhase};
use crate::stats::{AbsIntegral, RunStatistics, integral_abs, steady_state_error};

/// Engine constants for simulation runs.
#[derive(Clone, Debug, PartialEq)]
pub struct SimOptions {
    /// Fixed time step (seconds)
    pub dt: f64,
    /// Maximum steps in single mode before giving up on settling
    pub single_step_budget: usize,
    /// Exact step count in comparison mode
    pub comparison_steps: usize,
    /// Continuous time inside the band required to count as settled (seconds)
    pub settling_dwell_s: f64,
    /// Smallest moment of inertia used as a divisor (kg·m²)
    pub inertia_floor: f64,
    /// Report progress every N steps
    pub progress_every: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: 1e-3,
            single_step_budget: 120_000,
            comparison_steps: 5_000,
            settling_dwell_s: DEFAULT_DWELL_S,
            inertia_floor: DEFAULT_INERTIA_FLOOR,
            progress_every: 1_000,
        }
    }
}

impl SimOptions {
    /// Step budget for `mode`.
    pub fn steps_for(&self, mode: RunMode) -> usize {
        match mode {
            RunMode::Single => self.single_step_budget,
            RunMode::Comparison => self.comparison_steps,
        }
    }

    fn validate(&self, mode: RunMode) -> SimResult<()> {
        if self.dt.is_nan() || self.dt <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if self.steps_for(mode) == 0 {
            return Err(SimError::InvalidArg {
                what: "step budget must be positive",
            });
        }
        Ok(())
    }
}

/// Progress snapshot handed to the progress callback.
#[derive(Clone, Debug, PartialEq)]
pub struct SimProgress {
    pub step: usize,
    pub total_steps: usize,
    pub sim_time_s: f64,
    pub fraction_complete: f64,
}

/// Everything a run produces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub mode: RunMode,
    pub setpoint: f64,
    /// Loop iterations executed; the series holds `steps + 1` samples.
    pub steps: usize,
    pub series: SampleSeries,
    /// PID statistics.
    pub stats: RunStatistics,
    /// Fuzzy statistics, comparison mode only.
    pub fuzzy_stats: Option<RunStatistics>,
}

/// Run one simulation to completion.
pub fn run_simulation(
    params: &SimulationParameters,
    opts: &SimOptions,
) -> SimResult<SimulationOutput> {
    run_simulation_with_progress(params, opts, &RunLimits::none(), None)
}

/// Run one simulation, polling `limits` every step and reporting progress
/// every `opts.progress_every` steps.
pub fn run_simulation_with_progress(
    params: &SimulationParameters,
    opts: &SimOptions,
    limits: &RunLimits,
    progress: Option<&mut dyn FnMut(&SimProgress)>,
) -> SimResult<SimulationOutput> {
    opts.validate(params.mode)?;

    let plant = Flywheel::from_disc(
        kg(params.mass),
        m(params.radius),
        params.b,
        nm(params.disturbance),
        opts.inertia_floor,
    );
    debug!(
        mode = params.mode.label(),
        setpoint = params.omega_set,
        inertia = plant.inertia,
        kp = params.kp,
        ki = params.ki,
        kd = params.kd,
        max_torque = params.max_torque,
        "starting simulation"
    );

    let result = match params.mode {
        RunMode::Single => run_single(params, opts, &plant, limits, progress),
        RunMode::Comparison => run_comparison(params, opts, &plant, limits, progress),
    };

    match &result {
        Ok(output) => info!(
            mode = output.mode.label(),
            steps = output.steps,
            settling_time = ?output.stats.settling_time,
            steady_state_error = output.stats.steady_state_error,
            integral_error = output.stats.integral_error,
            "simulation finished"
        ),
        Err(err) => warn!(error = %err, "simulation stopped"),
    }
    result
}

fn report(
    progress: &mut Option<&mut dyn FnMut(&SimProgress)>,
    opts: &SimOptions,
    step: usize,
    total_steps: usize,
    sim_time_s: f64,
) {
    if opts.progress_every == 0 || step % opts.progress_every != 0 {
        return;
    }
    if let Some(cb) = progress.as_mut() {
        cb(&SimProgress {
            step,
            total_steps,
            sim_time_s,
            fraction_complete: step as f64 / total_steps as f64,
        });
    }
}

/// PID only; stops early once the speed has settled.
fn run_single(
    params: &SimulationParameters,
    opts: &SimOptions,
    plant: &Flywheel,
    limits: &RunLimits,
    mut progress: Option<&mut dyn FnMut(&SimProgress)>,
) -> SimResult<SimulationOutput> {
    let dt = opts.dt;
    let sp = params.omega_set;
    let budget = opts.single_step_budget;

    let pid = PidController::new(params.gains());
    let mut pid_state = PidState::default();
    let mut state = PlantState::default();
    let mut detector = SettlingDetector::new(sp, opts.settling_dwell_s);
    let mut iae = AbsIntegral::default();

    let mut series = SampleSeries::single(budget.min(1 << 16) + 1);
    series.push(state.time_s, state.omega_rad_s, 0.0);

    let mut steps = 0;
    for step in 1..=budget {
        limits.check(step)?;

        let (next_pid, raw) = pid.update(&pid_state, state.omega_rad_s, sp, dt);
        pid_state = next_pid;
        iae.add(sp - state.omega_rad_s, dt);

        let tau = saturate(raw, params.max_torque);
        state = plant.advance(&state, tau, dt);
        series.push(round_to(state.time_s, 3), state.omega_rad_s, tau);
        steps = step;

        if let SettlingPhase::Settled { settling_time_s } =
            detector.observe(state.omega_rad_s, state.time_s, dt)
        {
            debug!(step, settling_time_s, "speed settled");
            break;
        }

        report(&mut progress, opts, step, budget, state.time_s);
    }

    let stats = RunStatistics {
        settling_time: detector.settling_time(),
        steady_state_error: steady_state_error(sp, &series.pid.omega),
        integral_error: iae.value(),
        integral_tau_abs: Some(integral_abs(&series.pid.tau, dt)),
    };

    Ok(SimulationOutput {
        mode: RunMode::Single,
        setpoint: sp,
        steps,
        series,
        stats,
        fuzzy_stats: None,
    })
}

/// PID and fuzzy against identical plants for a fixed number of steps.
fn run_comparison(
    params: &SimulationParameters,
    opts: &SimOptions,
    plant: &Flywheel,
    limits: &RunLimits,
    mut progress: Option<&mut dyn FnMut(&SimProgress)>,
) -> SimResult<SimulationOutput> {
    let dt = opts.dt;
    let sp = params.omega_set;
    let total = opts.comparison_steps;

    let pid = PidController::new(params.gains());
    let fuzzy = FuzzyController::new(params.max_torque);
    let mut pid_state = PidState::default();
    let mut fuzzy_state = FuzzyState::default();
    let mut pid_plant = PlantState::default();
    let mut fuzzy_plant = PlantState::default();
    let mut pid_iae = AbsIntegral::default();
    let mut fuzzy_iae = AbsIntegral::default();

    let mut series = SampleSeries::comparison(total + 1);
    series.push_pair(0.0, (0.0, 0.0), (0.0, 0.0));

    for step in 1..=total {
        limits.check(step)?;

        let (next_pid, raw_pid) = pid.update(&pid_state, pid_plant.omega_rad_s, sp, dt);
        pid_state = next_pid;
        pid_iae.add(sp - pid_plant.omega_rad_s, dt);
        let tau_pid = saturate(raw_pid, params.max_torque);

        let (next_fuzzy, raw_fuzzy) = fuzzy.update(&fuzzy_state, fuzzy_plant.omega_rad_s, sp);
        fuzzy_state = next_fuzzy;
        fuzzy_iae.add(sp - fuzzy_plant.omega_rad_s, dt);
        let tau_fuzzy = saturate(raw_fuzzy, params.max_torque);

        pid_plant = plant.advance(&pid_plant, tau_pid, dt);
        fuzzy_plant = plant.advance(&fuzzy_plant, tau_fuzzy, dt);

        series.push_pair(
            round_to(pid_plant.time_s, 3),
            (pid_plant.omega_rad_s, tau_pid),
            (fuzzy_plant.omega_rad_s, tau_fuzzy),
        );

        report(&mut progress, opts, step, total, pid_plant.time_s);
    }

    let stats = RunStatistics {
        settling_time: None,
        steady_state_error: steady_state_error(sp, &series.pid.omega),
        integral_error: pid_iae.value(),
        integral_tau_abs: None,
    };
    let fuzzy_stats = series.fuzzy.as_ref().map(|traj| RunStatistics {
        settling_time: None,
        steady_state_error: steady_state_error(sp, &traj.omega),
        integral_error: fuzzy_iae.value(),
        integral_tau_abs: None,
    });

    Ok(SimulationOutput {
        mode: RunMode::Comparison,
        setpoint: sp,
        steps: total,
        series,
        stats,
        fuzzy_stats,
    })
}
