//! Run execution and request handling.

use std::time::{Duration, Instant};

use fw_protocol::{ClientMessage, ServerMessage};
use fw_sim::{
    CancelToken, RunLimits, SimOptions, SimProgress, SimulationOutput, SimulationParameters,
    run_simulation_with_progress,
};
use tracing::info;

use crate::error::AppResult;
use crate::progress::{RunProgressEvent, RunStage};

/// Options for running simulations.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub sim: SimOptions,
    /// Wall-clock budget for one run.
    pub timeout: Option<Duration>,
    pub cancel: Option<CancelToken>,
}

impl RunOptions {
    /// Limits for a run starting now.
    pub fn limits(&self) -> RunLimits {
        let mut limits = RunLimits::none();
        if let Some(token) = &self.cancel {
            limits = limits.with_cancel(token.clone());
        }
        if let Some(timeout) = self.timeout {
            limits = limits.with_timeout(timeout);
        }
        limits
    }
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub output: SimulationOutput,
    pub elapsed_wall_s: f64,
}

impl RunResponse {
    pub fn message(&self) -> ServerMessage {
        ServerMessage::from(&self.output)
    }
}

pub fn run(params: &SimulationParameters, options: &RunOptions) -> AppResult<RunResponse> {
    run_with_progress(params, options, None)
}

pub fn run_with_progress(
    params: &SimulationParameters,
    options: &RunOptions,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mode = params.mode;
    let limits = options.limits();

    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent::stage(mode, RunStage::Simulating, 0.0));
    }

    let output = {
        let mut forward = |p: &SimProgress| {
            if let Some(cb) = progress_cb.as_deref_mut() {
                cb(RunProgressEvent {
                    mode,
                    stage: RunStage::Simulating,
                    elapsed_wall_s: started.elapsed().as_secs_f64(),
                    sim: Some(p.clone()),
                });
            }
        };
        run_simulation_with_progress(params, &options.sim, &limits, Some(&mut forward))?
    };

    let elapsed_wall_s = started.elapsed().as_secs_f64();
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent::stage(mode, RunStage::Completed, elapsed_wall_s));
    }

    Ok(RunResponse {
        output,
        elapsed_wall_s,
    })
}

/// Run the simulation a client message asks for.
pub fn handle_request(message: &ClientMessage, options: &RunOptions) -> AppResult<ServerMessage> {
    match message {
        ClientMessage::StartSimulation(params) => Ok(run(params, options)?.message()),
    }
}

/// Answer one JSON message with the JSON response text.
pub fn handle_message(text: &str, options: &RunOptions) -> AppResult<String> {
    let started = Instant::now();
    let message = ClientMessage::parse(text)?;
    let response = handle_request(&message, options)?;
    let json = response.to_json()?;
    info!(
        bytes = json.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request answered"
    );
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppError;
    use fw_sim::RunMode;

    fn short_options() -> RunOptions {
        RunOptions {
            sim: SimOptions {
                single_step_budget: 2_000,
                comparison_steps: 2_000,
                progress_every: 500,
                ..SimOptions::default()
            },
            ..RunOptions::default()
        }
    }

    #[test]
    fn progress_events_bracket_the_run() {
        let params = SimulationParameters {
            omega_set: 1.0,
            kp: 1.0,
            mode: RunMode::Comparison,
            ..SimulationParameters::default()
        };
        let mut events = Vec::new();
        let mut cb = |e: RunProgressEvent| events.push(e);
        run_with_progress(&params, &short_options(), Some(&mut cb)).unwrap();

        assert_eq!(events.first().map(|e| e.stage), Some(RunStage::Simulating));
        assert_eq!(events.last().map(|e| e.stage), Some(RunStage::Completed));
        let steps: Vec<_> = events
            .iter()
            .filter_map(|e| e.sim.as_ref().map(|p| p.step))
            .collect();
        assert_eq!(steps, vec![500, 1000, 1500, 2000]);
        assert_eq!(events.last().map(|e| e.fraction_complete()), Some(1.0));
    }

    #[test]
    fn cancelled_token_stops_run() {
        let token = CancelToken::new();
        token.cancel();
        let options = RunOptions {
            cancel: Some(token),
            ..short_options()
        };
        let err = run(&SimulationParameters::default(), &options).unwrap_err();
        assert!(matches!(err, AppError::Cancelled { step: 1 }));
    }

    #[test]
    fn expired_timeout_stops_run() {
        let options = RunOptions {
            timeout: Some(Duration::ZERO),
            ..short_options()
        };
        let err = run(&SimulationParameters::default(), &options).unwrap_err();
        assert!(matches!(err, AppError::TimedOut { step: 1 }));
    }

    #[test]
    fn unknown_message_is_a_protocol_error() {
        let err = handle_message(r#"{"type": "pause"}"#, &short_options()).unwrap_err();
        assert!(matches!(err, AppError::Protocol(_)));
        let err = handle_message("not json", &short_options()).unwrap_err();
        assert!(matches!(err, AppError::Protocol(_)));
    }
}
