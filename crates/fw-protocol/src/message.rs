//! Request and response envelopes.
//!
//! Both directions use `{"type": ..., "payload": {...}}`.

use fw_sim::{RunMode, SimulationOutput, SimulationParameters};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::params::resolve_parameters;
use crate::{ProtocolError, ProtocolResult};

pub const START_SIMULATION: &str = "start_simulation";

/// Reported as `settling_time` when a single-mode run never settled.
pub const UNSETTLED_SENTINEL: f64 = -1.0;

/// Message sent by a client.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    StartSimulation(SimulationParameters),
}

impl ClientMessage {
    /// Parse a message from JSON text.
    pub fn parse(text: &str) -> ProtocolResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Interpret a decoded envelope. A missing payload resolves to defaults.
    pub fn from_value(value: &Value) -> ProtocolResult<Self> {
        match value.get("type").and_then(Value::as_str) {
            Some(START_SIMULATION) => {
                let payload = value.get("payload").unwrap_or(&Value::Null);
                Ok(Self::StartSimulation(resolve_parameters(payload)))
            }
            Some(other) => Err(ProtocolError::UnknownMessage {
                kind: other.to_string(),
            }),
            None => Err(ProtocolError::UnknownMessage {
                kind: "<missing>".to_string(),
            }),
        }
    }
}

/// Message sent back to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerMessage {
    SimulationData(SimulationData),
}

impl ServerMessage {
    pub fn to_json(&self) -> ProtocolResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<&SimulationOutput> for ServerMessage {
    fn from(output: &SimulationOutput) -> Self {
        Self::SimulationData(SimulationData::from(output))
    }
}

/// Trajectories and statistics of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationData {
    pub time: Vec<f64>,
    pub omega: Vec<f64>,
    pub tau: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub omega_fuzzy: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tau_fuzzy: Option<Vec<f64>>,
    pub omega_set: f64,
    pub stats: StatsPayload,
}

impl From<&SimulationOutput> for SimulationData {
    fn from(output: &SimulationOutput) -> Self {
        let series = &output.series;
        Self {
            time: series.time.clone(),
            omega: series.pid.omega.clone(),
            tau: series.pid.tau.clone(),
            omega_fuzzy: series.fuzzy.as_ref().map(|f| f.omega.clone()),
            tau_fuzzy: series.fuzzy.as_ref().map(|f| f.tau.clone()),
            omega_set: output.setpoint,
            stats: StatsPayload::from(output),
        }
    }
}

/// Statistics block of a `simulation_data` payload.
///
/// Single mode reports `settling_time` (`-1` when unsettled) and
/// `integral_tau_abs`; comparison mode reports the fuzzy pair instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settling_time: Option<f64>,
    pub steady_state_error: f64,
    pub integral_error: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integral_tau_abs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steady_state_error_fuzzy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integral_error_fuzzy: Option<f64>,
}

impl StatsPayload {
    /// Settling time with the sentinel replaced by `None`.
    pub fn settled_at(&self) -> Option<f64> {
        self.settling_time.filter(|t| *t >= 0.0)
    }
}

impl From<&SimulationOutput> for StatsPayload {
    fn from(output: &SimulationOutput) -> Self {
        let stats = &output.stats;
        let settling_time = match output.mode {
            RunMode::Single => Some(stats.settling_time.unwrap_or(UNSETTLED_SENTINEL)),
            RunMode::Comparison => None,
        };
        Self {
            settling_time,
            steady_state_error: stats.steady_state_error,
            integral_error: stats.integral_error,
            integral_tau_abs: stats.integral_tau_abs,
            steady_state_error_fuzzy: output.fuzzy_stats.as_ref().map(|s| s.steady_state_error),
            integral_error_fuzzy: output.fuzzy_stats.as_ref().map(|s| s.integral_error),
        }
    }
}
