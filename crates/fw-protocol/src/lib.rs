//! fw-protocol: wire messages and parameter files.
//!
//! A host delivers a `start_simulation` message whose payload names the
//! parameters of one run and answers with a `simulation_data` message.
//! Payload resolution never fails: missing or malformed fields take their
//! documented defaults.

pub mod message;
pub mod params;

use std::path::Path;

use fw_sim::SimulationParameters;

pub use message::{
    ClientMessage, START_SIMULATION, ServerMessage, SimulationData, StatsPayload,
    UNSETTLED_SENTINEL,
};
pub use params::{infer_mode, resolve_parameters, to_payload};

pub type ProtocolResult<T> = Result<T, ProtocolError>;

#[derive(thiserror::Error, Debug)]
pub enum ProtocolError {
    #[error("Unknown message type: {kind}")]
    UnknownMessage { kind: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> ProtocolResult<SimulationParameters> {
    let content = std::fs::read_to_string(path)?;
    let payload: serde_json::Value = serde_yaml::from_str(&content)?;
    Ok(resolve_parameters(&payload))
}

pub fn save_yaml(path: &Path, params: &SimulationParameters) -> ProtocolResult<()> {
    let content = serde_yaml::to_string(&to_payload(params))?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProtocolResult<SimulationParameters> {
    let content = std::fs::read_to_string(path)?;
    let payload: serde_json::Value = serde_json::from_str(&content)?;
    Ok(resolve_parameters(&payload))
}

pub fn save_json(path: &Path, params: &SimulationParameters) -> ProtocolResult<()> {
    let content = serde_json::to_string_pretty(&to_payload(params))?;
    std::fs::write(path, content)?;
    Ok(())
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

/// Load parameters from a `.yaml`/`.yml` file, or JSON for any other extension.
pub fn load_parameters(path: &Path) -> ProtocolResult<SimulationParameters> {
    if is_yaml(path) {
        load_yaml(path)
    } else {
        load_json(path)
    }
}

/// Save parameters in the format implied by the file extension.
pub fn save_parameters(path: &Path, params: &SimulationParameters) -> ProtocolResult<()> {
    if is_yaml(path) {
        save_yaml(path, params)
    } else {
        save_json(path, params)
    }
}
