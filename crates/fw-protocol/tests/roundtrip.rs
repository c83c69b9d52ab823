//! Request in, response out: the wire contract end to end.

use fw_protocol::{ClientMessage, ServerMessage, load_parameters, save_parameters};
use fw_sim::{RunMode, SimOptions, SimulationParameters, run_simulation};
use serde_json::Value;

fn respond(request: &str) -> Value {
    let ClientMessage::StartSimulation(params) = ClientMessage::parse(request).unwrap();
    let output = run_simulation(&params, &SimOptions::default()).unwrap();
    let text = ServerMessage::from(&output).to_json().unwrap();
    serde_json::from_str(&text).unwrap()
}

fn array_len(value: &Value) -> usize {
    value.as_array().map(Vec::len).unwrap_or(0)
}

#[test]
fn single_request_response() {
    let response = respond(
        r#"{"type": "start_simulation",
            "payload": {"mass": 1.0, "radius": 0.5, "omega_set": 1.0,
                        "Kp": 1.0, "Ki": 0.0, "Kd": 0.0, "maxMoment": 0.5}}"#,
    );

    assert_eq!(response["type"], "simulation_data");
    let payload = &response["payload"];
    let n = array_len(&payload["time"]);
    assert!(n > 1 && n < 120_001);
    assert_eq!(array_len(&payload["omega"]), n);
    assert_eq!(array_len(&payload["tau"]), n);
    assert_eq!(payload["omega_set"], 1.0);
    assert_eq!(payload["time"][1], 0.001);
    assert_eq!(payload["tau"][1], 0.5);

    let stats = &payload["stats"];
    let settling = stats["settling_time"].as_f64().unwrap();
    assert!(settling > 0.0);
    assert!(stats["integral_tau_abs"].as_f64().unwrap() > 0.0);
    assert!(stats.get("steady_state_error_fuzzy").is_none());
}

#[test]
fn unsettled_run_reports_sentinel() {
    let response = respond(
        r#"{"type": "start_simulation",
            "payload": {"omega_set": 10.0, "Kp": 1.0, "b": 0.1, "maxMoment": 0.01}}"#,
    );
    let payload = &response["payload"];
    assert_eq!(payload["stats"]["settling_time"], -1.0);
    assert_eq!(array_len(&payload["time"]), 120_001);
}

#[test]
fn comparison_request_response() {
    let response = respond(
        r#"{"type": "start_simulation",
            "payload": {"omega_set": 1.0, "kp": 1.0, "ki": 0.0, "kd": 0.0}}"#,
    );
    let payload = &response["payload"];
    for key in ["time", "omega", "tau", "omega_fuzzy", "tau_fuzzy"] {
        assert_eq!(array_len(&payload[key]), 5_001, "{key}");
    }

    let stats = &payload["stats"];
    assert!(stats.get("settling_time").is_none());
    assert!(stats.get("integral_tau_abs").is_none());
    assert!(stats["steady_state_error_fuzzy"].is_f64());
    assert!(stats["integral_error_fuzzy"].as_f64().unwrap() > 0.0);
}

#[test]
fn default_request_is_quiescent() {
    let response = respond(r#"{"type": "start_simulation", "payload": {}}"#);
    let payload = &response["payload"];
    let omega = payload["omega"].as_array().unwrap();
    assert!(omega.iter().all(|w| w.as_f64() == Some(0.0)));
    assert_eq!(payload["stats"]["settling_time"], 0.0);
}

#[test]
fn parameter_files_round_trip() {
    let dir = std::env::temp_dir().join(format!("fw-protocol-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let params = SimulationParameters {
        omega_set: 2.5,
        kp: 0.8,
        ki: 0.1,
        max_torque: 1.2,
        mode: RunMode::Comparison,
        ..SimulationParameters::default()
    };
    for name in ["params.yaml", "params.json"] {
        let path = dir.join(name);
        save_parameters(&path, &params).unwrap();
        assert_eq!(load_parameters(&path).unwrap(), params, "{name}");
    }

    let partial = dir.join("partial.yml");
    std::fs::write(&partial, "omega_set: 3\nkp: 2.0\n").unwrap();
    let loaded = load_parameters(&partial).unwrap();
    assert_eq!(loaded.omega_set, 3.0);
    assert_eq!(loaded.mode, RunMode::Comparison);

    std::fs::remove_dir_all(&dir).unwrap();
}
