//! Lenient resolution of request payloads into [`SimulationParameters`].
//!
//! Every field is optional. A field that is missing, null, or not a number
//! keeps its default; a payload that is not an object yields the defaults.

use fw_sim::{RunMode, SimulationParameters};
use serde_json::{Map, Value, json};

const UPPER_GAINS: [&str; 3] = ["Kp", "Ki", "Kd"];
const LOWER_GAINS: [&str; 3] = ["kp", "ki", "kd"];

/// First key in `keys` holding a number, else `default`.
fn number(obj: &Map<String, Value>, keys: &[&str], default: f64) -> f64 {
    keys.iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_f64))
        .unwrap_or(default)
}

/// Run mode named by the payload, or inferred from which gain keys it uses.
///
/// An explicit `mode` of `"single"` or `"comparison"` wins. Otherwise a
/// payload carrying lowercase gain keys and no capitalized ones is a
/// comparison request.
pub fn infer_mode(obj: &Map<String, Value>) -> RunMode {
    match obj.get("mode").and_then(Value::as_str).map(str::trim) {
        Some(m) if m.eq_ignore_ascii_case("single") => return RunMode::Single,
        Some(m) if m.eq_ignore_ascii_case("comparison") => return RunMode::Comparison,
        _ => {}
    }
    let has = |keys: &[&str]| keys.iter().any(|k| obj.contains_key(*k));
    if has(&LOWER_GAINS) && !has(&UPPER_GAINS) {
        RunMode::Comparison
    } else {
        RunMode::Single
    }
}

/// Resolve a `start_simulation` payload. Never fails.
pub fn resolve_parameters(payload: &Value) -> SimulationParameters {
    let defaults = SimulationParameters::default();
    let Some(obj) = payload.as_object() else {
        return defaults;
    };

    SimulationParameters {
        mass: number(obj, &["mass"], defaults.mass),
        radius: number(obj, &["radius"], defaults.radius),
        omega_set: number(obj, &["omega_set"], defaults.omega_set),
        kp: number(obj, &["Kp", "kp"], defaults.kp),
        ki: number(obj, &["Ki", "ki"], defaults.ki),
        kd: number(obj, &["Kd", "kd"], defaults.kd),
        b: number(obj, &["b"], defaults.b),
        disturbance: number(obj, &["disturbance"], defaults.disturbance),
        max_torque: number(obj, &["maxMoment", "maxTorque"], defaults.max_torque),
        mode: infer_mode(obj),
    }
}

/// Wire payload for `params`, using the field names a client would send.
pub fn to_payload(params: &SimulationParameters) -> Value {
    json!({
        "mass": params.mass,
        "radius": params.radius,
        "omega_set": params.omega_set,
        "Kp": params.kp,
        "Ki": params.ki,
        "Kd": params.kd,
        "b": params.b,
        "disturbance": params.disturbance,
        "maxMoment": params.max_torque,
        "mode": params.mode.label(),
    })
}
