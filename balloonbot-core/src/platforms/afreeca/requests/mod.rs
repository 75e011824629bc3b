// File: src/platforms/afreeca/requests/mod.rs
pub mod channel;
pub mod station;

use serde_json::Value;

/// The platform is loose about JSON types: numbers sometimes arrive as
/// strings and vice versa. Missing or unusable values become 0 / "".
pub(crate) fn json_i64(v: Option<&Value>) -> i64 {
    match v {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

pub(crate) fn json_string(v: Option<&Value>) -> String {
    match v {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// First few hundred chars of a body, for error messages.
pub(crate) fn body_snippet(body: &str) -> String {
    body.chars().take(200).collect()
}
