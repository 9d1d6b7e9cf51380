//! Check run display names built from the job and its build matrix.

use serde_json::{Map, Value};
use tracing::debug;

const OS_KEYS: [&str; 2] = ["os", "operating-system"];

fn parse_matrix(matrix: Option<&str>) -> Map<String, Value> {
    let Some(raw) = matrix.map(str::trim).filter(|m| !m.is_empty()) else {
        return Map::new();
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            debug!("Ignoring matrix input that is not a JSON object: {}", raw);
            Map::new()
        }
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `job (os, key: value, ...)`, or just the job when the matrix is empty.
fn context(job: &str, matrix: &Map<String, Value>) -> String {
    let mut parts = Vec::new();

    let os = OS_KEYS
        .iter()
        .filter_map(|key| matrix.get(*key))
        .map(display_value)
        .find(|os| !os.is_empty());
    if let Some(os) = os {
        parts.push(os);
    }

    for (key, value) in matrix {
        if !OS_KEYS.contains(&key.as_str()) {
            parts.push(format!("{}: {}", key, display_value(value)));
        }
    }

    if !job.is_empty() && !parts.is_empty() {
        format!("{} ({})", job, parts.join(", "))
    } else {
        job.to_string()
    }
}

/// Name for a check run, e.g. `JUnit Report: build (ubuntu-latest, node: 12)`.
pub fn check_name(prefix: &str, job: Option<&str>, matrix: Option<&str>) -> String {
    let context = context(job.unwrap_or_default(), &parse_matrix(matrix));

    match (context.is_empty(), prefix.is_empty()) {
        (false, false) => format!("{}: {}", prefix, context),
        (false, true) => context,
        (true, _) => prefix.to_string(),
    }
}
