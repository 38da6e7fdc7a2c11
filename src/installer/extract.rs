//! Best-effort extraction of a JSON object embedded in free text.
//!
//! Two stages: find the first `{`, then decode one JSON value from there.
//! Text after the object is ignored. Failure is a value, not an error.

use serde_json::{json, Deserializer, Map, Value};
use tracing::{debug, warn};

use super::InstallSummary;

/// Result of looking for a JSON object in text.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Found(Map<String, Value>),
    /// The text has no `{` at all.
    NoObjectStart,
    /// Decoding from the first `{` failed.
    Invalid { offset: usize, reason: String },
}

pub fn extract_json_object(text: &str) -> Extraction {
    let Some(offset) = text.find('{') else {
        return Extraction::NoObjectStart;
    };

    let mut values = Deserializer::from_str(&text[offset..]).into_iter::<Value>();
    match values.next() {
        Some(Ok(Value::Object(map))) => Extraction::Found(map),
        Some(Ok(other)) => Extraction::Invalid {
            offset,
            reason: format!("expected an object, found {}", other),
        },
        Some(Err(e)) => Extraction::Invalid {
            offset,
            reason: e.to_string(),
        },
        None => Extraction::Invalid {
            offset,
            reason: "no value after '{'".to_string(),
        },
    }
}

/// The extracted object with `raw_output` added, or a synthetic failure
/// object `{success: false, error, raw_output}`.
pub fn summary_value_from_output(text: &str) -> Value {
    match extract_json_object(text) {
        Extraction::Found(mut map) => {
            map.insert("raw_output".to_string(), Value::String(text.to_string()));
            Value::Object(map)
        }
        Extraction::NoObjectStart => {
            warn!("Service output contains no JSON object");
            json!({
                "success": false,
                "error": "no JSON object found in service output",
                "raw_output": text,
            })
        }
        Extraction::Invalid { offset, reason } => {
            warn!(offset, reason = %reason, "Service output JSON could not be decoded");
            json!({
                "success": false,
                "error": format!("invalid JSON at offset {}: {}", offset, reason),
                "raw_output": text,
            })
        }
    }
}

/// Typed summary parsed out of service output text.
pub fn summary_from_output(text: &str) -> InstallSummary {
    let value = summary_value_from_output(text);
    match serde_json::from_value::<InstallSummary>(value) {
        Ok(summary) => {
            debug!(
                success = summary.success,
                personas = summary.personas.len(),
                rules = summary.rules.len(),
                "Install summary extracted"
            );
            summary
        }
        Err(e) => InstallSummary::failure(
            format!("summary has an unexpected shape: {}", e),
            Some(text.to_string()),
        ),
    }
}
