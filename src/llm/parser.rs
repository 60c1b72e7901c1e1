//! Defensive parsing of model responses.
//!
//! Responses are supposed to be JSON objects but models drift: stray prose,
//! markdown fences, missing keys. Parsing never fails outward; the report
//! layer always receives a record with exactly the task's declared keys.

use serde_json::{Map, Value};

use crate::llm::TaskKind;

/// Parse a raw model response into the task's record shape.
///
/// On any decode failure the offending payload is logged and an all-null
/// placeholder is returned, so a bad response costs one row's content, never
/// the batch.
pub fn parse_structured(raw: &str, kind: TaskKind) -> Map<String, Value> {
    let cleaned = strip_code_fence(raw);

    match serde_json::from_str::<Value>(cleaned) {
        Ok(Value::Object(fields)) => normalize(fields, kind),
        Ok(other) => {
            tracing::warn!(
                task = kind.name(),
                "Response was valid JSON but not an object: {other}"
            );
            kind.placeholder()
        }
        Err(_) => {
            tracing::warn!(task = kind.name(), "Failed to decode JSON response: {raw}");
            kind.placeholder()
        }
    }
}

/// Project the parsed object onto the declared schema: declared keys missing
/// from the response become null, undeclared keys are dropped.
fn normalize(mut fields: Map<String, Value>, kind: TaskKind) -> Map<String, Value> {
    kind.schema_keys()
        .iter()
        .map(|key| {
            let value = fields.remove(*key).unwrap_or(Value::Null);
            ((*key).to_string(), value)
        })
        .collect()
}

/// Strip one surrounding markdown code fence, if present.
///
/// The prompts open a ```json fence, so models frequently close it around
/// the payload.
pub(crate) fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}
