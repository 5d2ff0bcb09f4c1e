//! Small helpers shared by the dump and ghost pipelines.

use serde::Serialize;
use serde_json::{Map, Value};

/// Directory/file name fragment for an id value. HubSpot ids arrive as
/// numbers, occasionally as strings; anything else has no usable name.
pub fn id_segment(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() && !s.contains(['/', '\\']) && s != "." && s != ".." => {
            Some(s.clone())
        }
        _ => None,
    }
}

/// Keep at most `max` characters. Returns the kept text and whether anything was cut.
pub fn truncate_chars(text: &str, max: usize) -> (&str, bool) {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => (&text[..byte_idx], true),
        None => (text, false),
    }
}

/// Recursively rebuild objects with keys in ascending order.
pub fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Indented JSON with sorted keys, stable across runs for the same input.
pub fn to_sorted_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let value = serde_json::to_value(value)?;
    serde_json::to_string_pretty(&sort_keys(value))
}
