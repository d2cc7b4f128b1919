//! Normalization helpers shared by every extraction step.
//!
//! Completion records arrive as untyped JSON. Values here are read
//! defensively: numbers and numeric strings are accepted, everything else is
//! "no reading". Objects are never turned into display strings, which is how
//! the `[object Object]` identifiers got into stored data in the first place.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Identifier produced when an object reference was stringified instead of
/// having its id extracted.
pub const CORRUPTION_ARTIFACT: &str = "[object Object]";

/// Outcome of reading an identifier out of a loosely typed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierCandidate {
    /// Field absent, empty or of a type that cannot carry an id
    Missing,
    /// Field held a stringified object (or an object with no id inside)
    Corrupted,
    /// Usable identifier
    Valid(String),
}

impl IdentifierCandidate {
    pub fn into_valid(self) -> Option<String> {
        match self {
            Self::Valid(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_corrupted(&self) -> bool {
        matches!(self, Self::Corrupted)
    }
}

/// Parse a reading value from a JSON value.
///
/// Accepts JSON numbers and numeric strings. `0` and `"0"` are present
/// values. `NaN`, infinities, blanks and non-scalar values yield `None`.
pub fn parse_reading_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_reading_str(s),
        _ => None,
    }
}

/// Parse a reading value from text.
pub fn parse_reading_str(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Check whether a string is an object-stringification artifact.
pub fn is_corruption_artifact(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed == CORRUPTION_ARTIFACT || (trimmed.starts_with("[object ") && trimmed.ends_with(']'))
}

/// Trim an identifier and reject empty or corrupted values.
pub fn sanitize_identifier(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || is_corruption_artifact(trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Read an identifier from a JSON value without stringifying objects.
///
/// Nested objects are searched one level deep for `id` / `asset_id`.
pub fn identifier_from_value(value: &Value) -> IdentifierCandidate {
    match value {
        Value::String(s) if is_corruption_artifact(s) => IdentifierCandidate::Corrupted,
        Value::String(s) => sanitize_identifier(s)
            .map_or(IdentifierCandidate::Missing, IdentifierCandidate::Valid),
        Value::Number(n) => IdentifierCandidate::Valid(n.to_string()),
        Value::Object(obj) => ["id", "asset_id"]
            .iter()
            .filter_map(|field| obj.get(*field))
            .find_map(|nested| match nested {
                Value::String(s) => sanitize_identifier(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .map_or(IdentifierCandidate::Corrupted, IdentifierCandidate::Valid),
        _ => IdentifierCandidate::Missing,
    }
}

/// First field among `fields` that holds a parseable reading.
pub fn first_reading(obj: &Map<String, Value>, fields: &[&str]) -> Option<f64> {
    fields
        .iter()
        .filter_map(|field| obj.get(*field))
        .find_map(parse_reading_value)
}

/// First field among `fields` that holds non-empty display text.
pub fn first_text(obj: &Map<String, Value>, fields: &[&str]) -> Option<String> {
    fields.iter().filter_map(|field| obj.get(*field)).find_map(|v| match v {
        Value::String(s) => sanitize_identifier(s),
        _ => None,
    })
}

/// Parse a timestamp stored either as RFC 3339 text or epoch milliseconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

/// Serde helper for configuration bounds that may be stored as numbers,
/// numeric strings, blanks or nulls.
pub fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(parse_reading_value))
}
