//! Decoding and selection shared by the reading log adapters.

use serde_json::Value;
use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::{ReadingLogEntry, ReadingLogQuery};

/// Decode a log payload: a bare array or an object wrapping one under
/// `readings` or `data`. Malformed entries are skipped.
pub(crate) fn decode_entries(payload: Value) -> DomainResult<Vec<ReadingLogEntry>> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("readings").or_else(|| obj.remove("data")) {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(DomainError::SerializationError(
                    "reading log payload has no readings array".to_string(),
                ))
            }
        },
        other => {
            return Err(DomainError::SerializationError(format!(
                "unexpected reading log payload: {other}"
            )))
        }
    };

    let total = items.len();
    let entries: Vec<ReadingLogEntry> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if entries.len() < total {
        debug!(skipped = total - entries.len(), "skipped malformed reading log entries");
    }
    Ok(entries)
}

/// Entries matching the query, most recent first, capped at the limit.
///
/// Entries that do not name a recorder or site are not excluded by them.
pub(crate) fn select_entries(entries: &[ReadingLogEntry], query: &ReadingLogQuery) -> Vec<ReadingLogEntry> {
    let mut selected: Vec<ReadingLogEntry> = entries
        .iter()
        .filter(|e| query.contains(e.recorded_at))
        .filter(|e| e.recorded_by.as_deref().is_none_or(|by| by == query.recorded_by))
        .filter(|e| match (query.site_id.as_deref(), e.site_id.as_deref()) {
            (Some(wanted), Some(site)) => wanted == site,
            _ => true,
        })
        .cloned()
        .collect();

    selected.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
    selected.truncate(query.limit);
    selected
}
