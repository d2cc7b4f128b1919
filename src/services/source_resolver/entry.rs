//! Per-entry resolution shared by the list-based strategies.

use serde_json::{Map, Value};
use tracing::debug;

use super::strategies::{Confidence, ExtractedReading};
use crate::domain::models::{AssetReading, CompletionRecord, ReadingSource, TaskConfig};
use crate::domain::normalize::{
    first_reading, first_text, identifier_from_value, parse_reading_value, parse_timestamp,
    IdentifierCandidate,
};

/// Identifier candidates, highest priority first.
pub const IDENTIFIER_FIELDS: &[&str] = &["asset_id", "asset_id_alt", "id", "value"];

/// Reading value candidates, highest priority first.
pub const VALUE_FIELDS: &[&str] = &["temperature", "reading", "temp"];

/// Display name candidates on a list entry.
pub const NAME_FIELDS: &[&str] = &["equipment_name", "name", "asset_name", "label"];

/// Name given to entries that carry neither a name nor a resolvable id.
pub const UNKNOWN_EQUIPMENT: &str = "Unknown equipment";

/// Reading value held by a field that is either a scalar or a nested object.
pub(crate) fn value_from_field(value: &Value) -> Option<f64> {
    match value {
        Value::Object(obj) => first_reading(obj, VALUE_FIELDS).or_else(|| first_reading(obj, &["value"])),
        other => parse_reading_value(other),
    }
}

/// Resolved identity of one list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EntryIdentity {
    asset_id: Option<String>,
    confidence: Confidence,
}

/// Work out which asset a list entry belongs to.
///
/// A corrupted identifier is recovered from the configured asset at the
/// same position, then by name. `None` means the entry is unrecoverable.
fn resolve_identity(
    entry: &Map<String, Value>,
    entry_name: Option<&str>,
    index: usize,
    config: &TaskConfig,
) -> Option<EntryIdentity> {
    // The first present candidate decides; later fields never replace a corrupted one.
    let candidate = IDENTIFIER_FIELDS
        .iter()
        .filter_map(|field| entry.get(*field))
        .map(identifier_from_value)
        .find(|candidate| !matches!(candidate, IdentifierCandidate::Missing));

    let corrupted = match candidate {
        Some(IdentifierCandidate::Valid(asset_id)) => {
            return Some(EntryIdentity {
                asset_id: Some(asset_id),
                confidence: Confidence::Exact,
            });
        }
        Some(IdentifierCandidate::Corrupted) => true,
        _ => false,
    };

    let by_name = entry_name.and_then(|name| config.find_by_name(name));

    if corrupted {
        let recovered = config.asset_at(index).or(by_name);
        return match recovered {
            Some(asset) => {
                debug!(index, asset_id = %asset.id, "recovered corrupted asset identifier");
                Some(EntryIdentity {
                    asset_id: Some(asset.id.clone()),
                    confidence: Confidence::Recovered,
                })
            }
            None => {
                debug!(index, name = ?entry_name, "dropping entry with unrecoverable identifier");
                None
            }
        };
    }

    Some(match by_name {
        Some(asset) => EntryIdentity {
            asset_id: Some(asset.id.clone()),
            confidence: Confidence::Inferred,
        },
        None => EntryIdentity {
            asset_id: None,
            confidence: Confidence::Inferred,
        },
    })
}

/// Build a reading from one `equipment_list` / `temperatures` object.
pub(crate) fn resolve_entry(
    entry: &Map<String, Value>,
    index: usize,
    record: &CompletionRecord,
    config: &TaskConfig,
    source: ReadingSource,
) -> Option<ExtractedReading> {
    let entry_name = first_text(entry, NAME_FIELDS);
    let identity = resolve_identity(entry, entry_name.as_deref(), index, config)?;
    let value = first_reading(entry, VALUE_FIELDS);

    if identity.asset_id.is_none() && entry_name.is_none() && value.is_none() {
        return None;
    }

    let configured = identity.asset_id.as_deref().and_then(|id| config.asset(id));
    let equipment_name = entry_name
        .or_else(|| configured.and_then(|a| a.name.clone()))
        .or_else(|| identity.asset_id.clone())
        .unwrap_or_else(|| UNKNOWN_EQUIPMENT.to_string());
    let nickname = first_text(entry, &["nickname"]).or_else(|| configured.and_then(|a| a.nickname.clone()));
    let recorded_at = ["recorded_at", "timestamp"]
        .iter()
        .filter_map(|field| entry.get(*field))
        .find_map(parse_timestamp)
        .or_else(|| record.completed_at());

    let reading = AssetReading::new(identity.asset_id, equipment_name, value, source)
        .with_nickname(nickname)
        .with_recorded_at(recorded_at);

    Some(ExtractedReading {
        reading,
        confidence: identity.confidence,
    })
}
