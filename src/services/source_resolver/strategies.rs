//! Extraction strategies, one per storage shape.
//!
//! Each strategy reads a single shape and knows nothing of the others. The
//! resolver runs them in priority order and keeps the first non-empty set.

use std::collections::HashSet;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entry::{resolve_entry, value_from_field};
use crate::domain::models::completion::{KEYED_FIELD_PREFIX, RESERVED_FIELDS};
use crate::domain::models::{AssetReading, AssetRef, CompletionRecord, ReadingSource, TaskConfig};
use crate::domain::normalize::parse_reading_value;

/// How the asset attribution of a reading was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Identifier read directly from the data
    Exact,
    /// Corrupted identifier replaced by position or name
    Recovered,
    /// Attribution guessed from a name or key substring
    Inferred,
}

/// A reading produced by one strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedReading {
    pub reading: AssetReading,
    pub confidence: Confidence,
}

impl ExtractedReading {
    fn exact(reading: AssetReading) -> Self {
        Self {
            reading,
            confidence: Confidence::Exact,
        }
    }
}

/// Inputs every strategy reads from.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionContext<'a> {
    pub record: &'a CompletionRecord,
    pub config: &'a TaskConfig,
}

/// One storage shape the resolver knows how to read.
pub trait ExtractionStrategy: Send + Sync + Debug {
    /// Source tag applied to readings from this strategy
    fn source(&self) -> ReadingSource;

    /// Extract readings; an empty result hands over to the next strategy
    fn extract(&self, ctx: &ExtractionContext<'_>) -> Vec<ExtractedReading>;
}

/// Strategies in priority order.
pub fn default_strategies() -> Vec<Box<dyn ExtractionStrategy>> {
    vec![
        Box::new(EquipmentListStrategy),
        Box::new(TemperatureArrayStrategy),
        Box::new(KeyedFieldStrategy),
        Box::new(AssetIdKeyStrategy),
        Box::new(HeuristicMatchStrategy::default()),
    ]
}

fn is_reserved(key: &str) -> bool {
    RESERVED_FIELDS.contains(&key)
}

fn configured_reading(asset: &AssetRef, value: Option<f64>, ctx: &ExtractionContext<'_>, source: ReadingSource) -> AssetReading {
    AssetReading::new(Some(asset.id.clone()), asset.display_name(), value, source)
        .with_nickname(asset.nickname.clone())
        .with_recorded_at(ctx.record.completed_at())
}

/// `equipment_list`: one reading per per-equipment object.
#[derive(Debug, Clone, Copy, Default)]
pub struct EquipmentListStrategy;

impl ExtractionStrategy for EquipmentListStrategy {
    fn source(&self) -> ReadingSource {
        ReadingSource::EquipmentList
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> Vec<ExtractedReading> {
        let Some(entries) = ctx.record.equipment_list() else {
            return Vec::new();
        };

        entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let obj = entry.as_object()?;
                resolve_entry(obj, index, ctx.record, ctx.config, self.source())
            })
            .collect()
    }
}

/// `temperatures`: flat list of objects or bare values.
///
/// Bare values belong to the configured asset at the same position. The
/// first entry for an asset wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemperatureArrayStrategy;

impl ExtractionStrategy for TemperatureArrayStrategy {
    fn source(&self) -> ReadingSource {
        ReadingSource::TemperatureArray
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> Vec<ExtractedReading> {
        let Some(entries) = ctx.record.temperatures() else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut readings = Vec::new();

        for (index, entry) in entries.iter().enumerate() {
            let extracted = match entry {
                Value::Object(obj) => resolve_entry(obj, index, ctx.record, ctx.config, self.source()),
                scalar => ctx.config.asset_at(index).map(|asset| {
                    ExtractedReading {
                        reading: configured_reading(asset, parse_reading_value(scalar), ctx, self.source()),
                        confidence: Confidence::Inferred,
                    }
                }),
            };
            let Some(extracted) = extracted else {
                continue;
            };

            let key = extracted
                .reading
                .asset_id
                .clone()
                .unwrap_or_else(|| extracted.reading.equipment_name.to_lowercase());
            if seen.insert(key) {
                readings.push(extracted);
            }
        }

        readings
    }
}

/// `temp_<asset_id>` keys, read from the record overlaid on template
/// defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyedFieldStrategy;

impl ExtractionStrategy for KeyedFieldStrategy {
    fn source(&self) -> ReadingSource {
        ReadingSource::KeyedField
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> Vec<ExtractedReading> {
        let merged = ctx.record.merged_with_defaults(&ctx.config.defaults);

        ctx.config
            .assets
            .iter()
            .filter_map(|asset| {
                let raw = merged.get(&format!("{KEYED_FIELD_PREFIX}{}", asset.id))?;
                Some(ExtractedReading::exact(configured_reading(
                    asset,
                    value_from_field(raw),
                    ctx,
                    self.source(),
                )))
            })
            .collect()
    }
}

/// Top-level keys that are exactly a configured asset id.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetIdKeyStrategy;

impl ExtractionStrategy for AssetIdKeyStrategy {
    fn source(&self) -> ReadingSource {
        ReadingSource::AssetIdKey
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> Vec<ExtractedReading> {
        ctx.config
            .assets
            .iter()
            .filter(|asset| !is_reserved(&asset.id))
            .filter_map(|asset| {
                let raw = ctx.record.get(&asset.id)?;
                Some(ExtractedReading::exact(configured_reading(
                    asset,
                    value_from_field(raw),
                    ctx,
                    self.source(),
                )))
            })
            .collect()
    }
}

/// Last resort: keys containing an asset's id, name or nickname.
///
/// Only values that parse as numbers are accepted and each key feeds at
/// most one asset.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicMatchStrategy {
    min_needle_len: usize,
}

impl Default for HeuristicMatchStrategy {
    fn default() -> Self {
        Self { min_needle_len: 2 }
    }
}

impl HeuristicMatchStrategy {
    fn needles(&self, asset: &AssetRef) -> Vec<String> {
        [Some(asset.id.as_str()), asset.name.as_deref(), asset.nickname.as_deref()]
            .into_iter()
            .flatten()
            .map(|n| n.trim().to_lowercase())
            .filter(|n| n.len() >= self.min_needle_len)
            .collect()
    }
}

impl ExtractionStrategy for HeuristicMatchStrategy {
    fn source(&self) -> ReadingSource {
        ReadingSource::HeuristicMatch
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> Vec<ExtractedReading> {
        let assets = &ctx.config.assets;
        let needles: Vec<Vec<String>> = assets.iter().map(|asset| self.needles(asset)).collect();
        let mut used_keys: HashSet<&str> = HashSet::new();
        let mut found: Vec<Option<f64>> = vec![None; assets.len()];

        // Whole-word hits across all assets take precedence over substring hits.
        for whole_word in [true, false] {
            for (index, asset_needles) in needles.iter().enumerate() {
                if found[index].is_some() || asset_needles.is_empty() {
                    continue;
                }

                let hit = ctx
                    .record
                    .fields()
                    .iter()
                    .filter(|(key, _)| !is_reserved(key) && !used_keys.contains(key.as_str()))
                    .find_map(|(key, raw)| {
                        let key_lower = key.to_lowercase();
                        if !asset_needles
                            .iter()
                            .any(|needle| key_mentions(&key_lower, needle, whole_word))
                        {
                            return None;
                        }
                        value_from_field(raw).map(|value| (key.as_str(), value))
                    });

                if let Some((key, value)) = hit {
                    used_keys.insert(key);
                    found[index] = Some(value);
                }
            }
        }

        assets
            .iter()
            .zip(found)
            .filter_map(|(asset, value)| {
                value.map(|value| ExtractedReading {
                    reading: configured_reading(asset, Some(value), ctx, self.source()),
                    confidence: Confidence::Inferred,
                })
            })
            .collect()
    }
}

/// Whether `key` contains `needle`, optionally only between non-alphanumeric
/// boundaries.
fn key_mentions(key: &str, needle: &str, whole_word: bool) -> bool {
    if !whole_word {
        return key.contains(needle);
    }
    key.match_indices(needle).any(|(start, _)| {
        let before = key[..start].chars().next_back();
        let after = key[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> TaskConfig {
        TaskConfig::new(vec![
            AssetRef::new("a1", "Dairy Fridge"),
            AssetRef::new("f1", "Chest Freezer").with_nickname("Ice cream"),
        ])
    }

    fn run(strategy: &dyn ExtractionStrategy, record: serde_json::Value, config: &TaskConfig) -> Vec<ExtractedReading> {
        let record = CompletionRecord::from_value(record).unwrap();
        strategy.extract(&ExtractionContext { record: &record, config })
    }

    #[test]
    fn test_equipment_list_skips_non_objects() {
        let out = run(
            &EquipmentListStrategy,
            json!({"equipment_list": ["a1", {"asset_id": "a1", "temperature": 3}]}),
            &config(),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].reading.source, ReadingSource::EquipmentList);
    }

    #[test]
    fn test_temperature_array_scalars_by_position() {
        let out = run(&TemperatureArrayStrategy, json!({"temperatures": ["3.5", -19, 7]}), &config());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].reading.asset_id.as_deref(), Some("a1"));
        assert_eq!(out[0].reading.value, Some(3.5));
        assert_eq!(out[1].reading.asset_id.as_deref(), Some("f1"));
        assert_eq!(out[1].reading.value, Some(-19.0));
    }

    #[test]
    fn test_temperature_array_first_entry_per_asset_wins() {
        let out = run(
            &TemperatureArrayStrategy,
            json!({"temperatures": [
                {"asset_id": "a1", "temperature": 3},
                {"asset_id": "a1", "temperature": 9}
            ]}),
            &config(),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].reading.value, Some(3.0));
    }

    #[test]
    fn test_keyed_fields_use_template_defaults() {
        let mut config = config();
        config.defaults = json!({"temp_f1": "-18"}).as_object().unwrap().clone();

        let out = run(&KeyedFieldStrategy, json!({"temp_a1": 0}), &config);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].reading.value, Some(0.0));
        assert_eq!(out[1].reading.value, Some(-18.0));
        assert!(out.iter().all(|r| r.reading.source == ReadingSource::KeyedField));
    }

    #[test]
    fn test_asset_id_keys_ignore_reserved_names() {
        let config = TaskConfig::new(vec![AssetRef::new("a1", "Fridge"), AssetRef::new("status", "Weird")]);
        let out = run(&AssetIdKeyStrategy, json!({"a1": "4", "status": 12}), &config);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].reading.asset_id.as_deref(), Some("a1"));
        assert_eq!(out[0].reading.value, Some(4.0));
    }

    #[test]
    fn test_heuristic_matches_name_and_nickname() {
        let out = run(
            &HeuristicMatchStrategy::default(),
            json!({"dairy fridge reading": "3", "ice cream temp": "-19", "notes": "5"}),
            &config(),
        );
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].reading.asset_id.as_deref(), Some("a1"));
        assert_eq!(out[1].reading.asset_id.as_deref(), Some("f1"));
        assert_eq!(out[1].reading.value, Some(-19.0));
        assert!(out.iter().all(|r| r.confidence == Confidence::Inferred));
    }

    #[test]
    fn test_heuristic_requires_numeric_value() {
        let out = run(&HeuristicMatchStrategy::default(), json!({"a1_comment": "looks fine"}), &config());
        assert!(out.is_empty());
    }

    #[test]
    fn test_heuristic_prefers_whole_word_over_prefix() {
        let config = TaskConfig::new(vec![AssetRef::new("a1", "Fridge"), AssetRef::new("a10", "Blast Chiller")]);
        let out = run(
            &HeuristicMatchStrategy::default(),
            json!({"a10_reading": "2", "temp_a1": "4"}),
            &config,
        );

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].reading.asset_id.as_deref(), Some("a1"));
        assert_eq!(out[0].reading.value, Some(4.0));
        assert_eq!(out[1].reading.asset_id.as_deref(), Some("a10"));
        assert_eq!(out[1].reading.value, Some(2.0));
    }

    #[test]
    fn test_heuristic_leaves_longer_id_key_to_its_asset() {
        let config = TaskConfig::new(vec![AssetRef::new("a1", "Fridge"), AssetRef::new("a10", "Blast Chiller")]);
        let out = run(&HeuristicMatchStrategy::default(), json!({"temp_a10": "3"}), &config);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].reading.asset_id.as_deref(), Some("a10"));
    }

    #[test]
    fn test_key_mentions_boundaries() {
        assert!(key_mentions("temp_a1", "a1", true));
        assert!(!key_mentions("temp_a10", "a1", true));
        assert!(key_mentions("temp_a10", "a1", false));
        assert!(key_mentions("dairy fridge reading", "dairy fridge", true));
    }
}
