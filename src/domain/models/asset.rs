//! Task-template asset configuration.
//!
//! Assets are configured on the task template, either as an equipment
//! config list or as a repeatable field. Each carries its own range.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::range::TemperatureRange;
use crate::domain::normalize::{deserialize_lenient_f64, identifier_from_value, IdentifierCandidate};

/// One asset as configured on a task template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRef {
    #[serde(
        alias = "asset_id",
        alias = "assetId",
        alias = "value",
        deserialize_with = "deserialize_asset_id"
    )]
    pub id: String,

    #[serde(default, alias = "equipment_name", alias = "label")]
    pub name: Option<String>,

    #[serde(default)]
    pub nickname: Option<String>,

    #[serde(
        default,
        alias = "min",
        alias = "tempMin",
        deserialize_with = "deserialize_lenient_f64"
    )]
    pub temp_min: Option<f64>,

    #[serde(
        default,
        alias = "max",
        alias = "tempMax",
        deserialize_with = "deserialize_lenient_f64"
    )]
    pub temp_max: Option<f64>,
}

fn deserialize_asset_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    match identifier_from_value(&raw) {
        IdentifierCandidate::Valid(id) => Ok(id),
        IdentifierCandidate::Corrupted => Err(serde::de::Error::custom(
            "asset id is an object-stringification artifact",
        )),
        IdentifierCandidate::Missing => Err(serde::de::Error::custom("asset id is empty")),
    }
}

/// Asset list that skips entries without a usable id.
fn deserialize_assets<'de, D>(deserializer: D) -> Result<Vec<AssetRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<AssetRef>(entry) {
            Ok(asset) => Some(asset),
            Err(e) => {
                warn!(index, error = %e, "skipping unusable configured asset");
                None
            }
        })
        .collect())
}

impl AssetRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            nickname: None,
            temp_min: None,
            temp_max: None,
        }
    }

    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.temp_min = min;
        self.temp_max = max;
        self
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn range(&self) -> TemperatureRange {
        TemperatureRange::new(self.temp_min, self.temp_max)
    }

    /// Configured name, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Case-insensitive match against name or nickname.
    pub fn is_named(&self, candidate: &str) -> bool {
        let candidate = candidate.trim();
        !candidate.is_empty()
            && [self.name.as_deref(), self.nickname.as_deref()]
                .into_iter()
                .flatten()
                .any(|n| n.trim().eq_ignore_ascii_case(candidate))
    }
}

/// Warning and failure thresholds supplied alongside the task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub warn: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub fail: Option<f64>,
}

impl Thresholds {
    pub fn new(warn: Option<f64>, fail: Option<f64>) -> Self {
        Self { warn, fail }
    }

    pub fn exceeds_warn(&self, value: f64) -> bool {
        self.warn.is_some_and(|limit| value > limit)
    }

    pub fn exceeds_fail(&self, value: f64) -> bool {
        self.fail.is_some_and(|limit| value > limit)
    }

    /// Fill unset thresholds from a fallback (typically configuration).
    pub fn or(self, fallback: Self) -> Self {
        Self {
            warn: self.warn.or(fallback.warn),
            fail: self.fail.or(fallback.fail),
        }
    }
}

/// Asset configuration attached to a task template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    #[serde(
        default,
        alias = "equipment_config",
        alias = "repeatable_field",
        deserialize_with = "deserialize_assets"
    )]
    pub assets: Vec<AssetRef>,

    /// Default field values from the template, overlaid by the record.
    #[serde(default)]
    pub defaults: Map<String, Value>,

    #[serde(default)]
    pub thresholds: Thresholds,
}

impl TaskConfig {
    pub fn new(assets: Vec<AssetRef>) -> Self {
        Self {
            assets,
            ..Default::default()
        }
    }

    pub fn asset(&self, id: &str) -> Option<&AssetRef> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn asset_at(&self, index: usize) -> Option<&AssetRef> {
        self.assets.get(index)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&AssetRef> {
        self.assets.iter().find(|a| a.is_named(name))
    }

    pub fn is_known(&self, id: &str) -> bool {
        self.asset(id).is_some()
    }

    /// Configured range for an asset, `None` when the asset is unknown or
    /// has no bound at all.
    pub fn range_for(&self, asset_id: &str) -> Option<TemperatureRange> {
        self.asset(asset_id)
            .map(AssetRef::range)
            .filter(|r| !r.is_unset())
    }
}

/// Identifier to display-name lookup used to enrich output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetDirectory(HashMap<String, String>);

impl AssetDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.0.insert(id.into(), name.into());
    }

    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for AssetDirectory {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_asset_ref_lenient_bounds() {
        let asset: AssetRef = serde_json::from_value(json!({
            "asset_id": "f1",
            "equipment_name": "Chest Freezer",
            "temp_min": "-18",
            "temp_max": -20
        }))
        .unwrap();

        assert_eq!(asset.id, "f1");
        assert_eq!(asset.name.as_deref(), Some("Chest Freezer"));
        assert_eq!(asset.range(), TemperatureRange::bounded(-18.0, -20.0));
    }

    #[test]
    fn test_asset_ref_blank_bounds_are_unset() {
        let asset: AssetRef =
            serde_json::from_value(json!({"id": 7, "name": "Fridge", "temp_min": "", "temp_max": null}))
                .unwrap();
        assert_eq!(asset.id, "7");
        assert!(asset.range().is_unset());
    }

    #[test]
    fn test_asset_ref_rejects_corrupted_id() {
        let result = serde_json::from_value::<AssetRef>(json!({"id": "[object Object]"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_repeatable_field_value_and_label() {
        let config: TaskConfig = serde_json::from_value(json!({
            "repeatable_field": [{"value": "a1", "label": "Fridge", "temp_min": 1, "temp_max": 5}]
        }))
        .unwrap();

        assert_eq!(config.assets[0].id, "a1");
        assert_eq!(config.assets[0].name.as_deref(), Some("Fridge"));
        assert_eq!(config.range_for("a1"), Some(TemperatureRange::bounded(1.0, 5.0)));
    }

    #[test]
    fn test_task_config_skips_unusable_assets() {
        let config: TaskConfig = serde_json::from_value(json!({
            "assets": [
                {"id": "[object Object]", "name": "Ghost"},
                {"name": "No id"},
                {"id": "f1", "name": "Chest Freezer"}
            ]
        }))
        .unwrap();

        assert_eq!(config.assets.len(), 1);
        assert!(config.is_known("f1"));
    }

    #[test]
    fn test_task_config_null_assets() {
        let config: TaskConfig = serde_json::from_value(json!({"assets": null})).unwrap();
        assert!(config.assets.is_empty());
    }

    #[test]
    fn test_task_config_aliases() {
        let config: TaskConfig = serde_json::from_value(json!({
            "equipment_config": [{"id": "a1", "name": "Fridge", "temp_min": 1, "temp_max": 5}],
            "thresholds": {"warn": "6", "fail": 8}
        }))
        .unwrap();

        assert_eq!(config.assets.len(), 1);
        assert_eq!(config.thresholds, Thresholds::new(Some(6.0), Some(8.0)));
        assert_eq!(config.range_for("a1"), Some(TemperatureRange::bounded(1.0, 5.0)));
        assert_eq!(config.range_for("missing"), None);
    }

    #[test]
    fn test_find_by_name_matches_nickname() {
        let config = TaskConfig::new(vec![
            AssetRef::new("a1", "Walk-in Fridge").with_nickname("Dairy"),
        ]);
        assert_eq!(config.find_by_name("dairy").map(|a| a.id.as_str()), Some("a1"));
        assert_eq!(config.find_by_name("WALK-IN FRIDGE").map(|a| a.id.as_str()), Some("a1"));
        assert!(config.find_by_name("").is_none());
    }

    #[test]
    fn test_thresholds() {
        let thresholds = Thresholds::new(Some(5.0), Some(8.0));
        assert!(thresholds.exceeds_warn(5.5));
        assert!(!thresholds.exceeds_warn(5.0));
        assert!(thresholds.exceeds_fail(8.1));
        assert!(!Thresholds::default().exceeds_fail(1000.0));

        let merged = Thresholds::new(None, Some(9.0)).or(Thresholds::new(Some(4.0), Some(1.0)));
        assert_eq!(merged, Thresholds::new(Some(4.0), Some(9.0)));
    }
}
