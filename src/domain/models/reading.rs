//! Asset reading domain model.
//!
//! A reading is one temperature value attributed to one asset at one point
//! in time, tagged with the storage shape it was recovered from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage shape a reading was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingSource {
    /// Per-equipment objects under `equipment_list`
    EquipmentList,
    /// Flat `temperatures` array
    TemperatureArray,
    /// `temp_<asset_id>` keys
    KeyedField,
    /// Top-level key equal to an asset id
    AssetIdKey,
    /// Key containing the asset id, name or nickname
    HeuristicMatch,
    /// Time-windowed external reading log
    ExternalLog,
}

impl ReadingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EquipmentList => "equipment_list",
            Self::TemperatureArray => "temperature_array",
            Self::KeyedField => "keyed_field",
            Self::AssetIdKey => "asset_id_key",
            Self::HeuristicMatch => "heuristic_match",
            Self::ExternalLog => "external_log",
        }
    }
}

impl std::fmt::Display for ReadingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A temperature reading for one asset.
///
/// `value` is `None` when no reading was taken. `Some(0.0)` is a real
/// reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetReading {
    pub asset_id: Option<String>,
    pub equipment_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
    pub source: ReadingSource,
}

impl AssetReading {
    pub fn new(
        asset_id: Option<String>,
        equipment_name: impl Into<String>,
        value: Option<f64>,
        source: ReadingSource,
    ) -> Self {
        Self {
            asset_id,
            equipment_name: equipment_name.into(),
            nickname: None,
            value: value.filter(|v| v.is_finite()),
            recorded_at: None,
            source,
        }
    }

    pub fn with_nickname(mut self, nickname: Option<String>) -> Self {
        self.nickname = nickname;
        self
    }

    pub fn with_recorded_at(mut self, recorded_at: Option<DateTime<Utc>>) -> Self {
        self.recorded_at = recorded_at;
        self
    }

    /// Whether a value was recorded. Zero counts.
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Name to show operators: nickname when set, equipment name otherwise.
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.equipment_name)
    }

    /// Whether this reading belongs to the given asset id or equipment name.
    pub fn matches(&self, asset_id: Option<&str>, equipment_name: Option<&str>) -> bool {
        if let (Some(mine), Some(theirs)) = (self.asset_id.as_deref(), asset_id) {
            if mine == theirs {
                return true;
            }
        }
        equipment_name.is_some_and(|name| self.equipment_name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_value_is_present() {
        let reading = AssetReading::new(Some("a1".into()), "Fridge", Some(0.0), ReadingSource::EquipmentList);
        assert!(reading.has_value());
    }

    #[test]
    fn test_non_finite_value_is_dropped() {
        let reading = AssetReading::new(None, "Fridge", Some(f64::NAN), ReadingSource::KeyedField);
        assert!(!reading.has_value());
    }

    #[test]
    fn test_display_name_prefers_nickname() {
        let reading = AssetReading::new(Some("a1".into()), "Fridge", None, ReadingSource::EquipmentList)
            .with_nickname(Some("Dairy fridge".into()));
        assert_eq!(reading.display_name(), "Dairy fridge");
    }

    #[test]
    fn test_matches_by_id_or_name() {
        let reading = AssetReading::new(Some("a1".into()), "Walk-in Freezer", None, ReadingSource::EquipmentList);
        assert!(reading.matches(Some("a1"), None));
        assert!(reading.matches(Some("zz"), Some("walk-in freezer")));
        assert!(!reading.matches(Some("zz"), Some("Fridge")));
        assert!(!reading.matches(None, None));
    }

    #[test]
    fn test_source_serializes_snake_case() {
        let json = serde_json::to_string(&ReadingSource::AssetIdKey).unwrap();
        assert_eq!(json, "\"asset_id_key\"");
    }
}
