//! Temperature range and compliance status models.

use serde::{Deserialize, Serialize};

use super::reading::AssetReading;

/// Configured acceptable interval for an asset.
///
/// Both bounds set with `min > max` is an inverted (freezer) range: the
/// acceptable zone runs from `max` (coldest) up to `min` (warmest).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Orientation of a range, computed once from its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeKind {
    Normal,
    Inverted,
}

impl TemperatureRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min: min.filter(|v| v.is_finite()),
            max: max.filter(|v| v.is_finite()),
        }
    }

    pub fn bounded(min: f64, max: f64) -> Self {
        Self::new(Some(min), Some(max))
    }

    /// No bound configured at all.
    pub fn is_unset(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn kind(&self) -> RangeKind {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min > max => RangeKind::Inverted,
            _ => RangeKind::Normal,
        }
    }

    /// Coldest and warmest acceptable values, whatever the orientation.
    pub fn acceptable_bounds(&self) -> (Option<f64>, Option<f64>) {
        match self.kind() {
            RangeKind::Normal => (self.min, self.max),
            RangeKind::Inverted => (self.max, self.min),
        }
    }
}

impl std::fmt::Display for TemperatureRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.acceptable_bounds() {
            (Some(low), Some(high)) => write!(f, "{low} to {high}"),
            (Some(low), None) => write!(f, "at least {low}"),
            (None, Some(high)) => write!(f, "at most {high}"),
            (None, None) => f.write_str("no range"),
        }
    }
}

/// Compliance classification of a reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    #[default]
    Ok,
    Warning,
    Failed,
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Warning => "warning",
            Self::Failed => "failed",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the acceptable zone a reading fell on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Breach {
    TooCold,
    TooWarm,
}

impl Breach {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::TooCold => "too cold",
            Self::TooWarm => "too warm",
        }
    }
}

/// A reading together with its classification for one evaluation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedReading {
    #[serde(flatten)]
    pub reading: AssetReading,
    pub status: ComplianceStatus,
    pub range: Option<TemperatureRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breach: Option<Breach>,
}

impl EvaluatedReading {
    pub fn is_failed(&self) -> bool {
        self.status.is_failed()
    }
}
