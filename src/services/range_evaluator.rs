//! Range evaluation for temperature readings.
//!
//! Classifies a reading against its configured range. Normal ranges fail
//! outside `[min, max]`; inverted (freezer) ranges fail outside `[max, min]`.
//! Out-of-range readings are always `Failed`: `Warning` only ever comes from
//! the follow-up thresholds.

use tracing::trace;

use crate::domain::models::{
    AssetReading, Breach, ComplianceStatus, EvaluatedReading, RangeKind, TaskConfig,
    TemperatureRange,
};

/// Service for classifying readings against configured ranges
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeEvaluator;

impl RangeEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Compliance status of a reading against a range.
    ///
    /// An unset range and a missing value are both `Ok`; "no reading
    /// recorded" is flagged by presentation layers, not here.
    pub fn evaluate(&self, reading: &AssetReading, range: &TemperatureRange) -> ComplianceStatus {
        match reading.value.and_then(|value| Self::breach(value, range)) {
            Some(_) => ComplianceStatus::Failed,
            None => ComplianceStatus::Ok,
        }
    }

    /// Which side of the acceptable zone `value` falls on, if outside it.
    ///
    /// An unset bound is unconstrained.
    pub fn breach(value: f64, range: &TemperatureRange) -> Option<Breach> {
        if range.is_unset() {
            return None;
        }

        let (coldest, warmest) = match range.kind() {
            RangeKind::Normal => (range.min, range.max),
            RangeKind::Inverted => (range.max, range.min),
        };

        if coldest.is_some_and(|low| value < low) {
            Some(Breach::TooCold)
        } else if warmest.is_some_and(|high| value > high) {
            Some(Breach::TooWarm)
        } else {
            None
        }
    }

    /// Evaluate a reading using the range configured for its asset.
    ///
    /// Readings without an id are matched to configuration by name.
    pub fn evaluate_reading(&self, reading: AssetReading, config: &TaskConfig) -> EvaluatedReading {
        let range = reading
            .asset_id
            .as_deref()
            .and_then(|id| config.range_for(id))
            .or_else(|| {
                config
                    .find_by_name(&reading.equipment_name)
                    .map(|asset| asset.range())
                    .filter(|r| !r.is_unset())
            });

        let breach = match (reading.value, range.as_ref()) {
            (Some(value), Some(range)) => Self::breach(value, range),
            _ => None,
        };
        let status = if breach.is_some() {
            ComplianceStatus::Failed
        } else {
            ComplianceStatus::Ok
        };

        trace!(
            asset_id = ?reading.asset_id,
            value = ?reading.value,
            range = ?range,
            status = %status,
            "reading evaluated"
        );

        EvaluatedReading {
            reading,
            status,
            range,
            breach,
        }
    }

    /// Evaluate a batch of readings, preserving order.
    pub fn evaluate_all(
        &self,
        readings: Vec<AssetReading>,
        config: &TaskConfig,
    ) -> Vec<EvaluatedReading> {
        readings
            .into_iter()
            .map(|reading| self.evaluate_reading(reading, config))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{AssetRef, ReadingSource};

    fn reading(value: Option<f64>) -> AssetReading {
        AssetReading::new(Some("a1".into()), "Fridge", value, ReadingSource::EquipmentList)
    }

    #[test]
    fn test_normal_range() {
        let evaluator = RangeEvaluator::new();
        let range = TemperatureRange::bounded(1.0, 4.0);

        assert_eq!(evaluator.evaluate(&reading(Some(5.0)), &range), ComplianceStatus::Failed);
        assert_eq!(evaluator.evaluate(&reading(Some(2.0)), &range), ComplianceStatus::Ok);
        assert_eq!(evaluator.evaluate(&reading(Some(1.0)), &range), ComplianceStatus::Ok);
        assert_eq!(evaluator.evaluate(&reading(Some(4.0)), &range), ComplianceStatus::Ok);
        assert_eq!(evaluator.evaluate(&reading(Some(0.0)), &range), ComplianceStatus::Failed);
    }

    #[test]
    fn test_inverted_range() {
        let evaluator = RangeEvaluator::new();
        let range = TemperatureRange::bounded(-18.0, -20.0);

        assert_eq!(evaluator.evaluate(&reading(Some(-19.0)), &range), ComplianceStatus::Ok);
        assert_eq!(evaluator.evaluate(&reading(Some(-15.0)), &range), ComplianceStatus::Failed);
        assert_eq!(evaluator.evaluate(&reading(Some(-21.0)), &range), ComplianceStatus::Failed);
        assert_eq!(RangeEvaluator::breach(-15.0, &range), Some(Breach::TooWarm));
        assert_eq!(RangeEvaluator::breach(-21.0, &range), Some(Breach::TooCold));
    }

    #[test]
    fn test_no_range_is_always_ok() {
        let evaluator = RangeEvaluator::new();
        let range = TemperatureRange::default();
        for value in [-100.0, 0.0, 1000.0] {
            assert_eq!(evaluator.evaluate(&reading(Some(value)), &range), ComplianceStatus::Ok);
        }
    }

    #[test]
    fn test_missing_value_is_ok() {
        let evaluator = RangeEvaluator::new();
        let range = TemperatureRange::bounded(1.0, 4.0);
        assert_eq!(evaluator.evaluate(&reading(None), &range), ComplianceStatus::Ok);
    }

    #[test]
    fn test_single_bound_is_unconstrained_on_other_side() {
        let evaluator = RangeEvaluator::new();
        let min_only = TemperatureRange::new(Some(1.0), None);
        assert_eq!(evaluator.evaluate(&reading(Some(99.0)), &min_only), ComplianceStatus::Ok);
        assert_eq!(evaluator.evaluate(&reading(Some(0.5)), &min_only), ComplianceStatus::Failed);

        let max_only = TemperatureRange::new(None, Some(5.0));
        assert_eq!(evaluator.evaluate(&reading(Some(-40.0)), &max_only), ComplianceStatus::Ok);
        assert_eq!(evaluator.evaluate(&reading(Some(5.5)), &max_only), ComplianceStatus::Failed);
    }

    #[test]
    fn test_never_produces_warning() {
        let evaluator = RangeEvaluator::new();
        let range = TemperatureRange::bounded(1.0, 4.0);
        for value in [-5.0, 0.9, 1.0, 3.0, 4.1, 50.0] {
            assert_ne!(evaluator.evaluate(&reading(Some(value)), &range), ComplianceStatus::Warning);
        }
    }

    #[test]
    fn test_evaluate_reading_uses_config_range() {
        let evaluator = RangeEvaluator::new();
        let config = TaskConfig::new(vec![AssetRef::new("a1", "Fridge").with_range(Some(1.0), Some(5.0))]);

        let evaluated = evaluator.evaluate_reading(reading(Some(0.0)), &config);
        assert_eq!(evaluated.status, ComplianceStatus::Failed);
        assert_eq!(evaluated.breach, Some(Breach::TooCold));
        assert_eq!(evaluated.range, Some(TemperatureRange::bounded(1.0, 5.0)));
    }

    #[test]
    fn test_evaluate_reading_falls_back_to_name() {
        let evaluator = RangeEvaluator::new();
        let config = TaskConfig::new(vec![AssetRef::new("a1", "Fridge").with_range(Some(1.0), Some(5.0))]);
        let unnamed = AssetReading::new(None, "fridge", Some(7.0), ReadingSource::TemperatureArray);

        let evaluated = evaluator.evaluate_reading(unnamed, &config);
        assert_eq!(evaluated.status, ComplianceStatus::Failed);
        assert_eq!(evaluated.breach, Some(Breach::TooWarm));
    }

    #[test]
    fn test_evaluate_reading_without_config_is_ok() {
        let evaluator = RangeEvaluator::new();
        let evaluated = evaluator.evaluate_reading(reading(Some(80.0)), &TaskConfig::default());
        assert_eq!(evaluated.status, ComplianceStatus::Ok);
        assert!(evaluated.range.is_none());
    }
}
