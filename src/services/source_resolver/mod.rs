//! Source resolver: rebuilds the canonical reading list for a completion.
//!
//! Readings may have been stored under several shapes over the product's
//! lifetime. The resolver tries each shape in priority order and the first
//! one that yields anything wins outright. When the winner carries no
//! values at all, the external reading log is consulted as a fallback.
//!
//! ```text
//! equipment_list -> temperatures -> temp_<id> -> <id> -> substring match
//!                                   |
//!                   no values? -> external log (±window, same recorder/site)
//! ```

mod entry;
pub mod strategies;

pub use entry::{IDENTIFIER_FIELDS, NAME_FIELDS, UNKNOWN_EQUIPMENT, VALUE_FIELDS};
pub use strategies::{
    default_strategies, AssetIdKeyStrategy, Confidence, EquipmentListStrategy, ExtractedReading,
    ExtractionContext, ExtractionStrategy, HeuristicMatchStrategy, KeyedFieldStrategy,
    TemperatureArrayStrategy,
};

use chrono::Duration;
use tracing::{debug, warn};

use crate::domain::models::{
    AssetReading, CompletionRecord, ReadingSource, ResolverConfig, TaskConfig,
};
use crate::domain::ports::{ReadingLogEntry, ReadingLogQuery, ReadingLogSource};

/// Result of the local (record-only) part of the cascade.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalResolution {
    /// Strategy that produced the readings, `None` when nothing matched
    pub source: Option<ReadingSource>,
    pub readings: Vec<ExtractedReading>,
}

impl LocalResolution {
    pub fn has_values(&self) -> bool {
        self.readings.iter().any(|r| r.reading.has_value())
    }

    pub fn into_readings(self) -> Vec<AssetReading> {
        self.readings.into_iter().map(|r| r.reading).collect()
    }
}

/// Service that resolves completion records into asset readings
#[derive(Debug)]
pub struct SourceResolver {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
    log_window: Duration,
    log_result_limit: usize,
}

impl Default for SourceResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceResolver {
    /// Create a resolver with the default strategy order, a ±5 minute log
    /// window and a cap of 10 log entries
    pub fn new() -> Self {
        Self::from_config(&ResolverConfig::default())
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        let window_secs = i64::try_from(config.log_window_secs).unwrap_or(i64::MAX);
        Self {
            strategies: default_strategies(),
            log_window: Duration::try_seconds(window_secs).unwrap_or_else(|| Duration::minutes(5)),
            log_result_limit: config.log_result_limit,
        }
    }

    /// Replace the strategy list. Order is priority order.
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Run the record-only cascade: first non-empty strategy wins.
    pub fn resolve_local(&self, record: &CompletionRecord, config: &TaskConfig) -> LocalResolution {
        let ctx = ExtractionContext { record, config };

        for (position, strategy) in self.strategies.iter().enumerate() {
            let readings = strategy.extract(&ctx);
            if readings.is_empty() {
                continue;
            }

            debug!(
                source = %strategy.source(),
                count = readings.len(),
                with_values = readings.iter().filter(|r| r.reading.has_value()).count(),
                "reading source selected"
            );

            if tracing::enabled!(tracing::Level::DEBUG) {
                self.log_shadowed_readings(&ctx, &readings, position);
            }

            return LocalResolution {
                source: Some(strategy.source()),
                readings,
            };
        }

        debug!("no reading source matched the completion record");
        LocalResolution::default()
    }

    /// Resolve readings for a completion, consulting the external log when
    /// the record itself holds no values.
    ///
    /// Log failures are swallowed; the record's own readings are returned.
    pub async fn resolve(
        &self,
        record: &CompletionRecord,
        config: &TaskConfig,
        log_source: &dyn ReadingLogSource,
    ) -> Vec<AssetReading> {
        let local = self.resolve_local(record, config);
        if local.has_values() {
            return local.into_readings();
        }

        let readings = local.into_readings();
        let Some(query) = self.log_query(record) else {
            debug!("completion lacks recorder or time; skipping external log lookup");
            return readings;
        };

        match log_source.fetch_readings(&query).await {
            Ok(entries) => {
                debug!(entries = entries.len(), "external log entries fetched");
                Self::merge_log_entries(readings, &entries, &query, config)
            }
            Err(err) => {
                warn!(
                    error = %err,
                    recorded_by = %query.recorded_by,
                    "external reading log unavailable; continuing with local readings"
                );
                readings
            }
        }
    }

    /// Query for the log window around this completion, if the record
    /// carries enough to scope one.
    pub fn log_query(&self, record: &CompletionRecord) -> Option<ReadingLogQuery> {
        let recorded_by = record.recorded_by()?;
        let completed_at = record.completed_at()?;
        Some(ReadingLogQuery::around(
            recorded_by,
            record.site_id(),
            completed_at,
            self.log_window,
            self.log_result_limit,
        ))
    }

    /// Merge external log entries into the local readings.
    ///
    /// Entries are assumed most recent first; the first usable entry per
    /// asset wins. Local values are never overwritten. Entries for assets
    /// neither present locally nor configured on the task are ignored.
    pub fn merge_log_entries(
        mut readings: Vec<AssetReading>,
        entries: &[ReadingLogEntry],
        query: &ReadingLogQuery,
        config: &TaskConfig,
    ) -> Vec<AssetReading> {
        for entry in entries.iter().take(query.limit) {
            let Some(value) = entry.reading else {
                continue;
            };
            if !query.contains(entry.recorded_at) {
                continue;
            }

            let existing = readings
                .iter_mut()
                .find(|r| r.matches(Some(entry.asset_id.as_str()), entry.equipment_name.as_deref()));

            match existing {
                Some(reading) if !reading.has_value() => {
                    reading.value = Some(value);
                    reading.recorded_at = Some(entry.recorded_at);
                    reading.source = ReadingSource::ExternalLog;
                    if reading.asset_id.is_none() {
                        reading.asset_id = Some(entry.asset_id.clone());
                    }
                }
                Some(_) => {}
                None => {
                    let configured = config.asset(&entry.asset_id).or_else(|| {
                        entry.equipment_name.as_deref().and_then(|n| config.find_by_name(n))
                    });
                    let Some(asset) = configured else {
                        continue;
                    };
                    if readings.iter().any(|r| r.asset_id.as_deref() == Some(asset.id.as_str())) {
                        continue;
                    }
                    readings.push(
                        AssetReading::new(
                            Some(asset.id.clone()),
                            asset.display_name(),
                            Some(value),
                            ReadingSource::ExternalLog,
                        )
                        .with_nickname(asset.nickname.clone())
                        .with_recorded_at(Some(entry.recorded_at)),
                    );
                }
            }
        }

        readings
    }

    /// Report readings lower-priority strategies would have contributed for
    /// assets the winner does not cover. They are not merged.
    fn log_shadowed_readings(
        &self,
        ctx: &ExtractionContext<'_>,
        winners: &[ExtractedReading],
        position: usize,
    ) {
        for strategy in self.strategies.iter().skip(position + 1) {
            let shadowed = strategy
                .extract(ctx)
                .into_iter()
                .filter(|candidate| {
                    !winners.iter().any(|w| {
                        w.reading.matches(
                            candidate.reading.asset_id.as_deref(),
                            Some(candidate.reading.equipment_name.as_str()),
                        )
                    })
                })
                .count();
            if shadowed > 0 {
                debug!(
                    source = %strategy.source(),
                    shadowed,
                    "lower-priority source has readings for assets not covered by the selected source"
                );
            }
        }
    }
}
