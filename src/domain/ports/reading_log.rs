use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainResult;
use crate::domain::normalize::deserialize_lenient_f64;

/// Query against the external reading log.
///
/// Scoped by recorder, optional site and a time window around the
/// completion being reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingLogQuery {
    pub recorded_by: String,
    pub site_id: Option<String>,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub limit: usize,
}

impl ReadingLogQuery {
    /// Window of `half_width` either side of `center`.
    pub fn around(
        recorded_by: impl Into<String>,
        site_id: Option<String>,
        center: DateTime<Utc>,
        half_width: Duration,
        limit: usize,
    ) -> Self {
        Self {
            recorded_by: recorded_by.into(),
            site_id,
            window_start: center - half_width,
            window_end: center + half_width,
            limit,
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.window_start && at <= self.window_end
    }
}

/// One entry returned by the external reading log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingLogEntry {
    pub asset_id: String,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub reading: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    pub recorded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_name: Option<String>,
}

/// Port for the time-windowed external reading log.
///
/// Implementations return entries most recent first, capped at
/// `query.limit`. Callers treat any error as "no supplemental readings".
///
/// # Examples
///
/// ```no_run
/// use tempguard::domain::ports::{ReadingLogQuery, ReadingLogSource};
///
/// async fn example(source: &dyn ReadingLogSource, query: &ReadingLogQuery) {
///     let entries = source.fetch_readings(query).await.unwrap_or_default();
///     println!("{} supplemental readings", entries.len());
/// }
/// ```
#[async_trait]
pub trait ReadingLogSource: Send + Sync {
    /// Fetch log entries matching the query
    async fn fetch_readings(&self, query: &ReadingLogQuery) -> DomainResult<Vec<ReadingLogEntry>>;
}
