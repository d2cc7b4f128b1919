//! In-memory reading log.

use std::path::Path;

use async_trait::async_trait;

use super::payload::{decode_entries, select_entries};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::{ReadingLogEntry, ReadingLogQuery, ReadingLogSource};

/// Reading log backed by a fixed set of entries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReadingLog {
    entries: Vec<ReadingLogEntry>,
}

impl InMemoryReadingLog {
    pub fn new(entries: Vec<ReadingLogEntry>) -> Self {
        Self { entries }
    }

    /// Load entries from a JSON file holding an array, or an object with a
    /// `readings` array.
    pub fn from_json_file(path: impl AsRef<Path>) -> DomainResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DomainError::LogSourceUnavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        let payload = serde_json::from_str(&raw)?;
        Ok(Self::new(decode_entries(payload)?))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ReadingLogSource for InMemoryReadingLog {
    async fn fetch_readings(&self, query: &ReadingLogQuery) -> DomainResult<Vec<ReadingLogEntry>> {
        Ok(select_entries(&self.entries, query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use std::io::Write;

    #[tokio::test]
    async fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"readings": [
                {{"asset_id": "a1", "reading": "0", "recorded_at": "2024-03-01T10:01:00Z"}},
                {{"asset_id": "a2", "reading": 5, "recorded_at": "2024-03-01T12:00:00Z"}}
            ]}}"#
        )
        .unwrap();
        file.flush().unwrap();

        let log = InMemoryReadingLog::from_json_file(file.path()).unwrap();
        assert_eq!(log.len(), 2);

        let center = DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z").unwrap().with_timezone(&Utc);
        let query = ReadingLogQuery::around("u1", None, center, Duration::minutes(5), 10);
        let entries = log.fetch_readings(&query).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].reading, Some(0.0));
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let err = InMemoryReadingLog::from_json_file("/nonexistent/log.json").unwrap_err();
        assert!(matches!(err, DomainError::LogSourceUnavailable(_)));
    }
}
