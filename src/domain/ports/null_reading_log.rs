//! Null reading log implementation.
//!
//! Used when no external reading log is configured but the resolver
//! requires a ReadingLogSource implementation.

use async_trait::async_trait;

use super::reading_log::{ReadingLogEntry, ReadingLogQuery, ReadingLogSource};
use crate::domain::errors::DomainResult;

/// A reading log that never has any entries.
#[derive(Debug, Clone, Default)]
pub struct NullReadingLog;

impl NullReadingLog {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ReadingLogSource for NullReadingLog {
    async fn fetch_readings(&self, _query: &ReadingLogQuery) -> DomainResult<Vec<ReadingLogEntry>> {
        Ok(Vec::new())
    }
}
