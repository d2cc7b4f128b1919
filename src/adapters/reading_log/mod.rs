//! Reading log adapters.
//!
//! Implementations of [`ReadingLogSource`]:
//! - [`HttpReadingLog`]: remote reading log service
//! - [`InMemoryReadingLog`]: fixed entries, typically loaded from a JSON dump
//!
//! [`ReadingLogSource`]: crate::domain::ports::ReadingLogSource

pub mod http;
pub mod memory;
mod payload;

use std::sync::Arc;

pub use self::http::HttpReadingLog;
pub use self::memory::InMemoryReadingLog;

use crate::domain::errors::DomainResult;
use crate::domain::models::LogSourceConfig;
use crate::domain::ports::{NullReadingLog, ReadingLogSource};

/// Build the configured reading log; [`NullReadingLog`] when no base URL is set.
pub fn reading_log_from_config(config: &LogSourceConfig) -> DomainResult<Arc<dyn ReadingLogSource>> {
    match HttpReadingLog::from_config(config)? {
        Some(http) => Ok(Arc::new(http)),
        None => Ok(Arc::new(NullReadingLog::new())),
    }
}
