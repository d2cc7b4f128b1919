//! Adapters for external systems.

pub mod reading_log;

pub use reading_log::{reading_log_from_config, HttpReadingLog, InMemoryReadingLog};
