//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the async interfaces infrastructure adapters implement:
//! - ReadingLogSource: time-windowed external reading log lookups
//!
//! These traits keep the reconciliation engine independent of how the
//! external log is actually reached.

pub mod null_reading_log;
pub mod reading_log;

pub use null_reading_log::NullReadingLog;
pub use reading_log::{ReadingLogEntry, ReadingLogQuery, ReadingLogSource};
