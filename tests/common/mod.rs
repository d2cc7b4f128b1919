//! Common test utilities for integration tests
//!
//! Shared fixtures for completion records, task configurations and
//! temporary JSON files.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tempguard::domain::models::{AssetRef, CompletionRecord, TaskConfig};

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Fridge `a1` (1 to 5) and freezer `f1` (inverted, -18/-20).
#[allow(dead_code)]
pub fn kitchen_task() -> TaskConfig {
    TaskConfig::new(vec![
        AssetRef::new("a1", "Dairy Fridge").with_range(Some(1.0), Some(5.0)),
        AssetRef::new("f1", "Chest Freezer").with_range(Some(-18.0), Some(-20.0)),
    ])
}

#[allow(dead_code)]
pub fn record(value: Value) -> CompletionRecord {
    CompletionRecord::from_value(value).expect("fixture record must be a JSON object")
}

/// Write `value` as JSON into `dir/name` and return the path.
#[allow(dead_code)]
pub fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).expect("Failed to write fixture");
    path
}
