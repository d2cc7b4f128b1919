//! CLI command implementations.

pub mod config;
pub mod evaluate;
pub mod follow_up;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::adapters::{reading_log_from_config, InMemoryReadingLog};
use crate::domain::models::{AssetDirectory, CompletionRecord, Config};
use crate::domain::ports::ReadingLogSource;
use crate::services::ComplianceService;

/// Read and deserialize a JSON file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

pub(crate) fn read_record(path: &Path) -> Result<CompletionRecord> {
    let value = read_json(path)?;
    CompletionRecord::from_value(value).with_context(|| format!("Invalid completion record in {}", path.display()))
}

/// Build the compliance service for a command.
///
/// A `--log-file` dump replaces the configured reading log service.
pub(crate) fn build_service(
    config: &Config,
    log_file: Option<&PathBuf>,
    directory: Option<&PathBuf>,
) -> Result<ComplianceService> {
    let log_source: Arc<dyn ReadingLogSource> = match log_file {
        Some(path) => Arc::new(
            InMemoryReadingLog::from_json_file(path)
                .with_context(|| format!("Failed to load reading log {}", path.display()))?,
        ),
        None => reading_log_from_config(&config.log_source).context("Failed to create reading log client")?,
    };

    let directory: AssetDirectory = match directory {
        Some(path) => read_json(path)?,
        None => AssetDirectory::new(),
    };

    Ok(ComplianceService::from_config(config, log_source).with_directory(directory))
}
