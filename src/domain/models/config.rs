use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::asset::Thresholds;

/// Main configuration structure for tempguard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Source resolver configuration
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// External reading log configuration
    #[serde(default)]
    pub log_source: LogSourceConfig,

    /// Default thresholds, used when a task supplies none
    #[serde(default)]
    pub thresholds: Thresholds,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: LogFormat,

    /// Directory for log files (stderr only when unset)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Log file rotation policy
    #[serde(default)]
    pub rotation: RotationPolicy,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}

fn default_log_level() -> String {
    "info".to_string()
}

const fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: RotationPolicy::default(),
        }
    }
}

/// Source resolver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResolverConfig {
    /// Half-width of the external log window around completion time
    #[serde(default = "default_log_window_secs")]
    pub log_window_secs: u64,

    /// Maximum number of external log entries fetched per evaluation
    #[serde(default = "default_log_result_limit")]
    pub log_result_limit: usize,
}

const fn default_log_window_secs() -> u64 {
    300
}

const fn default_log_result_limit() -> usize {
    10
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            log_window_secs: default_log_window_secs(),
            log_result_limit: default_log_result_limit(),
        }
    }
}

/// External reading log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LogSourceConfig {
    /// Base URL of the reading log service; no external lookups when unset
    #[serde(default)]
    pub base_url: Option<String>,

    /// Bearer token sent with every request
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for LogSourceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}
