use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Upper bound on `resolver.log_result_limit`
pub const MAX_LOG_RESULT_LIMIT: usize = 100;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log window: {0}s. Must be positive")]
    InvalidLogWindow(u64),

    #[error("Invalid log result limit: {0}. Must be between 1 and 100")]
    InvalidLogResultLimit(usize),

    #[error("Invalid timeout: {0}s. Must be positive")]
    InvalidTimeout(u64),

    #[error("Invalid log source URL: {0}. Must start with http:// or https://")]
    InvalidBaseUrl(String),

    #[error("Invalid thresholds: warn ({warn}) must not exceed fail ({fail})")]
    InvalidThresholds { warn: f64, fail: f64 },
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .tempguard/config.yaml
    /// 3. .tempguard/local.yaml (optional overrides)
    /// 4. Environment variables (TEMPGUARD_* prefix, `__` separates sections)
    pub fn load() -> Result<Config> {
        let config: Config = Self::base_figment()
            .merge(Yaml::file(".tempguard/config.yaml"))
            .merge(Yaml::file(".tempguard/local.yaml"))
            .merge(Env::prefixed("TEMPGUARD_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring
    /// environment overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let config: Config = Self::base_figment()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("TEMPGUARD_").split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn base_figment() -> Figment {
        Figment::new().merge(Serialized::defaults(Config::default()))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        if config.resolver.log_window_secs == 0 {
            return Err(ConfigError::InvalidLogWindow(config.resolver.log_window_secs));
        }

        let limit = config.resolver.log_result_limit;
        if limit == 0 || limit > MAX_LOG_RESULT_LIMIT {
            return Err(ConfigError::InvalidLogResultLimit(limit));
        }

        if config.log_source.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.log_source.timeout_secs));
        }

        if let Some(url) = &config.log_source.base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidBaseUrl(url.clone()));
            }
        }

        if let (Some(warn), Some(fail)) = (config.thresholds.warn, config.thresholds.fail) {
            if warn > fail {
                return Err(ConfigError::InvalidThresholds { warn, fail });
            }
        }

        Ok(())
    }
}
