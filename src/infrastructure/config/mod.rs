//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - Programmatic defaults
//! - YAML file loading (`.tempguard/config.yaml`, `.tempguard/local.yaml`)
//! - Environment variable overrides (`TEMPGUARD_*`)
//! - Validation

pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
