//! tempguard - temperature-compliance reconciliation engine
//!
//! Turns heterogeneous task-completion records into a canonical list of
//! per-asset temperature readings, classifies each against its configured
//! range and decides whether a monitoring or callout follow-up is needed.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, parsing helpers and port traits
//! - **Service Layer** (`services`): source resolution, range evaluation and
//!   follow-up orchestration
//! - **Adapters** (`adapters`): external reading log implementations
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use serde_json::json;
//! use tempguard::domain::models::{AssetRef, CompletionRecord, FollowUpContext, TaskConfig};
//! use tempguard::domain::ports::NullReadingLog;
//! use tempguard::services::ComplianceService;
//!
//! # async fn run() -> tempguard::DomainResult<()> {
//! let task = TaskConfig::new(vec![
//!     AssetRef::new("f1", "Chest Freezer").with_range(Some(-18.0), Some(-20.0)),
//! ]);
//! let record = CompletionRecord::from_value(json!({
//!     "equipment_list": [{"asset_id": "f1", "temperature": "-15"}]
//! }))?;
//!
//! let service = ComplianceService::new(Arc::new(NullReadingLog));
//! let report = service.evaluate_completion(&record, &task, &FollowUpContext::none()).await;
//! assert!(report.decision.is_required());
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    AssetReading, AssetRef, ComplianceStatus, CompletionRecord, Config, EvaluatedReading,
    FollowUpAction, FollowUpContext, FollowUpDecision, TaskConfig, Thresholds,
};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{ComplianceReport, ComplianceService, FollowUpOrchestrator, RangeEvaluator, SourceResolver};
