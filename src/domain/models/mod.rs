pub mod asset;
pub mod completion;
pub mod config;
pub mod follow_up;
pub mod range;
pub mod reading;

pub use asset::{AssetDirectory, AssetRef, TaskConfig, Thresholds};
pub use completion::{ChecklistItem, CompletionRecord, ManualResult, OperatorChoice};
pub use config::{
    Config, LogFormat, LogSourceConfig, LoggingConfig, ResolverConfig, RotationPolicy,
};
pub use follow_up::{
    FollowUpAction, FollowUpContext, FollowUpDecision, FollowUpReason, MonitoringState,
};
pub use range::{Breach, ComplianceStatus, EvaluatedReading, RangeKind, TemperatureRange};
pub use reading::{AssetReading, ReadingSource};
