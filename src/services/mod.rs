pub mod compliance_service;
pub mod follow_up_orchestrator;
pub mod range_evaluator;
pub mod source_resolver;

pub use compliance_service::{
    ComplianceReport, ComplianceService, EvaluationRequest, FollowUpResolution,
};
pub use follow_up_orchestrator::{CompletionChecks, FollowUpOrchestrator};
pub use range_evaluator::RangeEvaluator;
pub use source_resolver::{LocalResolution, SourceResolver};
