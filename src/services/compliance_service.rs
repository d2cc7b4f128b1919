//! Compliance service: resolve, evaluate and decide for task completions.

use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::follow_up_orchestrator::{CompletionChecks, FollowUpOrchestrator};
use super::range_evaluator::RangeEvaluator;
use super::source_resolver::{SourceResolver, UNKNOWN_EQUIPMENT};
use crate::domain::errors::DomainResult;
use crate::domain::models::{
    AssetDirectory, AssetReading, CompletionRecord, Config, EvaluatedReading, FollowUpContext,
    FollowUpDecision, TaskConfig, Thresholds,
};
use crate::domain::ports::ReadingLogSource;

/// Everything needed to evaluate one completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub record: CompletionRecord,
    #[serde(default)]
    pub task: TaskConfig,
    #[serde(default)]
    pub context: FollowUpContext,
}

/// Evaluated readings and the follow-up decision for one completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub readings: Vec<EvaluatedReading>,
    pub decision: FollowUpDecision,
}

impl ComplianceReport {
    pub fn failed_count(&self) -> usize {
        self.readings.iter().filter(|r| r.is_failed()).count()
    }

    /// Readings for which nothing was recorded.
    pub fn missing_count(&self) -> usize {
        self.readings.iter().filter(|r| !r.reading.has_value()).count()
    }
}

/// Original and corrective readings of a monitoring follow-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUpResolution {
    pub context: FollowUpContext,
    pub original: Option<EvaluatedReading>,
    pub new: Option<EvaluatedReading>,
}

impl FollowUpResolution {
    /// Corrective reading exists and is back in range.
    pub fn is_back_in_range(&self) -> bool {
        self.new
            .as_ref()
            .is_some_and(|r| r.reading.has_value() && !r.is_failed())
    }
}

/// Service for evaluating task completions
pub struct ComplianceService {
    resolver: SourceResolver,
    evaluator: RangeEvaluator,
    orchestrator: FollowUpOrchestrator,
    log_source: Arc<dyn ReadingLogSource>,
    directory: AssetDirectory,
    default_thresholds: Thresholds,
}

impl ComplianceService {
    pub fn new(log_source: Arc<dyn ReadingLogSource>) -> Self {
        Self {
            resolver: SourceResolver::new(),
            evaluator: RangeEvaluator::new(),
            orchestrator: FollowUpOrchestrator::new(),
            log_source,
            directory: AssetDirectory::new(),
            default_thresholds: Thresholds::default(),
        }
    }

    pub fn from_config(config: &Config, log_source: Arc<dyn ReadingLogSource>) -> Self {
        Self {
            resolver: SourceResolver::from_config(&config.resolver),
            default_thresholds: config.thresholds,
            ..Self::new(log_source)
        }
    }

    /// Asset directory used to name readings that only carry an id
    pub fn with_directory(mut self, directory: AssetDirectory) -> Self {
        self.directory = directory;
        self
    }

    pub fn with_resolver(mut self, resolver: SourceResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Resolve readings, classify them and decide the follow-up.
    #[instrument(skip_all, fields(assets = task.assets.len(), reason = context.reason.as_str()))]
    pub async fn evaluate_completion(
        &self,
        record: &CompletionRecord,
        task: &TaskConfig,
        context: &FollowUpContext,
    ) -> ComplianceReport {
        let readings = self.resolved_readings(record, task).await;
        let thresholds = task.thresholds.or(self.default_thresholds);

        let evaluated = self.evaluator.evaluate_all(readings, task);
        let evaluated = self.orchestrator.apply_thresholds(evaluated, &thresholds);
        let checks = CompletionChecks::from_record(record);
        let decision = self.orchestrator.decide(&evaluated, &thresholds, &checks, context);

        info!(
            readings = evaluated.len(),
            failed = evaluated.iter().filter(|r| r.is_failed()).count(),
            action = %decision.action,
            "completion evaluated"
        );

        ComplianceReport {
            readings: evaluated,
            decision,
        }
    }

    /// Evaluate several completions concurrently. Order is preserved.
    pub async fn evaluate_batch(&self, requests: &[EvaluationRequest]) -> Vec<ComplianceReport> {
        let futures = requests
            .iter()
            .map(|req| self.evaluate_completion(&req.record, &req.task, &req.context));
        join_all(futures).await
    }

    /// Reconcile a monitoring follow-up with its own completion.
    ///
    /// Both readings are evaluated against the task's configured ranges.
    pub async fn resolve_follow_up(
        &self,
        record: &CompletionRecord,
        task: &TaskConfig,
        context: &FollowUpContext,
    ) -> DomainResult<FollowUpResolution> {
        let readings = self.resolved_readings(record, task).await;
        let context = self.orchestrator.reconcile(context, &readings)?;

        let evaluate = |reading: &Option<AssetReading>| {
            reading
                .clone()
                .map(|r| self.evaluator.evaluate_reading(self.enrich(r), task))
        };
        let original = evaluate(&context.original_reading);
        let new = evaluate(&context.new_reading);

        if new.is_none() {
            warn!("monitoring follow-up completed without a usable reading");
        }

        Ok(FollowUpResolution {
            context,
            original,
            new,
        })
    }

    async fn resolved_readings(&self, record: &CompletionRecord, task: &TaskConfig) -> Vec<AssetReading> {
        self.resolver
            .resolve(record, task, self.log_source.as_ref())
            .await
            .into_iter()
            .map(|reading| self.enrich(reading))
            .collect()
    }

    /// Replace placeholder names with the directory's name for the asset.
    fn enrich(&self, mut reading: AssetReading) -> AssetReading {
        let Some(asset_id) = reading.asset_id.as_deref() else {
            return reading;
        };
        let is_placeholder =
            reading.equipment_name == asset_id || reading.equipment_name == UNKNOWN_EQUIPMENT;
        if is_placeholder {
            if let Some(name) = self.directory.name_of(asset_id) {
                reading.equipment_name = name.to_string();
            }
        }
        reading
    }
}
