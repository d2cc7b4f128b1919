//! Follow-up orchestration.
//!
//! Decides whether a completion needs a monitoring task or a contractor
//! callout, and reconciles a monitoring follow-up's original reading with
//! the reading taken when the follow-up itself was completed.

use tracing::{debug, info};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AssetReading, ChecklistItem, ComplianceStatus, CompletionRecord, EvaluatedReading,
    FollowUpAction, FollowUpContext, FollowUpDecision, ManualResult, MonitoringState,
    OperatorChoice, ReadingSource, Thresholds,
};

/// Non-temperature inputs that can also require a follow-up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionChecks {
    pub manual_result: Option<ManualResult>,
    pub checklist: Vec<ChecklistItem>,
    pub operator_choice: Option<OperatorChoice>,
}

impl CompletionChecks {
    pub fn from_record(record: &CompletionRecord) -> Self {
        Self {
            manual_result: record.manual_result(),
            checklist: record.checklist(),
            operator_choice: record.operator_choice(),
        }
    }
}

/// Service deciding follow-up actions for evaluated completions
#[derive(Debug, Clone, Copy, Default)]
pub struct FollowUpOrchestrator;

impl FollowUpOrchestrator {
    pub fn new() -> Self {
        Self
    }

    /// Relabel readings against the numeric thresholds.
    ///
    /// Above `fail` becomes `Failed`; above `warn` turns an `Ok` reading
    /// into `Warning`. This is the only place `Warning` is produced.
    pub fn apply_thresholds(
        &self,
        readings: Vec<EvaluatedReading>,
        thresholds: &Thresholds,
    ) -> Vec<EvaluatedReading> {
        readings
            .into_iter()
            .map(|mut evaluated| {
                if let Some(value) = evaluated.reading.value {
                    if thresholds.exceeds_fail(value) {
                        evaluated.status = ComplianceStatus::Failed;
                    } else if thresholds.exceeds_warn(value)
                        && evaluated.status == ComplianceStatus::Ok
                    {
                        evaluated.status = ComplianceStatus::Warning;
                    }
                }
                evaluated
            })
            .collect()
    }

    /// Decide the follow-up for one completion.
    ///
    /// A follow-up is required when a reading exceeds the failure threshold
    /// or fails its range, the manual result is a fail, or a required
    /// checklist item is unsatisfied. Which follow-up is up to the operator.
    /// Exceeding only the warning threshold yields a silent monitor.
    pub fn decide(
        &self,
        readings: &[EvaluatedReading],
        thresholds: &Thresholds,
        checks: &CompletionChecks,
        context: &FollowUpContext,
    ) -> FollowUpDecision {
        let mut reasons = Vec::new();

        for evaluated in readings {
            let Some(value) = evaluated.reading.value else {
                continue;
            };
            let name = evaluated.reading.display_name();

            if let Some(limit) = thresholds.fail.filter(|_| thresholds.exceeds_fail(value)) {
                reasons.push(format!("{name}: {value} exceeds failure threshold {limit}"));
            }
            if let (Some(breach), Some(range)) = (evaluated.breach, evaluated.range) {
                reasons.push(format!(
                    "{name}: {value} is {} (acceptable {range})",
                    breach.describe()
                ));
            } else if evaluated.status.is_failed() && !thresholds.exceeds_fail(value) {
                reasons.push(format!("{name}: {value} failed"));
            }
        }

        if checks.manual_result == Some(ManualResult::Fail) {
            reasons.push("Manual check recorded as fail".to_string());
        }

        for item in checks.checklist.iter().filter(|item| item.is_unsatisfied()) {
            reasons.push(format!("Required check not satisfied: {}", item.label));
        }

        if !reasons.is_empty() {
            if let Some(note) = Self::context_note(context) {
                reasons.push(note);
            }

            let (action, awaiting_operator_choice) = match checks.operator_choice {
                Some(OperatorChoice::Monitor) => (FollowUpAction::Monitor, false),
                Some(OperatorChoice::Callout) => (FollowUpAction::Callout, false),
                Some(OperatorChoice::Both) => (FollowUpAction::MonitorAndCallout, false),
                None => (FollowUpAction::MonitorAndCallout, true),
            };

            info!(
                action = %action,
                awaiting_operator_choice,
                triggers = reasons.len(),
                "follow-up required"
            );

            return FollowUpDecision {
                action,
                requires_confirmation: true,
                awaiting_operator_choice,
                reasons,
            };
        }

        let warnings: Vec<String> = readings
            .iter()
            .filter_map(|evaluated| {
                let value = evaluated.reading.value?;
                let limit = thresholds.warn.filter(|_| thresholds.exceeds_warn(value))?;
                Some(format!(
                    "{}: {value} exceeds warning threshold {limit}",
                    evaluated.reading.display_name()
                ))
            })
            .collect();

        if warnings.is_empty() {
            debug!("no follow-up required");
            return FollowUpDecision::none();
        }

        debug!(warnings = warnings.len(), "silent monitoring follow-up");
        FollowUpDecision {
            action: FollowUpAction::Monitor,
            requires_confirmation: false,
            awaiting_operator_choice: false,
            reasons: warnings,
        }
    }

    /// Pick the follow-up task's own reading for a monitoring context.
    ///
    /// Prefers the reading for the original asset; otherwise the first
    /// equipment-list reading, since monitoring tasks cover one asset.
    pub fn new_reading_for(
        &self,
        context: &FollowUpContext,
        follow_up_readings: &[AssetReading],
    ) -> Option<AssetReading> {
        let original_id = context
            .original_reading
            .as_ref()
            .and_then(|r| r.asset_id.as_deref());

        original_id
            .and_then(|id| {
                follow_up_readings
                    .iter()
                    .find(|r| r.asset_id.as_deref() == Some(id))
            })
            .or_else(|| {
                follow_up_readings
                    .iter()
                    .find(|r| r.source == ReadingSource::EquipmentList)
            })
            .cloned()
    }

    /// Resolve a monitoring follow-up from its completion readings.
    ///
    /// When no usable reading is found the context is returned unchanged
    /// and stays open.
    pub fn reconcile(
        &self,
        context: &FollowUpContext,
        follow_up_readings: &[AssetReading],
    ) -> DomainResult<FollowUpContext> {
        let state = context.state();
        if state != MonitoringState::Monitoring {
            return Err(DomainError::InvalidStateTransition {
                from: state.as_str().to_string(),
                to: MonitoringState::Resolved.as_str().to_string(),
                reason: "context is not an open monitoring follow-up".to_string(),
            });
        }

        match self.new_reading_for(context, follow_up_readings) {
            Some(new_reading) => {
                debug!(
                    asset_id = ?new_reading.asset_id,
                    value = ?new_reading.value,
                    "monitoring follow-up resolved"
                );
                context.resolve(new_reading)
            }
            None => {
                debug!("follow-up completion has no matching reading; monitoring stays open");
                Ok(context.clone())
            }
        }
    }

    fn context_note(context: &FollowUpContext) -> Option<String> {
        let original = context.original_reading.as_ref()?;
        let value = original.value?;
        Some(format!(
            "Follow-up of {} reading {value} ({})",
            original.display_name(),
            context.reason.as_str()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Breach, FollowUpReason, TemperatureRange};
    use chrono::Utc;
    use serde_json::json;

    fn evaluated(id: &str, value: Option<f64>, status: ComplianceStatus) -> EvaluatedReading {
        EvaluatedReading {
            reading: AssetReading::new(Some(id.into()), id.to_uppercase(), value, ReadingSource::EquipmentList),
            status,
            range: None,
            breach: None,
        }
    }

    fn checks_with_choice(choice: Option<OperatorChoice>) -> CompletionChecks {
        CompletionChecks {
            operator_choice: choice,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_follow_up_when_all_ok() {
        let orchestrator = FollowUpOrchestrator::new();
        let decision = orchestrator.decide(
            &[evaluated("a1", Some(3.0), ComplianceStatus::Ok)],
            &Thresholds::new(Some(5.0), Some(8.0)),
            &CompletionChecks::default(),
            &FollowUpContext::none(),
        );
        assert_eq!(decision, FollowUpDecision::none());
    }

    #[test]
    fn test_range_failure_requires_operator_choice() {
        let orchestrator = FollowUpOrchestrator::new();
        let mut failed = evaluated("a1", Some(0.0), ComplianceStatus::Failed);
        failed.range = Some(TemperatureRange::bounded(1.0, 5.0));
        failed.breach = Some(Breach::TooCold);

        let decision = orchestrator.decide(
            &[failed],
            &Thresholds::default(),
            &CompletionChecks::default(),
            &FollowUpContext::none(),
        );

        assert_eq!(decision.action, FollowUpAction::MonitorAndCallout);
        assert!(decision.awaiting_operator_choice);
        assert!(decision.requires_confirmation);
        assert_eq!(decision.reasons, vec!["A1: 0 is too cold (acceptable 1 to 5)".to_string()]);
    }

    #[test]
    fn test_operator_choice_selects_action() {
        let orchestrator = FollowUpOrchestrator::new();
        let readings = [evaluated("a1", Some(9.0), ComplianceStatus::Ok)];
        let thresholds = Thresholds::new(None, Some(8.0));

        let monitor = orchestrator.decide(&readings, &thresholds, &checks_with_choice(Some(OperatorChoice::Monitor)), &FollowUpContext::none());
        assert_eq!(monitor.action, FollowUpAction::Monitor);
        assert!(!monitor.awaiting_operator_choice);

        let callout = orchestrator.decide(&readings, &thresholds, &checks_with_choice(Some(OperatorChoice::Callout)), &FollowUpContext::none());
        assert_eq!(callout.action, FollowUpAction::Callout);
        assert!(callout.requires_confirmation);
    }

    #[test]
    fn test_warn_only_is_silent_monitor() {
        let orchestrator = FollowUpOrchestrator::new();
        let decision = orchestrator.decide(
            &[evaluated("a1", Some(6.0), ComplianceStatus::Ok)],
            &Thresholds::new(Some(5.0), Some(8.0)),
            &CompletionChecks::default(),
            &FollowUpContext::none(),
        );
        assert_eq!(decision.action, FollowUpAction::Monitor);
        assert!(!decision.requires_confirmation);
        assert!(!decision.awaiting_operator_choice);
        assert_eq!(decision.reasons.len(), 1);
    }

    #[test]
    fn test_fail_threshold_beats_warn() {
        let orchestrator = FollowUpOrchestrator::new();
        let decision = orchestrator.decide(
            &[evaluated("a1", Some(9.0), ComplianceStatus::Ok)],
            &Thresholds::new(Some(5.0), Some(8.0)),
            &CompletionChecks::default(),
            &FollowUpContext::none(),
        );
        assert!(decision.requires_confirmation);
        assert_eq!(decision.reasons, vec!["A1: 9 exceeds failure threshold 8".to_string()]);
    }

    #[test]
    fn test_manual_fail_and_checklist_require_follow_up() {
        let orchestrator = FollowUpOrchestrator::new();
        let record = CompletionRecord::from_value(json!({
            "pass_fail": "fail",
            "checklist": [{"label": "Seal intact", "required": true, "response": "no"}],
            "flag_reason": "monitor"
        }))
        .unwrap();
        let checks = CompletionChecks::from_record(&record);

        let decision = orchestrator.decide(&[], &Thresholds::default(), &checks, &FollowUpContext::none());
        assert_eq!(decision.action, FollowUpAction::Monitor);
        assert_eq!(decision.reasons.len(), 2);
        assert!(decision.justification().contains("Seal intact"));
    }

    #[test]
    fn test_missing_values_never_trigger() {
        let orchestrator = FollowUpOrchestrator::new();
        let decision = orchestrator.decide(
            &[evaluated("a1", None, ComplianceStatus::Ok)],
            &Thresholds::new(Some(-100.0), Some(-50.0)),
            &CompletionChecks::default(),
            &FollowUpContext::none(),
        );
        assert!(!decision.is_required());
    }

    #[test]
    fn test_apply_thresholds_relabels() {
        let orchestrator = FollowUpOrchestrator::new();
        let relabelled = orchestrator.apply_thresholds(
            vec![
                evaluated("a1", Some(3.0), ComplianceStatus::Ok),
                evaluated("a2", Some(6.0), ComplianceStatus::Ok),
                evaluated("a3", Some(9.0), ComplianceStatus::Ok),
                evaluated("a4", Some(6.0), ComplianceStatus::Failed),
            ],
            &Thresholds::new(Some(5.0), Some(8.0)),
        );
        let statuses: Vec<_> = relabelled.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                ComplianceStatus::Ok,
                ComplianceStatus::Warning,
                ComplianceStatus::Failed,
                ComplianceStatus::Failed
            ]
        );
    }

    fn monitoring_context(asset_id: &str, value: f64) -> FollowUpContext {
        FollowUpContext::none()
            .start_monitoring(
                AssetReading::new(Some(asset_id.into()), "Freezer", Some(value), ReadingSource::EquipmentList),
                Utc::now(),
            )
            .unwrap()
    }

    #[test]
    fn test_new_reading_prefers_matching_asset() {
        let orchestrator = FollowUpOrchestrator::new();
        let ctx = monitoring_context("f1", -15.0);
        let readings = vec![
            AssetReading::new(Some("f2".into()), "Other", Some(-30.0), ReadingSource::EquipmentList),
            AssetReading::new(Some("f1".into()), "Freezer", Some(-19.0), ReadingSource::EquipmentList),
        ];
        let new_reading = orchestrator.new_reading_for(&ctx, &readings).unwrap();
        assert_eq!(new_reading.value, Some(-19.0));
    }

    #[test]
    fn test_new_reading_falls_back_to_first_equipment_entry() {
        let orchestrator = FollowUpOrchestrator::new();
        let ctx = monitoring_context("f1", -15.0);
        let readings = vec![
            AssetReading::new(Some("k9".into()), "Keyed", Some(1.0), ReadingSource::KeyedField),
            AssetReading::new(Some("x1".into()), "Freezer", Some(-19.0), ReadingSource::EquipmentList),
            AssetReading::new(Some("x2".into()), "Freezer 2", Some(-22.0), ReadingSource::EquipmentList),
        ];
        let new_reading = orchestrator.new_reading_for(&ctx, &readings).unwrap();
        assert_eq!(new_reading.asset_id.as_deref(), Some("x1"));
    }

    #[test]
    fn test_reconcile_resolves_monitoring() {
        let orchestrator = FollowUpOrchestrator::new();
        let ctx = monitoring_context("f1", -15.0);
        let readings = vec![AssetReading::new(Some("f1".into()), "Freezer", Some(-19.0), ReadingSource::EquipmentList)];

        let resolved = orchestrator.reconcile(&ctx, &readings).unwrap();
        assert_eq!(resolved.state(), MonitoringState::Resolved);
        assert_eq!(resolved.original_reading, ctx.original_reading);
    }

    #[test]
    fn test_reconcile_without_reading_stays_open() {
        let orchestrator = FollowUpOrchestrator::new();
        let ctx = monitoring_context("f1", -15.0);
        let still_open = orchestrator.reconcile(&ctx, &[]).unwrap();
        assert_eq!(still_open.state(), MonitoringState::Monitoring);
    }

    #[test]
    fn test_reconcile_rejects_non_monitoring_context() {
        let orchestrator = FollowUpOrchestrator::new();
        let ctx = FollowUpContext::with_reason(FollowUpReason::CompletedLate);
        assert!(orchestrator.reconcile(&ctx, &[]).is_err());
    }

    #[test]
    fn test_context_note_added_when_still_failing() {
        let orchestrator = FollowUpOrchestrator::new();
        let ctx = monitoring_context("f1", -15.0);
        let decision = orchestrator.decide(
            &[evaluated("f1", Some(-14.0), ComplianceStatus::Failed)],
            &Thresholds::default(),
            &CompletionChecks::default(),
            &ctx,
        );
        assert_eq!(decision.reasons.len(), 2);
        assert_eq!(decision.reasons[1], "Follow-up of Freezer reading -15 (monitoring)");
    }
}
