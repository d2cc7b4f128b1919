//! Follow-up domain model.
//!
//! A follow-up is a secondary task created because a reading was out of
//! range. Monitoring follow-ups carry a snapshot of the reading that caused
//! them and, once completed, the corrective reading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::reading::AssetReading;
use crate::domain::errors::{DomainError, DomainResult};

/// Why the task being evaluated exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpReason {
    #[default]
    None,
    Monitoring,
    CalloutReport,
    CompletedLate,
    CompletedEarly,
}

impl FollowUpReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Monitoring => "monitoring",
            Self::CalloutReport => "callout_report",
            Self::CompletedLate => "completed_late",
            Self::CompletedEarly => "completed_early",
        }
    }
}

/// Position of a context in the monitoring lifecycle.
///
/// `None -> Monitoring -> Resolved`. There is no expiry state: a monitoring
/// follow-up that is never completed stays `Monitoring`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitoringState {
    None,
    Monitoring,
    Resolved,
}

impl MonitoringState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Monitoring => "monitoring",
            Self::Resolved => "resolved",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved)
    }
}

/// Prior follow-up context for an evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FollowUpContext {
    #[serde(default)]
    pub reason: FollowUpReason,
    #[serde(default)]
    pub original_reading: Option<AssetReading>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub new_reading: Option<AssetReading>,
}

impl FollowUpContext {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_reason(reason: FollowUpReason) -> Self {
        Self {
            reason,
            ..Default::default()
        }
    }

    pub fn state(&self) -> MonitoringState {
        match (self.reason, &self.original_reading, &self.new_reading) {
            (FollowUpReason::Monitoring, Some(_), Some(_)) => MonitoringState::Resolved,
            (FollowUpReason::Monitoring, Some(_), None) => MonitoringState::Monitoring,
            _ => MonitoringState::None,
        }
    }

    /// Open a monitoring follow-up with a snapshot of the triggering reading.
    ///
    /// The snapshot is immutable: a context that already holds an original
    /// reading cannot be restarted.
    pub fn start_monitoring(
        &self,
        original: AssetReading,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if self.original_reading.is_some() {
            return Err(DomainError::InvalidStateTransition {
                from: self.state().as_str().to_string(),
                to: MonitoringState::Monitoring.as_str().to_string(),
                reason: "original reading already captured".to_string(),
            });
        }

        Ok(Self {
            reason: FollowUpReason::Monitoring,
            original_reading: Some(original),
            created_at: Some(created_at),
            new_reading: None,
        })
    }

    /// Record the follow-up's own reading and move to `Resolved`.
    pub fn resolve(&self, new_reading: AssetReading) -> DomainResult<Self> {
        let state = self.state();
        if state != MonitoringState::Monitoring {
            return Err(DomainError::InvalidStateTransition {
                from: state.as_str().to_string(),
                to: MonitoringState::Resolved.as_str().to_string(),
                reason: "only an open monitoring follow-up can be resolved".to_string(),
            });
        }

        Ok(Self {
            new_reading: Some(new_reading),
            ..self.clone()
        })
    }
}

/// Follow-up signal handed to task-creation collaborators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpAction {
    #[default]
    None,
    Monitor,
    Callout,
    MonitorAndCallout,
}

impl FollowUpAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Monitor => "monitor",
            Self::Callout => "callout",
            Self::MonitorAndCallout => "monitor_and_callout",
        }
    }

    pub fn includes_monitoring(&self) -> bool {
        matches!(self, Self::Monitor | Self::MonitorAndCallout)
    }

    pub fn includes_callout(&self) -> bool {
        matches!(self, Self::Callout | Self::MonitorAndCallout)
    }
}

impl std::fmt::Display for FollowUpAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the follow-up decision for one completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FollowUpDecision {
    pub action: FollowUpAction,
    /// Operator must confirm before the follow-up is created.
    pub requires_confirmation: bool,
    /// Follow-up is required but the operator has not picked monitor or
    /// callout yet; `action` lists both options.
    pub awaiting_operator_choice: bool,
    /// Human-readable justification, one line per trigger.
    pub reasons: Vec<String>,
}

impl FollowUpDecision {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_required(&self) -> bool {
        self.action != FollowUpAction::None
    }

    pub fn justification(&self) -> String {
        self.reasons.join("; ")
    }
}
