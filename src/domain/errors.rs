//! Domain errors for the tempguard compliance engine.
//!
//! The reconciliation engine itself never fails: bad data degrades to
//! "no reading". These errors cover the boundaries around it.

use thiserror::Error;

/// Domain-level errors that can occur in the tempguard system.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid completion record: {0}")]
    InvalidRecord(String),

    #[error("Invalid task configuration: {0}")]
    InvalidTaskConfig(String),

    #[error("Invalid state transition from {from} to {to}: {reason}")]
    InvalidStateTransition { from: String, to: String, reason: String },

    #[error("Reading log source unavailable: {0}")]
    LogSourceUnavailable(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for DomainError {
    fn from(err: reqwest::Error) -> Self {
        DomainError::LogSourceUnavailable(err.to_string())
    }
}
