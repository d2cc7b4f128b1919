//! Domain layer for the tempguard compliance engine
//!
//! This module contains the reading, range and follow-up models plus the
//! ports the engine talks to.

pub mod errors;
pub mod normalize;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{DomainError, DomainResult};
