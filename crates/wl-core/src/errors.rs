//! Cross-cutting error types for the workload crates.
//!
//! Engine-specific errors (`EngineError`) and store errors (`DatabaseError`)
//! live in their own crates and wrap these.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::enums::EntityKind;

/// Errors that can be raised by any workload crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity} {id}")]
    NotFound { entity: EntityKind, id: String },

    /// A data-model invariant does not hold.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// A history write was not strictly after the latest snapshot of the entity.
    #[error(
        "Conflicting snapshot for {entity} {id}: {attempted} is not after latest snapshot {latest}"
    )]
    ConflictingSnapshot {
        entity: EntityKind,
        id: String,
        attempted: DateTime<Utc>,
        latest: DateTime<Utc>,
    },

    /// Input failed validation before reaching an invariant check.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    /// Shorthand for building an [`CoreError::InvariantViolation`].
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }
}
