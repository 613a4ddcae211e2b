//! Engine error types.
//!
//! Every error aborts the public operation that raised it; the engine never
//! publishes a partial recomputation.

use chrono::{DateTime, Utc};
use thiserror::Error;
use wl_core::enums::EntityKind;
use wl_core::errors::CoreError;
use wl_expr::ExprError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The expression evaluator rejected an expression.
    #[error("Invalid expression: {0}")]
    InvalidExpression(#[from] ExprError),

    /// A task's load could not be computed from its inputs.
    #[error("Load calculation failed for task {task}: {reason}")]
    LoadCalculation { task: String, reason: String },

    /// The FTE fixed-point solver did not settle within its cycle limit.
    #[error("FTE target did not converge after {cycles} cycles")]
    ConvergenceFailure { cycles: u32 },

    /// A data-model invariant does not hold.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// A history write was not strictly after the entity's latest snapshot.
    #[error("Conflicting snapshot for {entity} {id}: {attempted} is not after {latest}")]
    ConflictingSnapshot {
        entity: EntityKind,
        id: String,
        attempted: DateTime<Utc>,
        latest: DateTime<Utc>,
    },

    /// An entity could not be serialized into a snapshot.
    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// Stable name of the error kind, for presentation and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidExpression(_) => "invalid_expression",
            Self::LoadCalculation { .. } => "load_calculation_error",
            Self::ConvergenceFailure { .. } => "convergence_failure",
            Self::InvariantViolation(_) => "invariant_violation",
            Self::ConflictingSnapshot { .. } => "conflicting_snapshot",
            Self::Serialization(_) => "serialization_error",
        }
    }

    pub(crate) fn load(task: &str, reason: impl Into<String>) -> Self {
        Self::LoadCalculation {
            task: task.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }
}

impl From<CoreError> for EngineError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::ConflictingSnapshot {
                entity,
                id,
                attempted,
                latest,
            } => Self::ConflictingSnapshot {
                entity,
                id,
                attempted,
                latest,
            },
            CoreError::InvariantViolation(message) | CoreError::Validation(message) => {
                Self::InvariantViolation(message)
            }
            CoreError::NotFound { entity, id } => {
                Self::InvariantViolation(format!("{entity} {id} does not exist"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable() {
        assert_eq!(
            EngineError::ConvergenceFailure { cycles: 64 }.kind(),
            "convergence_failure"
        );
        assert_eq!(
            EngineError::from(ExprError::DivisionByZero).kind(),
            "invalid_expression"
        );
    }

    #[test]
    fn convergence_failure_surfaces_cycle_count() {
        let message = EngineError::ConvergenceFailure { cycles: 64 }.to_string();
        assert!(message.contains("64"), "{message}");
    }

    #[test]
    fn invalid_expression_keeps_parser_message() {
        let message = EngineError::from(ExprError::UnknownName("x".into())).to_string();
        assert_eq!(message, "Invalid expression: unknown name 'x'");
    }

    #[test]
    fn core_errors_map_onto_engine_kinds() {
        let err = EngineError::from(CoreError::invariant("staff ab1: bad"));
        assert!(matches!(err, EngineError::InvariantViolation(_)));
    }
}
