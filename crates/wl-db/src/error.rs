//! Database error types for wl-db.

use thiserror::Error;
use wl_core::errors::CoreError;
use wl_engine::EngineError;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned malformed data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The engine rejected the operation.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    /// Stable name of the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Engine(err) => err.kind(),
            Self::Query(_) | Self::LibSql(_) => "query_error",
            Self::Migration(_) => "migration_error",
            Self::NoResult => "not_found",
            Self::InvalidState(_) => "invalid_state",
            Self::Other(_) => "other",
        }
    }
}

impl From<CoreError> for DatabaseError {
    fn from(error: CoreError) -> Self {
        Self::Engine(EngineError::from(error))
    }
}
