//! Service layer pairing the database with the engine.
//!
//! `WorkloadService` wraps `WorkloadDb` (raw database access) and `Engine`
//! (load calculation). All repo methods are implemented as
//! `impl WorkloadService`; the transactional engine operations live in
//! [`crate::operations`].

use wl_config::EngineConfig;
use wl_engine::Engine;

use crate::WorkloadDb;
use crate::error::DatabaseError;

pub struct WorkloadService {
    db: WorkloadDb,
    engine: Engine,
}

impl WorkloadService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    /// * `config` - Engine limits applied to every operation.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str, config: EngineConfig) -> Result<Self, DatabaseError> {
        let db = WorkloadDb::open_local(db_path).await?;
        Ok(Self::from_db(db, config))
    }

    /// Create from an existing `WorkloadDb`.
    #[must_use]
    pub const fn from_db(db: WorkloadDb, config: EngineConfig) -> Self {
        Self {
            db,
            engine: Engine::new(config),
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &WorkloadDb {
        &self.db
    }

    /// Access the engine.
    #[must_use]
    pub const fn engine(&self) -> &Engine {
        &self.engine
    }
}
