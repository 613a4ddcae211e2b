//! # wl-db
//!
//! libSQL persistent store for teaching workload balancing.
//!
//! Holds the user-managed entities (standard loads, groups, staff, units,
//! load functions, tasks, assignments) with their engine-derived fields, and
//! the append-only history of year-rollover snapshots.
//!
//! Public engine operations run through [`service::WorkloadService`]: the
//! graph is loaded inside one transaction, recomputed in memory, and written
//! back before commit, so a failed operation leaves the store untouched.

pub mod error;
pub mod helpers;
mod migrations;
pub mod operations;
pub mod repos;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle.
pub struct WorkloadDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl WorkloadDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let workload_db = Self { db, conn };
        workload_db.run_migrations().await?;
        Ok(workload_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"tsk-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> WorkloadDb {
        WorkloadDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = [
            "standard_loads",
            "academic_groups",
            "staff",
            "units",
            "load_functions",
            "tasks",
            "assignments",
            "history_records",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        let id = db.generate_id(wl_core::ids::PREFIX_TASK).await.unwrap();
        assert!(id.starts_with("tsk-"), "{id}");
        assert_eq!(id.len(), 12, "{id}");
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()), "{id}");
    }

    #[tokio::test]
    async fn generate_id_uniqueness() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..100 {
            let id = db.generate_id(wl_core::ids::PREFIX_ASSIGNMENT).await.unwrap();
            assert!(ids.insert(id.clone()), "Duplicate ID generated: {id}");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn staff_contract_xor_is_enforced() {
        let db = test_db().await;
        db.conn()
            .execute("INSERT INTO standard_loads (year) VALUES (2024)", ())
            .await
            .unwrap();

        let both = db
            .conn()
            .execute(
                "INSERT INTO staff (account, name, hours_fixed, fte_fraction, year)
                 VALUES ('ab1', 'A', 100, 0.5, 2024)",
                (),
            )
            .await;
        assert!(both.is_err());

        let neither = db
            .conn()
            .execute(
                "INSERT INTO staff (account, name, year) VALUES ('ab1', 'A', 2024)",
                (),
            )
            .await;
        assert!(neither.is_err());
    }

    #[tokio::test]
    async fn lead_task_requires_unit() {
        let db = test_db().await;
        let result = db
            .conn()
            .execute(
                "INSERT INTO tasks (id, name, title, is_lead) VALUES ('tsk-1', 'Lead', 'Lead', 1)",
                (),
            )
            .await;
        assert!(result.is_err());
    }
}
