//! History repository: append-only snapshots.

use chrono::{DateTime, Utc};
use wl_core::enums::EntityKind;
use wl_core::errors::CoreError;
use wl_core::history::{HistoryLedger, HistoryRecord, LedgerEntry};

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, parse_datetime, parse_enum, parse_json};
use crate::service::WorkloadService;

const SELECT_COLS: &str =
    "history_id, entity_kind, entity_id, history_date, load_balance_final, data";

fn row_to_record(row: &libsql::Row) -> Result<HistoryRecord, DatabaseError> {
    Ok(HistoryRecord {
        history_id: row.get(0)?,
        entity_kind: parse_enum(&row.get::<String>(1)?)?,
        entity_id: row.get(2)?,
        history_date: parse_datetime(&row.get::<String>(3)?)?,
        load_balance_final: row.get::<Option<i64>>(4)?,
        data: parse_json(&row.get::<String>(5)?)?,
    })
}

/// Load the balance index of every snapshot, without payloads.
pub(crate) async fn fetch_ledger(
    conn: &libsql::Connection,
) -> Result<HistoryLedger, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT history_id, entity_kind, entity_id, history_date, load_balance_final
             FROM history_records",
            (),
        )
        .await?;
    let mut ledger = HistoryLedger::new();
    while let Some(row) = rows.next().await? {
        let kind: EntityKind = parse_enum(&row.get::<String>(1)?)?;
        ledger.insert(
            kind,
            row.get::<String>(2)?,
            LedgerEntry {
                history_id: row.get(0)?,
                history_date: parse_datetime(&row.get::<String>(3)?)?,
                load_balance_final: row.get::<Option<i64>>(4)?,
            },
        );
    }
    Ok(ledger)
}

pub(crate) async fn insert(
    conn: &libsql::Connection,
    record: &HistoryRecord,
) -> Result<(), DatabaseError> {
    let data =
        serde_json::to_string(&record.data).map_err(|e| DatabaseError::Other(e.into()))?;
    conn.execute(
        &format!("INSERT INTO history_records ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
        libsql::params![
            record.history_id,
            record.entity_kind.as_str(),
            record.entity_id.as_str(),
            format_datetime(record.history_date),
            record.load_balance_final,
            data
        ],
    )
    .await?;
    Ok(())
}

async fn latest_date(
    conn: &libsql::Connection,
    kind: EntityKind,
    entity_id: &str,
) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT history_date FROM history_records
             WHERE entity_kind = ?1 AND entity_id = ?2
             ORDER BY history_date DESC, history_id DESC LIMIT 1",
            libsql::params![kind.as_str(), entity_id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(parse_datetime(&row.get::<String>(0)?)?)),
        None => Ok(None),
    }
}

impl WorkloadService {
    /// Append one snapshot. The store assigns `history_id`.
    ///
    /// # Errors
    ///
    /// Returns a `ConflictingSnapshot` engine error if `history_date` is not
    /// strictly after the entity's latest snapshot.
    pub async fn append_history(
        &self,
        record: &HistoryRecord,
    ) -> Result<HistoryRecord, DatabaseError> {
        let conn = self.db().conn();
        if let Some(latest) = latest_date(conn, record.entity_kind, &record.entity_id).await? {
            if record.history_date <= latest {
                return Err(CoreError::ConflictingSnapshot {
                    entity: record.entity_kind,
                    id: record.entity_id.clone(),
                    attempted: record.history_date,
                    latest,
                }
                .into());
            }
        }

        let data =
            serde_json::to_string(&record.data).map_err(|e| DatabaseError::Other(e.into()))?;
        conn.execute(
            "INSERT INTO history_records
                 (entity_kind, entity_id, history_date, load_balance_final, data)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            libsql::params![
                record.entity_kind.as_str(),
                record.entity_id.as_str(),
                format_datetime(record.history_date),
                record.load_balance_final,
                data
            ],
        )
        .await?;

        Ok(HistoryRecord {
            history_id: conn.last_insert_rowid(),
            ..record.clone()
        })
    }

    /// Snapshots of one entity, newest first.
    pub async fn list_history(
        &self,
        kind: EntityKind,
        entity_id: &str,
    ) -> Result<Vec<HistoryRecord>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM history_records
                     WHERE entity_kind = ?1 AND entity_id = ?2
                     ORDER BY history_date DESC, history_id DESC"
                ),
                libsql::params![kind.as_str(), entity_id],
            )
            .await?;
        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(row_to_record(&row)?);
        }
        Ok(records)
    }

    /// Sum of frozen balances over an entity's snapshots dated at or before
    /// `as_of`.
    pub async fn history_balance_sum_as_of(
        &self,
        kind: EntityKind,
        entity_id: &str,
        as_of: DateTime<Utc>,
    ) -> Result<i64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT COALESCE(SUM(load_balance_final), 0) FROM history_records
                 WHERE entity_kind = ?1 AND entity_id = ?2 AND history_date <= ?3",
                libsql::params![kind.as_str(), entity_id, format_datetime(as_of)],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    /// The in-memory balance index over all snapshots.
    pub async fn load_ledger(&self) -> Result<HistoryLedger, DatabaseError> {
        fetch_ledger(self.db().conn()).await
    }
}
