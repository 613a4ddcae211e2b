//! Append-only history snapshots.
//!
//! A snapshot freezes the serialized state of one entity at a `history_date`.
//! Snapshots are only produced at year rollover and never edited. Reads are
//! ordered by `(history_date desc, history_id desc)`.
//!
//! [`HistoryLedger`] is the in-memory index the engine works against: it knows
//! the latest snapshot date of every entity (to reject conflicting writes) and
//! the frozen balances (to answer "sum as of date" queries) without holding the
//! snapshot payloads.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::EntityKind;
use crate::errors::CoreError;

/// A frozen copy of one entity.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct HistoryRecord {
    pub history_id: i64,
    pub entity_kind: EntityKind,
    pub entity_id: String,
    pub history_date: DateTime<Utc>,
    /// Frozen balance, for staff and academic groups only.
    pub load_balance_final: Option<i64>,
    /// Serialized entity state.
    pub data: serde_json::Value,
}

/// Index row of the ledger: everything about a snapshot except its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerEntry {
    pub history_id: i64,
    pub history_date: DateTime<Utc>,
    pub load_balance_final: Option<i64>,
}

/// In-memory index over all snapshots.
#[derive(Debug, Clone, Default)]
pub struct HistoryLedger {
    entries: BTreeMap<(EntityKind, String), Vec<LedgerEntry>>,
    last_id: i64,
}

impl HistoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an already persisted snapshot.
    pub fn insert(&mut self, kind: EntityKind, entity_id: impl Into<String>, entry: LedgerEntry) {
        self.last_id = self.last_id.max(entry.history_id);
        let list = self.entries.entry((kind, entity_id.into())).or_default();
        list.push(entry);
        list.sort_by(|a, b| {
            a.history_date
                .cmp(&b.history_date)
                .then(a.history_id.cmp(&b.history_id))
        });
    }

    /// Assign an ID to a new snapshot and register it.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ConflictingSnapshot` if the record's `history_date`
    /// is not strictly after the entity's latest snapshot.
    pub fn append(&mut self, mut record: HistoryRecord) -> Result<HistoryRecord, CoreError> {
        if let Some(latest) = self.latest_date(record.entity_kind, &record.entity_id) {
            if record.history_date <= latest {
                return Err(CoreError::ConflictingSnapshot {
                    entity: record.entity_kind,
                    id: record.entity_id,
                    attempted: record.history_date,
                    latest,
                });
            }
        }
        record.history_id = self.last_id + 1;
        self.insert(
            record.entity_kind,
            record.entity_id.clone(),
            LedgerEntry {
                history_id: record.history_id,
                history_date: record.history_date,
                load_balance_final: record.load_balance_final,
            },
        );
        Ok(record)
    }

    /// Date of the most recent snapshot of an entity.
    #[must_use]
    pub fn latest_date(&self, kind: EntityKind, entity_id: &str) -> Option<DateTime<Utc>> {
        self.entries
            .get(&(kind, entity_id.to_string()))
            .and_then(|list| list.last())
            .map(|entry| entry.history_date)
    }

    /// Sum of frozen balances over all snapshots dated at or before `as_of`.
    #[must_use]
    pub fn balance_sum_as_of(
        &self,
        kind: EntityKind,
        entity_id: &str,
        as_of: DateTime<Utc>,
    ) -> i64 {
        self.entries
            .get(&(kind, entity_id.to_string()))
            .map_or(0, |list| {
                list.iter()
                    .filter(|entry| entry.history_date <= as_of)
                    .filter_map(|entry| entry.load_balance_final)
                    .sum()
            })
    }

    /// Number of snapshots held for an entity.
    #[must_use]
    pub fn count(&self, kind: EntityKind, entity_id: &str) -> usize {
        self.entries
            .get(&(kind, entity_id.to_string()))
            .map_or(0, Vec::len)
    }

    /// Highest history ID seen so far.
    #[must_use]
    pub const fn last_id(&self) -> i64 {
        self.last_id
    }
}
