//! Transactional engine operations.
//!
//! Each operation opens one transaction, loads the full workload graph
//! through it, runs the engine in memory, and writes every derived field
//! (plus any snapshots) back before committing. Any error rolls the
//! transaction back.

use chrono::{DateTime, SubsecRound, Utc};
use tracing::{info, warn};
use wl_core::entities::StandardLoadDraft;
use wl_core::responses::BalanceReport;
use wl_engine::{RecalculationReport, RolloverOutcome, Workload};

use crate::error::DatabaseError;
use crate::repos::{assignment, group, history, load_function, staff, standard_load, task, unit};
use crate::service::WorkloadService;

/// Load the current year's graph through `conn`.
pub(crate) async fn fetch_workload(conn: &libsql::Connection) -> Result<Workload, DatabaseError> {
    let mut workload = Workload::new(standard_load::fetch_latest(conn).await?);
    for group in group::fetch_all(conn).await? {
        workload.insert_group(group);
    }
    for member in staff::fetch_all(conn).await? {
        workload.insert_staff(member);
    }
    for unit in unit::fetch_all(conn).await? {
        workload.insert_unit(unit);
    }
    for function in load_function::fetch_all(conn).await? {
        workload.insert_load_function(function);
    }
    for task in task::fetch_all(conn).await? {
        workload.insert_task(task);
    }
    for assignment in assignment::fetch_all(conn).await? {
        workload.insert_assignment(assignment);
    }
    Ok(workload)
}

/// Write every engine-owned field of the graph.
async fn persist(conn: &libsql::Connection, workload: &Workload) -> Result<(), DatabaseError> {
    standard_load::write(conn, &workload.standard_load).await?;
    for task in workload.tasks.values() {
        task::write_derived(conn, task).await?;
    }
    for assignment in workload.assignments.values() {
        assignment::write_derived(conn, assignment).await?;
    }
    for member in workload.staff.values() {
        staff::write_derived(conn, member).await?;
    }
    for group in workload.groups.values() {
        group::write_derived(conn, group).await?;
    }
    Ok(())
}

async fn finish<T>(
    tx: libsql::Transaction,
    operation: &'static str,
    result: Result<T, DatabaseError>,
) -> Result<T, DatabaseError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            warn!(operation, kind = err.kind(), "Rolling back: {err}");
            tx.rollback().await?;
            Err(err)
        }
    }
}

impl WorkloadService {
    /// The current year's graph, outside any transaction.
    pub async fn load_workload(&self) -> Result<Workload, DatabaseError> {
        fetch_workload(self.db().conn()).await
    }

    /// Recompute and store every derived field.
    ///
    /// # Errors
    ///
    /// Any engine error (as `DatabaseError::Engine`) or store error; the
    /// store is unchanged on error.
    pub async fn recalculate(&self) -> Result<RecalculationReport, DatabaseError> {
        let tx = self.db().conn().transaction().await?;
        let result = async {
            let mut workload = fetch_workload(&tx).await?;
            let report = self.engine().recalculate(&mut workload)?;
            persist(&tx, &workload).await?;
            Ok::<_, DatabaseError>(report)
        }
        .await;
        finish(tx, "recalculate", result).await
    }

    /// Replace the current year's rates and targets, then recalculate.
    ///
    /// # Errors
    ///
    /// As [`WorkloadService::recalculate`], plus an invariant violation if
    /// the draft is not for the current year.
    pub async fn commit_standard_load(
        &self,
        draft: StandardLoadDraft,
    ) -> Result<RecalculationReport, DatabaseError> {
        let tx = self.db().conn().transaction().await?;
        let result = async {
            let mut workload = fetch_workload(&tx).await?;
            let report = self.engine().commit_standard_load(&mut workload, draft)?;
            persist(&tx, &workload).await?;
            Ok::<_, DatabaseError>(report)
        }
        .await;
        finish(tx, "commit_standard_load", result).await
    }

    /// Roll over into the draft's year.
    ///
    /// `history_date` is truncated to microseconds, the precision snapshots
    /// are stored at.
    ///
    /// # Errors
    ///
    /// As [`WorkloadService::recalculate`], plus `ConflictingSnapshot` when
    /// `history_date` is not after an existing snapshot of some entity.
    pub async fn new_year(
        &self,
        draft: StandardLoadDraft,
        history_date: DateTime<Utc>,
    ) -> Result<RolloverOutcome, DatabaseError> {
        let history_date = history_date.trunc_subsecs(6);
        let tx = self.db().conn().transaction().await?;
        let result = async {
            let mut workload = fetch_workload(&tx).await?;
            let mut ledger = history::fetch_ledger(&tx).await?;
            let outcome = self
                .engine()
                .new_year(&mut workload, &mut ledger, draft, history_date)?;

            standard_load::insert(&tx, &workload.standard_load).await?;
            persist(&tx, &workload).await?;
            for record in &outcome.snapshots {
                history::insert(&tx, record).await?;
            }
            Ok::<_, DatabaseError>(outcome)
        }
        .await;
        let outcome = finish(tx, "new_year", result).await?;
        info!(
            year = outcome.previous_year + 1,
            snapshots = outcome.snapshots.len(),
            "Stored rollover"
        );
        Ok(outcome)
    }

    /// Balance report over the stored state.
    pub async fn balances(&self) -> Result<BalanceReport, DatabaseError> {
        let workload = self.load_workload().await?;
        Ok(self.engine().balances(&workload))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::test_support::helpers::seeded_service;

    #[tokio::test]
    async fn fetched_workload_matches_stored_rows() {
        let (svc, ids) = seeded_service().await;

        let workload = svc.load_workload().await.unwrap();

        assert_eq!(workload.year(), 2024);
        assert_eq!(workload.staff.len(), 2);
        assert_eq!(workload.tasks.len(), 3);
        assert_eq!(workload.full_time_task_ids(), vec![ids.full_time.clone()]);
        assert_eq!(workload.assignment_ids_of_task(&ids.teaching_b).len(), 1);
    }

    #[tokio::test]
    async fn recalculate_prices_full_time_task() {
        let (svc, ids) = seeded_service().await;

        svc.recalculate().await.unwrap();

        let task = svc.get_task(&ids.full_time).await.unwrap();
        assert_eq!(task.load_calc, 900);
        assert_eq!(svc.get_task(&ids.teaching_a).await.unwrap().load_calc, 800);
    }
}
