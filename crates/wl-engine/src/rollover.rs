//! Year rollover: freeze every entity into history, carry running balances
//! forward, and open the next year.

use chrono::{DateTime, Utc};
use serde::Serialize;
use wl_config::EngineConfig;
use wl_core::entities::StandardLoadDraft;
use wl_core::enums::EntityKind;
use wl_core::history::{HistoryLedger, HistoryRecord};

use crate::aggregate::group_balance;
use crate::error::EngineError;
use crate::solver::{RecalculationReport, recalculate};
use crate::workload::Workload;

/// Result of a rollover.
#[derive(Debug, Clone, PartialEq)]
pub struct RolloverOutcome {
    pub previous_year: i32,
    pub history_date: DateTime<Utc>,
    /// Snapshots appended, in write order.
    pub snapshots: Vec<HistoryRecord>,
    pub report: RecalculationReport,
}

/// Roll the workload into the draft's year.
///
/// On error the workload and ledger may be partially updated; callers that
/// need atomicity work on copies (see [`crate::Engine::new_year`]).
///
/// # Errors
///
/// Returns [`EngineError::InvariantViolation`] if the draft year is not the
/// one directly after the current year, [`EngineError::ConflictingSnapshot`] if
/// `history_date` is not after an entity's latest snapshot, and anything
/// recalculation raises.
pub fn rollover(
    workload: &mut Workload,
    ledger: &mut HistoryLedger,
    draft: StandardLoadDraft,
    history_date: DateTime<Utc>,
    config: &EngineConfig,
) -> Result<RolloverOutcome, EngineError> {
    let previous_year = workload.year();
    if previous_year.checked_add(1) != Some(draft.year) {
        return Err(EngineError::invariant(format!(
            "new year {} must directly follow the current year {previous_year}",
            draft.year
        )));
    }

    let snapshots = freeze(workload, ledger, history_date)?;

    workload.standard_load = draft.into_standard_load(None);
    let year = workload.year();

    for staff in workload.staff.values_mut() {
        staff.load_balance_historic =
            ledger.balance_sum_as_of(EntityKind::Staff, &staff.account, history_date);
        staff.load_balance_final = 0;
        staff.year = year;
    }
    for assignment in workload.assignments.values_mut() {
        assignment.is_provisional = true;
    }
    for group in workload.groups.values_mut() {
        group.load_balance_historic =
            ledger.balance_sum_as_of(EntityKind::AcademicGroup, &group.code, history_date);
        group.load_balance_final = 0;
    }

    workload.validate(config)?;
    let report = recalculate(workload, config)?;

    Ok(RolloverOutcome {
        previous_year,
        history_date,
        snapshots,
        report,
    })
}

fn freeze(
    workload: &Workload,
    ledger: &mut HistoryLedger,
    history_date: DateTime<Utc>,
) -> Result<Vec<HistoryRecord>, EngineError> {
    let mut writer = SnapshotWriter {
        ledger,
        history_date,
        records: Vec::new(),
    };

    for kind in EntityKind::ALL {
        match kind {
            EntityKind::StandardLoad => {
                let load = &workload.standard_load;
                writer.write(kind, load.year.to_string(), load, None)?;
            }
            EntityKind::Staff => {
                for staff in workload.staff.values() {
                    let balance = staff.load_balance();
                    let mut frozen = staff.clone();
                    frozen.load_balance_final = balance;
                    writer.write(kind, staff.account.clone(), &frozen, Some(balance))?;
                }
            }
            EntityKind::Assignment => {
                for assignment in workload.assignments.values() {
                    writer.write(kind, assignment.id.clone(), assignment, None)?;
                }
            }
            EntityKind::Task => {
                for task in workload.tasks.values() {
                    writer.write(kind, task.id.clone(), task, None)?;
                }
            }
            EntityKind::Unit => {
                for unit in workload.units.values() {
                    writer.write(kind, unit.code.clone(), unit, None)?;
                }
            }
            EntityKind::LoadFunction => {
                for function in workload.load_functions.values() {
                    writer.write(kind, function.name.clone(), function, None)?;
                }
            }
            EntityKind::AcademicGroup => {
                for group in workload.groups.values() {
                    let balance = group_balance(workload, &group.code);
                    let mut frozen = group.clone();
                    frozen.load_balance_final = balance;
                    writer.write(kind, group.code.clone(), &frozen, Some(balance))?;
                }
            }
        }
    }

    Ok(writer.records)
}

struct SnapshotWriter<'a> {
    ledger: &'a mut HistoryLedger,
    history_date: DateTime<Utc>,
    records: Vec<HistoryRecord>,
}

impl SnapshotWriter<'_> {
    fn write<T: Serialize>(
        &mut self,
        kind: EntityKind,
        entity_id: String,
        entity: &T,
        load_balance_final: Option<i64>,
    ) -> Result<(), EngineError> {
        let record = self.ledger.append(HistoryRecord {
            history_id: 0,
            entity_kind: kind,
            entity_id,
            history_date: self.history_date,
            load_balance_final,
            data: serde_json::to_value(entity)?,
        })?;
        self.records.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use wl_core::entities::{Contract, Staff, StandardLoad};
    use wl_core::history::LedgerEntry;

    fn standard_load(year: i32) -> StandardLoad {
        StandardLoadDraft {
            year,
            load_lecture: 0.0,
            load_lecture_first: 0.0,
            load_coursework_set: 0.0,
            load_coursework_credit: 0.0,
            load_coursework_marked: 0.0,
            load_exam_credit: 0.0,
            load_exam_marked: 0.0,
            load_fte_misc: 0.0,
            target_load_per_fte: 1000,
        }
        .into_standard_load(None)
    }

    fn date(year: i32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, 8, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn draft_year_must_follow_current_year() {
        for year in [2023, 2024, 2026, 2030] {
            let mut workload = Workload::new(standard_load(2024));
            let mut ledger = HistoryLedger::new();
            let draft = workload.standard_load.draft_for_year(year);

            let err = rollover(
                &mut workload,
                &mut ledger,
                draft,
                date(2024),
                &EngineConfig::default(),
            )
            .unwrap_err();
            assert!(matches!(err, EngineError::InvariantViolation(_)), "{year}");
            assert_eq!(ledger.last_id(), 0);
        }
    }

    #[test]
    fn historic_balance_accumulates_across_years() {
        let mut workload = Workload::new(standard_load(2024));
        let mut staff = Staff::new("ab1", "A", Contract::FixedHours { hours: 100 }, 2024);
        staff.load_assigned = 150;
        staff.load_target = 100;
        workload.insert_staff(staff);

        let mut ledger = HistoryLedger::new();
        ledger.insert(
            EntityKind::Staff,
            "ab1",
            LedgerEntry {
                history_id: 7,
                history_date: date(2023),
                load_balance_final: Some(-20),
            },
        );

        let draft = workload.standard_load.draft_for_year(2025);
        let outcome =
            rollover(&mut workload, &mut ledger, draft, date(2024), &EngineConfig::default())
                .unwrap();

        let staff = &workload.staff["ab1"];
        assert_eq!(staff.load_balance_historic, 30);
        assert_eq!(staff.load_balance_final, 0);
        assert_eq!(staff.year, 2025);
        assert_eq!(outcome.previous_year, 2024);
        // standard load + one staff member
        assert_eq!(outcome.snapshots.len(), 2);
        assert_eq!(outcome.snapshots[1].history_id, 9);
    }

    #[test]
    fn snapshot_date_must_follow_latest() {
        let mut workload = Workload::new(standard_load(2024));
        workload.insert_staff(Staff::new("ab1", "A", Contract::FixedHours { hours: 100 }, 2024));
        let mut ledger = HistoryLedger::new();
        ledger.insert(
            EntityKind::Staff,
            "ab1",
            LedgerEntry {
                history_id: 1,
                history_date: date(2024),
                load_balance_final: Some(0),
            },
        );

        let draft = workload.standard_load.draft_for_year(2025);
        let err = rollover(&mut workload, &mut ledger, draft, date(2024), &EngineConfig::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::ConflictingSnapshot { .. }), "{err}");
    }
}
