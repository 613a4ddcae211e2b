//! Full recalculation with the FTE fixed-point loop.
//!
//! The per-FTE target is the average assigned load per FTE unit, and
//! full-time tasks cost exactly one target's worth of hours, so the target
//! depends on itself. The first cycle is seeded with the closed-form solution
//! of that affine equation; later cycles apply the floored definition until
//! no full-time task moves.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};
use wl_config::EngineConfig;
use wl_core::entities::Contract;
use wl_core::numeric::floor_load;
use wl_expr::Limits;

use crate::aggregate::{update_groups, update_staff_assigned, update_staff_target};
use crate::error::EngineError;
use crate::formula::{effective_students, task_load};
use crate::loader::update_assignment;
use crate::workload::Workload;

/// Slack added before flooring the analytic seed, so that a value computed
/// as `1799.9999999` lands on 1800.
const SEED_EPSILON: f64 = 1e-9;

/// Outcome of one recalculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecalculationReport {
    /// Fixed-point cycles, at least one.
    pub cycles: u32,
    /// The per-FTE target in force afterwards.
    pub target_load_per_fte: i64,
    pub tasks_changed: usize,
    pub assignments_changed: usize,
    pub staff_changed: usize,
}

#[derive(Debug, Default)]
struct Changes {
    tasks: BTreeSet<String>,
    assignments: BTreeSet<String>,
    staff: BTreeSet<String>,
}

/// Recompute every derived field of the workload.
///
/// Order: non-full-time tasks, assignments, staff assigned loads, the FTE
/// loop (target, full-time tasks, their assignments and staff), staff
/// targets, groups.
///
/// # Errors
///
/// Propagates load formula failures. Returns
/// [`EngineError::ConvergenceFailure`] when full-time loads are still moving
/// after `config.cycle_limit` cycles; the workload is left as of the last
/// cycle.
pub fn recalculate(
    workload: &mut Workload,
    config: &EngineConfig,
) -> Result<RecalculationReport, EngineError> {
    let limits = Limits {
        max_power_bits: config.max_power_bits,
    };
    let mut changes = Changes::default();

    let tasks: Vec<String> = workload
        .tasks
        .values()
        .filter(|t| !t.is_full_time())
        .map(|t| t.id.clone())
        .collect();
    for id in tasks {
        if update_task(workload, &id, limits)? {
            changes.tasks.insert(id);
        }
    }

    let assignments: Vec<String> = workload.assignments.keys().cloned().collect();
    for id in assignments {
        if update_assignment(workload, &id, limits)? {
            changes.assignments.insert(id);
        }
    }

    let accounts: Vec<String> = workload.staff.keys().cloned().collect();
    for account in &accounts {
        if update_staff_assigned(workload, account) {
            changes.staff.insert(account.clone());
        }
    }

    let cycles = converge(workload, config.cycle_limit, limits, &mut changes)?;

    for account in &accounts {
        if update_staff_target(workload, account) {
            changes.staff.insert(account.clone());
        }
    }
    update_groups(workload);

    let report = RecalculationReport {
        cycles,
        target_load_per_fte: workload.standard_load.effective_target_per_fte(),
        tasks_changed: changes.tasks.len(),
        assignments_changed: changes.assignments.len(),
        staff_changed: changes.staff.len(),
    };
    info!(
        year = workload.year(),
        cycles,
        target = report.target_load_per_fte,
        tasks = report.tasks_changed,
        assignments = report.assignments_changed,
        staff = report.staff_changed,
        "Recalculated workload"
    );
    Ok(report)
}

fn converge(
    workload: &mut Workload,
    cycle_limit: u32,
    limits: Limits,
    changes: &mut Changes,
) -> Result<u32, EngineError> {
    let full_time = workload.full_time_task_ids();
    let mut cycles = 0;

    loop {
        cycles += 1;
        let target = if cycles == 1 {
            first_target(workload)
        } else {
            fte_target(workload)
        };
        workload.standard_load.target_load_per_fte_calc = Some(target);
        debug!(cycle = cycles, target, "FTE target");

        let mut changed = false;
        for id in &full_time {
            if !update_task(workload, id, limits)? {
                continue;
            }
            changed = true;
            changes.tasks.insert(id.clone());

            for assignment_id in workload.assignment_ids_of_task(id) {
                if !update_assignment(workload, &assignment_id, limits)? {
                    continue;
                }
                let Some(account) = workload
                    .assignments
                    .get(&assignment_id)
                    .map(|a| a.staff.clone())
                else {
                    continue;
                };
                changes.assignments.insert(assignment_id);
                if update_staff_assigned(workload, &account) {
                    changes.staff.insert(account);
                }
            }
        }

        if !changed {
            return Ok(cycles);
        }
        if cycles >= cycle_limit {
            warn!(cycles, target, "FTE target did not converge");
            return Err(EngineError::ConvergenceFailure { cycles });
        }
    }
}

/// Keep a target that already satisfies the definition, otherwise jump to
/// the analytic solution when there is one.
fn first_target(workload: &Workload) -> i64 {
    let defined = fte_target(workload);
    if workload.standard_load.target_load_per_fte_calc == Some(defined) {
        return defined;
    }
    analytic_target(workload).unwrap_or(defined)
}

/// Per-FTE target from the current assigned loads:
/// `floor(misc + (assigned - fixed) / fte)`, or the declared target when
/// there is no FTE staff or nothing assigned.
#[must_use]
pub fn fte_target(workload: &Workload) -> i64 {
    let total_assigned: i64 = workload.assignments.values().map(|a| a.load_calc).sum();
    let (total_fixed, total_fte) = contract_totals(workload);

    if total_fte > 0.0 && total_assigned > 0 {
        #[allow(clippy::cast_precision_loss)]
        let spread = (total_assigned - total_fixed) as f64 / total_fte;
        floor_load(workload.standard_load.load_fte_misc + spread)
    } else {
        i64::from(workload.standard_load.target_load_per_fte)
    }
}

/// Closed-form fixed point of the target equation.
///
/// With `A0` the load from assignments to non-full-time tasks and `k` the
/// summed multipliers of full-time assignments, the target `F` satisfies
/// `F = misc + (A0 + k·F - fixed) / T`, so `F = (misc + (A0 - fixed)/T) / (1 - k/T)`.
/// `None` when there are no full-time assignments or no finite positive
/// solution.
#[must_use]
pub fn analytic_target(workload: &Workload) -> Option<i64> {
    let (total_fixed, total_fte) = contract_totals(workload);
    if total_fte <= 0.0 {
        return None;
    }

    let mut base = 0_i64;
    let mut slope = 0.0;
    for assignment in workload.assignments.values() {
        match workload.tasks.get(&assignment.task) {
            Some(task) if task.is_full_time() => slope += task.load_multiplier,
            _ => base += assignment.load_calc,
        }
    }
    if slope <= 0.0 || slope >= total_fte {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let (base, total_fixed) = (base as f64, total_fixed as f64);
    let target = (workload.standard_load.load_fte_misc + (base - total_fixed) / total_fte)
        / (1.0 - slope / total_fte);
    if !target.is_finite() || base + slope * target <= 0.0 {
        return None;
    }
    Some(floor_load(target + SEED_EPSILON))
}

fn contract_totals(workload: &Workload) -> (i64, f64) {
    workload
        .staff
        .values()
        .fold((0, 0.0), |(fixed, fte), staff| match staff.contract {
            Contract::FixedHours { hours } => (fixed + i64::from(hours), fte),
            Contract::Fte { fraction } => (fixed, fte + fraction),
        })
}

fn update_task(workload: &mut Workload, id: &str, limits: Limits) -> Result<bool, EngineError> {
    let Some(task) = workload.tasks.get(id) else {
        return Ok(false);
    };
    let students = effective_students(workload, task);
    let load = task_load(workload, task, students, limits)?;

    let Some(task) = workload.tasks.get_mut(id) else {
        return Ok(false);
    };
    if task.load_calc == load.load && task.load_calc_first == load.load_first {
        return Ok(false);
    }
    task.load_calc = load.load;
    task.load_calc_first = load.load_first;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wl_core::entities::{Assignment, Staff, StandardLoadDraft, Task, TaskKind};

    fn workload(misc: f64) -> Workload {
        Workload::new(
            StandardLoadDraft {
                year: 2024,
                load_lecture: 0.0,
                load_lecture_first: 0.0,
                load_coursework_set: 0.0,
                load_coursework_credit: 0.0,
                load_coursework_marked: 0.0,
                load_exam_credit: 0.0,
                load_exam_marked: 0.0,
                load_fte_misc: misc,
                target_load_per_fte: 1650,
            }
            .into_standard_load(None),
        )
    }

    #[test]
    fn target_falls_back_to_declared_without_fte_staff() {
        let mut workload = workload(100.0);
        workload.insert_staff(Staff::new("ab1", "A", Contract::FixedHours { hours: 500 }, 2024));
        workload.insert_task(Task::new("tsk-1", "Admin").with_load_fixed(800, 0));
        workload.insert_assignment(Assignment::new("asg-1", "tsk-1", "ab1"));

        let report = recalculate(&mut workload, &EngineConfig::default()).unwrap();
        assert_eq!(report.target_load_per_fte, 1650);
        assert_eq!(workload.staff["ab1"].load_target, 500);
    }

    #[test]
    fn fixed_hours_are_excluded_from_the_fte_average() {
        let mut workload = workload(0.0);
        workload.insert_staff(Staff::new("ab1", "A", Contract::Fte { fraction: 0.5 }, 2024));
        workload.insert_staff(Staff::new("cd2", "C", Contract::FixedHours { hours: 200 }, 2024));
        workload.insert_task(Task::new("tsk-1", "Admin").with_load_fixed(700, 0));
        workload.insert_assignment(Assignment::new("asg-1", "tsk-1", "ab1"));

        recalculate(&mut workload, &EngineConfig::default()).unwrap();
        // (700 - 200) / 0.5
        assert_eq!(workload.standard_load.target_load_per_fte_calc, Some(1000));
        assert_eq!(workload.staff["ab1"].load_target, 500);
    }

    #[test]
    fn analytic_seed_solves_the_affine_equation() {
        let mut workload = workload(100.0);
        for account in ["ab1", "cd2"] {
            workload.insert_staff(Staff::new(
                account,
                account,
                Contract::Fte { fraction: 1.0 },
                2024,
            ));
        }
        let mut task = Task::new("tsk-1", "Teaching");
        task.load_calc = 1600;
        workload.insert_task(task);
        workload.insert_task(Task::new("tsk-ft", "Research").with_kind(TaskKind::FullTime));
        let mut assignment = Assignment::new("asg-1", "tsk-1", "ab1");
        assignment.load_calc = 1600;
        workload.insert_assignment(assignment);
        workload.insert_assignment(Assignment::new("asg-ft", "tsk-ft", "ab1"));

        assert_eq!(analytic_target(&workload), Some(1800));
    }

    #[test]
    fn cycle_limit_is_enforced() {
        let mut workload = workload(100.0);
        workload.insert_staff(Staff::new("ab1", "A", Contract::Fte { fraction: 1.0 }, 2024));
        workload.insert_task(Task::new("tsk-ft", "Research").with_kind(TaskKind::FullTime));
        workload.insert_assignment(Assignment::new("asg-1", "tsk-ft", "ab1"));

        // F = 100 + F has no solution; each cycle adds the misc allowance.
        let err = recalculate(&mut workload, &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::ConvergenceFailure { cycles: 64 }), "{err}");
    }

    #[test]
    fn cycle_limit_of_one_fails_when_full_time_loads_move() {
        let mut workload = workload(100.0);
        workload.insert_staff(Staff::new("ab1", "A", Contract::Fte { fraction: 1.0 }, 2024));
        workload.insert_task(Task::new("tsk-1", "Admin").with_load_fixed(800, 0));
        workload.insert_task(Task::new("tsk-ft", "Research").with_kind(TaskKind::FullTime));
        workload.insert_assignment(Assignment::new("asg-1", "tsk-1", "ab1"));

        let config = EngineConfig {
            cycle_limit: 1,
            ..EngineConfig::default()
        };
        assert!(matches!(
            recalculate(&mut workload, &config),
            Err(EngineError::ConvergenceFailure { cycles: 1 })
        ));
    }
}
