//! Assignment loader: one assignment's `load_calc` from its task.

use wl_expr::Limits;

use crate::error::EngineError;
use crate::formula::task_load;
use crate::workload::Workload;

/// Compute the load an assignment carries.
///
/// Without a student override the assignment takes its task's stored
/// `load_calc`/`load_calc_first`, so the task must already be current.
///
/// # Errors
///
/// Returns [`EngineError::InvariantViolation`] for a dangling task reference
/// and propagates load formula failures for student overrides.
pub fn assignment_load(
    workload: &Workload,
    assignment_id: &str,
    limits: Limits,
) -> Result<i64, EngineError> {
    let assignment = workload.assignments.get(assignment_id).ok_or_else(|| {
        EngineError::invariant(format!("assignment {assignment_id} does not exist"))
    })?;
    let task = workload.tasks.get(&assignment.task).ok_or_else(|| {
        EngineError::invariant(format!(
            "assignment {assignment_id}: task {} does not exist",
            assignment.task
        ))
    })?;

    if assignment.students.is_none() {
        return Ok(if assignment.is_first_time {
            task.load_calc_first
        } else {
            task.load_calc
        });
    }

    let load = task_load(workload, task, assignment.students, limits)?;
    Ok(load.select(assignment.is_first_time))
}

/// Recompute and store an assignment's `load_calc`. Returns whether it
/// changed.
///
/// # Errors
///
/// See [`assignment_load`].
pub fn update_assignment(
    workload: &mut Workload,
    assignment_id: &str,
    limits: Limits,
) -> Result<bool, EngineError> {
    let load = assignment_load(workload, assignment_id, limits)?;
    let Some(assignment) = workload.assignments.get_mut(assignment_id) else {
        return Ok(false);
    };
    if assignment.load_calc == load {
        return Ok(false);
    }
    assignment.load_calc = load;
    Ok(true)
}
