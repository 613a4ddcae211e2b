//! Per-task load formula.
//!
//! Three variants, dispatched on [`TaskKind`]: full-time tasks cost one FTE's
//! worth of hours, unit leads are priced from the unit's sessions and
//! assessment, and everything else is a fixed load plus an optional
//! per-student function.

use wl_core::entities::{StandardLoad, Task, TaskKind, Unit};
use wl_core::numeric::round_load;
use wl_expr::{Bindings, Expression, Limits, EXAMS, LECTURES, STUDENTS};

use crate::error::EngineError;
use crate::workload::Workload;

/// Both variants of a computed load, after multiplier and rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskLoad {
    pub load: i64,
    pub load_first: i64,
}

impl TaskLoad {
    #[must_use]
    pub const fn select(self, first_time: bool) -> i64 {
        if first_time { self.load_first } else { self.load }
    }
}

/// `task.students`, else the unit's head count, else unbound.
#[must_use]
pub fn effective_students(workload: &Workload, task: &Task) -> Option<u32> {
    task.students.or_else(|| {
        task.unit_code()
            .and_then(|code| workload.units.get(code))
            .and_then(|unit| unit.students)
    })
}

/// Compute a task's load with `students` as the effective student count.
///
/// # Errors
///
/// Returns [`EngineError::LoadCalculation`] when a lead task has no unit or
/// lacks a field its assessment terms need, or when the task's load function
/// is missing or fails to evaluate.
pub fn task_load(
    workload: &Workload,
    task: &Task,
    students: Option<u32>,
    limits: Limits,
) -> Result<TaskLoad, EngineError> {
    let (load, load_first) = match task.kind {
        TaskKind::FullTime => {
            #[allow(clippy::cast_precision_loss)]
            let target = workload.standard_load.effective_target_per_fte() as f64;
            (target, target)
        }
        TaskKind::Lead {
            coursework_fraction,
            exam_fraction,
        } => {
            let unit = task
                .unit_code()
                .and_then(|code| workload.units.get(code))
                .ok_or_else(|| EngineError::load(&task.id, "lead task has no unit"))?;
            lead_load(
                &workload.standard_load,
                task,
                unit,
                coursework_fraction,
                exam_fraction,
            )?
        }
        TaskKind::Standard => {
            let load =
                f64::from(task.load_fixed) + function_load(workload, task, students, limits)?;
            (load, load + f64::from(task.load_fixed_first))
        }
    };

    Ok(TaskLoad {
        load: finish(task, load)?,
        load_first: finish(task, load_first)?,
    })
}

fn finish(task: &Task, load: f64) -> Result<i64, EngineError> {
    let scaled = load * task.load_multiplier;
    if !scaled.is_finite() {
        return Err(EngineError::load(
            &task.id,
            format!("load {scaled} is not a finite number"),
        ));
    }
    Ok(round_load(scaled))
}

fn lead_load(
    rates: &StandardLoad,
    task: &Task,
    unit: &Unit,
    coursework_fraction: f64,
    exam_fraction: f64,
) -> Result<(f64, f64), EngineError> {
    let contact = f64::from(unit.contact_sessions());
    let lecture_load = contact * rates.load_lecture;
    let lecture_load_first = contact * rates.load_lecture_first;

    let mut coursework_load = 0.0;
    if unit.coursework > 0 && coursework_fraction > 0.0 {
        let coursework = f64::from(unit.coursework);
        let mark_fraction =
            required(task, unit.coursework_mark_fraction, "coursework_mark_fraction")?;
        let credits = f64::from(required(task, unit.credits, "credits")?);
        let students = f64::from(required(task, unit.students, "students")?);

        coursework_load += coursework * rates.load_coursework_set;
        coursework_load += mark_fraction * credits * rates.load_coursework_credit;
        coursework_load += (coursework + mark_fraction * credits)
            * coursework_fraction
            * students
            * rates.load_coursework_marked;
    }

    let mut exam_load = 0.0;
    if exam_fraction > 0.0 {
        let mark_fraction = required(task, unit.exam_mark_fraction, "exam_mark_fraction")?;
        let credits = f64::from(required(task, unit.credits, "credits")?);
        let students = f64::from(required(task, unit.students, "students")?);

        exam_load += mark_fraction * credits * rates.load_exam_credit;
        exam_load += students * exam_fraction * rates.load_exam_marked;
    }

    let base = coursework_load + exam_load + f64::from(task.load_fixed);
    Ok((
        base + lecture_load,
        base + lecture_load_first + f64::from(task.load_fixed_first),
    ))
}

fn required<T>(task: &Task, value: Option<T>, field: &str) -> Result<T, EngineError> {
    value.ok_or_else(|| {
        EngineError::load(
            &task.id,
            format!("unit {field} is required for lead assessment load"),
        )
    })
}

fn function_load(
    workload: &Workload,
    task: &Task,
    students: Option<u32>,
    limits: Limits,
) -> Result<f64, EngineError> {
    let Some(name) = &task.load_function else {
        return Ok(0.0);
    };
    let function = workload
        .load_functions
        .get(name)
        .ok_or_else(|| {
            EngineError::load(&task.id, format!("load function {name} does not exist"))
        })?;

    let mut bindings = Bindings::new();
    if let Some(students) = students {
        bindings.insert(STUDENTS, i64::from(students));
    }
    if let Some(unit) = task.unit_code().and_then(|code| workload.units.get(code)) {
        bindings.insert(LECTURES, i64::from(unit.lectures));
        bindings.insert(EXAMS, i64::from(unit.exams));
    }

    Expression::parse(&function.expression)
        .and_then(|expression| expression.eval(&bindings, limits))
        .map_err(|err| {
            EngineError::load(
                &task.id,
                format!("load function {name} ('{}'): {err}", function.expression),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wl_core::entities::{LoadFunction, StandardLoadDraft, TaskScope};

    fn rates() -> StandardLoad {
        StandardLoadDraft {
            year: 2024,
            load_lecture: 3.5,
            load_lecture_first: 6.0,
            load_coursework_set: 0.0,
            load_coursework_credit: 0.0,
            load_coursework_marked: 0.0,
            load_exam_credit: 0.0,
            load_exam_marked: 0.0,
            load_fte_misc: 100.0,
            target_load_per_fte: 1650,
        }
        .into_standard_load(None)
    }

    fn lead_unit() -> Unit {
        let mut unit = Unit::new("PH101", "Mechanics");
        unit.lectures = 10;
        unit.synoptic_lectures = 2;
        unit.problem_classes = 3;
        unit.students = Some(60);
        unit.credits = Some(15);
        unit.coursework_mark_fraction = Some(0.0);
        unit.exam_mark_fraction = Some(1.0);
        unit
    }

    fn lead_task(coursework_fraction: f64, exam_fraction: f64) -> Task {
        Task::new("tsk-lead", "Lead")
            .with_scope(TaskScope::Unit("PH101".into()))
            .with_kind(TaskKind::Lead {
                coursework_fraction,
                exam_fraction,
            })
            .with_load_fixed(10, 5)
    }

    #[test]
    fn minimal_lead_task() {
        let mut workload = Workload::new(rates());
        workload.insert_unit(lead_unit());
        let task = lead_task(0.0, 0.0);

        let load = task_load(&workload, &task, None, Limits::default()).unwrap();
        assert_eq!(load, TaskLoad { load: 63, load_first: 105 });
        assert_eq!(load.select(true), 105);
    }

    #[test]
    fn lead_assessment_terms() {
        let mut standard = rates();
        standard.load_lecture = 0.0;
        standard.load_lecture_first = 0.0;
        standard.load_coursework_set = 2.0;
        standard.load_coursework_credit = 1.0;
        standard.load_coursework_marked = 0.1;
        standard.load_exam_credit = 1.0;
        standard.load_exam_marked = 0.5;
        let mut workload = Workload::new(standard);
        let mut unit = lead_unit();
        unit.coursework = 4;
        unit.coursework_mark_fraction = Some(0.4);
        unit.exam_mark_fraction = Some(0.6);
        workload.insert_unit(unit);
        let task = lead_task(0.5, 1.0).with_load_fixed(0, 0);

        // coursework: 4*2 + 0.4*15*1 + (4 + 6)*0.5*60*0.1 = 8 + 6 + 30 = 44
        // exam: 0.6*15*1 + 60*1*0.5 = 9 + 30 = 39
        let load = task_load(&workload, &task, None, Limits::default()).unwrap();
        assert_eq!(load, TaskLoad { load: 83, load_first: 83 });
    }

    #[test]
    fn lead_exam_load_needs_credits() {
        let mut workload = Workload::new(rates());
        let mut unit = lead_unit();
        unit.credits = None;
        workload.insert_unit(unit);

        let err = task_load(&workload, &lead_task(0.0, 0.5), None, Limits::default()).unwrap_err();
        assert!(matches!(err, EngineError::LoadCalculation { .. }), "{err}");
    }

    #[test]
    fn lead_without_unit_fails() {
        let workload = Workload::new(rates());
        let err = task_load(&workload, &lead_task(0.0, 0.0), None, Limits::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Load calculation failed for task tsk-lead: lead task has no unit"
        );
    }

    #[test]
    fn per_student_function() {
        let mut workload = Workload::new(rates());
        workload.insert_load_function(LoadFunction::new("per-student", "2*s"));
        let task = Task::new("tsk-1", "Marking")
            .with_load_fixed(5, 0)
            .with_load_function("per-student")
            .with_students(20);
        let students = effective_students(&workload, &task);

        let load = task_load(&workload, &task, students, Limits::default()).unwrap();
        assert_eq!(load, TaskLoad { load: 45, load_first: 45 });
    }

    #[test]
    fn unit_bindings_reach_the_function() {
        let mut workload = Workload::new(rates());
        workload.insert_unit(lead_unit());
        workload.insert_load_function(LoadFunction::new("per-lecture", "l + s/10"));
        let task = Task::new("tsk-1", "Demonstrating")
            .with_scope(TaskScope::Unit("PH101".into()))
            .with_load_function("per-lecture")
            .with_load_fixed(0, 3);

        assert_eq!(effective_students(&workload, &task), Some(60));
        let load = task_load(&workload, &task, Some(60), Limits::default()).unwrap();
        assert_eq!(load, TaskLoad { load: 16, load_first: 19 });
    }

    #[test]
    fn function_bindings_follow_available_inputs() {
        let mut workload = Workload::new(rates());
        workload.insert_load_function(LoadFunction::new("per-student", "2*s"));
        let task = Task::new("tsk-1", "Marking")
            .with_load_fixed(5, 0)
            .with_load_function("per-student")
            .with_multiplier(1.0);

        // No students anywhere and no unit: bindings are empty, so the
        // function contributes nothing.
        let load = task_load(&workload, &task, None, Limits::default()).unwrap();
        assert_eq!(load.load, 5);

        workload.insert_load_function(LoadFunction::new("per-student", "2*s + l"));
        let err = task_load(&workload, &task, Some(3), Limits::default()).unwrap_err();
        assert!(err.to_string().contains("unknown name 'l'"), "{err}");
    }

    #[test]
    fn full_time_task_uses_effective_target() {
        let mut workload = Workload::new(rates());
        let task = Task::new("tsk-ft", "Research").with_kind(TaskKind::FullTime);
        assert_eq!(
            task_load(&workload, &task, None, Limits::default()).unwrap(),
            TaskLoad { load: 1650, load_first: 1650 }
        );

        workload.standard_load.target_load_per_fte_calc = Some(900);
        let half = task.with_multiplier(0.5);
        assert_eq!(
            task_load(&workload, &half, None, Limits::default()).unwrap(),
            TaskLoad { load: 450, load_first: 450 }
        );
    }

    #[test]
    fn multiplier_rounds_half_away_from_zero() {
        let workload = Workload::new(rates());
        let task = Task::new("tsk-1", "Admin")
            .with_load_fixed(5, 0)
            .with_multiplier(0.5);
        assert_eq!(task_load(&workload, &task, None, Limits::default()).unwrap().load, 3);
    }
}
