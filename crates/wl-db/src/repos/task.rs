//! Task repository.
//!
//! The task's kind is stored as the `is_lead`/`is_full_time` flags plus the
//! lead fractions; its scope as the mutually exclusive `unit` and
//! `academic_group` columns.

use wl_core::entities::{Task, TaskKind, TaskScope};
use wl_core::errors::CoreError;
use wl_core::ids::PREFIX_TASK;

use crate::error::DatabaseError;
use crate::helpers::{get_bool, get_opt_string, get_opt_u32, get_u32, opt_count, opt_real, opt_text};
use crate::service::WorkloadService;
use crate::updates::task::TaskUpdate;

const SELECT_COLS: &str = "id, name, title, unit, academic_group, is_required, is_unique, \
     is_lead, is_full_time, load_fixed, load_fixed_first, load_multiplier, load_function, \
     students, coursework_fraction, exam_fraction, load_calc, load_calc_first";

fn row_to_task(row: &libsql::Row) -> Result<Task, DatabaseError> {
    let id: String = row.get(0)?;
    let scope = match (get_opt_string(row, 3)?, get_opt_string(row, 4)?) {
        (Some(_), Some(_)) => {
            return Err(CoreError::invariant(format!(
                "task {id}: both unit and academic group are set"
            ))
            .into());
        }
        (Some(unit), None) => TaskScope::Unit(unit),
        (None, Some(group)) => TaskScope::Group(group),
        (None, None) => TaskScope::Free,
    };
    let kind = match (get_bool(row, 7)?, get_bool(row, 8)?) {
        (true, true) => {
            return Err(
                CoreError::invariant(format!("task {id}: both lead and full-time")).into(),
            );
        }
        (true, false) => TaskKind::Lead {
            coursework_fraction: row.get::<Option<f64>>(14)?.unwrap_or(0.0),
            exam_fraction: row.get::<Option<f64>>(15)?.unwrap_or(0.0),
        },
        (false, true) => TaskKind::FullTime,
        (false, false) => TaskKind::Standard,
    };
    Ok(Task {
        name: row.get(1)?,
        title: row.get(2)?,
        scope,
        kind,
        is_required: get_bool(row, 5)?,
        is_unique: get_bool(row, 6)?,
        load_fixed: get_u32(row, 9)?,
        load_fixed_first: get_u32(row, 10)?,
        load_multiplier: row.get(11)?,
        load_function: get_opt_string(row, 12)?,
        students: get_opt_u32(row, 13)?,
        load_calc: row.get(16)?,
        load_calc_first: row.get(17)?,
        id,
    })
}

const fn lead_fractions(kind: TaskKind) -> (Option<f64>, Option<f64>) {
    match kind {
        TaskKind::Lead {
            coursework_fraction,
            exam_fraction,
        } => (Some(coursework_fraction), Some(exam_fraction)),
        TaskKind::Standard | TaskKind::FullTime => (None, None),
    }
}

pub(crate) async fn fetch_all(conn: &libsql::Connection) -> Result<Vec<Task>, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT {SELECT_COLS} FROM tasks ORDER BY id"), ())
        .await?;
    let mut tasks = Vec::new();
    while let Some(row) = rows.next().await? {
        tasks.push(row_to_task(&row)?);
    }
    Ok(tasks)
}

pub(crate) async fn write_derived(
    conn: &libsql::Connection,
    task: &Task,
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE tasks SET load_calc = ?1, load_calc_first = ?2 WHERE id = ?3",
        libsql::params![task.load_calc, task.load_calc_first, task.id.as_str()],
    )
    .await?;
    Ok(())
}

impl WorkloadService {
    /// Store a task under a freshly generated ID. The supplied `id` and
    /// derived loads are ignored.
    pub async fn create_task(&self, task: &Task) -> Result<Task, DatabaseError> {
        let id = self.db().generate_id(PREFIX_TASK).await?;
        let (coursework_fraction, exam_fraction) = lead_fractions(task.kind);

        self.db()
            .conn()
            .execute(
                "INSERT INTO tasks (id, name, title, unit, academic_group, is_required,
                     is_unique, is_lead, is_full_time, load_fixed, load_fixed_first,
                     load_multiplier, load_function, students, coursework_fraction, exam_fraction)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
                libsql::params![
                    id.as_str(),
                    task.name.as_str(),
                    task.title.as_str(),
                    opt_text(task.unit_code()),
                    opt_text(task.group_code()),
                    i64::from(task.is_required),
                    i64::from(task.is_unique),
                    i64::from(task.is_lead()),
                    i64::from(task.is_full_time()),
                    i64::from(task.load_fixed),
                    i64::from(task.load_fixed_first),
                    task.load_multiplier,
                    opt_text(task.load_function.as_deref()),
                    opt_count(task.students),
                    opt_real(coursework_fraction),
                    opt_real(exam_fraction)
                ],
            )
            .await?;
        self.get_task(&id).await
    }

    pub async fn get_task(&self, id: &str) -> Result<Task, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM tasks WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_task(&row)
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, DatabaseError> {
        fetch_all(self.db().conn()).await
    }

    /// Update user-managed fields. Derived loads are refreshed by the next
    /// `recalculate`.
    pub async fn update_task(&self, id: &str, update: TaskUpdate) -> Result<Task, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref title) = update.title {
            sets.push(format!("title = ?{idx}"));
            params.push(title.clone().into());
            idx += 1;
        }
        if let Some(is_required) = update.is_required {
            sets.push(format!("is_required = ?{idx}"));
            params.push(i64::from(is_required).into());
            idx += 1;
        }
        if let Some(is_unique) = update.is_unique {
            sets.push(format!("is_unique = ?{idx}"));
            params.push(i64::from(is_unique).into());
            idx += 1;
        }
        if let Some(load_fixed) = update.load_fixed {
            sets.push(format!("load_fixed = ?{idx}"));
            params.push(i64::from(load_fixed).into());
            idx += 1;
        }
        if let Some(load_fixed_first) = update.load_fixed_first {
            sets.push(format!("load_fixed_first = ?{idx}"));
            params.push(i64::from(load_fixed_first).into());
            idx += 1;
        }
        if let Some(load_multiplier) = update.load_multiplier {
            sets.push(format!("load_multiplier = ?{idx}"));
            params.push(load_multiplier.into());
            idx += 1;
        }
        if let Some(ref load_function) = update.load_function {
            sets.push(format!("load_function = ?{idx}"));
            params.push(opt_text(load_function.as_deref()));
            idx += 1;
        }
        if let Some(students) = update.students {
            sets.push(format!("students = ?{idx}"));
            params.push(opt_count(students));
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_task(id).await;
        }

        params.push(id.into());
        let sql = format!("UPDATE tasks SET {} WHERE id = ?{idx}", sets.join(", "));
        let updated = self
            .db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        if updated == 0 {
            return Err(DatabaseError::NoResult);
        }
        self.get_task(id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::helpers::test_service;
    use crate::updates::task::TaskUpdateBuilder;
    use pretty_assertions::assert_eq;
    use wl_core::entities::Unit;

    use super::*;

    #[tokio::test]
    async fn lead_task_roundtrip() {
        let svc = test_service().await;
        svc.create_unit(&Unit::new("PH101", "Mechanics")).await.unwrap();
        let task = Task::new("", "Unit lead")
            .with_scope(TaskScope::Unit("PH101".into()))
            .with_kind(TaskKind::Lead {
                coursework_fraction: 0.5,
                exam_fraction: 1.0,
            })
            .with_load_fixed(10, 5);

        let created = svc.create_task(&task).await.unwrap();

        assert!(created.id.starts_with("tsk-"));
        assert_eq!(Task { id: String::new(), ..created.clone() }, task);
        assert_eq!(svc.list_tasks().await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn duplicate_unit_title_is_rejected() {
        let svc = test_service().await;
        svc.create_unit(&Unit::new("PH101", "Mechanics")).await.unwrap();
        let task = Task::new("", "Tutor").with_scope(TaskScope::Unit("PH101".into()));
        svc.create_task(&task).await.unwrap();

        assert!(svc.create_task(&task).await.is_err());
    }

    #[tokio::test]
    async fn update_changes_only_given_fields() {
        let svc = test_service().await;
        let created = svc
            .create_task(&Task::new("", "Admin").with_load_fixed(50, 0))
            .await
            .unwrap();

        let updated = svc
            .update_task(
                &created.id,
                TaskUpdateBuilder::new()
                    .title("Departmental admin")
                    .load_multiplier(1.5)
                    .students(Some(12))
                    .build(),
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Departmental admin");
        assert_eq!(updated.name, "Admin");
        assert_eq!(updated.load_fixed, 50);
        assert_eq!(updated.students, Some(12));
    }

    #[tokio::test]
    async fn multiplier_out_of_range_is_rejected_by_schema() {
        let svc = test_service().await;
        assert!(
            svc.create_task(&Task::new("", "Admin").with_multiplier(20.0))
                .await
                .is_err()
        );
    }
}
