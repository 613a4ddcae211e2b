//! Assignment repository.

use wl_core::entities::Assignment;
use wl_core::ids::PREFIX_ASSIGNMENT;

use crate::error::DatabaseError;
use crate::helpers::{get_bool, get_opt_u32, opt_count};
use crate::service::WorkloadService;
use crate::updates::assignment::AssignmentUpdate;

const SELECT_COLS: &str = "id, task, staff, students, is_first_time, is_provisional, load_calc";

fn row_to_assignment(row: &libsql::Row) -> Result<Assignment, DatabaseError> {
    Ok(Assignment {
        id: row.get(0)?,
        task: row.get(1)?,
        staff: row.get(2)?,
        students: get_opt_u32(row, 3)?,
        is_first_time: get_bool(row, 4)?,
        is_provisional: get_bool(row, 5)?,
        load_calc: row.get(6)?,
    })
}

pub(crate) async fn fetch_all(conn: &libsql::Connection) -> Result<Vec<Assignment>, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT {SELECT_COLS} FROM assignments ORDER BY id"), ())
        .await?;
    let mut assignments = Vec::new();
    while let Some(row) = rows.next().await? {
        assignments.push(row_to_assignment(&row)?);
    }
    Ok(assignments)
}

/// Write the derived load and the provisional flag, which rollover resets.
pub(crate) async fn write_derived(
    conn: &libsql::Connection,
    assignment: &Assignment,
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE assignments SET load_calc = ?1, is_provisional = ?2 WHERE id = ?3",
        libsql::params![
            assignment.load_calc,
            i64::from(assignment.is_provisional),
            assignment.id.as_str()
        ],
    )
    .await?;
    Ok(())
}

impl WorkloadService {
    /// Bind a staff member to a task under a fresh ID.
    pub async fn create_assignment(
        &self,
        task: &str,
        staff: &str,
        students: Option<u32>,
        is_first_time: bool,
    ) -> Result<Assignment, DatabaseError> {
        let id = self.db().generate_id(PREFIX_ASSIGNMENT).await?;
        self.db()
            .conn()
            .execute(
                "INSERT INTO assignments (id, task, staff, students, is_first_time)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    id.as_str(),
                    task,
                    staff,
                    opt_count(students),
                    i64::from(is_first_time)
                ],
            )
            .await?;
        self.get_assignment(&id).await
    }

    pub async fn get_assignment(&self, id: &str) -> Result<Assignment, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM assignments WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_assignment(&row)
    }

    pub async fn list_assignments(&self) -> Result<Vec<Assignment>, DatabaseError> {
        fetch_all(self.db().conn()).await
    }

    pub async fn list_assignments_for_staff(
        &self,
        staff: &str,
    ) -> Result<Vec<Assignment>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM assignments WHERE staff = ?1 ORDER BY id"),
                [staff],
            )
            .await?;
        let mut assignments = Vec::new();
        while let Some(row) = rows.next().await? {
            assignments.push(row_to_assignment(&row)?);
        }
        Ok(assignments)
    }

    /// Update user-managed fields, including re-approving a provisional
    /// assignment.
    pub async fn update_assignment(
        &self,
        id: &str,
        update: AssignmentUpdate,
    ) -> Result<Assignment, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(students) = update.students {
            sets.push(format!("students = ?{idx}"));
            params.push(opt_count(students));
            idx += 1;
        }
        if let Some(is_first_time) = update.is_first_time {
            sets.push(format!("is_first_time = ?{idx}"));
            params.push(i64::from(is_first_time).into());
            idx += 1;
        }
        if let Some(is_provisional) = update.is_provisional {
            sets.push(format!("is_provisional = ?{idx}"));
            params.push(i64::from(is_provisional).into());
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_assignment(id).await;
        }

        params.push(id.into());
        let sql = format!("UPDATE assignments SET {} WHERE id = ?{idx}", sets.join(", "));
        let updated = self
            .db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        if updated == 0 {
            return Err(DatabaseError::NoResult);
        }
        self.get_assignment(id).await
    }
}
