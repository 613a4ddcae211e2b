//! Unit repository.

use wl_core::entities::Unit;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_u32, get_u32, opt_count, opt_real};
use crate::service::WorkloadService;

const SELECT_COLS: &str = "code, name, students, credits, lectures, synoptic_lectures, \
     problem_classes, coursework, exams, coursework_mark_fraction, exam_mark_fraction";

fn row_to_unit(row: &libsql::Row) -> Result<Unit, DatabaseError> {
    Ok(Unit {
        code: row.get(0)?,
        name: row.get(1)?,
        students: get_opt_u32(row, 2)?,
        credits: get_opt_u32(row, 3)?,
        lectures: get_u32(row, 4)?,
        synoptic_lectures: get_u32(row, 5)?,
        problem_classes: get_u32(row, 6)?,
        coursework: get_u32(row, 7)?,
        exams: get_u32(row, 8)?,
        coursework_mark_fraction: row.get::<Option<f64>>(9)?,
        exam_mark_fraction: row.get::<Option<f64>>(10)?,
    })
}

pub(crate) async fn fetch_all(conn: &libsql::Connection) -> Result<Vec<Unit>, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT {SELECT_COLS} FROM units ORDER BY code"), ())
        .await?;
    let mut units = Vec::new();
    while let Some(row) = rows.next().await? {
        units.push(row_to_unit(&row)?);
    }
    Ok(units)
}

impl WorkloadService {
    /// Store a unit after checking its mark fractions.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Engine` with an invariant violation for
    /// unbalanced mark fractions.
    pub async fn create_unit(&self, unit: &Unit) -> Result<Unit, DatabaseError> {
        unit.check_mark_fractions()?;
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO units ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
                ),
                libsql::params![
                    unit.code.as_str(),
                    unit.name.as_str(),
                    opt_count(unit.students),
                    opt_count(unit.credits),
                    i64::from(unit.lectures),
                    i64::from(unit.synoptic_lectures),
                    i64::from(unit.problem_classes),
                    i64::from(unit.coursework),
                    i64::from(unit.exams),
                    opt_real(unit.coursework_mark_fraction),
                    opt_real(unit.exam_mark_fraction)
                ],
            )
            .await?;
        self.get_unit(&unit.code).await
    }

    pub async fn get_unit(&self, code: &str) -> Result<Unit, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM units WHERE code = ?1"), [code])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_unit(&row)
    }

    pub async fn list_units(&self) -> Result<Vec<Unit>, DatabaseError> {
        fetch_all(self.db().conn()).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::helpers::test_service;
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn create_and_get_roundtrip() {
        let svc = test_service().await;
        let mut unit = Unit::new("PH101", "Mechanics");
        unit.students = Some(60);
        unit.lectures = 10;
        unit.coursework_mark_fraction = Some(0.25);
        unit.exam_mark_fraction = Some(0.75);

        let created = svc.create_unit(&unit).await.unwrap();

        assert_eq!(created, unit);
        assert_eq!(svc.list_units().await.unwrap(), vec![unit]);
    }

    #[tokio::test]
    async fn unbalanced_mark_fractions_are_rejected() {
        let svc = test_service().await;
        let mut unit = Unit::new("PH101", "Mechanics");
        unit.coursework_mark_fraction = Some(0.5);
        unit.exam_mark_fraction = Some(0.2);

        let err = svc.create_unit(&unit).await.unwrap_err();

        assert_eq!(err.kind(), "invariant_violation");
        assert!(svc.list_units().await.unwrap().is_empty());
    }
}
