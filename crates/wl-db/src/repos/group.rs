//! Academic group repository.

use wl_core::entities::AcademicGroup;

use crate::error::DatabaseError;
use crate::service::WorkloadService;

const SELECT_COLS: &str = "code, short_name, name, load_balance_final, load_balance_historic";

fn row_to_group(row: &libsql::Row) -> Result<AcademicGroup, DatabaseError> {
    Ok(AcademicGroup {
        code: row.get(0)?,
        short_name: row.get(1)?,
        name: row.get(2)?,
        load_balance_final: row.get(3)?,
        load_balance_historic: row.get(4)?,
    })
}

pub(crate) async fn fetch_all(
    conn: &libsql::Connection,
) -> Result<Vec<AcademicGroup>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM academic_groups ORDER BY code"),
            (),
        )
        .await?;
    let mut groups = Vec::new();
    while let Some(row) = rows.next().await? {
        groups.push(row_to_group(&row)?);
    }
    Ok(groups)
}

/// Write the engine-derived balances.
pub(crate) async fn write_derived(
    conn: &libsql::Connection,
    group: &AcademicGroup,
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE academic_groups SET load_balance_final = ?1, load_balance_historic = ?2
         WHERE code = ?3",
        libsql::params![
            group.load_balance_final,
            group.load_balance_historic,
            group.code.as_str()
        ],
    )
    .await?;
    Ok(())
}

impl WorkloadService {
    pub async fn create_group(
        &self,
        group: &AcademicGroup,
    ) -> Result<AcademicGroup, DatabaseError> {
        if group.code.chars().count() != 1 {
            return Err(DatabaseError::InvalidState(format!(
                "academic group code '{}' must be a single character",
                group.code
            )));
        }
        self.db()
            .conn()
            .execute(
                "INSERT INTO academic_groups (code, short_name, name) VALUES (?1, ?2, ?3)",
                libsql::params![
                    group.code.as_str(),
                    group.short_name.as_str(),
                    group.name.as_str()
                ],
            )
            .await?;
        self.get_group(&group.code).await
    }

    pub async fn get_group(&self, code: &str) -> Result<AcademicGroup, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM academic_groups WHERE code = ?1"),
                [code],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_group(&row)
    }

    pub async fn list_groups(&self) -> Result<Vec<AcademicGroup>, DatabaseError> {
        fetch_all(self.db().conn()).await
    }
}
