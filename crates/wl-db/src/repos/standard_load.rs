//! Standard load repository: one row per academic year.

use wl_core::entities::{StandardLoad, StandardLoadDraft};

use crate::error::DatabaseError;
use crate::service::WorkloadService;

const SELECT_COLS: &str = "year, load_lecture, load_lecture_first, load_coursework_set, \
     load_coursework_credit, load_coursework_marked, load_exam_credit, load_exam_marked, \
     load_fte_misc, target_load_per_fte, target_load_per_fte_calc";

fn row_to_standard_load(row: &libsql::Row) -> Result<StandardLoad, DatabaseError> {
    let target = row.get::<i64>(9)?;
    Ok(StandardLoad {
        year: row.get(0)?,
        load_lecture: row.get(1)?,
        load_lecture_first: row.get(2)?,
        load_coursework_set: row.get(3)?,
        load_coursework_credit: row.get(4)?,
        load_coursework_marked: row.get(5)?,
        load_exam_credit: row.get(6)?,
        load_exam_marked: row.get(7)?,
        load_fte_misc: row.get(8)?,
        target_load_per_fte: u32::try_from(target).map_err(|_| {
            DatabaseError::InvalidState(format!("target_load_per_fte {target} out of range"))
        })?,
        target_load_per_fte_calc: row.get::<Option<i64>>(10)?,
    })
}

/// Most recent year's standard load.
pub(crate) async fn fetch_latest(conn: &libsql::Connection) -> Result<StandardLoad, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM standard_loads ORDER BY year DESC LIMIT 1"),
            (),
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    row_to_standard_load(&row)
}

pub(crate) async fn insert(
    conn: &libsql::Connection,
    load: &StandardLoad,
) -> Result<(), DatabaseError> {
    conn.execute(
        &format!(
            "INSERT INTO standard_loads ({SELECT_COLS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
        ),
        libsql::params![
            load.year,
            load.load_lecture,
            load.load_lecture_first,
            load.load_coursework_set,
            load.load_coursework_credit,
            load.load_coursework_marked,
            load.load_exam_credit,
            load.load_exam_marked,
            load.load_fte_misc,
            i64::from(load.target_load_per_fte),
            load.target_load_per_fte_calc
        ],
    )
    .await?;
    Ok(())
}

/// Overwrite every column of an existing year.
pub(crate) async fn write(
    conn: &libsql::Connection,
    load: &StandardLoad,
) -> Result<(), DatabaseError> {
    let updated = conn
        .execute(
            "UPDATE standard_loads SET load_lecture = ?2, load_lecture_first = ?3,
                 load_coursework_set = ?4, load_coursework_credit = ?5,
                 load_coursework_marked = ?6, load_exam_credit = ?7, load_exam_marked = ?8,
                 load_fte_misc = ?9, target_load_per_fte = ?10, target_load_per_fte_calc = ?11
             WHERE year = ?1",
            libsql::params![
                load.year,
                load.load_lecture,
                load.load_lecture_first,
                load.load_coursework_set,
                load.load_coursework_credit,
                load.load_coursework_marked,
                load.load_exam_credit,
                load.load_exam_marked,
                load.load_fte_misc,
                i64::from(load.target_load_per_fte),
                load.target_load_per_fte_calc
            ],
        )
        .await?;
    if updated == 0 {
        return Err(DatabaseError::NoResult);
    }
    Ok(())
}

impl WorkloadService {
    /// Create the first standard load of a fresh store.
    ///
    /// Later years are created by `new_year`, never directly.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if a standard load already
    /// exists or the year is below the configured minimum.
    pub async fn create_standard_load(
        &self,
        draft: StandardLoadDraft,
    ) -> Result<StandardLoad, DatabaseError> {
        match fetch_latest(self.db().conn()).await {
            Ok(existing) => {
                return Err(DatabaseError::InvalidState(format!(
                    "standard load for {} already exists; use new_year to advance",
                    existing.year
                )));
            }
            Err(DatabaseError::NoResult) => {}
            Err(err) => return Err(err),
        }
        let min_year = self.engine().config().min_year;
        if draft.year < min_year {
            return Err(DatabaseError::InvalidState(format!(
                "year {} is before {min_year}",
                draft.year
            )));
        }

        let load = draft.into_standard_load(None);
        insert(self.db().conn(), &load).await?;
        Ok(load)
    }

    /// The current year's standard load.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` on an empty store.
    pub async fn latest_standard_load(&self) -> Result<StandardLoad, DatabaseError> {
        fetch_latest(self.db().conn()).await
    }

    pub async fn get_standard_load(&self, year: i32) -> Result<StandardLoad, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM standard_loads WHERE year = ?1"),
                [year],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_standard_load(&row)
    }

    pub async fn list_standard_loads(&self) -> Result<Vec<StandardLoad>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM standard_loads ORDER BY year"),
                (),
            )
            .await?;
        let mut loads = Vec::new();
        while let Some(row) = rows.next().await? {
            loads.push(row_to_standard_load(&row)?);
        }
        Ok(loads)
    }
}
