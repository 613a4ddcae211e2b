//! Staff repository.

use wl_core::entities::{Contract, Staff};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, opt_count, opt_real, opt_text, parse_enum};
use crate::service::WorkloadService;
use crate::updates::staff::StaffUpdate;

const SELECT_COLS: &str = "account, name, academic_group, gender, staff_type, hours_fixed, \
     fte_fraction, load_target, load_assigned, load_balance_final, load_balance_historic, year";

fn row_to_staff(row: &libsql::Row) -> Result<Staff, DatabaseError> {
    let account: String = row.get(0)?;
    let contract = Contract::from_columns(
        &account,
        row.get::<Option<i64>>(5)?,
        row.get::<Option<f64>>(6)?,
    )?;
    Ok(Staff {
        name: row.get(1)?,
        academic_group: get_opt_string(row, 2)?,
        gender: parse_enum(&row.get::<String>(3)?)?,
        staff_type: row.get(4)?,
        contract,
        load_target: row.get(7)?,
        load_assigned: row.get(8)?,
        load_balance_final: row.get(9)?,
        load_balance_historic: row.get(10)?,
        year: row.get(11)?,
        account,
    })
}

pub(crate) async fn fetch_all(conn: &libsql::Connection) -> Result<Vec<Staff>, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT {SELECT_COLS} FROM staff ORDER BY account"), ())
        .await?;
    let mut staff = Vec::new();
    while let Some(row) = rows.next().await? {
        staff.push(row_to_staff(&row)?);
    }
    Ok(staff)
}

/// Write the engine-derived loads and balances, and the year.
pub(crate) async fn write_derived(
    conn: &libsql::Connection,
    staff: &Staff,
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE staff SET load_target = ?1, load_assigned = ?2, load_balance_final = ?3,
             load_balance_historic = ?4, year = ?5
         WHERE account = ?6",
        libsql::params![
            staff.load_target,
            staff.load_assigned,
            staff.load_balance_final,
            staff.load_balance_historic,
            staff.year,
            staff.account.as_str()
        ],
    )
    .await?;
    Ok(())
}

impl WorkloadService {
    /// Store a staff member in the current year. Derived loads start at zero
    /// until the next recalculation.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` for a fixed-hours contract above
    /// the configured maximum, or a libSQL error for constraint failures.
    pub async fn create_staff(&self, staff: &Staff) -> Result<Staff, DatabaseError> {
        let max_hours = self.engine().config().max_hours_fixed;
        if let Contract::FixedHours { hours } = staff.contract {
            if hours > max_hours {
                return Err(DatabaseError::InvalidState(format!(
                    "staff {}: hours_fixed {hours} exceeds {max_hours}",
                    staff.account
                )));
            }
        }
        let year = self.latest_standard_load().await?.year;

        self.db()
            .conn()
            .execute(
                "INSERT INTO staff (account, name, academic_group, gender, staff_type,
                     hours_fixed, fte_fraction, year)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                libsql::params![
                    staff.account.as_str(),
                    staff.name.as_str(),
                    opt_text(staff.academic_group.as_deref()),
                    staff.gender.as_str(),
                    staff.staff_type.as_str(),
                    opt_count(staff.contract.hours_fixed()),
                    opt_real(staff.contract.fte_fraction()),
                    year
                ],
            )
            .await?;
        self.get_staff(&staff.account).await
    }

    pub async fn get_staff(&self, account: &str) -> Result<Staff, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM staff WHERE account = ?1"),
                [account],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_staff(&row)
    }

    pub async fn list_staff(&self) -> Result<Vec<Staff>, DatabaseError> {
        fetch_all(self.db().conn()).await
    }

    /// Update user-managed fields. Derived loads are refreshed by the next
    /// `recalculate`.
    pub async fn update_staff(
        &self,
        account: &str,
        update: StaffUpdate,
    ) -> Result<Staff, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref name) = update.name {
            sets.push(format!("name = ?{idx}"));
            params.push(name.clone().into());
            idx += 1;
        }
        if let Some(ref group) = update.academic_group {
            sets.push(format!("academic_group = ?{idx}"));
            params.push(opt_text(group.as_deref()));
            idx += 1;
        }
        if let Some(gender) = update.gender {
            sets.push(format!("gender = ?{idx}"));
            params.push(gender.as_str().into());
            idx += 1;
        }
        if let Some(ref staff_type) = update.staff_type {
            sets.push(format!("staff_type = ?{idx}"));
            params.push(staff_type.clone().into());
            idx += 1;
        }
        if let Some(contract) = update.contract {
            sets.push(format!("hours_fixed = ?{idx}"));
            params.push(opt_count(contract.hours_fixed()));
            idx += 1;
            sets.push(format!("fte_fraction = ?{idx}"));
            params.push(opt_real(contract.fte_fraction()));
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_staff(account).await;
        }

        params.push(account.into());
        let sql = format!("UPDATE staff SET {} WHERE account = ?{idx}", sets.join(", "));
        let updated = self
            .db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        if updated == 0 {
            return Err(DatabaseError::NoResult);
        }
        self.get_staff(account).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::helpers::{draft, test_service};
    use crate::updates::staff::StaffUpdateBuilder;
    use pretty_assertions::assert_eq;
    use wl_core::entities::AcademicGroup;
    use wl_core::enums::Gender;

    use super::*;

    #[tokio::test]
    async fn create_binds_to_current_year() {
        let svc = test_service().await;
        svc.create_standard_load(draft(2024)).await.unwrap();
        svc.create_group(&AcademicGroup::new("A", "Astro", "Astrophysics"))
            .await
            .unwrap();

        let staff =
            Staff::new("ab1", "A. B.", Contract::Fte { fraction: 0.8 }, 1900).with_group("A");
        let created = svc.create_staff(&staff).await.unwrap();

        assert_eq!(created.year, 2024);
        assert_eq!(created.contract, Contract::Fte { fraction: 0.8 });
        assert_eq!(created.academic_group.as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn excessive_fixed_hours_are_rejected() {
        let svc = test_service().await;
        svc.create_standard_load(draft(2024)).await.unwrap();
        let staff = Staff::new("ab1", "A", Contract::FixedHours { hours: 5000 }, 2024);
        assert!(matches!(
            svc.create_staff(&staff).await,
            Err(DatabaseError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn update_switches_contract_basis() {
        let svc = test_service().await;
        svc.create_standard_load(draft(2024)).await.unwrap();
        svc.create_staff(&Staff::new("ab1", "A", Contract::Fte { fraction: 1.0 }, 2024))
            .await
            .unwrap();

        let updated = svc
            .update_staff(
                "ab1",
                StaffUpdateBuilder::new()
                    .contract(Contract::FixedHours { hours: 300 })
                    .gender(Gender::Female)
                    .build(),
            )
            .await
            .unwrap();

        assert_eq!(updated.contract, Contract::FixedHours { hours: 300 });
        assert_eq!(updated.gender, Gender::Female);
    }

    #[tokio::test]
    async fn update_of_unknown_account_is_not_found() {
        let svc = test_service().await;
        let err = svc
            .update_staff("zz9", StaffUpdateBuilder::new().name("Z").build())
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NoResult));
    }
}
