//! Load function repository. Expressions are validated before every write.

use wl_core::entities::LoadFunction;

use crate::error::DatabaseError;
use crate::helpers::opt_real;
use crate::service::WorkloadService;
use crate::updates::load_function::LoadFunctionUpdate;

const SELECT_COLS: &str = "name, expression, plot_minimum, plot_maximum";

fn row_to_load_function(row: &libsql::Row) -> Result<LoadFunction, DatabaseError> {
    Ok(LoadFunction {
        name: row.get(0)?,
        expression: row.get(1)?,
        plot_minimum: row.get::<Option<f64>>(2)?,
        plot_maximum: row.get::<Option<f64>>(3)?,
    })
}

pub(crate) async fn fetch_all(
    conn: &libsql::Connection,
) -> Result<Vec<LoadFunction>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM load_functions ORDER BY name"),
            (),
        )
        .await?;
    let mut functions = Vec::new();
    while let Some(row) = rows.next().await? {
        functions.push(row_to_load_function(&row)?);
    }
    Ok(functions)
}

impl WorkloadService {
    /// Store a load function.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Engine` with `InvalidExpression` when the
    /// expression fails trial evaluation; nothing is written.
    pub async fn create_load_function(
        &self,
        function: &LoadFunction,
    ) -> Result<LoadFunction, DatabaseError> {
        self.engine().validate_load_function(function)?;
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO load_functions ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4)"),
                libsql::params![
                    function.name.as_str(),
                    function.expression.as_str(),
                    opt_real(function.plot_minimum),
                    opt_real(function.plot_maximum)
                ],
            )
            .await?;
        self.get_load_function(&function.name).await
    }

    pub async fn get_load_function(&self, name: &str) -> Result<LoadFunction, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM load_functions WHERE name = ?1"),
                [name],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_load_function(&row)
    }

    pub async fn list_load_functions(&self) -> Result<Vec<LoadFunction>, DatabaseError> {
        fetch_all(self.db().conn()).await
    }

    /// Apply an update after validating the merged function.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Engine` if the updated expression or plot
    /// range is invalid; nothing is written.
    pub async fn update_load_function(
        &self,
        name: &str,
        update: LoadFunctionUpdate,
    ) -> Result<LoadFunction, DatabaseError> {
        let current = self.get_load_function(name).await?;
        let merged = LoadFunction {
            expression: update
                .expression
                .clone()
                .unwrap_or_else(|| current.expression.clone()),
            plot_minimum: update.plot_minimum.unwrap_or(current.plot_minimum),
            plot_maximum: update.plot_maximum.unwrap_or(current.plot_maximum),
            ..current
        };
        self.engine().validate_load_function(&merged)?;

        self.db()
            .conn()
            .execute(
                "UPDATE load_functions SET expression = ?1, plot_minimum = ?2, plot_maximum = ?3
                 WHERE name = ?4",
                libsql::params![
                    merged.expression.as_str(),
                    opt_real(merged.plot_minimum),
                    opt_real(merged.plot_maximum),
                    name
                ],
            )
            .await?;
        Ok(merged)
    }
}
