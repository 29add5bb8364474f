use chrono::NaiveDate;
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::core::{AppError, RecordState, Result};
use crate::modules::employees::models::{Employee, WorkShift};

/// Repository for employee database operations
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, only_active: bool) -> Result<Vec<Employee>> {
        let sql = if only_active {
            "SELECT * FROM employees WHERE state = 'active' ORDER BY id"
        } else {
            "SELECT * FROM employees ORDER BY id"
        };

        let rows: Vec<EmployeeRow> = sqlx::query_as(sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(EmployeeRow::into_employee).collect()
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Employee>> {
        let row: Option<EmployeeRow> = sqlx::query_as("SELECT * FROM employees WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(EmployeeRow::into_employee).transpose()
    }

    pub async fn create(
        &self,
        name: &str,
        national_id: &str,
        work_shift: WorkShift,
        hired_on: NaiveDate,
        state: RecordState,
    ) -> Result<Employee> {
        let result = sqlx::query(
            r#"
            INSERT INTO employees (name, national_id, work_shift, hired_on, state)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(name.trim())
        .bind(national_id.trim())
        .bind(work_shift.to_string())
        .bind(hired_on)
        .bind(state.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, national_id))?;

        Ok(Employee {
            id: result.last_insert_rowid(),
            name: name.trim().to_string(),
            national_id: national_id.trim().to_string(),
            work_shift,
            hired_on,
            state,
        })
    }

    pub async fn update(
        &self,
        id: i64,
        name: &str,
        national_id: &str,
        work_shift: WorkShift,
        hired_on: NaiveDate,
        state: RecordState,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET name = ?, national_id = ?, work_shift = ?, hired_on = ?, state = ?
            WHERE id = ?
            "#,
        )
        .bind(name.trim())
        .bind(national_id.trim())
        .bind(work_shift.to_string())
        .bind(hired_on)
        .bind(state.to_string())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, national_id))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Employee with id {} not found",
                id
            )));
        }

        Ok(())
    }

    /// Delete an employee; rejected while movements reference them
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_foreign_key_violation() {
                        return AppError::validation(
                            "Employee has recorded movements and cannot be deleted",
                        );
                    }
                }
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Employee with id {} not found",
                id
            )));
        }

        Ok(())
    }

    pub async fn is_active(&self, id: i64) -> Result<bool> {
        Ok(self
            .find_by_id(id)
            .await?
            .map(|e| e.state == RecordState::Active)
            .unwrap_or(false))
    }
}

fn map_unique_violation(e: sqlx::Error, national_id: &str) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::validation(format!(
                "An employee with national id '{}' already exists",
                national_id.trim()
            ));
        }
    }
    AppError::Database(e)
}

#[derive(Debug, sqlx::FromRow)]
struct EmployeeRow {
    id: i64,
    name: String,
    national_id: String,
    work_shift: String,
    hired_on: NaiveDate,
    state: String,
}

impl EmployeeRow {
    fn into_employee(self) -> Result<Employee> {
        let work_shift = WorkShift::from_str(&self.work_shift)
            .map_err(AppError::internal)?;
        let state = RecordState::from_str(&self.state)
            .map_err(AppError::internal)?;

        Ok(Employee {
            id: self.id,
            name: self.name,
            national_id: self.national_id,
            work_shift,
            hired_on: self.hired_on,
            state,
        })
    }
}
