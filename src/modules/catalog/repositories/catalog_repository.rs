// SQLite persistence for the look-up catalogs.
//
// The three flat catalogs share one row shape; table names come from
// CatalogKind, a closed enum, never from request input. Deleting a row
// that cash movements still reference fails the FK check and is
// reported as a validation error instead of cascading.

use sqlx::SqlitePool;
use std::str::FromStr;

use crate::core::{AppError, RecordState, Result};
use crate::modules::catalog::models::{CatalogEntry, CatalogKind, PaymentPlan};

/// Repository for catalog database operations
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List entries of a flat catalog, optionally only active ones
    pub async fn list(&self, kind: CatalogKind, only_active: bool) -> Result<Vec<CatalogEntry>> {
        let sql = if only_active {
            format!(
                "SELECT id, description, state FROM {} WHERE state = 'active' ORDER BY id",
                kind.table()
            )
        } else {
            format!(
                "SELECT id, description, state FROM {} ORDER BY id",
                kind.table()
            )
        };

        let rows: Vec<CatalogRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(CatalogRow::into_entry).collect()
    }

    /// Find one entry by id
    pub async fn find_by_id(&self, kind: CatalogKind, id: i64) -> Result<Option<CatalogEntry>> {
        let sql = format!(
            "SELECT id, description, state FROM {} WHERE id = ?",
            kind.table()
        );

        let row: Option<CatalogRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(CatalogRow::into_entry).transpose()
    }

    /// Insert a new entry
    pub async fn create(
        &self,
        kind: CatalogKind,
        description: &str,
        state: RecordState,
    ) -> Result<CatalogEntry> {
        let sql = format!(
            "INSERT INTO {} (description, state) VALUES (?, ?)",
            kind.table()
        );

        let result = sqlx::query(&sql)
            .bind(description.trim())
            .bind(state.to_string())
            .execute(&self.pool)
            .await?;

        Ok(CatalogEntry {
            id: result.last_insert_rowid(),
            description: description.trim().to_string(),
            state,
        })
    }

    /// Update description and state of an entry
    pub async fn update(
        &self,
        kind: CatalogKind,
        id: i64,
        description: &str,
        state: RecordState,
    ) -> Result<()> {
        let sql = format!(
            "UPDATE {} SET description = ?, state = ? WHERE id = ?",
            kind.table()
        );

        let result = sqlx::query(&sql)
            .bind(description.trim())
            .bind(state.to_string())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "{} with id {} not found",
                kind.label(),
                id
            )));
        }

        Ok(())
    }

    /// Delete an entry; rejected while movements reference it
    pub async fn delete(&self, kind: CatalogKind, id: i64) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?", kind.table());

        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_fk_violation(e, kind.label()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "{} with id {} not found",
                kind.label(),
                id
            )));
        }

        Ok(())
    }

    /// Whether an entry exists and is active
    pub async fn is_active(&self, kind: CatalogKind, id: i64) -> Result<bool> {
        Ok(self
            .find_by_id(kind, id)
            .await?
            .map(|e| e.state == RecordState::Active)
            .unwrap_or(false))
    }

    // Payment plans carry the installment count and get dedicated queries

    pub async fn list_plans(&self, only_active: bool) -> Result<Vec<PaymentPlan>> {
        let sql = if only_active {
            "SELECT id, description, installment_count, state FROM payment_plans \
             WHERE state = 'active' ORDER BY id"
        } else {
            "SELECT id, description, installment_count, state FROM payment_plans ORDER BY id"
        };

        let rows: Vec<PlanRow> = sqlx::query_as(sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(PlanRow::into_plan).collect()
    }

    pub async fn find_plan_by_id(&self, id: i64) -> Result<Option<PaymentPlan>> {
        let row: Option<PlanRow> = sqlx::query_as(
            "SELECT id, description, installment_count, state FROM payment_plans WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(PlanRow::into_plan).transpose()
    }

    pub async fn create_plan(
        &self,
        description: &str,
        installment_count: i64,
        state: RecordState,
    ) -> Result<PaymentPlan> {
        let result = sqlx::query(
            "INSERT INTO payment_plans (description, installment_count, state) VALUES (?, ?, ?)",
        )
        .bind(description.trim())
        .bind(installment_count)
        .bind(state.to_string())
        .execute(&self.pool)
        .await?;

        Ok(PaymentPlan {
            id: result.last_insert_rowid(),
            description: description.trim().to_string(),
            installment_count,
            state,
        })
    }

    pub async fn update_plan(
        &self,
        id: i64,
        description: &str,
        installment_count: i64,
        state: RecordState,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE payment_plans SET description = ?, installment_count = ?, state = ? \
             WHERE id = ?",
        )
        .bind(description.trim())
        .bind(installment_count)
        .bind(state.to_string())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Payment plan with id {} not found",
                id
            )));
        }

        Ok(())
    }

    pub async fn delete_plan(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM payment_plans WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_fk_violation(e, "Payment plan"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Payment plan with id {} not found",
                id
            )));
        }

        Ok(())
    }

    pub async fn plan_is_active(&self, id: i64) -> Result<bool> {
        Ok(self
            .find_plan_by_id(id)
            .await?
            .map(|p| p.state == RecordState::Active)
            .unwrap_or(false))
    }
}

fn map_fk_violation(e: sqlx::Error, label: &str) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return AppError::validation(format!(
                "{} is referenced by existing movements and cannot be deleted",
                label
            ));
        }
    }
    AppError::Database(e)
}

#[derive(Debug, sqlx::FromRow)]
struct CatalogRow {
    id: i64,
    description: String,
    state: String,
}

impl CatalogRow {
    fn into_entry(self) -> Result<CatalogEntry> {
        let state = RecordState::from_str(&self.state)
            .map_err(AppError::internal)?;

        Ok(CatalogEntry {
            id: self.id,
            description: self.description,
            state,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PlanRow {
    id: i64,
    description: String,
    installment_count: i64,
    state: String,
}

impl PlanRow {
    fn into_plan(self) -> Result<PaymentPlan> {
        let state = RecordState::from_str(&self.state)
            .map_err(AppError::internal)?;

        Ok(PaymentPlan {
            id: self.id,
            description: self.description,
            installment_count: self.installment_count,
            state,
        })
    }
}
