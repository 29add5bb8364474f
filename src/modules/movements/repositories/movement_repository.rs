use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::core::{AppError, RecordState, Result};
use crate::modules::movements::models::CashMovement;

/// Filters for the consulta/reporte listings. All fields optional and
/// combined with AND.
#[derive(Debug, Default, Clone)]
pub struct MovementFilter {
    pub client_id: Option<i64>,
    pub service_id: Option<i64>,
    pub document_type_id: Option<i64>,
    pub payment_method_id: Option<i64>,
    pub payment_plan_id: Option<i64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Repository for cash movement database operations
pub struct MovementRepository {
    pool: SqlitePool,
}

impl MovementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a movement and return it with its assigned id
    pub async fn create(&self, movement: &CashMovement) -> Result<CashMovement> {
        let result = sqlx::query(
            r#"
            INSERT INTO cash_movements (
                employee_id, client_id, service_id, document_type_id,
                payment_method_id, payment_plan_id, amount, description,
                occurred_at, state
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(movement.employee_id)
        .bind(movement.client_id)
        .bind(movement.service_id)
        .bind(movement.document_type_id)
        .bind(movement.payment_method_id)
        .bind(movement.payment_plan_id)
        .bind(movement.amount.to_string())
        .bind(&movement.description)
        .bind(movement.occurred_at)
        .bind(movement.state.to_string())
        .execute(&self.pool)
        .await?;

        let mut created = movement.clone();
        created.id = result.last_insert_rowid();
        Ok(created)
    }

    /// Find movement by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<CashMovement>> {
        let row: Option<MovementRow> =
            sqlx::query_as("SELECT * FROM cash_movements WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(MovementRow::into_movement).transpose()
    }

    /// List movements matching the filter, newest first
    pub async fn list(&self, filter: &MovementFilter) -> Result<Vec<CashMovement>> {
        let rows: Vec<MovementRow> = sqlx::query_as(
            r#"
            SELECT * FROM cash_movements
            WHERE (? IS NULL OR client_id = ?)
              AND (? IS NULL OR service_id = ?)
              AND (? IS NULL OR document_type_id = ?)
              AND (? IS NULL OR payment_method_id = ?)
              AND (? IS NULL OR payment_plan_id = ?)
              AND (? IS NULL OR occurred_at >= ?)
              AND (? IS NULL OR occurred_at <= ?)
            ORDER BY occurred_at DESC, id DESC
            "#,
        )
        .bind(filter.client_id)
        .bind(filter.client_id)
        .bind(filter.service_id)
        .bind(filter.service_id)
        .bind(filter.document_type_id)
        .bind(filter.document_type_id)
        .bind(filter.payment_method_id)
        .bind(filter.payment_method_id)
        .bind(filter.payment_plan_id)
        .bind(filter.payment_plan_id)
        .bind(filter.from)
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.to)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(MovementRow::into_movement).collect()
    }

    /// Delete a movement. Callers must have checked payment linkage.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM cash_movements WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Movement with id {} not found",
                id
            )));
        }

        Ok(())
    }
}

/// Database row shape; amount as TEXT
#[derive(Debug, sqlx::FromRow)]
struct MovementRow {
    id: i64,
    employee_id: i64,
    client_id: i64,
    service_id: i64,
    document_type_id: i64,
    payment_method_id: i64,
    payment_plan_id: i64,
    amount: String,
    description: Option<String>,
    occurred_at: DateTime<Utc>,
    state: String,
}

impl MovementRow {
    fn into_movement(self) -> Result<CashMovement> {
        let amount = Decimal::from_str(&self.amount).map_err(|_| {
            AppError::internal(format!(
                "Invalid movement amount in database: {}",
                self.amount
            ))
        })?;

        let state = RecordState::from_str(&self.state)
            .map_err(AppError::internal)?;

        Ok(CashMovement {
            id: self.id,
            employee_id: self.employee_id,
            client_id: self.client_id,
            service_id: self.service_id,
            document_type_id: self.document_type_id,
            payment_method_id: self.payment_method_id,
            payment_plan_id: self.payment_plan_id,
            amount,
            description: self.description,
            occurred_at: self.occurred_at,
            state,
        })
    }
}
