// SQLite persistence for payments.
//
// The applied-payment sum is computed in Rust over Decimal values rather
// than with SQLite's SUM, which would coerce the TEXT amounts to floats.

use rust_decimal::Decimal;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::str::FromStr;

use crate::core::{AppError, Result};
use crate::modules::payments::models::{Payment, PaymentStatus};

/// Repository for payment database operations
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert a payment within an existing transaction
    pub async fn insert_with_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        payment: &Payment,
    ) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO payments (invoice_id, movement_id, method_id, amount, paid_at, status)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(payment.invoice_id)
        .bind(payment.movement_id)
        .bind(payment.method_id)
        .bind(payment.amount.to_string())
        .bind(payment.paid_at)
        .bind(payment.status.to_string())
        .execute(&mut **tx)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Find payment by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Payment>> {
        let row: Option<PaymentRow> =
            sqlx::query_as("SELECT * FROM payments WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(PaymentRow::into_payment).transpose()
    }

    /// Payments recorded against one invoice, oldest first
    pub async fn list_for_invoice(&self, invoice_id: i64) -> Result<Vec<Payment>> {
        let rows: Vec<PaymentRow> =
            sqlx::query_as("SELECT * FROM payments WHERE invoice_id = ? ORDER BY id")
                .bind(invoice_id)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(PaymentRow::into_payment).collect()
    }

    /// All payments, used by the integrity checker
    pub async fn list_all(&self) -> Result<Vec<Payment>> {
        let rows: Vec<PaymentRow> =
            sqlx::query_as("SELECT * FROM payments ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(PaymentRow::into_payment).collect()
    }

    /// Sum of Applied payments for an invoice
    pub async fn applied_sum(&self, invoice_id: i64) -> Result<Decimal> {
        let amounts: Vec<String> = sqlx::query_scalar(
            "SELECT amount FROM payments WHERE invoice_id = ? AND status = 'applied'",
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        sum_amounts(&amounts)
    }

    /// Sum of Applied payments, within an existing transaction
    pub async fn applied_sum_with_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        invoice_id: i64,
    ) -> Result<Decimal> {
        let amounts: Vec<String> = sqlx::query_scalar(
            "SELECT amount FROM payments WHERE invoice_id = ? AND status = 'applied'",
        )
        .bind(invoice_id)
        .fetch_all(&mut **tx)
        .await?;

        sum_amounts(&amounts)
    }

    /// Count of Applied payments for an invoice (void checks)
    pub async fn applied_count(&self, invoice_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM payments WHERE invoice_id = ? AND status = 'applied'",
        )
        .bind(invoice_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Whether an Applied payment references the given movement
    pub async fn applied_exists_for_movement(&self, movement_id: i64) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM payments WHERE movement_id = ? AND status = 'applied'",
        )
        .bind(movement_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Mark a payment as voided, within an existing transaction
    pub async fn mark_voided_with_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        id: i64,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE payments SET status = 'voided' WHERE id = ? AND status = 'applied'",
        )
        .bind(id)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::validation(format!(
                "Payment {} is not in applied state",
                id
            )));
        }

        Ok(())
    }
}

fn sum_amounts(amounts: &[String]) -> Result<Decimal> {
    amounts.iter().try_fold(Decimal::ZERO, |acc, raw| {
        let amount = Decimal::from_str(raw).map_err(|_| {
            AppError::internal(format!("Invalid payment amount in database: {}", raw))
        })?;
        Ok(acc + amount)
    })
}

/// Database row shape; amount as TEXT
#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: i64,
    invoice_id: i64,
    movement_id: Option<i64>,
    method_id: Option<i64>,
    amount: String,
    paid_at: chrono::DateTime<chrono::Utc>,
    status: String,
}

impl PaymentRow {
    fn into_payment(self) -> Result<Payment> {
        let amount = Decimal::from_str(&self.amount).map_err(|_| {
            AppError::internal(format!(
                "Invalid payment amount in database: {}",
                self.amount
            ))
        })?;

        let status = PaymentStatus::from_str(&self.status)
            .map_err(AppError::internal)?;

        Ok(Payment {
            id: self.id,
            invoice_id: self.invoice_id,
            movement_id: self.movement_id,
            method_id: self.method_id,
            amount,
            paid_at: self.paid_at,
            status,
        })
    }
}
