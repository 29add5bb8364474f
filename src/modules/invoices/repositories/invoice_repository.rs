// SQLite persistence for the invoice ledger.
//
// Amounts travel as TEXT and are parsed into rust_decimal::Decimal in the
// row structs; summing happens in Rust, never in SQLite.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::core::{AppError, Result};
use crate::modules::invoices::models::{Invoice, InvoiceStatus};
use crate::modules::invoices::services::numbering;

/// Repository for invoice database operations
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a new invoice, assigning its sequential number.
    ///
    /// The period scan and the insert share one transaction; the UNIQUE
    /// constraint on `number` turns a same-period race into an error
    /// rather than a duplicate.
    pub async fn create(
        &self,
        client_id: i64,
        service_id: i64,
        issued_on: NaiveDate,
        due_on: NaiveDate,
        total: rust_decimal::Decimal,
    ) -> Result<Invoice> {
        let mut tx = self.pool.begin().await?;

        let existing: Vec<String> =
            sqlx::query_scalar("SELECT number FROM invoices WHERE number LIKE ?")
                .bind(numbering::period_pattern(issued_on))
                .fetch_all(&mut *tx)
                .await?;

        let sequence = numbering::next_sequence(existing.iter().map(String::as_str));
        let number = numbering::format_number(issued_on, sequence);

        let mut invoice = Invoice::new(number, client_id, service_id, issued_on, due_on, total)?;

        let result = sqlx::query(
            r#"
            INSERT INTO invoices (
                number, client_id, service_id, issued_on, due_on,
                total, paid, pending, status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&invoice.number)
        .bind(invoice.client_id)
        .bind(invoice.service_id)
        .bind(invoice.issued_on)
        .bind(invoice.due_on)
        .bind(invoice.total.to_string())
        .bind(invoice.paid.to_string())
        .bind(invoice.pending.to_string())
        .bind(invoice.status.to_string())
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::validation(format!(
                        "Invoice number '{}' was taken by a concurrent request",
                        invoice.number
                    ));
                }
            }
            AppError::Database(e)
        })?;

        tx.commit().await?;

        invoice.id = result.last_insert_rowid();
        Ok(invoice)
    }

    /// Find invoice by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Invoice>> {
        let row: Option<InvoiceRow> =
            sqlx::query_as("SELECT * FROM invoices WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(InvoiceRow::into_invoice).transpose()
    }

    /// Find invoice by its ledger number
    pub async fn find_by_number(&self, number: &str) -> Result<Option<Invoice>> {
        let row: Option<InvoiceRow> =
            sqlx::query_as("SELECT * FROM invoices WHERE number = ?")
                .bind(number)
                .fetch_optional(&self.pool)
                .await?;

        row.map(InvoiceRow::into_invoice).transpose()
    }

    /// List invoices, newest first, optionally filtered by status and client
    pub async fn list(
        &self,
        status: Option<InvoiceStatus>,
        client_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Invoice>> {
        let rows: Vec<InvoiceRow> = sqlx::query_as(
            r#"
            SELECT * FROM invoices
            WHERE (? IS NULL OR status = ?)
              AND (? IS NULL OR client_id = ?)
            ORDER BY issued_on DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(status.map(|s| s.to_string()))
        .bind(status.map(|s| s.to_string()))
        .bind(client_id)
        .bind(client_id)
        .bind(limit.clamp(1, 100))
        .bind(offset.max(0))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(InvoiceRow::into_invoice).collect()
    }

    /// All invoices, used by the integrity checker
    pub async fn list_all(&self) -> Result<Vec<Invoice>> {
        let rows: Vec<InvoiceRow> =
            sqlx::query_as("SELECT * FROM invoices ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(InvoiceRow::into_invoice).collect()
    }

    /// Oldest invoice with an open balance for a client+service pair.
    ///
    /// Auto-application targets this invoice when a movement arrives
    /// without explicit invoice linkage.
    pub async fn find_oldest_open(
        &self,
        client_id: i64,
        service_id: i64,
    ) -> Result<Option<Invoice>> {
        let row: Option<InvoiceRow> = sqlx::query_as(
            r#"
            SELECT * FROM invoices
            WHERE client_id = ? AND service_id = ?
              AND status IN ('pending', 'partial', 'overdue')
            ORDER BY issued_on ASC, id ASC
            LIMIT 1
            "#,
        )
        .bind(client_id)
        .bind(service_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(InvoiceRow::into_invoice).transpose()
    }

    /// Write back the settlement fields after recalculation
    pub async fn update_settlement(&self, invoice: &Invoice) -> Result<()> {
        let result = settlement_update(invoice).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Invoice with id {} not found",
                invoice.id
            )));
        }

        Ok(())
    }

    /// Write back the settlement fields within an existing transaction
    pub async fn update_settlement_with_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        invoice: &Invoice,
    ) -> Result<()> {
        let result = settlement_update(invoice).execute(&mut **tx).await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Invoice with id {} not found",
                invoice.id
            )));
        }

        Ok(())
    }

    /// Mark an invoice as voided. Callers must have checked `can_void`.
    pub async fn mark_voided(&self, id: i64) -> Result<()> {
        let result = sqlx::query(
            "UPDATE invoices SET status = 'voided', updated_at = ? WHERE id = ?",
        )
        .bind(chrono::Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Invoice with id {} not found",
                id
            )));
        }

        Ok(())
    }
}

fn settlement_update(
    invoice: &Invoice,
) -> sqlx::query::Query<'_, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'_>> {
    sqlx::query(
        r#"
        UPDATE invoices
        SET paid = ?, pending = ?, status = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(invoice.paid.to_string())
    .bind(invoice.pending.to_string())
    .bind(invoice.status.to_string())
    .bind(invoice.updated_at)
    .bind(invoice.id)
}

/// Database row shape; amounts as TEXT
#[derive(Debug, sqlx::FromRow)]
struct InvoiceRow {
    id: i64,
    number: String,
    client_id: i64,
    service_id: i64,
    issued_on: NaiveDate,
    due_on: NaiveDate,
    total: String,
    paid: String,
    pending: String,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl InvoiceRow {
    fn into_invoice(self) -> Result<Invoice> {
        let parse = |field: &str, value: &str| {
            rust_decimal::Decimal::from_str(value).map_err(|_| {
                AppError::internal(format!("Invalid {} amount in database: {}", field, value))
            })
        };

        let status = InvoiceStatus::from_str(&self.status)
            .map_err(AppError::internal)?;

        Ok(Invoice {
            id: self.id,
            number: self.number,
            client_id: self.client_id,
            service_id: self.service_id,
            issued_on: self.issued_on,
            due_on: self.due_on,
            total: parse("total", &self.total)?,
            paid: parse("paid", &self.paid)?,
            pending: parse("pending", &self.pending)?,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
