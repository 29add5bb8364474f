// Aggregate queries for the report endpoints.
//
// Rows are fetched with their TEXT amounts and summed in Rust over
// Decimal; SQLite's SUM would coerce to floats.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::core::{AppError, Result};
use crate::modules::reports::models::{DailyTotal, DashboardSummary, GroupTotal};

/// Repository for report aggregations
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Counters for the landing page
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        let total_clients: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await?;

        let total_movements: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cash_movements")
            .fetch_one(&self.pool)
            .await?;

        let amounts: Vec<String> = sqlx::query_scalar("SELECT amount FROM cash_movements")
            .fetch_all(&self.pool)
            .await?;

        Ok(DashboardSummary {
            total_clients,
            total_movements,
            total_income: sum_amounts(&amounts)?,
        })
    }

    /// Movement totals grouped by payment method
    pub async fn totals_by_method(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<GroupTotal>> {
        let rows: Vec<GroupRow> = sqlx::query_as(
            r#"
            SELECT pm.id AS id, pm.description AS description, cm.amount AS amount
            FROM cash_movements cm
            JOIN payment_methods pm ON pm.id = cm.payment_method_id
            WHERE cm.occurred_at >= ? AND cm.occurred_at <= ?
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        group_totals(rows)
    }

    /// Movement totals grouped by service
    pub async fn totals_by_service(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<GroupTotal>> {
        let rows: Vec<GroupRow> = sqlx::query_as(
            r#"
            SELECT s.id AS id, s.description AS description, cm.amount AS amount
            FROM cash_movements cm
            JOIN service_items s ON s.id = cm.service_id
            WHERE cm.occurred_at >= ? AND cm.occurred_at <= ?
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        group_totals(rows)
    }

    /// Movement totals per calendar day
    pub async fn daily_totals(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<DailyTotal>> {
        let rows: Vec<DailyRow> = sqlx::query_as(
            r#"
            SELECT occurred_at, amount
            FROM cash_movements
            WHERE occurred_at >= ? AND occurred_at <= ?
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        let mut days: BTreeMap<NaiveDate, (i64, Decimal)> = BTreeMap::new();
        for row in rows {
            let amount = parse_amount(&row.amount)?;
            let entry = days.entry(row.occurred_at.date_naive()).or_default();
            entry.0 += 1;
            entry.1 += amount;
        }

        Ok(days
            .into_iter()
            .map(|(day, (movement_count, total))| DailyTotal {
                day,
                movement_count,
                total,
            })
            .collect())
    }
}

fn parse_amount(raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw).map_err(|_| {
        AppError::internal(format!("Invalid movement amount in database: {}", raw))
    })
}

fn sum_amounts(amounts: &[String]) -> Result<Decimal> {
    amounts
        .iter()
        .try_fold(Decimal::ZERO, |acc, raw| Ok(acc + parse_amount(raw)?))
}

fn group_totals(rows: Vec<GroupRow>) -> Result<Vec<GroupTotal>> {
    let mut groups: BTreeMap<i64, (String, i64, Decimal)> = BTreeMap::new();
    for row in rows {
        let amount = parse_amount(&row.amount)?;
        let entry = groups
            .entry(row.id)
            .or_insert_with(|| (row.description.clone(), 0, Decimal::ZERO));
        entry.1 += 1;
        entry.2 += amount;
    }

    Ok(groups
        .into_iter()
        .map(|(id, (description, movement_count, total))| GroupTotal {
            id,
            description,
            movement_count,
            total,
        })
        .collect())
}

#[derive(Debug, sqlx::FromRow)]
struct GroupRow {
    id: i64,
    description: String,
    amount: String,
}

#[derive(Debug, sqlx::FromRow)]
struct DailyRow {
    occurred_at: DateTime<Utc>,
    amount: String,
}
