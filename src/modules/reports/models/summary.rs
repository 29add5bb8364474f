use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Office-wide counters for the landing page
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub total_clients: i64,
    pub total_movements: i64,
    pub total_income: Decimal,
}

/// Movement total for one catalog group (payment method or service)
#[derive(Debug, Serialize)]
pub struct GroupTotal {
    pub id: i64,
    pub description: String,
    pub movement_count: i64,
    pub total: Decimal,
}

/// Movement total for one calendar day
#[derive(Debug, Serialize)]
pub struct DailyTotal {
    pub day: NaiveDate,
    pub movement_count: i64,
    pub total: Decimal,
}
