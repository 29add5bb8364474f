use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{money, Result};

/// Payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Counts toward the invoice's paid amount
    Applied,

    /// Reversed; excluded from settlement sums
    Voided,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Applied => write!(f, "applied"),
            PaymentStatus::Voided => write!(f, "voided"),
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "applied" => Ok(PaymentStatus::Applied),
            "voided" => Ok(PaymentStatus::Voided),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }
}

/// A monetary application against exactly one invoice, optionally backed
/// by a recorded cash movement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub invoice_id: i64,
    pub movement_id: Option<i64>,
    pub method_id: Option<i64>,
    pub amount: Decimal,
    pub paid_at: DateTime<Utc>,
    pub status: PaymentStatus,
}

impl Payment {
    /// Build a new unsaved payment with a validated amount.
    pub fn new(
        invoice_id: i64,
        movement_id: Option<i64>,
        method_id: Option<i64>,
        amount: Decimal,
    ) -> Result<Self> {
        money::require_positive(amount, "Payment amount")?;

        Ok(Self {
            id: 0, // set by the database
            invoice_id,
            movement_id,
            method_id,
            amount: money::round(amount),
            paid_at: Utc::now(),
            status: PaymentStatus::Applied,
        })
    }
}
