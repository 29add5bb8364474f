// Invoice ledger entry.
//
// An invoice fixes the amount owed for a client's service at billing time.
// Payments are appended over time; every mutation goes through `settle`,
// which re-derives paid/pending/status from the applied-payment sum so the
// ledger invariant (paid + pending = total, within tolerance) always holds.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{money, AppError, Result};

/// Invoice status lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// No payment applied yet
    Pending,

    /// Some payment applied, balance still open
    Partial,

    /// Pending balance cleared
    Paid,

    /// Due date passed with an open balance (overrides Pending/Partial)
    Overdue,

    /// Cancelled before any payment was applied; terminal
    Voided,
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Pending
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvoiceStatus::Pending => write!(f, "pending"),
            InvoiceStatus::Partial => write!(f, "partial"),
            InvoiceStatus::Paid => write!(f, "paid"),
            InvoiceStatus::Overdue => write!(f, "overdue"),
            InvoiceStatus::Voided => write!(f, "voided"),
        }
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvoiceStatus::Pending),
            "partial" => Ok(InvoiceStatus::Partial),
            "paid" => Ok(InvoiceStatus::Paid),
            "overdue" => Ok(InvoiceStatus::Overdue),
            "voided" => Ok(InvoiceStatus::Voided),
            _ => Err(format!("Invalid invoice status: {}", s)),
        }
    }
}

/// Derive the status an invoice should carry for a given applied-payment
/// sum and reference date. Pure; the settlement path and the integrity
/// checker both go through this single definition.
pub fn derive_status(
    total: Decimal,
    paid: Decimal,
    due_on: NaiveDate,
    today: NaiveDate,
) -> InvoiceStatus {
    let pending = money::round(total - paid);

    if pending <= money::tolerance() {
        return InvoiceStatus::Paid;
    }

    if today > due_on {
        // Overdue overrides Pending/Partial while a balance is open
        return InvoiceStatus::Overdue;
    }

    if paid > Decimal::ZERO {
        InvoiceStatus::Partial
    } else {
        InvoiceStatus::Pending
    }
}

/// Represents a billed amount with partial-payment tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    /// Sequential number scoped by issue year+month, e.g. FAC-202608-14
    pub number: String,
    pub client_id: i64,
    pub service_id: i64,
    pub issued_on: NaiveDate,
    pub due_on: NaiveDate,
    pub total: Decimal,
    pub paid: Decimal,
    pub pending: Decimal,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Build a new unsaved invoice, validating the billing data.
    pub fn new(
        number: String,
        client_id: i64,
        service_id: i64,
        issued_on: NaiveDate,
        due_on: NaiveDate,
        total: Decimal,
    ) -> Result<Self> {
        money::require_positive(total, "Invoice total")?;

        if due_on < issued_on {
            return Err(AppError::validation(
                "Due date cannot precede the issue date",
            ));
        }

        let now = Utc::now();
        let total = money::round(total);

        Ok(Self {
            id: 0, // set by the database
            number,
            client_id,
            service_id,
            issued_on,
            due_on,
            total,
            paid: Decimal::ZERO,
            pending: total,
            status: InvoiceStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Recompute paid/pending/status from the current applied-payment sum.
    ///
    /// Idempotent: settling twice with the same sum leaves the invoice
    /// unchanged. A voided invoice is never resettled.
    pub fn settle(&mut self, applied_sum: Decimal, today: NaiveDate) {
        if self.status == InvoiceStatus::Voided {
            return;
        }

        self.paid = money::round(applied_sum);
        self.pending = money::round(self.total - self.paid);
        // Clamp sub-tolerance residue so a fully paid invoice reports 0
        if self.pending.abs() <= money::tolerance() {
            self.pending = Decimal::ZERO;
        }
        self.status = derive_status(self.total, self.paid, self.due_on, today);
        self.updated_at = Utc::now();
    }

    /// Check whether a payment of `amount` fits the open balance.
    pub fn accepts_payment(&self, amount: Decimal) -> Result<()> {
        if self.status == InvoiceStatus::Voided {
            return Err(AppError::validation(format!(
                "Invoice {} is voided and cannot receive payments",
                self.number
            )));
        }

        money::require_positive(amount, "Payment amount")?;

        if amount > self.pending + money::tolerance() {
            return Err(AppError::validation(format!(
                "Payment of {} exceeds pending balance {} on invoice {}",
                amount, self.pending, self.number
            )));
        }

        Ok(())
    }

    /// Check whether the invoice may be voided. Allowed only while no
    /// payment has been applied.
    pub fn can_void(&self) -> Result<()> {
        if self.status == InvoiceStatus::Voided {
            return Err(AppError::validation(format!(
                "Invoice {} is already voided",
                self.number
            )));
        }

        if self.paid > Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Invoice {} has payments applied and cannot be voided",
                self.number
            )));
        }

        Ok(())
    }

    /// Ledger invariant: paid + pending = total, within tolerance.
    pub fn is_balanced(&self) -> bool {
        money::approx_eq(self.paid + self.pending, self.total)
    }
}
