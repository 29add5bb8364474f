use serde::Serialize;

/// One inconsistency found while cross-checking movements, payments and
/// invoices.
#[derive(Debug, Clone, Serialize)]
pub struct IntegrityFinding {
    pub kind: FindingKind,
    pub invoice_id: Option<i64>,
    pub payment_id: Option<i64>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Applied-payment sum differs from the invoice's paid amount
    PaidMismatch,

    /// paid + pending drifted away from total
    Unbalanced,

    /// Stored status differs from the derived status
    StaleStatus,

    /// Payment amount differs from its linked movement's amount
    MovementMismatch,

    /// Applied payment sitting on a voided invoice
    PaymentOnVoided,

    /// Payment references a movement that no longer exists
    MissingMovement,
}

/// Result of a full integrity pass; empty findings means consistent
#[derive(Debug, Serialize)]
pub struct IntegrityReport {
    pub checked_invoices: usize,
    pub checked_payments: usize,
    pub findings: Vec<IntegrityFinding>,
}

impl IntegrityReport {
    pub fn is_consistent(&self) -> bool {
        self.findings.is_empty()
    }
}
