use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{money, RecordState, Result};

/// A raw cash transaction recorded at the cashier window.
///
/// Movements reference the employee at the window, the client being
/// served and the catalog rows describing the operation. A movement may
/// end up backing a payment (see the payments module) or stand alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashMovement {
    pub id: i64,
    pub employee_id: i64,
    pub client_id: i64,
    pub service_id: i64,
    pub document_type_id: i64,
    pub payment_method_id: i64,
    pub payment_plan_id: i64,
    pub amount: Decimal,
    pub description: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub state: RecordState,
}

/// Reference ids for a new movement, grouped to keep signatures readable
#[derive(Debug, Clone, Copy)]
pub struct MovementRefs {
    pub employee_id: i64,
    pub client_id: i64,
    pub service_id: i64,
    pub document_type_id: i64,
    pub payment_method_id: i64,
    pub payment_plan_id: i64,
}

impl CashMovement {
    /// Build a new unsaved movement with a validated amount.
    pub fn new(refs: MovementRefs, amount: Decimal, description: Option<String>) -> Result<Self> {
        money::require_positive(amount, "Movement amount")?;

        Ok(Self {
            id: 0, // set by the database
            employee_id: refs.employee_id,
            client_id: refs.client_id,
            service_id: refs.service_id,
            document_type_id: refs.document_type_id,
            payment_method_id: refs.payment_method_id,
            payment_plan_id: refs.payment_plan_id,
            amount: money::round(amount),
            description,
            occurred_at: Utc::now(),
            state: RecordState::Active,
        })
    }
}
