use serde::{Deserialize, Serialize};

use crate::core::{AppError, RecordState, Result};

/// Payment modality: single payment or a number of installments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentPlan {
    pub id: i64,
    pub description: String,
    pub installment_count: i64,
    pub state: RecordState,
}

/// Validate the installment count from a form
pub fn validate_installments(count: i64) -> Result<()> {
    if count < 1 {
        return Err(AppError::validation(
            "Installment count must be at least 1",
        ));
    }
    if count > 48 {
        return Err(AppError::validation(
            "Installment count cannot exceed 48",
        ));
    }
    Ok(())
}
