use rust_decimal::Decimal;

use super::{AppError, Result};

/// Reconciliation tolerance: two amounts within one cent are considered equal.
pub fn tolerance() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

/// Round an amount to cashier precision (two decimal places, banker's rounding)
pub fn round(amount: Decimal) -> Decimal {
    amount.round_dp(2)
}

/// Compare two amounts within the reconciliation tolerance
pub fn approx_eq(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() <= tolerance()
}

/// Parse a monetary amount from user-supplied form input.
///
/// Rejects unparseable values and amounts with more than two decimal
/// places instead of silently rounding them.
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let amount: Decimal = input
        .trim()
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid amount: '{}'", input)))?;

    if amount.scale() > 2 {
        return Err(AppError::validation(format!(
            "Amounts must have at most 2 decimal places, got {}",
            amount.scale()
        )));
    }

    Ok(amount)
}

/// Validate that an amount is strictly positive
pub fn require_positive(amount: Decimal, what: &str) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(AppError::validation(format!(
            "{} must be greater than zero",
            what
        )));
    }
    Ok(())
}
