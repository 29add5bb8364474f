// Monetary primitives: rounding, tolerance comparison and form input parsing.

use cajero::core::money;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn test_round_uses_cashier_precision() {
    assert_eq!(money::round(dec!(10.004)), dec!(10.00));
    assert_eq!(money::round(dec!(10.006)), dec!(10.01));
    assert_eq!(money::round(dec!(1000)), dec!(1000));
}

#[test]
fn test_round_is_stable_at_two_decimals() {
    let amount = dec!(123.45);
    assert_eq!(money::round(amount), amount);
}

#[test]
fn test_approx_eq_accepts_one_cent_difference() {
    assert!(money::approx_eq(dec!(100.00), dec!(100.01)));
    assert!(money::approx_eq(dec!(100.01), dec!(100.00)));
    assert!(!money::approx_eq(dec!(100.00), dec!(100.02)));
}

#[test]
fn test_parse_amount_accepts_plain_and_decimal_input() {
    assert_eq!(money::parse_amount("350").unwrap(), dec!(350));
    assert_eq!(money::parse_amount("12.50").unwrap(), dec!(12.50));
    assert_eq!(money::parse_amount("  99.9 ").unwrap(), dec!(99.9));
}

#[test]
fn test_parse_amount_rejects_more_than_two_decimals() {
    assert!(money::parse_amount("12.505").is_err());
    assert!(money::parse_amount("0.001").is_err());
}

#[test]
fn test_parse_amount_rejects_garbage() {
    assert!(money::parse_amount("").is_err());
    assert!(money::parse_amount("abc").is_err());
    assert!(money::parse_amount("12,50").is_err());
}

#[test]
fn test_require_positive() {
    assert!(money::require_positive(dec!(0.01), "Amount").is_ok());
    assert!(money::require_positive(Decimal::ZERO, "Amount").is_err());
    assert!(money::require_positive(dec!(-5), "Amount").is_err());
}
