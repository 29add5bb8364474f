// Property-based checks on invoice settlement.
//
// Whatever the applied-payment sum, settling must keep the ledger
// invariant (paid + pending = total within tolerance), stay idempotent,
// and agree with derive_status.

use cajero::modules::invoices::models::{derive_status, Invoice, InvoiceStatus};
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn invoice(total: Decimal) -> Invoice {
    Invoice::new(
        "FAC-202601-1".to_string(),
        1,
        1,
        date(2026, 1, 1),
        date(2026, 1, 31),
        total,
    )
    .unwrap()
}

proptest! {
    #[test]
    fn settle_keeps_ledger_balanced(
        total_cents in 1i64..100_000_000,
        paid_cents in 0i64..100_000_000,
    ) {
        let total = Decimal::new(total_cents, 2);
        let applied = Decimal::new(paid_cents.min(total_cents), 2);

        let mut inv = invoice(total);
        inv.settle(applied, date(2026, 1, 15));

        prop_assert!(inv.is_balanced());
        prop_assert!(inv.pending >= Decimal::ZERO);
        prop_assert!(inv.paid >= Decimal::ZERO);
    }

    #[test]
    fn settle_is_idempotent(
        total_cents in 1i64..100_000_000,
        paid_cents in 0i64..100_000_000,
    ) {
        let total = Decimal::new(total_cents, 2);
        let applied = Decimal::new(paid_cents.min(total_cents), 2);
        let today = date(2026, 1, 15);

        let mut inv = invoice(total);
        inv.settle(applied, today);
        let first = (inv.paid, inv.pending, inv.status);

        inv.settle(applied, today);
        prop_assert_eq!((inv.paid, inv.pending, inv.status), first);
    }

    #[test]
    fn status_matches_derivation(
        total_cents in 1i64..100_000_000,
        paid_cents in 0i64..100_000_000,
        day in 1u32..28,
    ) {
        let total = Decimal::new(total_cents, 2);
        let applied = Decimal::new(paid_cents.min(total_cents), 2);
        let today = date(2026, 2, day); // past the January due date

        let mut inv = invoice(total);
        inv.settle(applied, today);

        prop_assert_eq!(
            inv.status,
            derive_status(total, inv.paid, inv.due_on, today)
        );
    }

    #[test]
    fn cleared_invoices_report_zero_pending(total_cents in 1i64..100_000_000) {
        let total = Decimal::new(total_cents, 2);

        let mut inv = invoice(total);
        inv.settle(total, date(2026, 1, 15));

        prop_assert_eq!(inv.status, InvoiceStatus::Paid);
        prop_assert_eq!(inv.pending, Decimal::ZERO);
    }

    #[test]
    fn split_payments_settle_like_a_lump_sum(
        total_cents in 2i64..100_000_000,
        split in 1i64..100_000_000,
    ) {
        let total = Decimal::new(total_cents, 2);
        let first = Decimal::new(split.min(total_cents - 1), 2);
        let today = date(2026, 1, 15);

        // Settlement depends only on the running sum, not the split
        let mut split_inv = invoice(total);
        split_inv.settle(first, today);
        split_inv.settle(total, today);

        let mut lump_inv = invoice(total);
        lump_inv.settle(total, today);

        prop_assert_eq!(split_inv.paid, lump_inv.paid);
        prop_assert_eq!(split_inv.pending, lump_inv.pending);
        prop_assert_eq!(split_inv.status, lump_inv.status);
    }
}
