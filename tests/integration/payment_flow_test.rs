// End-to-end invoice and payment lifecycle against an in-memory database:
// issue an invoice, apply partial payments, void, recalculate.

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use cajero::core::{AppError, RecordState};
use cajero::modules::catalog::{CatalogKind, CatalogRepository};
use cajero::modules::clients::{ClientRepository, ClientType};
use cajero::modules::invoices::models::InvoiceStatus;
use cajero::modules::invoices::{InvoiceRepository, InvoiceService};
use cajero::modules::payments::{PaymentRepository, PaymentService};

struct TestContext {
    invoices: InvoiceService,
    payments: PaymentService,
    invoice_repo: Arc<InvoiceRepository>,
    client_id: i64,
    service_id: i64,
}

async fn create_test_pool() -> SqlitePool {
    // A single connection keeps the in-memory database alive and shared
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("Invalid database URL")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

async fn setup() -> TestContext {
    let pool = create_test_pool().await;

    let catalog_repo = Arc::new(CatalogRepository::new(pool.clone()));
    let client_repo = Arc::new(ClientRepository::new(pool.clone()));
    let invoice_repo = Arc::new(InvoiceRepository::new(pool.clone()));
    let payment_repo = Arc::new(PaymentRepository::new(pool.clone()));

    let service = catalog_repo
        .create(CatalogKind::ServiceItem, "Tuition", RecordState::Active)
        .await
        .expect("Failed to seed service");

    let client = client_repo
        .create(
            "Ana Torres",
            ClientType::Student,
            Some("Accounting"),
            RecordState::Active,
        )
        .await
        .expect("Failed to seed client");

    TestContext {
        invoices: InvoiceService::new(
            invoice_repo.clone(),
            payment_repo.clone(),
            client_repo,
            catalog_repo,
            30,
        ),
        payments: PaymentService::new(invoice_repo.clone(), payment_repo),
        invoice_repo,
        client_id: client.id,
        service_id: service.id,
    }
}

#[tokio::test]
async fn test_partial_then_full_payment() {
    let ctx = setup().await;

    let invoice = ctx
        .invoices
        .create_invoice(ctx.client_id, ctx.service_id, dec!(1000), None, None)
        .await
        .expect("Failed to create invoice");

    assert_eq!(invoice.status, InvoiceStatus::Pending);
    assert_eq!(invoice.pending, dec!(1000));

    let (_, invoice) = ctx
        .payments
        .apply(invoice.id, dec!(400), None, None)
        .await
        .expect("Failed to apply first payment");

    assert_eq!(invoice.status, InvoiceStatus::Partial);
    assert_eq!(invoice.paid, dec!(400));
    assert_eq!(invoice.pending, dec!(600));

    let (_, invoice) = ctx
        .payments
        .apply(invoice.id, dec!(600), None, None)
        .await
        .expect("Failed to apply second payment");

    assert_eq!(invoice.status, InvoiceStatus::Paid);
    assert_eq!(invoice.pending, Decimal::ZERO);
    assert!(invoice.is_balanced());
}

#[tokio::test]
async fn test_overpayment_rejected() {
    let ctx = setup().await;

    let invoice = ctx
        .invoices
        .create_invoice(ctx.client_id, ctx.service_id, dec!(1000), None, None)
        .await
        .expect("Failed to create invoice");

    ctx.payments
        .apply(invoice.id, dec!(400), None, None)
        .await
        .expect("Failed to apply payment");

    let err = ctx
        .payments
        .apply(invoice.id, dec!(600.02), None, None)
        .await
        .expect_err("Overpayment should be rejected");
    assert!(matches!(err, AppError::Validation(_)));

    // Nothing was written
    let stored = ctx
        .invoice_repo
        .find_by_id(invoice.id)
        .await
        .expect("Failed to reload invoice")
        .expect("Invoice missing");
    assert_eq!(stored.paid, dec!(400));
}

#[tokio::test]
async fn test_void_payment_restores_balance() {
    let ctx = setup().await;

    let invoice = ctx
        .invoices
        .create_invoice(ctx.client_id, ctx.service_id, dec!(1000), None, None)
        .await
        .expect("Failed to create invoice");

    let (payment, invoice) = ctx
        .payments
        .apply(invoice.id, dec!(1000), None, None)
        .await
        .expect("Failed to apply payment");
    assert_eq!(invoice.status, InvoiceStatus::Paid);

    let invoice = ctx
        .payments
        .void_payment(payment.id)
        .await
        .expect("Failed to void payment");

    assert_eq!(invoice.status, InvoiceStatus::Pending);
    assert_eq!(invoice.paid, Decimal::ZERO);
    assert_eq!(invoice.pending, dec!(1000));

    // Voiding twice is rejected
    assert!(ctx.payments.void_payment(payment.id).await.is_err());
}

#[tokio::test]
async fn test_recalculate_is_idempotent() {
    let ctx = setup().await;

    let invoice = ctx
        .invoices
        .create_invoice(ctx.client_id, ctx.service_id, dec!(750), None, None)
        .await
        .expect("Failed to create invoice");

    ctx.payments
        .apply(invoice.id, dec!(250), None, None)
        .await
        .expect("Failed to apply payment");

    let first = ctx
        .payments
        .recalculate(invoice.id)
        .await
        .expect("Failed to recalculate");
    let second = ctx
        .payments
        .recalculate(invoice.id)
        .await
        .expect("Failed to recalculate again");

    assert_eq!(first.paid, second.paid);
    assert_eq!(first.pending, second.pending);
    assert_eq!(first.status, second.status);
    assert_eq!(second.paid, dec!(250));
}

#[tokio::test]
async fn test_void_invoice_only_before_payments() {
    let ctx = setup().await;

    let untouched = ctx
        .invoices
        .create_invoice(ctx.client_id, ctx.service_id, dec!(100), None, None)
        .await
        .expect("Failed to create invoice");

    let voided = ctx
        .invoices
        .void_invoice(untouched.id)
        .await
        .expect("Failed to void fresh invoice");
    assert_eq!(voided.status, InvoiceStatus::Voided);

    // A voided invoice rejects payments
    let err = ctx
        .payments
        .apply(voided.id, dec!(50), None, None)
        .await
        .expect_err("Payment on voided invoice should fail");
    assert!(matches!(err, AppError::Validation(_)));

    // An invoice with applied payments cannot be voided
    let paid = ctx
        .invoices
        .create_invoice(ctx.client_id, ctx.service_id, dec!(100), None, None)
        .await
        .expect("Failed to create invoice");
    ctx.payments
        .apply(paid.id, dec!(40), None, None)
        .await
        .expect("Failed to apply payment");

    assert!(ctx.invoices.void_invoice(paid.id).await.is_err());
}

#[tokio::test]
async fn test_invoice_numbers_sequential_within_period() {
    let ctx = setup().await;

    let first = ctx
        .invoices
        .create_invoice(ctx.client_id, ctx.service_id, dec!(100), None, None)
        .await
        .expect("Failed to create first invoice");
    let second = ctx
        .invoices
        .create_invoice(ctx.client_id, ctx.service_id, dec!(200), None, None)
        .await
        .expect("Failed to create second invoice");

    let first_suffix: u32 = first
        .number
        .rsplit('-')
        .next()
        .and_then(|s| s.parse().ok())
        .expect("Malformed invoice number");
    let second_suffix: u32 = second
        .number
        .rsplit('-')
        .next()
        .and_then(|s| s.parse().ok())
        .expect("Malformed invoice number");

    assert_eq!(second_suffix, first_suffix + 1);
    assert_ne!(first.number, second.number);
}

#[tokio::test]
async fn test_create_invoice_rejects_inactive_references() {
    let ctx = setup().await;

    let err = ctx
        .invoices
        .create_invoice(9999, ctx.service_id, dec!(100), None, None)
        .await
        .expect_err("Unknown client should be rejected");
    assert!(matches!(err, AppError::Validation(_)));

    let err = ctx
        .invoices
        .create_invoice(ctx.client_id, 9999, dec!(100), None, None)
        .await
        .expect_err("Unknown service should be rejected");
    assert!(matches!(err, AppError::Validation(_)));

    assert!(ctx
        .invoices
        .create_invoice(ctx.client_id, ctx.service_id, Decimal::ZERO, None, None)
        .await
        .is_err());
}

#[tokio::test]
async fn test_get_invoice_includes_payment_history() {
    let ctx = setup().await;

    let invoice = ctx
        .invoices
        .create_invoice(ctx.client_id, ctx.service_id, dec!(500), None, None)
        .await
        .expect("Failed to create invoice");

    ctx.payments
        .apply(invoice.id, dec!(200), None, None)
        .await
        .expect("Failed to apply payment");
    ctx.payments
        .apply(invoice.id, dec!(300), None, None)
        .await
        .expect("Failed to apply payment");

    let detail = ctx
        .invoices
        .get_invoice(invoice.id)
        .await
        .expect("Failed to fetch invoice detail");

    assert_eq!(detail.payments.len(), 2);
    assert_eq!(detail.invoice.status, InvoiceStatus::Paid);

    let err = ctx
        .invoices
        .get_invoice(9999)
        .await
        .expect_err("Missing invoice should be NotFound");
    assert!(matches!(err, AppError::NotFound(_)));
}
