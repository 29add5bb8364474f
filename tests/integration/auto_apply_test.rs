// Cash movements settling invoices: explicit linkage and automatic
// application to the oldest open invoice for the client+service pair.

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use cajero::core::{AppError, RecordState};
use cajero::modules::catalog::{CatalogKind, CatalogRepository};
use cajero::modules::clients::{ClientRepository, ClientType};
use cajero::modules::employees::{EmployeeRepository, WorkShift};
use cajero::modules::invoices::models::InvoiceStatus;
use cajero::modules::invoices::{InvoiceRepository, InvoiceService};
use cajero::modules::movements::{MovementFilter, MovementRefs, MovementRepository, MovementService};
use cajero::modules::payments::{PaymentRepository, PaymentService};

struct TestContext {
    invoices: InvoiceService,
    movements: MovementService,
    payments: Arc<PaymentService>,
    invoice_repo: Arc<InvoiceRepository>,
    movement_repo: Arc<MovementRepository>,
    refs: MovementRefs,
}

async fn create_test_pool() -> SqlitePool {
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
    let employee_repo = Arc::new(EmployeeRepository::new(pool.clone()));
    let invoice_repo = Arc::new(InvoiceRepository::new(pool.clone()));
    let payment_repo = Arc::new(PaymentRepository::new(pool.clone()));
    let movement_repo = Arc::new(MovementRepository::new(pool.clone()));

    let service = catalog_repo
        .create(CatalogKind::ServiceItem, "Tuition", RecordState::Active)
        .await
        .expect("Failed to seed service");
    let doc_type = catalog_repo
        .create(CatalogKind::DocumentType, "Receipt", RecordState::Active)
        .await
        .expect("Failed to seed document type");
    let method = catalog_repo
        .create(CatalogKind::PaymentMethod, "Cash", RecordState::Active)
        .await
        .expect("Failed to seed payment method");
    let plan = catalog_repo
        .create_plan("Single payment", 1, RecordState::Active)
        .await
        .expect("Failed to seed payment plan");

    let client = client_repo
        .create("Ana Torres", ClientType::Student, None, RecordState::Active)
        .await
        .expect("Failed to seed client");
    let employee = employee_repo
        .create(
            "Luis Vega",
            "40112233",
            WorkShift::Morning,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            RecordState::Active,
        )
        .await
        .expect("Failed to seed employee");

    let payments = Arc::new(PaymentService::new(
        invoice_repo.clone(),
        payment_repo.clone(),
    ));

    TestContext {
        invoices: InvoiceService::new(
            invoice_repo.clone(),
            payment_repo.clone(),
            client_repo.clone(),
            catalog_repo.clone(),
            30,
        ),
        movements: MovementService::new(
            movement_repo.clone(),
            payment_repo,
            payments.clone(),
            catalog_repo,
            client_repo,
            employee_repo,
        ),
        payments,
        invoice_repo,
        movement_repo,
        refs: MovementRefs {
            employee_id: employee.id,
            client_id: client.id,
            service_id: service.id,
            document_type_id: doc_type.id,
            payment_method_id: method.id,
            payment_plan_id: plan.id,
        },
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_auto_apply_targets_oldest_open_invoice() {
    let ctx = setup().await;

    let older = ctx
        .invoices
        .create_invoice(
            ctx.refs.client_id,
            ctx.refs.service_id,
            dec!(1000),
            Some(date(2026, 7, 1)),
            Some(date(2099, 1, 1)),
        )
        .await
        .expect("Failed to create older invoice");
    let newer = ctx
        .invoices
        .create_invoice(
            ctx.refs.client_id,
            ctx.refs.service_id,
            dec!(500),
            Some(date(2026, 8, 1)),
            Some(date(2099, 1, 1)),
        )
        .await
        .expect("Failed to create newer invoice");

    let recorded = ctx
        .movements
        .record(ctx.refs, dec!(400), Some("Window 3".to_string()), None)
        .await
        .expect("Failed to record movement");

    let payment = recorded.payment.expect("Movement should have applied");
    assert_eq!(payment.invoice_id, older.id);
    assert_eq!(payment.movement_id, Some(recorded.movement.id));

    let older = ctx
        .invoice_repo
        .find_by_id(older.id)
        .await
        .expect("Failed to reload invoice")
        .expect("Invoice missing");
    assert_eq!(older.status, InvoiceStatus::Partial);
    assert_eq!(older.pending, dec!(600));

    let newer = ctx
        .invoice_repo
        .find_by_id(newer.id)
        .await
        .expect("Failed to reload invoice")
        .expect("Invoice missing");
    assert_eq!(newer.status, InvoiceStatus::Pending);
}

#[tokio::test]
async fn test_oversized_movement_stands_alone() {
    let ctx = setup().await;

    let invoice = ctx
        .invoices
        .create_invoice(
            ctx.refs.client_id,
            ctx.refs.service_id,
            dec!(300),
            None,
            None,
        )
        .await
        .expect("Failed to create invoice");

    let recorded = ctx
        .movements
        .record(ctx.refs, dec!(5000), None, None)
        .await
        .expect("Failed to record movement");

    // Too large for the open balance: the movement is kept, nothing applied
    assert!(recorded.payment.is_none());
    assert!(recorded.movement.id > 0);

    let invoice = ctx
        .invoice_repo
        .find_by_id(invoice.id)
        .await
        .expect("Failed to reload invoice")
        .expect("Invoice missing");
    assert_eq!(invoice.status, InvoiceStatus::Pending);
}

#[tokio::test]
async fn test_movement_without_open_invoice_stands_alone() {
    let ctx = setup().await;

    let recorded = ctx
        .movements
        .record(ctx.refs, dec!(100), None, None)
        .await
        .expect("Failed to record movement");

    assert!(recorded.payment.is_none());
}

#[tokio::test]
async fn test_explicit_invoice_link() {
    let ctx = setup().await;

    // The older invoice would win auto-application; the cashier overrides
    ctx.invoices
        .create_invoice(
            ctx.refs.client_id,
            ctx.refs.service_id,
            dec!(1000),
            Some(date(2026, 7, 1)),
            Some(date(2099, 1, 1)),
        )
        .await
        .expect("Failed to create older invoice");
    let target = ctx
        .invoices
        .create_invoice(
            ctx.refs.client_id,
            ctx.refs.service_id,
            dec!(500),
            Some(date(2026, 8, 1)),
            Some(date(2099, 1, 1)),
        )
        .await
        .expect("Failed to create target invoice");

    let recorded = ctx
        .movements
        .record(ctx.refs, dec!(500), None, Some(target.id))
        .await
        .expect("Failed to record movement");

    let payment = recorded.payment.expect("Movement should have applied");
    assert_eq!(payment.invoice_id, target.id);

    let target = ctx
        .invoice_repo
        .find_by_id(target.id)
        .await
        .expect("Failed to reload invoice")
        .expect("Invoice missing");
    assert_eq!(target.status, InvoiceStatus::Paid);
}

#[tokio::test]
async fn test_explicit_link_validated_before_persisting() {
    let ctx = setup().await;

    let invoice = ctx
        .invoices
        .create_invoice(
            ctx.refs.client_id,
            ctx.refs.service_id,
            dec!(300),
            None,
            None,
        )
        .await
        .expect("Failed to create invoice");

    let err = ctx
        .movements
        .record(ctx.refs, dec!(400), None, Some(invoice.id))
        .await
        .expect_err("Oversized explicit payment should fail");
    assert!(matches!(err, AppError::Validation(_)));

    // The rejected movement was never persisted
    let stored = ctx
        .movements
        .list(&MovementFilter::default())
        .await
        .expect("Failed to list movements");
    assert!(stored.is_empty());
}

#[tokio::test]
async fn test_delete_movement_guarded_by_applied_payment() {
    let ctx = setup().await;

    ctx.invoices
        .create_invoice(
            ctx.refs.client_id,
            ctx.refs.service_id,
            dec!(1000),
            None,
            None,
        )
        .await
        .expect("Failed to create invoice");

    let recorded = ctx
        .movements
        .record(ctx.refs, dec!(400), None, None)
        .await
        .expect("Failed to record movement");
    let payment = recorded.payment.expect("Movement should have applied");

    let err = ctx
        .movements
        .delete(recorded.movement.id)
        .await
        .expect_err("Delete should be blocked by the applied payment");
    assert!(matches!(err, AppError::Validation(_)));

    // Once the payment is voided the movement can go
    ctx.payments
        .void_payment(payment.id)
        .await
        .expect("Failed to void payment");
    ctx.movements
        .delete(recorded.movement.id)
        .await
        .expect("Failed to delete movement");

    assert!(ctx
        .movement_repo
        .find_by_id(recorded.movement.id)
        .await
        .expect("Failed to query movement")
        .is_none());
}

#[tokio::test]
async fn test_inactive_reference_rejected() {
    let ctx = setup().await;

    let mut refs = ctx.refs;
    refs.payment_plan_id = 9999;

    let err = ctx
        .movements
        .record(refs, dec!(100), None, None)
        .await
        .expect_err("Unknown payment plan should be rejected");
    assert!(matches!(err, AppError::Validation(_)));
}
