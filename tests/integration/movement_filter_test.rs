// Movement listing filters: reference filters combine with AND, date
// bounds are inclusive, ordering is newest first.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal_macros::dec;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use cajero::core::RecordState;
use cajero::modules::catalog::{CatalogKind, CatalogRepository};
use cajero::modules::clients::{ClientRepository, ClientType};
use cajero::modules::employees::{EmployeeRepository, WorkShift};
use cajero::modules::movements::{MovementFilter, MovementRefs, MovementRepository, MovementService};
use cajero::modules::payments::{PaymentRepository, PaymentService};
use cajero::modules::invoices::InvoiceRepository;

struct TestContext {
    movements: MovementService,
    client_a: i64,
    client_b: i64,
    service_x: i64,
    service_y: i64,
    method_cash: i64,
    method_card: i64,
    base_refs: MovementRefs,
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

    let service_x = catalog_repo
        .create(CatalogKind::ServiceItem, "Tuition", RecordState::Active)
        .await
        .expect("Failed to seed service");
    let service_y = catalog_repo
        .create(CatalogKind::ServiceItem, "Library fee", RecordState::Active)
        .await
        .expect("Failed to seed service");
    let doc_type = catalog_repo
        .create(CatalogKind::DocumentType, "Receipt", RecordState::Active)
        .await
        .expect("Failed to seed document type");
    let method_cash = catalog_repo
        .create(CatalogKind::PaymentMethod, "Cash", RecordState::Active)
        .await
        .expect("Failed to seed payment method");
    let method_card = catalog_repo
        .create(CatalogKind::PaymentMethod, "Card", RecordState::Active)
        .await
        .expect("Failed to seed payment method");
    let plan = catalog_repo
        .create_plan("Single payment", 1, RecordState::Active)
        .await
        .expect("Failed to seed plan");

    let client_a = client_repo
        .create("Ana Torres", ClientType::Student, None, RecordState::Active)
        .await
        .expect("Failed to seed client");
    let client_b = client_repo
        .create("Beatriz Soto", ClientType::Staff, None, RecordState::Active)
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

    let payment_service = Arc::new(PaymentService::new(invoice_repo, payment_repo.clone()));

    TestContext {
        movements: MovementService::new(
            movement_repo,
            payment_repo,
            payment_service,
            catalog_repo,
            client_repo,
            employee_repo,
        ),
        client_a: client_a.id,
        client_b: client_b.id,
        service_x: service_x.id,
        service_y: service_y.id,
        method_cash: method_cash.id,
        method_card: method_card.id,
        base_refs: MovementRefs {
            employee_id: employee.id,
            client_id: client_a.id,
            service_id: service_x.id,
            document_type_id: doc_type.id,
            payment_method_id: method_cash.id,
            payment_plan_id: plan.id,
        },
    }
}

/// a/X/cash 100, a/Y/cash 200, b/X/card 50.50
async fn seed_movements(ctx: &TestContext) {
    let combos = [
        (ctx.client_a, ctx.service_x, ctx.method_cash, dec!(100)),
        (ctx.client_a, ctx.service_y, ctx.method_cash, dec!(200)),
        (ctx.client_b, ctx.service_x, ctx.method_card, dec!(50.50)),
    ];

    for (client_id, service_id, method_id, amount) in combos {
        let refs = MovementRefs {
            client_id,
            service_id,
            payment_method_id: method_id,
            ..ctx.base_refs
        };
        ctx.movements
            .record(refs, amount, None, None)
            .await
            .expect("Failed to record movement");
    }
}

#[tokio::test]
async fn test_unfiltered_list_returns_all_newest_first() {
    let ctx = setup().await;
    seed_movements(&ctx).await;

    let all = ctx
        .movements
        .list(&MovementFilter::default())
        .await
        .expect("Failed to list movements");

    assert_eq!(all.len(), 3);
    assert!(all.windows(2).all(|w| w[0].id >= w[1].id));
}

#[tokio::test]
async fn test_filters_combine_with_and() {
    let ctx = setup().await;
    seed_movements(&ctx).await;

    let by_client = ctx
        .movements
        .list(&MovementFilter {
            client_id: Some(ctx.client_a),
            ..Default::default()
        })
        .await
        .expect("Failed to list movements");
    assert_eq!(by_client.len(), 2);

    let by_client_and_service = ctx
        .movements
        .list(&MovementFilter {
            client_id: Some(ctx.client_a),
            service_id: Some(ctx.service_y),
            ..Default::default()
        })
        .await
        .expect("Failed to list movements");
    assert_eq!(by_client_and_service.len(), 1);
    assert_eq!(by_client_and_service[0].amount, dec!(200));

    let by_method = ctx
        .movements
        .list(&MovementFilter {
            payment_method_id: Some(ctx.method_card),
            ..Default::default()
        })
        .await
        .expect("Failed to list movements");
    assert_eq!(by_method.len(), 1);
    assert_eq!(by_method[0].client_id, ctx.client_b);

    let contradictory = ctx
        .movements
        .list(&MovementFilter {
            client_id: Some(ctx.client_b),
            service_id: Some(ctx.service_y),
            ..Default::default()
        })
        .await
        .expect("Failed to list movements");
    assert!(contradictory.is_empty());
}

#[tokio::test]
async fn test_date_range_filter() {
    let ctx = setup().await;
    seed_movements(&ctx).await;

    let now = Utc::now();

    let recent = ctx
        .movements
        .list(&MovementFilter {
            from: Some(now - Duration::hours(1)),
            to: Some(now + Duration::hours(1)),
            ..Default::default()
        })
        .await
        .expect("Failed to list movements");
    assert_eq!(recent.len(), 3);

    let future_only = ctx
        .movements
        .list(&MovementFilter {
            from: Some(now + Duration::days(1)),
            ..Default::default()
        })
        .await
        .expect("Failed to list movements");
    assert!(future_only.is_empty());

    let past_only = ctx
        .movements
        .list(&MovementFilter {
            to: Some(now - Duration::days(1)),
            ..Default::default()
        })
        .await
        .expect("Failed to list movements");
    assert!(past_only.is_empty());
}
