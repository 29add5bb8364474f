use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cajero::config::Config;
use cajero::middleware::RequestId;
use cajero::modules::catalog::CatalogRepository;
use cajero::modules::clients::ClientRepository;
use cajero::modules::employees::EmployeeRepository;
use cajero::modules::invoices::{InvoiceRepository, InvoiceService};
use cajero::modules::movements::{MovementRepository, MovementService};
use cajero::modules::payments::{IntegrityChecker, PaymentRepository, PaymentService};
use cajero::modules::reports::{ReportRepository, ReportService};
use cajero::modules::{catalog, clients, employees, health, invoices, movements, payments, reports};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cajero=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting Cajero billing service");
    tracing::info!("Environment: {}", config.app.env);

    // Create database connection pool and bring the schema up to date
    let db_pool = config.database.create_pool().await?;
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.max_connections
    );

    // Repositories
    let catalog_repo = Arc::new(CatalogRepository::new(db_pool.clone()));
    let client_repo = Arc::new(ClientRepository::new(db_pool.clone()));
    let employee_repo = Arc::new(EmployeeRepository::new(db_pool.clone()));
    let invoice_repo = Arc::new(InvoiceRepository::new(db_pool.clone()));
    let payment_repo = Arc::new(PaymentRepository::new(db_pool.clone()));
    let movement_repo = Arc::new(MovementRepository::new(db_pool.clone()));

    // Services
    let payment_service = Arc::new(PaymentService::new(
        invoice_repo.clone(),
        payment_repo.clone(),
    ));
    let invoice_service = Arc::new(InvoiceService::new(
        invoice_repo.clone(),
        payment_repo.clone(),
        client_repo.clone(),
        catalog_repo.clone(),
        config.app.invoice_due_days,
    ));
    let movement_service = Arc::new(MovementService::new(
        movement_repo.clone(),
        payment_repo.clone(),
        payment_service.clone(),
        catalog_repo.clone(),
        client_repo.clone(),
        employee_repo.clone(),
    ));
    let integrity_checker = Arc::new(IntegrityChecker::new(
        invoice_repo.clone(),
        payment_repo.clone(),
        movement_repo.clone(),
    ));
    let report_service = Arc::new(ReportService::new(ReportRepository::new(db_pool.clone())));

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestId)
            .wrap(Cors::permissive())
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(catalog_repo.clone()))
            .app_data(web::Data::new(client_repo.clone()))
            .app_data(web::Data::new(employee_repo.clone()))
            .app_data(web::Data::new(invoice_service.clone()))
            .app_data(web::Data::new(payment_service.clone()))
            .app_data(web::Data::new(movement_service.clone()))
            .app_data(web::Data::new(integrity_checker.clone()))
            .app_data(web::Data::new(report_service.clone()))
            .configure(health::controllers::configure)
            .configure(catalog::controllers::configure)
            .configure(clients::controllers::configure)
            .configure(employees::controllers::configure)
            .configure(invoices::controllers::configure)
            .configure(payments::controllers::configure)
            .configure(movements::controllers::configure)
            .configure(reports::controllers::configure)
    })
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}
