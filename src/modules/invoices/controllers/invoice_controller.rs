use std::str::FromStr;
use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::error::AppError;
use crate::core::money;
use crate::modules::invoices::models::InvoiceStatus;
use crate::modules::invoices::services::InvoiceService;
use crate::modules::payments::services::PaymentService;

#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    pub client_id: i64,
    pub service_id: i64,
    /// Amount as a string, parsed with cashier precision rules
    pub total: String,
    pub issued_on: Option<NaiveDate>,
    pub due_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct ListInvoicesQuery {
    pub status: Option<String>,
    pub client_id: Option<i64>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Issue a new invoice
/// POST /invoices
pub async fn create_invoice(
    service: web::Data<Arc<InvoiceService>>,
    request: web::Json<CreateInvoiceRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let total = money::parse_amount(&request.total)?;

    let invoice = service
        .create_invoice(
            request.client_id,
            request.service_id,
            total,
            request.issued_on,
            request.due_on,
        )
        .await?;

    Ok(HttpResponse::Created().json(invoice))
}

/// Get invoice with payment history
/// GET /invoices/{id}
pub async fn get_invoice(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let detail = service.get_invoice(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// List invoices
/// GET /invoices
pub async fn list_invoices(
    service: web::Data<Arc<InvoiceService>>,
    query: web::Query<ListInvoicesQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();

    let status = query
        .status
        .as_deref()
        .map(InvoiceStatus::from_str)
        .transpose()
        .map_err(AppError::validation)?;

    let invoices = service
        .list_invoices(status, query.client_id, query.limit, query.offset)
        .await?;

    Ok(HttpResponse::Ok().json(invoices))
}

/// Void an invoice that has no payments yet
/// POST /invoices/{id}/void
pub async fn void_invoice(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let invoice = service.void_invoice(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(invoice))
}

/// Recompute settlement fields from applied payments
/// POST /invoices/{id}/recalculate
pub async fn recalculate_invoice(
    payments: web::Data<Arc<PaymentService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let invoice = payments.recalculate(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(invoice))
}

/// Configure invoice routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/invoices")
            .route("", web::post().to(create_invoice))
            .route("", web::get().to(list_invoices))
            .route("/{id}", web::get().to(get_invoice))
            .route("/{id}/void", web::post().to(void_invoice))
            .route("/{id}/recalculate", web::post().to(recalculate_invoice)),
    );
}
