use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::core::money;
use crate::modules::payments::services::{IntegrityChecker, PaymentService};

#[derive(Debug, Deserialize)]
pub struct ApplyPaymentRequest {
    pub invoice_id: i64,
    /// Amount as a string, parsed with cashier precision rules
    pub amount: String,
    pub method_id: Option<i64>,
}

/// Apply a payment directly to an invoice (no cash movement involved)
/// POST /payments
pub async fn apply_payment(
    service: web::Data<Arc<PaymentService>>,
    request: web::Json<ApplyPaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let amount = money::parse_amount(&request.amount)?;

    let (payment, invoice) = service
        .apply(request.invoice_id, amount, request.method_id, None)
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "payment": payment,
        "invoice": invoice,
    })))
}

/// Void a payment and resettle its invoice
/// POST /payments/{id}/void
pub async fn void_payment(
    service: web::Data<Arc<PaymentService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let invoice = service.void_payment(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(invoice))
}

/// Run the movement/payment/invoice integrity check
/// GET /integrity
pub async fn run_integrity_check(
    checker: web::Data<Arc<IntegrityChecker>>,
) -> Result<HttpResponse, AppError> {
    let report = checker.run().await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Configure payment routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("", web::post().to(apply_payment))
            .route("/{id}/void", web::post().to(void_payment)),
    )
    .route("/integrity", web::get().to(run_integrity_check));
}
