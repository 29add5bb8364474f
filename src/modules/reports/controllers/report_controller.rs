use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::reports::services::ReportService;

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Landing page counters
/// GET /reports/summary
pub async fn dashboard_summary(
    service: web::Data<Arc<ReportService>>,
) -> Result<HttpResponse, AppError> {
    let summary = service.dashboard_summary().await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// Totals grouped by payment method
/// GET /reports/by-method?from=&to=
pub async fn totals_by_method(
    service: web::Data<Arc<ReportService>>,
    query: web::Query<RangeQuery>,
) -> Result<HttpResponse, AppError> {
    let totals = service.totals_by_method(query.from, query.to).await?;
    Ok(HttpResponse::Ok().json(totals))
}

/// Totals grouped by service
/// GET /reports/by-service?from=&to=
pub async fn totals_by_service(
    service: web::Data<Arc<ReportService>>,
    query: web::Query<RangeQuery>,
) -> Result<HttpResponse, AppError> {
    let totals = service.totals_by_service(query.from, query.to).await?;
    Ok(HttpResponse::Ok().json(totals))
}

/// Totals per calendar day
/// GET /reports/daily?from=&to=
pub async fn daily_totals(
    service: web::Data<Arc<ReportService>>,
    query: web::Query<RangeQuery>,
) -> Result<HttpResponse, AppError> {
    let totals = service.daily_totals(query.from, query.to).await?;
    Ok(HttpResponse::Ok().json(totals))
}

/// Configure report routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/summary", web::get().to(dashboard_summary))
            .route("/by-method", web::get().to(totals_by_method))
            .route("/by-service", web::get().to(totals_by_service))
            .route("/daily", web::get().to(daily_totals)),
    );
}
