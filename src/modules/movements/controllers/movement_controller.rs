use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::error::AppError;
use crate::core::money;
use crate::modules::movements::models::MovementRefs;
use crate::modules::movements::repositories::MovementFilter;
use crate::modules::movements::services::MovementService;

#[derive(Debug, Deserialize)]
pub struct MovementPayload {
    pub employee_id: i64,
    pub client_id: i64,
    pub service_id: i64,
    pub document_type_id: i64,
    pub payment_method_id: i64,
    pub payment_plan_id: i64,
    /// Amount as a string, parsed with cashier precision rules
    pub amount: String,
    pub description: Option<String>,
    /// Explicit invoice to settle against; omit for auto-application
    pub invoice_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct MovementQuery {
    pub client_id: Option<i64>,
    pub service_id: Option<i64>,
    pub document_type_id: Option<i64>,
    pub payment_method_id: Option<i64>,
    pub payment_plan_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl MovementQuery {
    fn into_filter(self) -> MovementFilter {
        MovementFilter {
            client_id: self.client_id,
            service_id: self.service_id,
            document_type_id: self.document_type_id,
            payment_method_id: self.payment_method_id,
            payment_plan_id: self.payment_plan_id,
            from: self
                .from
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc()),
            to: self
                .to
                .and_then(|d| d.and_hms_opt(23, 59, 59))
                .map(|dt| dt.and_utc()),
        }
    }
}

/// Record a cash movement
/// POST /movements
pub async fn record_movement(
    service: web::Data<Arc<MovementService>>,
    payload: web::Json<MovementPayload>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    let amount = money::parse_amount(&payload.amount)?;

    let refs = MovementRefs {
        employee_id: payload.employee_id,
        client_id: payload.client_id,
        service_id: payload.service_id,
        document_type_id: payload.document_type_id,
        payment_method_id: payload.payment_method_id,
        payment_plan_id: payload.payment_plan_id,
    };

    let recorded = service
        .record(refs, amount, payload.description, payload.invoice_id)
        .await?;

    Ok(HttpResponse::Created().json(recorded))
}

/// List movements with the consulta/reporte filters
/// GET /movements
pub async fn list_movements(
    service: web::Data<Arc<MovementService>>,
    query: web::Query<MovementQuery>,
) -> Result<HttpResponse, AppError> {
    let movements = service.list(&query.into_inner().into_filter()).await?;
    Ok(HttpResponse::Ok().json(movements))
}

/// Delete a movement
/// DELETE /movements/{id}
pub async fn delete_movement(
    service: web::Data<Arc<MovementService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    service.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure movement routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/movements")
            .route("", web::post().to(record_movement))
            .route("", web::get().to(list_movements))
            .route("/{id}", web::delete().to(delete_movement)),
    );
}
