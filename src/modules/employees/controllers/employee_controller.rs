use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::error::AppError;
use crate::core::RecordState;
use crate::modules::employees::models::{employee, WorkShift};
use crate::modules::employees::repositories::EmployeeRepository;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct EmployeePayload {
    pub name: String,
    pub national_id: String,
    pub work_shift: WorkShift,
    pub hired_on: NaiveDate,
    #[serde(default)]
    pub state: RecordState,
}

pub async fn list_employees(
    repo: web::Data<Arc<EmployeeRepository>>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let employees = repo.list(query.active).await?;
    Ok(HttpResponse::Ok().json(employees))
}

pub async fn create_employee(
    repo: web::Data<Arc<EmployeeRepository>>,
    payload: web::Json<EmployeePayload>,
) -> Result<HttpResponse, AppError> {
    employee::validate(&payload.name, &payload.national_id)?;
    let created = repo
        .create(
            &payload.name,
            &payload.national_id,
            payload.work_shift,
            payload.hired_on,
            payload.state,
        )
        .await?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn update_employee(
    repo: web::Data<Arc<EmployeeRepository>>,
    path: web::Path<i64>,
    payload: web::Json<EmployeePayload>,
) -> Result<HttpResponse, AppError> {
    employee::validate(&payload.name, &payload.national_id)?;
    repo.update(
        path.into_inner(),
        &payload.name,
        &payload.national_id,
        payload.work_shift,
        payload.hired_on,
        payload.state,
    )
    .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn delete_employee(
    repo: web::Data<Arc<EmployeeRepository>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    repo.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure employee routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/employees")
            .route("", web::get().to(list_employees))
            .route("", web::post().to(create_employee))
            .route("/{id}", web::put().to(update_employee))
            .route("/{id}", web::delete().to(delete_employee)),
    );
}
