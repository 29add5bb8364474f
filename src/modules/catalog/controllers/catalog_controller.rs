use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::core::RecordState;
use crate::modules::catalog::models::{entry, payment_plan, CatalogKind};
use crate::modules::catalog::repositories::CatalogRepository;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// When true, only active rows (the pick-list view)
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct CatalogPayload {
    pub description: String,
    #[serde(default)]
    pub state: RecordState,
}

#[derive(Debug, Deserialize)]
pub struct PlanPayload {
    pub description: String,
    pub installment_count: i64,
    #[serde(default)]
    pub state: RecordState,
}

async fn list_entries(
    repo: &CatalogRepository,
    kind: CatalogKind,
    query: ListQuery,
) -> Result<HttpResponse, AppError> {
    let entries = repo.list(kind, query.active).await?;
    Ok(HttpResponse::Ok().json(entries))
}

async fn create_entry(
    repo: &CatalogRepository,
    kind: CatalogKind,
    payload: CatalogPayload,
) -> Result<HttpResponse, AppError> {
    entry::validate_description(&payload.description)?;
    let created = repo.create(kind, &payload.description, payload.state).await?;
    Ok(HttpResponse::Created().json(created))
}

async fn update_entry(
    repo: &CatalogRepository,
    kind: CatalogKind,
    id: i64,
    payload: CatalogPayload,
) -> Result<HttpResponse, AppError> {
    entry::validate_description(&payload.description)?;
    repo.update(kind, id, &payload.description, payload.state)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn delete_entry(
    repo: &CatalogRepository,
    kind: CatalogKind,
    id: i64,
) -> Result<HttpResponse, AppError> {
    repo.delete(kind, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

macro_rules! catalog_handlers {
    ($list:ident, $create:ident, $update:ident, $delete:ident, $kind:expr) => {
        pub async fn $list(
            repo: web::Data<Arc<CatalogRepository>>,
            query: web::Query<ListQuery>,
        ) -> Result<HttpResponse, AppError> {
            list_entries(&repo, $kind, query.into_inner()).await
        }

        pub async fn $create(
            repo: web::Data<Arc<CatalogRepository>>,
            payload: web::Json<CatalogPayload>,
        ) -> Result<HttpResponse, AppError> {
            create_entry(&repo, $kind, payload.into_inner()).await
        }

        pub async fn $update(
            repo: web::Data<Arc<CatalogRepository>>,
            path: web::Path<i64>,
            payload: web::Json<CatalogPayload>,
        ) -> Result<HttpResponse, AppError> {
            update_entry(&repo, $kind, path.into_inner(), payload.into_inner()).await
        }

        pub async fn $delete(
            repo: web::Data<Arc<CatalogRepository>>,
            path: web::Path<i64>,
        ) -> Result<HttpResponse, AppError> {
            delete_entry(&repo, $kind, path.into_inner()).await
        }
    };
}

catalog_handlers!(
    list_document_types,
    create_document_type,
    update_document_type,
    delete_document_type,
    CatalogKind::DocumentType
);

catalog_handlers!(
    list_services,
    create_service,
    update_service,
    delete_service,
    CatalogKind::ServiceItem
);

catalog_handlers!(
    list_payment_methods,
    create_payment_method,
    update_payment_method,
    delete_payment_method,
    CatalogKind::PaymentMethod
);

// Payment plans: same surface plus the installment count

pub async fn list_payment_plans(
    repo: web::Data<Arc<CatalogRepository>>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let plans = repo.list_plans(query.active).await?;
    Ok(HttpResponse::Ok().json(plans))
}

pub async fn create_payment_plan(
    repo: web::Data<Arc<CatalogRepository>>,
    payload: web::Json<PlanPayload>,
) -> Result<HttpResponse, AppError> {
    entry::validate_description(&payload.description)?;
    payment_plan::validate_installments(payload.installment_count)?;
    let created = repo
        .create_plan(&payload.description, payload.installment_count, payload.state)
        .await?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn update_payment_plan(
    repo: web::Data<Arc<CatalogRepository>>,
    path: web::Path<i64>,
    payload: web::Json<PlanPayload>,
) -> Result<HttpResponse, AppError> {
    entry::validate_description(&payload.description)?;
    payment_plan::validate_installments(payload.installment_count)?;
    repo.update_plan(
        path.into_inner(),
        &payload.description,
        payload.installment_count,
        payload.state,
    )
    .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn delete_payment_plan(
    repo: web::Data<Arc<CatalogRepository>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    repo.delete_plan(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure catalog routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/catalog")
            .service(
                web::scope("/document-types")
                    .route("", web::get().to(list_document_types))
                    .route("", web::post().to(create_document_type))
                    .route("/{id}", web::put().to(update_document_type))
                    .route("/{id}", web::delete().to(delete_document_type)),
            )
            .service(
                web::scope("/services")
                    .route("", web::get().to(list_services))
                    .route("", web::post().to(create_service))
                    .route("/{id}", web::put().to(update_service))
                    .route("/{id}", web::delete().to(delete_service)),
            )
            .service(
                web::scope("/payment-methods")
                    .route("", web::get().to(list_payment_methods))
                    .route("", web::post().to(create_payment_method))
                    .route("/{id}", web::put().to(update_payment_method))
                    .route("/{id}", web::delete().to(delete_payment_method)),
            )
            .service(
                web::scope("/payment-plans")
                    .route("", web::get().to(list_payment_plans))
                    .route("", web::post().to(create_payment_plan))
                    .route("/{id}", web::put().to(update_payment_plan))
                    .route("/{id}", web::delete().to(delete_payment_plan)),
            ),
    );
}
