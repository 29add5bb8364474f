use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::core::RecordState;
use crate::modules::clients::models::{client, ClientType};
use crate::modules::clients::repositories::ClientRepository;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct ClientPayload {
    pub name: String,
    pub client_type: ClientType,
    pub program: Option<String>,
    #[serde(default)]
    pub state: RecordState,
}

pub async fn list_clients(
    repo: web::Data<Arc<ClientRepository>>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let clients = repo.list(query.active).await?;
    Ok(HttpResponse::Ok().json(clients))
}

pub async fn create_client(
    repo: web::Data<Arc<ClientRepository>>,
    payload: web::Json<ClientPayload>,
) -> Result<HttpResponse, AppError> {
    client::validate_name(&payload.name)?;
    let created = repo
        .create(
            &payload.name,
            payload.client_type,
            payload.program.as_deref(),
            payload.state,
        )
        .await?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn update_client(
    repo: web::Data<Arc<ClientRepository>>,
    path: web::Path<i64>,
    payload: web::Json<ClientPayload>,
) -> Result<HttpResponse, AppError> {
    client::validate_name(&payload.name)?;
    repo.update(
        path.into_inner(),
        &payload.name,
        payload.client_type,
        payload.program.as_deref(),
        payload.state,
    )
    .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn delete_client(
    repo: web::Data<Arc<ClientRepository>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    repo.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure client routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/clients")
            .route("", web::get().to(list_clients))
            .route("", web::post().to(create_client))
            .route("/{id}", web::put().to(update_client))
            .route("/{id}", web::delete().to(delete_client)),
    );
}
