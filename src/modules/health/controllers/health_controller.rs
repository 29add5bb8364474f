use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

/// Liveness/readiness probe; checks the database connection
/// GET /health
pub async fn health_check(pool: web::Data<SqlitePool>) -> HttpResponse {
    let database = match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(pool.get_ref())
        .await
    {
        Ok(_) => "up",
        Err(_) => "down",
    };

    let status = if database == "up" { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(serde_json::json!({
        "status": status,
        "service": "cajero",
        "database": database,
    }))
}

/// Configure health routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
