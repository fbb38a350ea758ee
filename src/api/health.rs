use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;
use sqlx::{Pool, Postgres};
use tracing::error;

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint including database connectivity.
/// Use for load balancers and uptime monitors.
#[get("/health")]
async fn health_check(pool: web::Data<Pool<Postgres>>) -> impl Responder {
    match sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(HealthResponse {
            status: "healthy".to_string(),
            database: "connected".to_string(),
            error: None,
        }),
        Err(e) => {
            error!("Health check failed: {:?}", e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "unhealthy".to_string(),
                database: "disconnected".to_string(),
                error: Some(format!("Database error: {}", e)),
            })
        }
    }
}

/// Liveness endpoint: the process is up. Does not check dependencies.
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive".to_string(),
        database: "not_checked".to_string(),
        error: None,
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config.service(health_check).service(liveness_check);
}
