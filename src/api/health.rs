use actix_web::{get, web::ServiceConfig, HttpResponse, Responder};
use chrono::Utc;
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// Health check endpoint
///
/// Use for load balancers and uptime monitors. There are no external
/// dependencies to probe; all state lives in process memory.
#[get("/api/health")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Liveness check endpoint
///
/// Simple check that the process is alive, for restart-style probes.
#[get("/api/health/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn health_config(config: &mut ServiceConfig) {
    config.service(health_check).service(liveness_check);
}
