use actix_web::{
    get, post,
    web::{Data, Path, ServiceConfig, scope},
    HttpResponse,
};
use actix_web_validator::Json;

use super::models::GenerateRequest;
use super::service::{GenerationService, ServiceError};

#[post("")]
async fn generate(
    service: Data<GenerationService>,
    request: Json<GenerateRequest>,
) -> HttpResponse {
    let response = service.start_generation(&request);
    HttpResponse::Ok().json(response)
}

#[get("/status/{job_id}")]
async fn generation_status(
    service: Data<GenerationService>,
    path: Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let status = service.job_status(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(status))
}

// Alias for the canonical status lookup. The original project shipped a
// second status surface here that always answered completed/100; both now
// read the same store.
#[get("/{job_id}")]
async fn job_status(
    service: Data<GenerationService>,
    path: Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let status = service.job_status(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(status))
}

pub fn generate_config(config: &mut ServiceConfig) {
    config.service(
        scope("/api/generate")
            .service(generate)
            .service(generation_status),
    );
}

pub fn status_config(config: &mut ServiceConfig) {
    config.service(scope("/api/status").service(job_status));
}
