use actix_multipart::form::{tempfile::TempFile, MultipartForm};
use actix_web::{
    post,
    web::{self, Data, ServiceConfig, scope},
    HttpResponse,
};
use chrono::Utc;
use image::GenericImageView;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::generate::ServiceError;
use crate::config::Config;

const MIN_DIMENSION: u32 = 512;
const MAX_DIMENSION: u32 = 4096;

/// Response for `POST /api/upload`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub file_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub file_size: usize,
    pub dimensions: Dimensions,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, MultipartForm)]
pub struct UploadForm {
    pub photo: TempFile,
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some(".jpg"),
        "image/png" => Some(".png"),
        "image/webp" => Some(".webp"),
        _ => None,
    }
}

#[post("")]
async fn upload_photo(
    config: Data<Config>,
    form: MultipartForm<UploadForm>,
) -> Result<HttpResponse, ServiceError> {
    let UploadForm { photo } = form.into_inner();

    let content_type = photo
        .content_type
        .as_ref()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_default();
    let extension = extension_for(&content_type).ok_or_else(|| {
        warn!("rejected upload with content type {:?}", content_type);
        ServiceError::Validation(
            "Invalid file type. Only JPEG, PNG, and WebP are allowed.".to_string(),
        )
    })?;

    let bytes = std::fs::read(photo.file.path())
        .map_err(|e| ServiceError::Internal(format!("failed to read upload: {}", e)))?;
    let file_size = bytes.len();

    // decode off the async executor; a 10MB photo can take a while
    let decoded = web::block(move || {
        image::load_from_memory(&bytes).map(|img| (img.dimensions(), bytes))
    })
    .await
    .map_err(|e| ServiceError::Internal(format!("decode task failed: {}", e)))?;

    let ((width, height), bytes) = decoded.map_err(|e| {
        warn!("undecodable upload: {}", e);
        ServiceError::Validation("Invalid image file".to_string())
    })?;

    if width < MIN_DIMENSION || height < MIN_DIMENSION {
        return Err(ServiceError::Validation(format!(
            "Image too small. Minimum dimensions: {}x{}px",
            MIN_DIMENSION, MIN_DIMENSION
        )));
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(ServiceError::Validation(format!(
            "Image too large. Maximum dimensions: {}x{}px",
            MAX_DIMENSION, MAX_DIMENSION
        )));
    }

    let file_id = format!(
        "upload-{}-{}",
        Utc::now().timestamp_millis(),
        rand::thread_rng().gen_range(0..1_000_000_000u32)
    );

    std::fs::create_dir_all(&config.upload_dir)
        .map_err(|e| ServiceError::Internal(format!("failed to create upload dir: {}", e)))?;
    let dest = config.upload_dir.join(format!("{}{}", file_id, extension));
    std::fs::write(&dest, &bytes)
        .map_err(|e| ServiceError::Internal(format!("failed to store upload: {}", e)))?;

    info!(
        "stored upload {} ({}x{}, {} bytes) at {}",
        file_id,
        width,
        height,
        file_size,
        dest.display()
    );

    Ok(HttpResponse::Ok().json(UploadResponse {
        success: true,
        message: "File uploaded successfully".to_string(),
        file_id,
        file_name: photo.file_name.clone(),
        file_size,
        dimensions: Dimensions { width, height },
    }))
}

pub fn upload_config(config: &mut ServiceConfig) {
    config.service(scope("/api/upload").service(upload_photo));
}
