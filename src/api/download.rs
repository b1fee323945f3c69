use actix_web::{
    get,
    web::{Path, ServiceConfig, scope},
    HttpResponse, Responder,
};
use serde::{Deserialize, Serialize};

/// Response for `GET /api/download/{resultId}`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    pub success: bool,
    pub image_url: String,
    pub message: String,
}

// No real artifact exists; the URL points at the SVG placeholder below.
#[get("/{result_id}")]
async fn download(path: Path<String>) -> impl Responder {
    let result_id = path.into_inner();
    HttpResponse::Ok().json(DownloadResponse {
        success: true,
        image_url: format!("/api/download/mock-image/{}", result_id),
        message: "Image ready for download".to_string(),
    })
}

#[get("/mock-image/{result_id}")]
async fn mock_image(path: Path<String>) -> impl Responder {
    let result_id = path.into_inner();
    let svg = format!(
        r##"<svg width="400" height="400" xmlns="http://www.w3.org/2000/svg">
  <rect width="400" height="400" fill="#f0f0f0"/>
  <text x="200" y="200" text-anchor="middle" font-family="Arial" font-size="16" fill="#666">
    Generated Headshot
  </text>
  <text x="200" y="220" text-anchor="middle" font-family="Arial" font-size="12" fill="#999">
    {}
  </text>
</svg>"##,
        result_id
    );

    HttpResponse::Ok().content_type("image/svg+xml").body(svg)
}

pub fn download_config(config: &mut ServiceConfig) {
    config.service(scope("/api/download").service(mock_image).service(download));
}
