use actix_multipart::form::MultipartFormConfig;
use actix_web::HttpResponse;
use serde::Serialize;

/// Uniform error body for every non-2xx response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
        }
    }
}

const MISSING_FIELDS: &str = "Missing required fields: fileId and style";
const INVALID_STYLE: &str = "Invalid style. Must be corporate, creative, or executive";

/// Creates a configured JsonConfig with standardized error handling for the
/// entire project
pub fn json_config() -> actix_web_validator::JsonConfig {
    actix_web_validator::JsonConfig::default().error_handler(|err, _req| {
        let message = match &err {
            actix_web_validator::Error::Validate(validation_errors) => validation_errors
                .field_errors()
                .values()
                .flat_map(|errors| errors.iter())
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| MISSING_FIELDS.to_string()),
            actix_web_validator::Error::Deserialize(de_err) => {
                let err_string = de_err.to_string();

                if err_string.contains("unknown variant") {
                    INVALID_STYLE.to_string()
                } else if err_string.contains("missing field")
                    || err_string.contains("EOF while parsing")
                {
                    MISSING_FIELDS.to_string()
                } else {
                    "Invalid JSON format".to_string()
                }
            }
            _ => "Request validation failed".to_string(),
        };

        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(ErrorResponse::new(&message)),
        )
        .into()
    })
}

/// Multipart counterpart of `json_config`: malformed or oversized uploads
/// get the same `{success, message}` body shape.
pub fn multipart_config(total_limit: usize) -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(total_limit)
        .error_handler(|err, _req| {
            let message = format!("Upload failed: {}", err);
            actix_web::error::InternalError::from_response(
                err,
                HttpResponse::BadRequest().json(ErrorResponse::new(&message)),
            )
            .into()
        })
}
