use serde::{Deserialize, Serialize};
use validator::Validate;

/// Stylistic presets offered by the studio
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HeadshotStyle {
    Corporate,
    Creative,
    Executive,
}

impl HeadshotStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadshotStyle::Corporate => "corporate",
            HeadshotStyle::Creative => "creative",
            HeadshotStyle::Executive => "executive",
        }
    }
}

/// Body of `POST /api/generate`
#[derive(Deserialize, Serialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[validate(length(min = 1, message = "Missing required fields: fileId and style"))]
    pub file_id: String,
    pub style: HeadshotStyle,
}
