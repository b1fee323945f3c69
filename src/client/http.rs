use async_trait::async_trait;

use crate::api::download::DownloadResponse;
use crate::api::generate::{GenerateRequest, GenerateResponse, HeadshotStyle, StatusResponse};
use crate::api::upload::UploadResponse;

use super::poller::StatusApi;
use super::ClientError;

/// HTTP client for the studio API.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://localhost:3001`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Upload a photo and get back the file handle used by `generate`.
    pub async fn upload_photo(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, ClientError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = reqwest::multipart::Form::new().part("photo", part);

        let response = self
            .http
            .post(format!("{}/api/upload", self.base_url))
            .multipart(form)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Request generation for an uploaded file; the returned id is the
    /// handle for status polling.
    pub async fn generate(
        &self,
        file_id: &str,
        style: HeadshotStyle,
    ) -> Result<GenerateResponse, ClientError> {
        let request = GenerateRequest {
            file_id: file_id.to_string(),
            style,
        };
        let response = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Resolve a completed job's result id into its (mock) image URL.
    pub async fn download(&self, result_id: &str) -> Result<DownloadResponse, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/download/{}", self.base_url, result_id))
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        Ok(response.json::<T>().await?)
    }

    async fn api_error(response: reqwest::Response) -> ClientError {
        let status = response.status().as_u16();
        let message = match response.json::<serde_json::Value>().await {
            Ok(body) => body
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("request failed")
                .to_string(),
            Err(_) => "request failed".to_string(),
        };
        ClientError::Api { status, message }
    }
}

#[async_trait]
impl StatusApi for ApiClient {
    async fn job_status(&self, job_id: &str) -> Result<StatusResponse, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/generate/status/{}", self.base_url, job_id))
            .send()
            .await?;
        Self::parse(response).await
    }
}
