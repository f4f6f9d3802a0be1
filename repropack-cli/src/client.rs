use crate::types::Result;
use crate::utils::disposition_filename;
use repropack_server::api::handlers::ApiResponse;
use repropack_server::models::{
    HealthStatus, PackageListResponse, PackageRecord, PackageRequest,
};
use reqwest::header::CONTENT_DISPOSITION;
use serde::de::DeserializeOwned;

/// HTTP client for a ReproPack server
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        let response = self.http.get(self.url("/health")).send().await?;
        Self::json(response).await
    }

    pub async fn create_package(&self, request: &PackageRequest) -> Result<PackageRecord> {
        let response = self
            .http
            .post(self.url("/create-package"))
            .json(request)
            .send()
            .await?;
        Self::json(response).await
    }

    pub async fn list_packages(&self) -> Result<PackageListResponse> {
        let response = self.http.get(self.url("/list-packages")).send().await?;
        Self::json(response).await
    }

    /// Download an archive, returning the server-provided file name and bytes
    pub async fn download_package(&self, package_id: &str) -> Result<(String, Vec<u8>)> {
        let response = self
            .http
            .get(self.url(&format!("/download-package/{}", package_id)))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_message(response).await.into());
        }

        let file_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_filename)
            .unwrap_or_else(|| format!("{}.zip", package_id));
        let bytes = response.bytes().await?;
        Ok((file_name, bytes.to_vec()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::error_message(response).await.into());
        }
        Ok(response.json().await?)
    }

    /// Pull the message out of an error envelope, falling back to the raw body
    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
            .ok()
            .and_then(|api| api.error)
            .unwrap_or(body);
        format!("Server returned {}: {}", status, detail)
    }
}
