//! REST client for the conversion service.
//!
//! [`FileApi`] is the seam the rest of the crate is written against;
//! [`ApiClient`] implements it over `reqwest`. Tests and alternative
//! transports implement the trait directly.
//!
//! | Operation      | Request                              | Response            |
//! |----------------|--------------------------------------|---------------------|
//! | `upload_pdf`   | `POST /upload` (multipart `file`)     | [`UploadResponse`]  |
//! | `list_files`   | `GET /files?page=&per_page=`          | [`FileListResponse`]|
//! | `get_file`     | `GET /files/{id}`                     | [`FileInfo`]        |
//! | `update_file`  | `PUT /files/{id}` (multipart `file`)  | [`FileInfo`]        |
//! | `delete_file`  | `DELETE /files/{id}`                  | [`DeleteResponse`]  |
//! | `health`       | `GET /health`                         | [`HealthResponse`]  |
//!
//! Non-2xx responses carry `{"detail": "..."}`, surfaced as
//! [`ClientError::Api`]. The client never retries.

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::model::{
    ApiErrorBody, DeleteResponse, FileInfo, FileListResponse, HealthResponse, UploadResponse,
};
use crate::validate::PdfUpload;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// Operations offered by the conversion service.
#[async_trait]
pub trait FileApi: Send + Sync {
    async fn upload_pdf(&self, upload: PdfUpload) -> Result<UploadResponse, ClientError>;

    async fn list_files(&self, page: u32, per_page: u32) -> Result<FileListResponse, ClientError>;

    async fn get_file(&self, id: &str) -> Result<FileInfo, ClientError>;

    async fn update_file(&self, id: &str, upload: PdfUpload) -> Result<FileInfo, ClientError>;

    async fn delete_file(&self, id: &str) -> Result<DeleteResponse, ClientError>;

    async fn health(&self) -> Result<HealthResponse, ClientError>;
}

/// HTTP implementation of [`FileApi`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `{base}/files/{id}` with `id` encoded as a single path segment.
    fn file_url(&self, id: &str) -> Result<Url, ClientError> {
        let base = self.config.endpoint("/files");
        let mut url = Url::parse(&base)
            .map_err(|e| ClientError::InvalidConfig(format!("bad base URL '{base}': {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidConfig(format!("base URL '{base}' cannot take a path")))?
            .push(id);
        Ok(url)
    }

    fn file_form(upload: PdfUpload) -> Result<Form, ClientError> {
        let filename = upload.filename().to_string();
        let mime = upload.mime().to_string();
        let part = Part::bytes(upload.into_bytes())
            .file_name(filename)
            .mime_str(&mime)?;
        Ok(Form::new().part("file", part))
    }

    /// Send `request` and decode a JSON body, mapping failures to [`ClientError`].
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> Result<T, ClientError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout {
                    url: url.to_string(),
                    secs: self.config.timeout_secs,
                }
            } else {
                ClientError::Http(e)
            }
        })?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<ApiErrorBody>(&body)
                .ok()
                .map(|b| b.detail);
            debug!(status = status.as_u16(), ?detail, "{} failed", url);
            return Err(ClientError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        serde_json::from_slice(&body).map_err(|e| ClientError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl FileApi for ApiClient {
    async fn upload_pdf(&self, upload: PdfUpload) -> Result<UploadResponse, ClientError> {
        let url = self.config.endpoint("/upload");
        info!("Uploading '{}' ({} bytes)", upload.filename(), upload.size());
        let form = Self::file_form(upload)?;
        self.send(self.http.post(&url).multipart(form), &url).await
    }

    async fn list_files(&self, page: u32, per_page: u32) -> Result<FileListResponse, ClientError> {
        let url = self.config.endpoint("/files");
        debug!(page, per_page, "Listing files");
        let request = self
            .http
            .get(&url)
            .query(&[("page", page), ("per_page", per_page)]);
        self.send(request, &url).await
    }

    async fn get_file(&self, id: &str) -> Result<FileInfo, ClientError> {
        let url = self.file_url(id)?;
        debug!("Fetching file {}", id);
        self.send(self.http.get(url.clone()), url.as_str()).await
    }

    async fn update_file(&self, id: &str, upload: PdfUpload) -> Result<FileInfo, ClientError> {
        let url = self.file_url(id)?;
        info!(
            "Replacing file {} with '{}' ({} bytes)",
            id,
            upload.filename(),
            upload.size()
        );
        let form = Self::file_form(upload)?;
        self.send(self.http.put(url.clone()).multipart(form), url.as_str())
            .await
    }

    async fn delete_file(&self, id: &str) -> Result<DeleteResponse, ClientError> {
        let url = self.file_url(id)?;
        info!("Deleting file {}", id);
        self.send(self.http.delete(url.clone()), url.as_str()).await
    }

    async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = self.config.endpoint("/health");
        self.send(self.http.get(&url), &url).await
    }
}
