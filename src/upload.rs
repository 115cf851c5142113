//! Uploading a new PDF for conversion.
//!
//! The service converts synchronously: `POST /upload` returns only once the
//! Markdown is ready. [`UploadSession`] tracks that single request through
//! [`UploadState`].

use crate::client::FileApi;
use crate::config::ClientConfig;
use crate::detail::{markdown_file_name, write_markdown};
use crate::error::{ClientError, MSG_UPLOAD_FAILED};
use crate::model::UploadResponse;
use crate::validate::{validate_upload, PdfUpload, UploadKind};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Progress of one upload.
///
/// Loading, failure and success are mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UploadState {
    #[default]
    Idle,
    Loading,
    Failed(String),
    Done(UploadResponse),
}

impl UploadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, UploadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            UploadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&UploadResponse> {
        match self {
            UploadState::Done(resp) => Some(resp),
            _ => None,
        }
    }
}

/// Validate `upload` and send it. No request is made if validation fails.
pub async fn upload_pdf<A>(
    api: &A,
    config: &ClientConfig,
    upload: PdfUpload,
) -> Result<UploadResponse, ClientError>
where
    A: FileApi + ?Sized,
{
    validate_upload(&upload, UploadKind::Upload, config)?;
    api.upload_pdf(upload).await
}

/// One upload form: accepts a file, shows progress, then the result.
#[derive(Debug, Default)]
pub struct UploadSession {
    state: UploadState,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    /// The drop zone is disabled while a conversion runs.
    pub fn accepts_input(&self) -> bool {
        !self.state.is_loading()
    }

    /// Validate `file` and enter [`UploadState::Loading`].
    ///
    /// A file rejected by local validation returns `Err` and leaves the state
    /// untouched; the caller shows the message as a blocking alert. While
    /// loading, [`Self::accepts_input`] is false until [`Self::finish`].
    pub fn begin(&mut self, config: &ClientConfig, file: &PdfUpload) -> Result<(), ClientError> {
        validate_upload(file, UploadKind::Upload, config)?;
        self.state = UploadState::Loading;
        Ok(())
    }

    /// Record the server's answer for the upload started by [`Self::begin`].
    pub fn finish(&mut self, result: Result<UploadResponse, ClientError>) {
        self.state = match result {
            Ok(resp) => {
                info!("Converted {}", resp.id);
                UploadState::Done(resp)
            }
            Err(e) => {
                warn!("Upload failed: {}", e);
                UploadState::Failed(e.user_message(MSG_UPLOAD_FAILED))
            }
        };
    }

    /// [`Self::begin`], send `file`, then [`Self::finish`].
    ///
    /// Server and transport failures are recorded as
    /// [`UploadState::Failed`] and return `Ok(())`.
    pub async fn upload<A>(
        &mut self,
        api: &A,
        config: &ClientConfig,
        file: PdfUpload,
    ) -> Result<(), ClientError>
    where
        A: FileApi + ?Sized,
    {
        self.begin(config, &file)?;
        let result = api.upload_pdf(file).await;
        self.finish(result);
        Ok(())
    }

    /// Clear the result to start another upload.
    pub fn reset(&mut self) {
        self.state = UploadState::Idle;
    }
}

/// File name offered when saving an upload result.
///
/// Fails when the server-assigned id is not a plain file name.
pub fn download_name(resp: &UploadResponse) -> Result<String, ClientError> {
    markdown_file_name("converted-", &resp.id)
}

/// Write the converted Markdown into `dir` and return the file path.
pub async fn save_markdown(resp: &UploadResponse, dir: &Path) -> Result<PathBuf, ClientError> {
    let path = dir.join(download_name(resp)?);
    write_markdown(&path, &resp.markdown).await?;
    Ok(path)
}
