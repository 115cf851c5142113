//! Local checks run before a file is sent to the service.
//!
//! A file must look like a PDF (declared type and `%PDF` magic bytes) and,
//! where the [`SizeLimitPolicy`](crate::config::SizeLimitPolicy) says so, be
//! no larger than the configured limit. A rejected file never reaches the
//! network.

use crate::config::ClientConfig;
use crate::error::ClientError;
use std::path::Path;
use tracing::debug;

/// The only accepted content type.
pub const PDF_MIME: &str = "application/pdf";

/// Which flow a file is being validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// A new file via `POST /upload`.
    Upload,
    /// A replacement via `PUT /files/{id}`.
    Update,
}

/// A file ready to be sent as the `file` field of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfUpload {
    filename: String,
    mime: String,
    bytes: Vec<u8>,
}

impl PdfUpload {
    /// Content type is derived from the filename's extension.
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let mime = mime_for_filename(&filename).to_string();
        Self {
            filename,
            mime,
            bytes,
        }
    }

    pub fn with_mime(filename: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read a local file.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let bytes = match tokio::fs::read(path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ClientError::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(source) => {
                return Err(ClientError::ReadFailed {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.pdf".to_string());
        debug!("Read {} ({} bytes)", path.display(), bytes.len());
        Ok(Self::new(filename, bytes))
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Content type for a filename, by extension.
pub fn mime_for_filename(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => PDF_MIME,
        "txt" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "html" | "htm" => "text/html",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

/// Reject a file that is not a PDF or is too large for `kind`.
pub fn validate_upload(
    upload: &PdfUpload,
    kind: UploadKind,
    config: &ClientConfig,
) -> Result<(), ClientError> {
    if upload.mime != PDF_MIME {
        return Err(ClientError::NotAPdf {
            filename: upload.filename.clone(),
            mime: upload.mime.clone(),
        });
    }

    if upload.bytes.len() >= 4 && &upload.bytes[..4] != b"%PDF" {
        return Err(ClientError::NotAPdf {
            filename: upload.filename.clone(),
            mime: format!("{} without %PDF header", upload.mime),
        });
    }

    let enforce_size = match kind {
        UploadKind::Upload => config.size_limit.applies_to_upload(),
        UploadKind::Update => config.size_limit.applies_to_update(),
    };
    if enforce_size && upload.size() > config.max_upload_bytes {
        return Err(ClientError::FileTooLarge {
            filename: upload.filename.clone(),
            size: upload.size(),
            limit: config.max_upload_bytes,
        });
    }

    Ok(())
}
