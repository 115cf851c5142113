//! Error types for the pdf2md-client library.
//!
//! Failures fall into three groups, and callers treat them differently:
//!
//! * **Validation**: the file was rejected locally (wrong type, too large,
//!   unreadable). No request was sent. [`ClientError::is_validation`] is true.
//!
//! * **API / transport**: the request was sent and failed. The server's
//!   `detail` text is kept verbatim so it can be shown to the user as-is.
//!
//! * **Navigation**: an invalid page number. These never become a
//!   `ClientError`; the controller logs and drops them.
//!
//! Nothing here is fatal to a session: every error resolves to an idle,
//! retryable state.

use std::path::PathBuf;
use thiserror::Error;

/// Shown when a non-PDF file is offered for upload or update.
pub const MSG_NOT_A_PDF: &str = "PDFファイルのみアップロード可能です。";
/// Shown when a file exceeds the upload size limit.
pub const MSG_FILE_TOO_LARGE: &str = "ファイルサイズは10MB以下である必要があります。";
/// Fallback for a failed list fetch.
pub const MSG_LIST_FAILED: &str = "ファイル一覧の取得に失敗しました";
/// Fallback for a failed detail fetch.
pub const MSG_DETAIL_FAILED: &str = "ファイル詳細の取得に失敗しました";
/// Fallback for a failed delete.
pub const MSG_DELETE_FAILED: &str = "ファイルの削除に失敗しました";
/// Fallback for a failed upload.
pub const MSG_UPLOAD_FAILED: &str = "アップロードに失敗しました。";
/// Fallback for a failed update.
pub const MSG_UPDATE_FAILED: &str = "ファイルの更新に失敗しました。";

/// All errors returned by the pdf2md-client library.
#[derive(Debug, Error)]
pub enum ClientError {
    // ── Validation errors ─────────────────────────────────────────────────
    /// The file is not a PDF (by extension/MIME type or magic bytes).
    #[error("{} ('{filename}' is {mime})", MSG_NOT_A_PDF)]
    NotAPdf { filename: String, mime: String },

    /// The file is larger than the configured upload limit.
    #[error("{} ('{filename}' is {size} bytes, limit {limit})", MSG_FILE_TOO_LARGE)]
    FileTooLarge {
        filename: String,
        size: u64,
        limit: u64,
    },

    /// Local file to upload was not found.
    #[error("File not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Local file exists but could not be read.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── API errors ────────────────────────────────────────────────────────
    /// The server answered with a non-2xx status.
    ///
    /// `detail` is the `detail` field of the JSON error body when present.
    #[error("API error (HTTP {status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },

    // ── Transport errors ──────────────────────────────────────────────────
    /// The request could not be sent or the connection failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The request exceeded the configured timeout.
    #[error("Request to '{url}' timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    /// A 2xx response body could not be decoded.
    #[error("Unexpected response from '{url}': {reason}")]
    Decode { url: String, reason: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// A file id cannot be used as a file name (empty, `..`, or a path
    /// separator). Nothing was written.
    #[error("File id '{id}' is not a valid file name")]
    UnsafeFileId { id: String },

    /// Could not write a Markdown file to disk.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    /// True when the error was raised before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ClientError::NotAPdf { .. }
                | ClientError::FileTooLarge { .. }
                | ClientError::FileNotFound { .. }
                | ClientError::ReadFailed { .. }
        )
    }

    /// The server's `detail` text, if this is an API error that carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text to show the user for this error.
    ///
    /// Validation errors carry their own message, API errors show the
    /// server's `detail` verbatim, everything else shows `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::NotAPdf { .. } => MSG_NOT_A_PDF.to_string(),
            ClientError::FileTooLarge { .. } => MSG_FILE_TOO_LARGE.to_string(),
            ClientError::Api {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => fallback.to_string(),
        }
    }
}
