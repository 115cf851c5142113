//! Wire types exchanged with the conversion service.
//!
//! Every type here is an immutable snapshot of what the server sent. The
//! file list is replaced wholesale on each fetch; nothing is patched in place.

use serde::{Deserialize, Serialize};

/// Processing state of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Processing,
    Completed,
    Failed,
    /// Any status string this client does not know.
    #[serde(other)]
    Unknown,
}

impl FileStatus {
    /// Only completed files have Markdown worth opening.
    pub fn is_viewable(self) -> bool {
        self == FileStatus::Completed
    }
}

/// One row of the paginated file list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileListItem {
    pub id: String,
    pub filename: String,
    pub status: FileStatus,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Size of the original PDF in bytes.
    pub file_size: u64,
    /// Conversion wall-clock time in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
}

/// One page of the file list as returned by `GET /files`.
///
/// `files.len() <= per_page` holds for any well-behaved server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileListResponse {
    pub files: Vec<FileListItem>,
    pub total_count: u64,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    10
}

impl FileListResponse {
    /// Number of pages needed to show `total_count` rows at `items_per_page`.
    pub fn total_pages(&self, items_per_page: u32) -> u32 {
        crate::layout::page_window::total_pages(self.total_count, items_per_page)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// A converted file with its Markdown, from `GET /files/{id}` or `PUT /files/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub markdown: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Result of `POST /upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub markdown: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<FileStatus>,
}

/// Result of `DELETE /files/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Result of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Server uptime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<f64>,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_response_deserializes_server_payload() {
        let json = r#"{
            "files": [
                {"id": "a1b2c3d4-0000", "filename": "report.pdf", "status": "completed",
                 "created_at": "2025-06-01T10:00:00", "file_size": 2048, "processing_time": 1.5},
                {"id": "e5f6-0001", "filename": "draft.pdf", "status": "processing",
                 "created_at": "2025-06-01T11:00:00", "file_size": 10}
            ],
            "total_count": 12,
            "page": 2,
            "per_page": 2
        }"#;
        let resp: FileListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.files.len(), 2);
        assert_eq!(resp.files[0].status, FileStatus::Completed);
        assert_eq!(resp.files[1].processing_time, None);
        assert_eq!(resp.total_pages(2), 6);
        assert_eq!(resp.total_pages(5), 3);
    }

    #[test]
    fn unknown_status_is_tolerated() {
        let item: FileListItem = serde_json::from_str(
            r#"{"id":"x","filename":"x.pdf","status":"queued","created_at":"now","file_size":0}"#,
        )
        .unwrap();
        assert_eq!(item.status, FileStatus::Unknown);
        assert!(!item.status.is_viewable());
    }

    #[test]
    fn upload_response_accepts_minimal_body() {
        let resp: UploadResponse =
            serde_json::from_str(r##"{"id":"abc","markdown":"# Title"}"##).unwrap();
        assert_eq!(resp.id, "abc");
        assert!(resp.filename.is_none());
    }
}
