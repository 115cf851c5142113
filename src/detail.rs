//! Detail view of one converted file: its Markdown, replacing the source
//! PDF, and saving the Markdown to disk.

use crate::client::FileApi;
use crate::config::ClientConfig;
use crate::error::{ClientError, MSG_UPDATE_FAILED};
use crate::model::FileInfo;
use crate::validate::{validate_upload, PdfUpload, UploadKind};
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

/// Which rendering of the Markdown is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Preview,
    Raw,
}

/// State of an open detail view.
#[derive(Debug, Clone)]
pub struct FileDetail {
    file: FileInfo,
    tab: DetailTab,
    is_updating: bool,
    update_error: Option<String>,
}

impl FileDetail {
    pub fn new(file: FileInfo) -> Self {
        Self {
            file,
            tab: DetailTab::default(),
            is_updating: false,
            update_error: None,
        }
    }

    pub fn file(&self) -> &FileInfo {
        &self.file
    }

    pub fn markdown(&self) -> &str {
        &self.file.markdown
    }

    pub fn tab(&self) -> DetailTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: DetailTab) {
        self.tab = tab;
    }

    pub fn is_updating(&self) -> bool {
        self.is_updating
    }

    pub fn update_error(&self) -> Option<&str> {
        self.update_error.as_deref()
    }

    /// Point the view at another file, clearing any previous error.
    pub fn replace(&mut self, file: FileInfo) {
        self.file = file;
        self.update_error = None;
    }

    /// Validate `upload` and mark the view as updating.
    ///
    /// Returns `false` and records the message in [`Self::update_error`]
    /// when the file is rejected locally.
    pub fn begin_update(&mut self, config: &ClientConfig, upload: &PdfUpload) -> bool {
        if let Err(e) = validate_upload(upload, UploadKind::Update, config) {
            self.update_error = Some(e.user_message(MSG_UPDATE_FAILED));
            return false;
        }
        self.is_updating = true;
        self.update_error = None;
        true
    }

    /// Record the server's answer for the update started by
    /// [`Self::begin_update`]. Returns the updated file on success.
    pub fn finish_update(&mut self, result: Result<FileInfo, ClientError>) -> Option<&FileInfo> {
        self.is_updating = false;
        match result {
            Ok(updated) => {
                info!("Updated file {}", updated.id);
                self.file = updated;
                Some(&self.file)
            }
            Err(e) => {
                warn!("Update of {} failed: {}", self.file.id, e);
                self.update_error = Some(e.user_message(MSG_UPDATE_FAILED));
                None
            }
        }
    }

    /// Replace the source PDF of this file and reconvert it.
    ///
    /// Returns the updated file on success, so the caller can refresh the
    /// list. Validation and server failures are recorded in
    /// [`Self::update_error`] and return `None`.
    pub async fn update<A>(
        &mut self,
        api: &A,
        config: &ClientConfig,
        upload: PdfUpload,
    ) -> Option<&FileInfo>
    where
        A: FileApi + ?Sized,
    {
        if !self.begin_update(config, &upload) {
            return None;
        }
        let result = api.update_file(&self.file.id, upload).await;
        self.finish_update(result)
    }

    /// File name offered when saving the Markdown.
    ///
    /// Fails when the server-assigned id is not a plain file name.
    pub fn download_name(&self) -> Result<String, ClientError> {
        markdown_file_name("", &self.file.id)
    }

    /// Write the Markdown into `dir` and return the file path.
    pub async fn save_markdown(&self, dir: &Path) -> Result<PathBuf, ClientError> {
        let path = dir.join(self.download_name()?);
        write_markdown(&path, &self.file.markdown).await?;
        Ok(path)
    }
}

/// `{prefix}{id}.md`, provided `id` names a single file inside the
/// target directory.
pub(crate) fn markdown_file_name(prefix: &str, id: &str) -> Result<String, ClientError> {
    let single_component = matches!(
        Path::new(id).components().collect::<Vec<_>>().as_slice(),
        [Component::Normal(_)]
    );
    if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") || !single_component {
        warn!("Refusing to use file id {:?} as a file name", id);
        return Err(ClientError::UnsafeFileId { id: id.to_string() });
    }
    Ok(format!("{prefix}{id}.md"))
}

pub(crate) async fn write_markdown(path: &Path, markdown: &str) -> Result<(), ClientError> {
    tokio::fs::write(path, markdown)
        .await
        .map_err(|source| ClientError::OutputWriteFailed {
            path: path.to_path_buf(),
            source,
        })?;
    info!("Wrote {}", path.display());
    Ok(())
}
