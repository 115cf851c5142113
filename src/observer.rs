//! Observer hooks for the file-list controller.
//!
//! A front-end implements [`FileListObserver`] to re-render when the list
//! changes, show a spinner while a fetch is in flight, or surface an error
//! banner. All methods have empty default bodies, so implementors override
//! only what they render.
//!
//! # Example
//!
//! ```rust
//! use pdf2md_client::{FileListObserver, FileListState};
//!
//! struct PrintObserver;
//!
//! impl FileListObserver for PrintObserver {
//!     fn on_state_changed(&self, state: &FileListState) {
//!         eprintln!("page {} ({:?})", state.current_page(), state.phase());
//!     }
//! }
//! ```
//!
//! # Thread safety
//!
//! Observers must be `Send + Sync`; the controller may be moved across
//! tasks. Use interior mutability (`Mutex`, atomics) for any counters.

use crate::model::FileListResponse;
use crate::state::FileListState;
use std::sync::Arc;

pub trait FileListObserver: Send + Sync {
    /// A list fetch was sent.
    fn on_fetch_start(&self, page: u32, per_page: u32) {
        let _ = (page, per_page);
    }

    /// The latest fetch succeeded. Not called for discarded stale responses.
    fn on_fetch_complete(&self, response: &FileListResponse) {
        let _ = response;
    }

    /// The latest fetch failed with the given user-facing message.
    fn on_fetch_error(&self, message: &str) {
        let _ = message;
    }

    /// A page request was out of range and dropped.
    fn on_page_rejected(&self, page: u32) {
        let _ = page;
    }

    /// A delete request was sent.
    fn on_delete_start(&self, id: &str) {
        let _ = id;
    }

    /// A delete finished; `ok` is false when it failed.
    fn on_delete_complete(&self, id: &str, ok: bool) {
        let _ = (id, ok);
    }

    /// Called after every state transition, including the ones whose
    /// requests are still in flight (`Phase::Loading`, a row being deleted).
    fn on_state_changed(&self, state: &FileListState) {
        let _ = state;
    }
}

/// Observer that ignores everything. The default.
pub struct NoopObserver;

impl FileListObserver for NoopObserver {}

/// Shared observer handle as stored by the controller.
pub type SharedObserver = Arc<dyn FileListObserver>;
