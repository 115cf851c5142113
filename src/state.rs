//! File-list state machine.
//!
//! All list, pagination and deletion state lives in [`FileListState`] and
//! changes only through [`FileListState::apply`]. Side effects are returned
//! as [`Effect`] values for a driver (see [`crate::controller`]) to perform;
//! their outcomes come back as events. This keeps re-clamping and refetch
//! triggers testable without any I/O.
//!
//! ```text
//!            Mounted / PageRequested / ItemsPerPageChanged / Refresh
//!   Idle ───────────────────────────────▶ Loading ──FetchSucceeded──▶ Loaded
//!                                           │  ▲                        │
//!                                FetchFailed│  └────── any refetch ─────┘
//!                                           ▼
//!                                         Error
//! ```
//!
//! Every fetch carries a sequence token. A response whose token is not the
//! latest one issued is discarded, so a slow response for an old page can
//! never overwrite a newer one.

use crate::layout::page_window::total_pages;
use crate::model::FileListResponse;
use tracing::{debug, warn};

/// Coarse phase of the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A fetch is in flight. A previous list may still be shown.
    Loading,
    Loaded,
    /// The latest fetch failed. A previous list may still be shown.
    Error,
}

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The view appeared; load the current page.
    Mounted,
    /// The responsive page size changed.
    ItemsPerPageChanged(u32),
    /// The user asked for a page. Dropped when out of range.
    PageRequested(u32),
    /// Fetch a specific page without range validation.
    FetchRequested(u32),
    /// Reload the current page.
    Refresh,
    FetchSucceeded {
        seq: u64,
        requested_page: u32,
        response: FileListResponse,
    },
    FetchFailed {
        seq: u64,
        message: String,
    },
    /// The user confirmed deletion of a file.
    DeleteConfirmed(String),
    DeleteSucceeded(String),
    DeleteFailed {
        id: String,
        message: String,
    },
    /// Show an error banner raised outside the list cycle (e.g. detail fetch).
    ErrorRaised(String),
}

/// Side effects requested by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch { seq: u64, page: u32, per_page: u32 },
    Delete { id: String },
}

/// List, pagination and deletion state of the file-list view.
#[derive(Debug, Clone, PartialEq)]
pub struct FileListState {
    phase: Phase,
    files: Option<FileListResponse>,
    error: Option<String>,
    current_page: u32,
    items_per_page: u32,
    deleting_file_id: Option<String>,
    last_seq: u64,
}

impl FileListState {
    pub fn new(items_per_page: u32) -> Self {
        Self {
            phase: Phase::Idle,
            files: None,
            error: None,
            current_page: 1,
            items_per_page: items_per_page.max(1),
            deleting_file_id: None,
            last_seq: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn files(&self) -> Option<&FileListResponse> {
        self.files.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn items_per_page(&self) -> u32 {
        self.items_per_page
    }

    pub fn deleting_file_id(&self) -> Option<&str> {
        self.deleting_file_id.as_deref()
    }

    /// Sequence token of the most recently issued fetch.
    pub fn last_seq(&self) -> u64 {
        self.last_seq
    }

    /// Highest valid page, once a list is known.
    pub fn max_page(&self) -> Option<u32> {
        self.files
            .as_ref()
            .map(|f| total_pages(f.total_count, self.items_per_page))
    }

    /// Apply `event` and return the effects it requests.
    pub fn apply(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Mounted | Event::Refresh => vec![self.issue_fetch()],

            Event::ItemsPerPageChanged(n) => {
                let n = n.max(1);
                if n == self.items_per_page {
                    return Vec::new();
                }
                debug!(from = self.items_per_page, to = n, "items per page changed");
                self.items_per_page = n;
                self.clamp_current_page();
                vec![self.issue_fetch()]
            }

            Event::PageRequested(page) => {
                let in_range = page >= 1 && self.max_page().is_none_or(|max| page <= max);
                if !in_range {
                    warn!(page, max = ?self.max_page(), "Invalid page number, ignoring");
                    return Vec::new();
                }
                if page == self.current_page {
                    return Vec::new();
                }
                self.current_page = page;
                vec![self.issue_fetch()]
            }

            Event::FetchRequested(page) => {
                self.current_page = page.max(1);
                vec![self.issue_fetch()]
            }

            Event::FetchSucceeded {
                seq,
                requested_page,
                response,
            } => {
                if seq != self.last_seq {
                    debug!(seq, latest = self.last_seq, "discarding stale list response");
                    return Vec::new();
                }
                if response.page != requested_page {
                    warn!(
                        "Page mismatch: requested {}, got {}",
                        requested_page, response.page
                    );
                }
                self.current_page = response.page.max(1);
                self.files = Some(response);
                self.phase = Phase::Loaded;

                if self.clamp_current_page() {
                    vec![self.issue_fetch()]
                } else {
                    Vec::new()
                }
            }

            Event::FetchFailed { seq, message } => {
                if seq != self.last_seq {
                    debug!(seq, latest = self.last_seq, "discarding stale list failure");
                    return Vec::new();
                }
                self.phase = Phase::Error;
                self.error = Some(message);
                Vec::new()
            }

            Event::DeleteConfirmed(id) => {
                if let Some(busy) = &self.deleting_file_id {
                    warn!(requested = %id, in_flight = %busy, "delete already in flight, ignoring");
                    return Vec::new();
                }
                self.deleting_file_id = Some(id.clone());
                vec![Effect::Delete { id }]
            }

            Event::DeleteSucceeded(id) => {
                self.finish_delete(&id);
                let last_on_page = self.files.as_ref().is_some_and(|f| f.files.len() == 1);
                if last_on_page && self.current_page > 1 {
                    self.current_page -= 1;
                }
                vec![self.issue_fetch()]
            }

            Event::DeleteFailed { id, message } => {
                self.finish_delete(&id);
                self.error = Some(message);
                Vec::new()
            }

            Event::ErrorRaised(message) => {
                self.error = Some(message);
                Vec::new()
            }
        }
    }

    fn issue_fetch(&mut self) -> Effect {
        self.last_seq += 1;
        self.phase = Phase::Loading;
        self.error = None;
        Effect::Fetch {
            seq: self.last_seq,
            page: self.current_page,
            per_page: self.items_per_page,
        }
    }

    /// Pull `current_page` back into range. Returns `true` if it moved.
    fn clamp_current_page(&mut self) -> bool {
        let Some(files) = &self.files else {
            return false;
        };
        if files.total_count == 0 {
            return false;
        }
        let max = total_pages(files.total_count, self.items_per_page).max(1);
        if self.current_page > max {
            debug!(from = self.current_page, to = max, "clamping current page");
            self.current_page = max;
            return true;
        }
        false
    }

    fn finish_delete(&mut self, id: &str) {
        if self.deleting_file_id.as_deref() == Some(id) {
            self.deleting_file_id = None;
        }
    }
}

/// Functional form of [`FileListState::apply`].
pub fn reduce(mut state: FileListState, event: Event) -> (FileListState, Vec<Effect>) {
    let effects = state.apply(event);
    (state, effects)
}
