//! Async driver for the file-list state machine.
//!
//! [`FileListController`] feeds user actions into [`FileListState`], performs
//! the returned [`Effect`]s against a [`FileApi`], and feeds each outcome
//! back in until no effects remain. The controller owns its state; all
//! methods take `&mut self`, so there is no locking.

use crate::client::FileApi;
use crate::error::{MSG_DELETE_FAILED, MSG_DETAIL_FAILED, MSG_LIST_FAILED};
use crate::layout::page_size::PageSizeConfig;
use crate::model::FileInfo;
use crate::observer::{NoopObserver, SharedObserver};
use crate::state::{Effect, Event, FileListState};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// Prompt shown before a file is deleted.
pub const MSG_CONFIRM_DELETE: &str = "このファイルを削除してもよろしいですか？";

/// Blocking yes/no prompt.
pub trait Confirm: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// Drives the paginated file list against a [`FileApi`].
pub struct FileListController<A> {
    api: A,
    state: FileListState,
    page_size: PageSizeConfig,
    observer: SharedObserver,
}

impl<A: FileApi> FileListController<A> {
    /// Page size is derived from `viewport_height` using `page_size`.
    pub fn new(api: A, page_size: PageSizeConfig, viewport_height: u32) -> Self {
        let items_per_page = page_size.items_for(viewport_height);
        Self {
            api,
            state: FileListState::new(items_per_page),
            page_size,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: SharedObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn state(&self) -> &FileListState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Initial load of the current page.
    pub async fn mount(&mut self) {
        self.dispatch(Event::Mounted).await;
    }

    /// Fetch `page` with the current page size.
    pub async fn fetch_files(&mut self, page: u32) {
        self.dispatch(Event::FetchRequested(page)).await;
    }

    /// Reload the current page.
    pub async fn refresh(&mut self) {
        self.dispatch(Event::Refresh).await;
    }

    /// Move to `page` if it is within range; otherwise drop the request.
    ///
    /// Returns whether the page was accepted.
    pub async fn handle_page_change(&mut self, page: u32) -> bool {
        let valid = page >= 1 && self.state.max_page().is_none_or(|max| page <= max);
        self.dispatch(Event::PageRequested(page)).await;
        if !valid {
            self.observer.on_page_rejected(page);
        }
        valid
    }

    /// Apply a new page size (normally from the page-size calculator).
    pub async fn set_items_per_page(&mut self, items_per_page: u32) {
        self.dispatch(Event::ItemsPerPageChanged(items_per_page)).await;
    }

    /// Recompute the page size for a settled viewport height.
    pub async fn handle_viewport_height(&mut self, height: u32) {
        let items = self.page_size.items_for(height);
        self.set_items_per_page(items).await;
    }

    /// Apply the latest height from a viewport tracker if it changed.
    ///
    /// Returns `true` when a new height was applied.
    pub async fn sync_viewport(&mut self, heights: &mut watch::Receiver<u32>) -> bool {
        if !heights.has_changed().unwrap_or(false) {
            return false;
        }
        let height = *heights.borrow_and_update();
        self.handle_viewport_height(height).await;
        true
    }

    /// Ask for confirmation, then delete `id` and refetch.
    ///
    /// Returns `false` when the user declined or the delete failed.
    pub async fn handle_delete_file(&mut self, id: &str, confirm: &dyn Confirm) -> bool {
        if !confirm.confirm(MSG_CONFIRM_DELETE) {
            debug!("Delete of {} cancelled", id);
            return false;
        }
        let outcomes = self.dispatch(Event::DeleteConfirmed(id.to_string())).await;
        outcomes
            .iter()
            .any(|e| matches!(e, Event::DeleteSucceeded(deleted) if deleted == id))
    }

    /// Fetch a file's Markdown for the detail view.
    ///
    /// On failure the error banner is set and `None` is returned.
    pub async fn view_file(&mut self, id: &str) -> Option<FileInfo> {
        match self.api.get_file(id).await {
            Ok(info) => Some(info),
            Err(e) => {
                let message = e.user_message(MSG_DETAIL_FAILED);
                self.dispatch(Event::ErrorRaised(message)).await;
                None
            }
        }
    }

    /// Apply `event`, then run effects until none remain.
    ///
    /// The observer sees the state after every transition, before the
    /// effects it requested are awaited, so in-flight states (a loading
    /// list, a row being deleted) are published.
    ///
    /// Returns the outcome events produced by the effects, in order.
    async fn dispatch(&mut self, event: Event) -> Vec<Event> {
        let mut outcomes = Vec::new();
        let mut queue: VecDeque<Effect> = self.state.apply(event).into();
        self.observer.on_state_changed(&self.state);
        while let Some(effect) = queue.pop_front() {
            let outcome = self.run(effect).await;
            if let Event::FetchSucceeded { seq, response, .. } = &outcome {
                if *seq == self.state.last_seq() {
                    self.observer.on_fetch_complete(response);
                }
            }
            queue.extend(self.state.apply(outcome.clone()));
            self.observer.on_state_changed(&self.state);
            outcomes.push(outcome);
        }
        outcomes
    }

    async fn run(&self, effect: Effect) -> Event {
        match effect {
            Effect::Fetch {
                seq,
                page,
                per_page,
            } => {
                self.observer.on_fetch_start(page, per_page);
                match self.api.list_files(page, per_page).await {
                    Ok(response) => {
                        debug!(
                            page = response.page,
                            rows = response.files.len(),
                            total = response.total_count,
                            "list fetched"
                        );
                        Event::FetchSucceeded {
                            seq,
                            requested_page: page,
                            response,
                        }
                    }
                    Err(e) => {
                        let message = e.user_message(MSG_LIST_FAILED);
                        self.observer.on_fetch_error(&message);
                        Event::FetchFailed { seq, message }
                    }
                }
            }
            Effect::Delete { id } => {
                self.observer.on_delete_start(&id);
                match self.api.delete_file(&id).await {
                    Ok(resp) => {
                        info!("Deleted {}: {}", id, resp.message);
                        self.observer.on_delete_complete(&id, true);
                        Event::DeleteSucceeded(id)
                    }
                    Err(e) => {
                        self.observer.on_delete_complete(&id, false);
                        Event::DeleteFailed {
                            message: e.user_message(MSG_DELETE_FAILED),
                            id,
                        }
                    }
                }
            }
        }
    }
}
