//! # pdf2md-client
//!
//! Client for a PDF-to-Markdown conversion service: upload a PDF, browse the
//! converted files page by page, open one, replace it, delete it.
//!
//! ## Why a client core?
//!
//! The interesting part of a file browser is not drawing it but keeping its
//! state straight: how many rows fit the window, which page numbers to
//! offer, what to fetch after a resize or a delete, and which of two racing
//! responses to believe. This crate keeps all of that in plain types so a
//! terminal, web or desktop front-end only has to render.
//!
//! ## Architecture
//!
//! ```text
//! resize events
//!  │
//!  ├─ 1. Debounce   coalesce bursts (150 ms, trailing edge)
//!  ├─ 2. Viewport   settled height
//!  ├─ 3. Page size  rows that fit, clamped to [min, max]
//!  ├─ 4. State      reducer: (state, event) → effects
//!  ├─ 5. Controller run effects against the REST client
//!  └─ 6. Observer   render hooks + page window for the footer
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2md_client::{ApiClient, ClientConfig, FileListController};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .base_url("http://localhost:8000")
//!         .build()?;
//!     let api = ApiClient::new(config.clone())?;
//!
//!     let mut list = FileListController::new(api, config.page_size, 1080);
//!     list.mount().await;
//!     if let Some(files) = list.state().files() {
//!         for f in &files.files {
//!             println!("{}  {}", f.id, f.filename);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2md-client` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2md-client = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod controller;
pub mod detail;
pub mod display;
pub mod error;
pub mod layout;
pub mod model;
pub mod observer;
pub mod state;
pub mod upload;
pub mod validate;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::{ApiClient, FileApi};
pub use config::{ClientConfig, ClientConfigBuilder, SizeLimitPolicy};
pub use controller::{Confirm, FileListController, MSG_CONFIRM_DELETE};
pub use detail::{DetailTab, FileDetail};
pub use error::ClientError;
pub use layout::debounce::Debouncer;
pub use layout::page_size::{calculate_items_per_page, ChromeLayout, PageSizeConfig};
pub use layout::page_window::{page_numbers, total_pages, PageItem, PaginationView};
pub use layout::viewport::{ViewportHeight, ViewportTracker};
pub use model::{
    DeleteResponse, FileInfo, FileListItem, FileListResponse, FileStatus, HealthResponse,
    UploadResponse,
};
pub use observer::{FileListObserver, NoopObserver, SharedObserver};
pub use state::{reduce, Effect, Event, FileListState, Phase};
pub use upload::{upload_pdf, UploadSession, UploadState};
pub use validate::{validate_upload, PdfUpload, UploadKind};
