//! Viewport-driven list sizing.
//!
//! Each submodule is a leaf that the file-list controller consumes. None of
//! them performs I/O; only [`debounce`] spawns a task.
//!
//! ## Data Flow
//!
//! ```text
//! resize ──▶ debounce ──▶ viewport ──▶ page_size ──▶ controller ──▶ page_window
//! (height)   (150 ms)     (available)  (rows/page)   (fetch)        (buttons)
//! ```
//!
//! 1. [`debounce`]   : coalesce bursts of resize events, trailing edge only
//! 2. [`viewport`]   : track the latest height and derive usable content height
//! 3. [`page_size`]  : how many rows fit, clamped to `[min, max]`
//! 4. [`page_window`]: which page buttons to show, with ellipsis truncation

pub mod debounce;
pub mod page_size;
pub mod page_window;
pub mod viewport;
