//! Responsive page size: how many list rows fit in the viewport.
//!
//! The fixed chrome height is a sum of named layout regions rather than a
//! measurement. If the surrounding layout changes, [`ChromeLayout`] has to
//! be updated by hand or the row count drifts.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Heights of every fixed region around the list, in the same unit as the
/// viewport height (pixels for the web layout, rows for a terminal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromeLayout {
    pub main_padding: u32,
    pub title: u32,
    pub description: u32,
    pub header_button: u32,
    pub header_spacing: u32,
    pub section_spacing: u32,
    pub card_header: u32,
    pub card_padding: u32,
    pub pagination: u32,
    pub pagination_margin: u32,
    /// Reserved for the error banner; zero while it is hidden.
    pub error_area: u32,
    pub safety_margin: u32,
}

impl Default for ChromeLayout {
    fn default() -> Self {
        Self {
            main_padding: 64,
            title: 42,
            description: 24,
            header_button: 36,
            header_spacing: 16,
            section_spacing: 24,
            card_header: 56,
            card_padding: 48,
            pagination: 76,
            pagination_margin: 24,
            error_area: 0,
            safety_margin: 20,
        }
    }
}

impl ChromeLayout {
    /// Layout of the terminal list view, in rows.
    pub fn terminal() -> Self {
        Self {
            main_padding: 0,
            title: 1,
            description: 0,
            header_button: 0,
            header_spacing: 0,
            section_spacing: 1,
            card_header: 2,
            card_padding: 0,
            pagination: 2,
            pagination_margin: 0,
            error_area: 1,
            safety_margin: 1,
        }
    }

    /// Total height of all fixed regions.
    pub fn total(&self) -> u32 {
        self.main_padding
            + self.title
            + self.description
            + self.header_button
            + self.header_spacing
            + self.section_spacing
            + self.card_header
            + self.card_padding
            + self.pagination
            + self.pagination_margin
            + self.error_area
            + self.safety_margin
    }
}

/// Bounds and geometry for the responsive page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSizeConfig {
    /// Lower bound on rows per page. Default: 5.
    pub min_items: u32,
    /// Upper bound on rows per page; caps rendering cost. Default: 30.
    pub max_items: u32,
    /// Height of one table row. Default: 72.
    pub item_height: u32,
    pub chrome: ChromeLayout,
}

impl Default for PageSizeConfig {
    fn default() -> Self {
        Self {
            min_items: 5,
            max_items: 30,
            item_height: 72,
            chrome: ChromeLayout::default(),
        }
    }
}

impl PageSizeConfig {
    /// Terminal geometry: one row per item, 5–50 items.
    pub fn terminal() -> Self {
        Self {
            min_items: 5,
            max_items: 50,
            item_height: 1,
            chrome: ChromeLayout::terminal(),
        }
    }

    /// Rows per page for the given viewport height.
    pub fn items_for(&self, viewport_height: u32) -> u32 {
        calculate_items_per_page(
            viewport_height,
            self.chrome.total(),
            self.item_height,
            self.min_items,
            self.max_items,
        )
    }
}

/// Rows that fit in `viewport_height` after `fixed_chrome_height`, clamped
/// to `[min, max]`.
///
/// When fewer than `min` rows fit, `min` is returned anyway and the view is
/// expected to scroll. The result is never below 1.
pub fn calculate_items_per_page(
    viewport_height: u32,
    fixed_chrome_height: u32,
    item_height: u32,
    min: u32,
    max: u32,
) -> u32 {
    let min = min.max(1);
    let max = max.max(min);

    let available = viewport_height.saturating_sub(fixed_chrome_height);
    let raw = available.checked_div(item_height).unwrap_or(max);
    let clamped = raw.clamp(min, max);

    debug!(
        viewport_height,
        fixed_chrome_height,
        available,
        raw,
        clamped,
        "items per page calculated"
    );

    clamped
}
