//! Page-number window for the pagination control.
//!
//! With more than [`MAX_VISIBLE_PAGES`] pages, a window of five consecutive
//! pages is shown around the current one, and the first and last pages are
//! pinned at the ends with an ellipsis bridging any gap:
//!
//! ```text
//! current=5, total=10   →   1 … 3 4 5 6 7 … 10
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of the page window.
pub const MAX_VISIBLE_PAGES: u32 = 5;

/// One slot in the rendered page list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageItem::Page(n) => write!(f, "{n}"),
            PageItem::Ellipsis => f.write_str("..."),
        }
    }
}

/// `ceil(total_items / items_per_page)`; zero when either is zero.
pub fn total_pages(total_items: u64, items_per_page: u32) -> u32 {
    if items_per_page == 0 {
        return 0;
    }
    let pages = total_items.div_ceil(u64::from(items_per_page));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Page buttons to render for `current_page` out of `total_pages`.
pub fn page_numbers(current_page: u32, total_pages: u32) -> Vec<PageItem> {
    if total_pages <= MAX_VISIBLE_PAGES {
        return (1..=total_pages).map(PageItem::Page).collect();
    }

    let (start, end) = if current_page <= 3 {
        (1, MAX_VISIBLE_PAGES)
    } else if current_page >= total_pages - 2 {
        (total_pages - 4, total_pages)
    } else {
        (current_page - 2, current_page + 2)
    };

    let mut pages = Vec::with_capacity(7);
    if start > 1 {
        pages.push(PageItem::Page(1));
        if start > 2 {
            pages.push(PageItem::Ellipsis);
        }
    }
    pages.extend((start..=end).map(PageItem::Page));
    if end < total_pages {
        if end < total_pages - 1 {
            pages.push(PageItem::Ellipsis);
        }
        pages.push(PageItem::Page(total_pages));
    }
    pages
}

/// Everything the pagination control needs to render one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    current_page: u32,
    total_items: u64,
    items_per_page: u32,
    total_pages: u32,
}

impl PaginationView {
    /// Returns `None` when there is at most one page; the control is hidden then.
    pub fn new(current_page: u32, total_items: u64, items_per_page: u32) -> Option<Self> {
        let total_pages = total_pages(total_items, items_per_page);
        if total_pages <= 1 {
            return None;
        }
        Some(Self {
            current_page,
            total_items,
            items_per_page,
            total_pages,
        })
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn pages(&self) -> Vec<PageItem> {
        page_numbers(self.current_page, self.total_pages)
    }

    pub fn is_current(&self, item: PageItem) -> bool {
        item == PageItem::Page(self.current_page)
    }

    /// 1-based inclusive range of rows shown on the current page.
    pub fn item_range(&self) -> (u64, u64) {
        let per_page = u64::from(self.items_per_page);
        let current = u64::from(self.current_page.max(1));
        let start = (current - 1) * per_page + 1;
        let end = (current * per_page).min(self.total_items);
        (start, end)
    }

    /// Target of the "previous" button, `None` on the first page.
    pub fn previous(&self) -> Option<u32> {
        let page = self.current_page.checked_sub(1)?;
        self.contains(page).then_some(page)
    }

    /// Target of the "next" button, `None` on the last page.
    pub fn next(&self) -> Option<u32> {
        let page = self.current_page + 1;
        self.contains(page).then_some(page)
    }

    pub fn contains(&self, page: u32) -> bool {
        (1..=self.total_pages).contains(&page)
    }
}
