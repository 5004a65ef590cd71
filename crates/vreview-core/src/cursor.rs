//! Session cursor: current page and in-page focus.
//!
//! Every transition is a synchronous pure function of the cursor and one
//! navigation event; out-of-range requests clamp (pages) or are ignored (focus).

use vreview_models::{ItemId, SearchHit};

/// Page navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn delta(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// `ceil(catalog_size / page_size)`; zero for an empty catalog.
pub fn total_pages(catalog_size: usize, page_size: usize) -> u32 {
    if catalog_size == 0 || page_size == 0 {
        return 0;
    }
    catalog_size.div_ceil(page_size).min(u32::MAX as usize) as u32
}

/// `max(0, min(requested, total_pages - 1))`; zero when there are no pages.
pub fn clamp_page(requested: i64, total_pages: u32) -> u32 {
    let last = i64::from(total_pages) - 1;
    requested.min(last).max(0) as u32
}

/// First catalog entry containing `query` (case-insensitive), as page + slot.
pub fn find_page_for_identifier(catalog: &[ItemId], query: &str, page_size: usize) -> Option<SearchHit> {
    if query.trim().is_empty() || page_size == 0 {
        return None;
    }
    let query = query.to_lowercase();
    catalog
        .iter()
        .position(|id| id.matches(&query))
        .map(|pos| SearchHit {
            page: (pos / page_size) as u32,
            index: pos % page_size,
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCursor {
    current_page: u32,
    focused_index: usize,
    page_size: usize,
    total_pages: u32,
}

impl SessionCursor {
    /// Cursor positioned at `last_page`, clamped to the current catalog.
    pub fn new(catalog_size: usize, page_size: usize, last_page: i64) -> Self {
        let total_pages = total_pages(catalog_size, page_size);
        Self {
            current_page: clamp_page(last_page, total_pages),
            focused_index: 0,
            page_size,
            total_pages,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn focused_index(&self) -> usize {
        self.focused_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Move one page forward or back, clamped. Focus resets to the first slot.
    pub fn advance(&mut self, direction: Direction) -> u32 {
        self.go_to(i64::from(self.current_page) + direction.delta())
    }

    /// Jump to `requested`, clamped. Focus resets to the first slot.
    pub fn go_to(&mut self, requested: i64) -> u32 {
        self.current_page = clamp_page(requested, self.total_pages);
        self.focused_index = 0;
        self.current_page
    }

    /// Focus slot `index` of the current page; out-of-range requests are ignored.
    pub fn focus(&mut self, index: usize) -> bool {
        if index < self.page_size {
            self.focused_index = index;
            true
        } else {
            false
        }
    }

    /// Move to a search hit and focus its slot.
    pub fn jump_to(&mut self, hit: SearchHit) {
        self.go_to(i64::from(hit.page));
        self.focus(hit.index);
    }

    /// Catalog index range covered by the current page.
    pub fn page_range(&self, catalog_size: usize) -> std::ops::Range<usize> {
        page_range(self.current_page, self.page_size, catalog_size)
    }
}

/// Catalog index range covered by `page`.
pub fn page_range(page: u32, page_size: usize, catalog_size: usize) -> std::ops::Range<usize> {
    let start = (page as usize).saturating_mul(page_size).min(catalog_size);
    let end = start.saturating_add(page_size).min(catalog_size);
    start..end
}
