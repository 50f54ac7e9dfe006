//! Response envelope and the canonical pagination cursor
//!
//! Every endpoint wraps its payload as `{ data, message? }`. Paginated list
//! endpoints add either a nested `pagination: { page, limit, total }` object
//! or flat `currentPageNumber` / `pageSize` / `totalPages` fields. Both are
//! folded into [`PageInfo`] here and nowhere else.

use serde::{Deserialize, Serialize};

/// Response wrapper used by every endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    /// The payload, absent on some write endpoints
    pub data: Option<T>,

    /// Human readable status text
    #[serde(default)]
    pub message: Option<String>,

    /// `{ page, limit, total }` shape
    #[serde(default)]
    pub pagination: Option<RawPagination>,

    /// Flat shape: total number of pages
    #[serde(default)]
    pub total_pages: Option<u64>,

    /// Flat shape: page size
    #[serde(default)]
    pub page_size: Option<u64>,

    /// Flat shape: current page (1-based)
    #[serde(default)]
    pub current_page_number: Option<u64>,
}

/// Nested pagination object, `total` counts items
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawPagination {
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl<T> Envelope<T> {
    /// Canonical cursor for this response.
    ///
    /// `requested_page` and `item_count` fill in whatever the server left out.
    pub fn page_info(&self, requested_page: u32, item_count: usize) -> PageInfo {
        if let Some(p) = self.pagination {
            let limit = p.limit.unwrap_or(item_count as u64).max(1);
            let total = p.total.unwrap_or(item_count as u64);
            return PageInfo::from_items(
                p.page.map(clamp_u32).unwrap_or(requested_page),
                clamp_u32(limit),
                total,
            );
        }

        if self.total_pages.is_some() || self.page_size.is_some() || self.current_page_number.is_some() {
            let limit = self.page_size.unwrap_or(item_count as u64).max(1);
            return PageInfo::from_pages(
                self.current_page_number.map(clamp_u32).unwrap_or(requested_page),
                clamp_u32(limit),
                clamp_u32(self.total_pages.unwrap_or(1)),
            );
        }

        PageInfo::single(item_count)
    }
}

fn clamp_u32(v: u64) -> u32 {
    v.min(u32::MAX as u64) as u32
}

/// Canonical pagination cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// Current page, 1-based
    pub page: u32,

    /// Page size reported by the server
    pub limit: u32,

    /// Number of pages, at least 1
    pub total_pages: u32,

    /// Number of items when the endpoint reports it
    pub total_items: Option<u64>,
}

impl Default for PageInfo {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            total_pages: 1,
            total_items: None,
        }
    }
}

impl PageInfo {
    /// Cursor from an item count, pages = ceil(total / limit).
    ///
    /// `page` is clamped into `1..=total_pages`.
    pub fn from_items(page: u32, limit: u32, total_items: u64) -> Self {
        let limit = limit.max(1);
        let total_pages = clamp_u32(total_items.div_ceil(limit as u64).max(1));
        Self {
            page: page.clamp(1, total_pages),
            limit,
            total_pages,
            total_items: Some(total_items),
        }
    }

    /// Cursor from a page count, `page` clamped like [`PageInfo::from_items`]
    pub fn from_pages(page: u32, limit: u32, total_pages: u32) -> Self {
        let total_pages = total_pages.max(1);
        Self {
            page: page.clamp(1, total_pages),
            limit: limit.max(1),
            total_pages,
            total_items: None,
        }
    }

    /// A single unpaginated page
    pub fn single(item_count: usize) -> Self {
        Self {
            page: 1,
            limit: (item_count as u32).max(1),
            total_pages: 1,
            total_items: Some(item_count as u64),
        }
    }

    /// Previous is enabled iff page > 1
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Next is disabled once page >= total pages
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn previous_page(&self) -> Option<u32> {
        self.has_previous().then(|| self.page - 1)
    }

    pub fn next_page(&self) -> Option<u32> {
        self.has_next().then(|| self.page + 1)
    }

    /// "Page N of M"
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages)
    }
}

/// One fetched page of records together with its cursor
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}

impl<T> Page<T> {
    /// Build a page from an envelope whose payload is a list
    pub fn from_envelope(envelope: Envelope<Vec<T>>, requested_page: u32) -> Self {
        let info = envelope.page_info(requested_page, envelope.data.as_ref().map_or(0, Vec::len));
        Self {
            items: envelope.data.unwrap_or_default(),
            info,
        }
    }
}

/// Message-only response used by write endpoints
pub type Ack = Envelope<serde_json::Value>;
