//! Page requests and page envelopes shared by every list endpoint.

use serde::{Deserialize, Serialize};

/// Default page size when the caller does not ask for one.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Largest page size a caller may request.
pub const MAX_PER_PAGE: u32 = 100;

/// Normalized 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Builds a page request, clamping out-of-range values instead of failing.
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }

    /// SQL `LIMIT`.
    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }

    /// SQL `OFFSET`.
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.per_page as i64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus enough metadata to fetch the next.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        let seen = request.offset() as u64 + items.len() as u64;
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
            has_more: seen < total,
        }
    }

    /// Converts the items while keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            has_more: self.has_more,
        }
    }
}

/// Query-string form accepted by list endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl From<PageQuery> for PageRequest {
    fn from(q: PageQuery) -> Self {
        PageRequest::new(q.page, q.per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let req = PageRequest::default();
        assert_eq!(req.page, 1);
        assert_eq!(req.per_page, DEFAULT_PER_PAGE);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn per_page_is_clamped() {
        assert_eq!(PageRequest::new(Some(0), Some(500)).per_page, MAX_PER_PAGE);
        assert_eq!(PageRequest::new(Some(0), Some(0)).per_page, 1);
        assert_eq!(PageRequest::new(Some(0), None).page, 1);
    }

    #[test]
    fn has_more_reflects_remaining_rows() {
        let req = PageRequest::new(Some(2), Some(10));
        let page = Page::new(vec![0; 10], 25, req);
        assert!(page.has_more);
        let last = Page::new(vec![0; 5], 25, PageRequest::new(Some(3), Some(10)));
        assert!(!last.has_more);
    }
}
