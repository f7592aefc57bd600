//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u64 = 10;
/// Maximum page size.
pub const MAX_PAGE_SIZE: u64 = 100;

/// A 1-based page request, clamped to sane bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

impl PageRequest {
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page: page.max(1),
            size: size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Number of items before this page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// One page of a list plus the totals needed to render a pager.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total: u64,
    pub total_page: u64,
}

impl<T> PageResponse<T> {
    /// Cut the page described by `request` out of the full, ordered list.
    pub fn slice(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(request.size).unwrap_or(usize::MAX))
            .collect();

        Self {
            items,
            page: request.page,
            size: request.size,
            total,
            total_page: total.div_ceil(request.size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_is_clamped() {
        assert_eq!(PageRequest::new(0, 0), PageRequest { page: 1, size: 1 });
        assert_eq!(PageRequest::new(3, 1_000).size, MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(3, 10).offset(), 20);
    }

    #[test]
    fn test_slice() {
        let page = PageResponse::slice((1..=25).collect::<Vec<_>>(), PageRequest::new(3, 10));
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total, 25);
        assert_eq!(page.total_page, 3);

        let past_end = PageResponse::slice(vec![1, 2], PageRequest::new(5, 10));
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total_page, 1);

        let empty = PageResponse::slice(Vec::<u8>::new(), PageRequest::default());
        assert_eq!(empty.total_page, 0);
    }
}
