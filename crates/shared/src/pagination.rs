//! Offset pagination utilities for list endpoints.

use serde::{Deserialize, Serialize};

/// Maximum page size a client may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default page size when the client does not specify one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Query parameters for paginated list endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageParams {
    /// Clamps the parameters into their valid ranges.
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.max(0),
            page_size: self.page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// SQL OFFSET for this page.
    pub fn offset(&self) -> i64 {
        self.page * self.page_size
    }

    /// SQL LIMIT for this page.
    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

/// A page of results plus the total row count.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, params: PageParams, total: i64) -> Self {
        Self {
            items,
            page: params.page,
            page_size: params.page_size,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = PageParams::default();
        assert_eq!(params.page, 0);
        assert_eq!(params.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_clamp_negative_page() {
        let params = PageParams {
            page: -3,
            page_size: 10,
        }
        .clamped();
        assert_eq!(params.page, 0);
    }

    #[test]
    fn test_clamp_oversized_page_size() {
        let params = PageParams {
            page: 0,
            page_size: 10_000,
        }
        .clamped();
        assert_eq!(params.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_clamp_zero_page_size() {
        let params = PageParams {
            page: 0,
            page_size: 0,
        }
        .clamped();
        assert_eq!(params.page_size, 1);
    }

    #[test]
    fn test_offset_limit() {
        let params = PageParams {
            page: 3,
            page_size: 25,
        };
        assert_eq!(params.offset(), 75);
        assert_eq!(params.limit(), 25);
    }

    #[test]
    fn test_page_wrapper() {
        let params = PageParams {
            page: 1,
            page_size: 2,
        };
        let page = Page::new(vec!["a", "b"], params, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.page, 1);
        assert_eq!(page.total, 5);
    }
}
