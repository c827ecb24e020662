//! Page/limit pagination helpers.
//!
//! List endpoints take 1-based `page` and `limit`; repositories take
//! `limit`/`offset`. Values are clamped here so handlers never pass raw user
//! input to SQL.

use serde::Serialize;

/// Default number of rows per page.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Maximum number of rows per page.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Default number of GPS points returned for a guard trail.
pub const DEFAULT_TRAIL_LIMIT: i64 = 50;

/// Maximum number of GPS points returned for a guard trail.
pub const MAX_TRAIL_LIMIT: i64 = 500;

/// Clamp a user-provided limit to `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a 1-based page number to at least 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Resolved pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: clamp_page(page),
            limit: clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// A page of results with totals for the dashboard pager.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T: Serialize> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub last_page: i64,
}

impl<T: Serialize> Page<T> {
    pub fn new(data: Vec<T>, total: i64, request: PageRequest) -> Self {
        let last_page = if total <= 0 {
            0
        } else {
            (total + request.limit - 1) / request.limit
        };
        Self {
            data,
            total,
            page: request.page,
            limit: request.limit,
            last_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        let req = PageRequest::new(None, None);
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(clamp_limit(Some(0), 10, 100), 1);
        assert_eq!(clamp_limit(Some(5000), 10, 100), 100);
        assert_eq!(clamp_limit(Some(-3), 10, 100), 1);
    }

    #[test]
    fn offset_follows_page() {
        let req = PageRequest::new(Some(3), Some(20));
        assert_eq!(req.offset(), 40);
        assert_eq!(PageRequest::new(Some(0), Some(20)).offset(), 0);
    }

    #[test]
    fn last_page_rounds_up() {
        let req = PageRequest::new(Some(1), Some(10));
        assert_eq!(Page::new(Vec::<i32>::new(), 0, req).last_page, 0);
        assert_eq!(Page::new(vec![1], 10, req).last_page, 1);
        assert_eq!(Page::new(vec![1], 11, req).last_page, 2);
    }
}
