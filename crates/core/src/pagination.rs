//! Page-based pagination helpers.
//!
//! Listing endpoints accept a 1-based `page` and a page size `limit`. The
//! repository layer works with `offset`/`limit`, so [`PageRequest`] converts
//! between the two.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// First page number.
pub const DEFAULT_PAGE: i64 = 1;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum number of rows per page.
pub const MAX_PAGE_SIZE: i64 = 100;

// ---------------------------------------------------------------------------
// PageRequest
// ---------------------------------------------------------------------------

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    limit: i64,
}

impl PageRequest {
    /// Build a page request from optional user input.
    ///
    /// `page` defaults to 1 and must be at least 1. `limit` defaults to
    /// [`DEFAULT_PAGE_SIZE`] and must lie in `1..=MAX_PAGE_SIZE`.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Result<Self, CoreError> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);

        if page < 1 {
            return Err(CoreError::Validation(format!(
                "page must be at least 1, got {page}"
            )));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(CoreError::Validation(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}, got {limit}"
            )));
        }

        Ok(Self { page, limit })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Number of rows to skip: `(page - 1) * limit`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}
