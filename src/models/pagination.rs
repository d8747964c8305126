//! Fixed-size, 1-based page handling shared by all listings

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

/// Query string accepted by listing endpoints
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PageQuery {
    /// Page number (default: 1)
    pub page: Option<i64>,
}

/// Validated page position for a listing with a fixed page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, per_page: i64) -> AppResult<Self> {
        let page = page.unwrap_or(1);
        if page < 1 {
            return Err(AppError::NotFound(format!("Invalid page ({})", page)));
        }
        Ok(Self {
            page,
            per_page: per_page.max(1),
        })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    /// Number of pages for `total` rows. An empty listing still has one (empty) page.
    pub fn num_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            1
        } else {
            (total + self.per_page - 1) / self.per_page
        }
    }

    /// Reject pages past the last one
    pub fn ensure_in_range(&self, total: i64) -> AppResult<()> {
        let num_pages = self.num_pages(total);
        if self.page > num_pages {
            return Err(AppError::NotFound(format!(
                "Invalid page ({}): listing has {} page(s)",
                self.page, num_pages
            )));
        }
        Ok(())
    }
}

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Entries on this page
    pub items: Vec<T>,
    /// Total number of entries in the listing
    pub total: i64,
    /// Current page number (1-based)
    pub page: i64,
    /// Fixed page size of the listing
    pub per_page: i64,
    /// Number of pages in the listing
    pub num_pages: i64,
}

impl<T> Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
            num_pages: request.num_pages(total),
        }
    }
}
