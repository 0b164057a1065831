//! Page bounds and pagination math.
//!
//! GitHub serves at most 100 pages of search results regardless of the
//! reported total, so every page count here is capped at [`MAX_PAGE`].

use serde::Serialize;

use crate::errors::DirectoryError;

/// Highest page the search endpoint will serve.
pub const MAX_PAGE: u32 = 100;

/// Largest `per_page` the search endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Number of reachable pages for `total_count` results, at least 1.
#[must_use]
pub fn max_page(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 1;
    }
    let pages = total_count
        .div_ceil(u64::from(page_size))
        .min(u64::from(MAX_PAGE));
    u32::try_from(pages).unwrap_or(MAX_PAGE).max(1)
}

/// Clamp an arbitrary requested page into the reachable range.
///
/// With `total_count` unknown the range is `1..=MAX_PAGE`.
#[must_use]
pub fn clamp_page(requested: i64, total_count: Option<u64>, page_size: u32) -> u32 {
    let upper = total_count.map_or(MAX_PAGE, |total| max_page(total, page_size));
    let clamped = requested.clamp(1, i64::from(upper));
    u32::try_from(clamped).unwrap_or(1)
}

/// Whether another page exists after `page`.
#[must_use]
pub fn has_next_page(page: u32, page_size: u32, total_count: u64) -> bool {
    u64::from(page) * u64::from(page_size) < total_count && page < MAX_PAGE
}

/// # Errors
/// `InvalidPage` when `page` is outside `1..=MAX_PAGE`.
pub fn validate_page(page: u32) -> Result<(), DirectoryError> {
    if (1..=MAX_PAGE).contains(&page) {
        Ok(())
    } else {
        Err(DirectoryError::invalid_page(page))
    }
}

/// # Errors
/// `InvalidPageSize` when `page_size` is outside `1..=MAX_PAGE_SIZE`.
pub fn validate_page_size(page_size: u32) -> Result<(), DirectoryError> {
    if (1..=MAX_PAGE_SIZE).contains(&page_size) {
        Ok(())
    } else {
        Err(DirectoryError::invalid_page_size(page_size))
    }
}

/// Navigation summary for a results page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    pub current_page: u32,
    /// Zero when nothing is known about the result set.
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PaginationInfo {
    #[must_use]
    pub fn compute(page: u32, total_count: u64, page_size: u32) -> Self {
        if total_count == 0 || page_size == 0 {
            return Self {
                current_page: 1,
                total_pages: 0,
                has_next_page: false,
                has_previous_page: false,
            };
        }
        let total_pages = max_page(total_count, page_size);
        let current_page = page.clamp(1, total_pages);
        Self {
            current_page,
            total_pages,
            has_next_page: current_page < total_pages,
            has_previous_page: current_page > 1,
        }
    }
}
