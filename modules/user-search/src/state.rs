//! Observable search state.

use serde::Serialize;
use user_directory_sdk::pagination::{PaginationInfo, max_page};
use user_directory_sdk::{DirectoryError, ErrorCategory, SearchResult};

/// A page-level failure as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchError {
    pub category: ErrorCategory,
    pub message: String,
}

impl From<&DirectoryError> for SearchError {
    fn from(err: &DirectoryError) -> Self {
        Self {
            category: err.category(),
            message: err.user_message(),
        }
    }
}

/// Everything a presentation layer needs to draw the search screen.
///
/// `loading` and `error` are never set together. `results` is replaced
/// wholesale by each applied response and kept as-is on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchState {
    /// Raw input as typed.
    pub query: String,
    pub page: u32,
    pub page_size: u32,
    pub results: SearchResult,
    pub loading: bool,
    pub error: Option<SearchError>,
    pub has_next_page: bool,
}

impl SearchState {
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            query: String::new(),
            page: 1,
            page_size,
            results: SearchResult::empty(),
            loading: false,
            error: None,
            has_next_page: false,
        }
    }

    #[must_use]
    pub fn pagination(&self) -> PaginationInfo {
        PaginationInfo::compute(self.page, self.results.total_count, self.page_size)
    }

    /// Last reachable page for the current results.
    #[must_use]
    pub fn max_page(&self) -> u32 {
        max_page(self.results.total_count, self.page_size)
    }

    #[must_use]
    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }
}
