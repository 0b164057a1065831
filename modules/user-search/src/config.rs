//! Search controller configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use user_directory_sdk::{MAX_PAGE_SIZE, SearchQuery};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Results requested per page, `1..=100`.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Quiet period after the last keystroke before a search starts.
    #[serde(default = "default_debounce", with = "usersearch_utils::humantime_serde")]
    pub debounce: Duration,

    /// Shortest accepted query, in characters after trimming.
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            debounce: default_debounce(),
            min_query_len: default_min_query_len(),
        }
    }
}

impl SearchConfig {
    /// Copy with out-of-range values pulled into their valid range.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            page_size: self.page_size.clamp(1, MAX_PAGE_SIZE),
            debounce: self.debounce,
            min_query_len: self.min_query_len.max(1),
        }
    }
}

fn default_page_size() -> u32 {
    10
}

fn default_debounce() -> Duration {
    Duration::from_millis(300)
}

fn default_min_query_len() -> usize {
    SearchQuery::DEFAULT_MIN_LEN
}
