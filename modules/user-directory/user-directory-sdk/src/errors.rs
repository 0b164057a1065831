//! Public error types for the user directory.
//!
//! Every failure a caller can see maps onto exactly one [`ErrorCategory`];
//! transport-level details stay inside the client implementation.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::pagination::{MAX_PAGE, MAX_PAGE_SIZE};

/// Coarse classification used for user-facing messages and retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    EmptyQuery,
    InvalidPage,
    RateLimited,
    NotFound,
    InvalidQuery,
    ServiceUnavailable,
    NetworkError,
    Unknown,
}

impl ErrorCategory {
    /// Human-readable message shown to the end user.
    #[must_use]
    pub fn user_message(self) -> &'static str {
        match self {
            Self::EmptyQuery => "Please enter a username to search.",
            Self::InvalidPage => {
                "Page number must be between 1 and 100. \
                 GitHub API only supports up to 100 pages for search results."
            }
            Self::RateLimited => "GitHub API rate limit exceeded. Please try again later.",
            Self::NotFound => "User not found.",
            Self::InvalidQuery => {
                "Invalid search query. Please check your search terms and try again."
            }
            Self::ServiceUnavailable => {
                "GitHub API is temporarily unavailable. Please try again later."
            }
            Self::NetworkError => "Network error. Please check your connection.",
            Self::Unknown => "An unexpected error occurred.",
        }
    }

    /// Whether re-issuing the same request can reasonably succeed.
    #[must_use]
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ServiceUnavailable | Self::NetworkError | Self::Unknown
        )
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EmptyQuery => "empty_query",
            Self::InvalidPage => "invalid_page",
            Self::RateLimited => "rate_limited",
            Self::NotFound => "not_found",
            Self::InvalidQuery => "invalid_query",
            Self::ServiceUnavailable => "service_unavailable",
            Self::NetworkError => "network_error",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Errors returned by a [`UserDirectoryClient`](crate::UserDirectoryClient).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// The query is empty or whitespace only.
    #[error("search query is empty")]
    EmptyQuery,

    /// Page outside `1..=MAX_PAGE`; rejected before any request is made.
    #[error("page {page} is outside 1..={max}", max = MAX_PAGE)]
    InvalidPage { page: u32 },

    /// Page size outside `1..=MAX_PAGE_SIZE`; rejected before any request is made.
    #[error("page size {page_size} is outside 1..={max}", max = MAX_PAGE_SIZE)]
    InvalidPageSize { page_size: u32 },

    /// Upstream quota exhausted (HTTP 403 or 429).
    #[error("rate limited by the directory service")]
    RateLimited { retry_after: Option<Duration> },

    /// Upstream returned 404.
    #[error("not found: {resource}")]
    NotFound { resource: String },

    /// Query rejected, either locally or by upstream validation (HTTP 422).
    #[error("invalid query: {message}")]
    InvalidQuery { message: String },

    /// Upstream returned a 5xx status.
    #[error("directory service unavailable (HTTP {status})")]
    ServiceUnavailable { status: u16 },

    /// Connection failure or timeout; no response was received.
    #[error("network error: {message}")]
    Network { message: String },

    /// Anything else: unexpected status, undecodable body, internal failure.
    #[error("unexpected directory error: {message}")]
    Unknown { message: String },
}

impl DirectoryError {
    #[must_use]
    pub fn invalid_page(page: u32) -> Self {
        Self::InvalidPage { page }
    }

    #[must_use]
    pub fn invalid_page_size(page_size: u32) -> Self {
        Self::InvalidPageSize { page_size }
    }

    #[must_use]
    pub fn rate_limited(retry_after: Option<Duration>) -> Self {
        Self::RateLimited { retry_after }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn service_unavailable(status: u16) -> Self {
        Self::ServiceUnavailable { status }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyQuery => ErrorCategory::EmptyQuery,
            Self::InvalidPage { .. } | Self::InvalidPageSize { .. } => ErrorCategory::InvalidPage,
            Self::RateLimited { .. } => ErrorCategory::RateLimited,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::InvalidQuery { .. } => ErrorCategory::InvalidQuery,
            Self::ServiceUnavailable { .. } => ErrorCategory::ServiceUnavailable,
            Self::Network { .. } => ErrorCategory::NetworkError,
            Self::Unknown { .. } => ErrorCategory::Unknown,
        }
    }

    /// Message for the end user. Internal details (upstream bodies, socket
    /// errors) are left to `Display` and the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidPageSize { .. } => {
                format!("Page size must be between 1 and {MAX_PAGE_SIZE}.")
            }
            other => other.category().user_message().to_owned(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn categories_follow_variants() {
        assert_eq!(DirectoryError::EmptyQuery.category(), ErrorCategory::EmptyQuery);
        assert_eq!(
            DirectoryError::invalid_page(101).category(),
            ErrorCategory::InvalidPage
        );
        assert_eq!(
            DirectoryError::invalid_page_size(0).category(),
            ErrorCategory::InvalidPage
        );
        assert_eq!(
            DirectoryError::rate_limited(None).category(),
            ErrorCategory::RateLimited
        );
        assert_eq!(
            DirectoryError::network("reset").category(),
            ErrorCategory::NetworkError
        );
    }

    #[test]
    fn user_messages_hide_internal_details() {
        let err = DirectoryError::network("tcp connect error: Connection refused (os error 111)");
        assert_eq!(err.user_message(), "Network error. Please check your connection.");
        assert!(err.to_string().contains("Connection refused"));

        let err = DirectoryError::service_unavailable(502);
        assert_eq!(
            err.user_message(),
            "GitHub API is temporarily unavailable. Please try again later."
        );
    }

    #[test]
    fn rate_limited_keeps_retry_after() {
        let err = DirectoryError::rate_limited(Some(Duration::from_secs(42)));
        assert!(matches!(
            err,
            DirectoryError::RateLimited { retry_after: Some(d) } if d.as_secs() == 42
        ));
        assert_eq!(
            err.user_message(),
            "GitHub API rate limit exceeded. Please try again later."
        );
    }

    #[test]
    fn page_size_has_its_own_message() {
        assert_eq!(
            DirectoryError::invalid_page_size(500).user_message(),
            "Page size must be between 1 and 100."
        );
    }

    #[test]
    fn transient_categories() {
        assert!(ErrorCategory::RateLimited.is_transient());
        assert!(ErrorCategory::NetworkError.is_transient());
        assert!(!ErrorCategory::EmptyQuery.is_transient());
        assert!(!ErrorCategory::InvalidPage.is_transient());
    }

    #[test]
    fn category_display_matches_serde_name() {
        for category in [ErrorCategory::RateLimited, ErrorCategory::NetworkError] {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{category}\""));
        }
    }
}
