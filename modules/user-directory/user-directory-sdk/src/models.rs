//! Search inputs and results: the query, raw hits, enriched profiles and a page of them.

use std::fmt;

use serde::Serialize;
use time::OffsetDateTime;

use crate::errors::DirectoryError;

/// Trimmed, non-empty username fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Minimum length (in characters, after trimming) applied by [`parse`](Self::parse).
    pub const DEFAULT_MIN_LEN: usize = 1;

    /// Trim and validate raw input with the default minimum length.
    ///
    /// # Errors
    /// `EmptyQuery` for blank input.
    pub fn parse(raw: &str) -> Result<Self, DirectoryError> {
        Self::parse_with_min_len(raw, Self::DEFAULT_MIN_LEN)
    }

    /// Trim and validate raw input.
    ///
    /// # Errors
    /// `EmptyQuery` for blank input, `InvalidQuery` when the trimmed text is
    /// shorter than `min_len` characters.
    pub fn parse_with_min_len(raw: &str, min_len: usize) -> Result<Self, DirectoryError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DirectoryError::EmptyQuery);
        }
        if trimmed.chars().count() < min_len {
            return Err(DirectoryError::invalid_query(format!(
                "Username must be at least {min_len} character{} long.",
                if min_len == 1 { "" } else { "s" }
            )));
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SearchQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One item of a search response, before detail enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: u64,
    pub login: String,
    pub avatar_url: String,
    pub profile_url: String,
}

/// Profile summary shown for each search result.
///
/// `id` is the identity key. A `degraded` summary was built from its
/// [`SearchHit`] after the detail lookup failed: counts are zero and the
/// optional fields are empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: u64,
    pub login: String,
    pub display_name: Option<String>,
    pub avatar_url: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub follower_count: u64,
    pub following_count: u64,
    pub public_repo_count: u64,
    pub profile_url: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub joined_at: Option<OffsetDateTime>,
    pub degraded: bool,
}

impl UserSummary {
    /// Fallback summary for a hit whose detail lookup failed.
    #[must_use]
    pub fn degraded_from(hit: &SearchHit) -> Self {
        Self {
            id: hit.id,
            login: hit.login.clone(),
            display_name: None,
            avatar_url: hit.avatar_url.clone(),
            bio: None,
            location: None,
            follower_count: 0,
            following_count: 0,
            public_repo_count: 0,
            profile_url: hit.profile_url.clone(),
            joined_at: None,
            degraded: true,
        }
    }

    /// Display name when set, login otherwise.
    #[must_use]
    pub fn name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.login)
    }
}

/// One page of search results, items in relevance order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub items: Vec<UserSummary>,
    pub total_count: u64,
    pub requested_page: u32,
    /// Upstream gave up before scanning every candidate.
    pub incomplete_results: bool,
}

impl SearchResult {
    /// Result with no items and an unknown (zero) total.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            requested_page: 1,
            incomplete_results: false,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn degraded_count(&self) -> usize {
        self.items.iter().filter(|u| u.degraded).count()
    }
}

impl Default for SearchResult {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn hit() -> SearchHit {
        SearchHit {
            id: 583_231,
            login: "octocat".to_owned(),
            avatar_url: "https://avatars.githubusercontent.com/u/583231?v=4".to_owned(),
            profile_url: "https://github.com/octocat".to_owned(),
        }
    }

    #[test]
    fn query_is_trimmed() {
        let q = SearchQuery::parse("  octo cat \n").unwrap();
        assert_eq!(q.as_str(), "octo cat");
        assert_eq!(q.to_string(), "octo cat");
    }

    #[test]
    fn blank_query_is_empty_error() {
        assert_eq!(SearchQuery::parse(""), Err(DirectoryError::EmptyQuery));
        assert_eq!(SearchQuery::parse(" \t "), Err(DirectoryError::EmptyQuery));
    }

    #[test]
    fn min_len_counts_characters() {
        assert!(SearchQuery::parse_with_min_len("ab", 3).is_err());
        assert!(SearchQuery::parse_with_min_len("\u{e4}\u{f6}\u{fc}", 3).is_ok());
        match SearchQuery::parse_with_min_len("a", 2) {
            Err(DirectoryError::InvalidQuery { message }) => {
                assert_eq!(message, "Username must be at least 2 characters long.");
            }
            other => panic!("expected InvalidQuery, got {other:?}"),
        }
    }

    #[test]
    fn degraded_summary_keeps_identity() {
        let summary = UserSummary::degraded_from(&hit());
        assert!(summary.degraded);
        assert_eq!(summary.id, 583_231);
        assert_eq!(summary.login, "octocat");
        assert_eq!(summary.avatar_url, hit().avatar_url);
        assert_eq!(
            (summary.follower_count, summary.following_count, summary.public_repo_count),
            (0, 0, 0)
        );
        assert!(summary.bio.is_none() && summary.joined_at.is_none());
    }

    #[test]
    fn name_falls_back_to_login() {
        let mut summary = UserSummary::degraded_from(&hit());
        assert_eq!(summary.name(), "octocat");
        summary.display_name = Some("The Octocat".to_owned());
        assert_eq!(summary.name(), "The Octocat");
        summary.display_name = Some("  ".to_owned());
        assert_eq!(summary.name(), "octocat");
    }

    #[test]
    fn summary_serializes_joined_at_as_rfc3339() {
        let mut summary = UserSummary::degraded_from(&hit());
        summary.joined_at = Some(time::macros::datetime!(2011-01-25 18:44:36 UTC));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["joined_at"], "2011-01-25T18:44:36Z");
        assert_eq!(json["degraded"], true);
    }
}
