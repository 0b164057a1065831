//! `UserDirectoryClient` trait definition.

use async_trait::async_trait;

use crate::errors::DirectoryError;
use crate::models::{SearchResult, UserSummary};

/// Remote directory of user profiles.
///
/// Implementations validate `page` and `page_size` against
/// [`MAX_PAGE`](crate::MAX_PAGE) / [`MAX_PAGE_SIZE`](crate::MAX_PAGE_SIZE)
/// before doing any I/O, and report every failure as a categorized
/// [`DirectoryError`]. The search controller holds one as
/// `Arc<dyn UserDirectoryClient>`.
#[async_trait]
pub trait UserDirectoryClient: Send + Sync {
    /// Search users by username fragment and return enriched summaries in
    /// relevance order. Entries whose detail lookup failed come back degraded
    /// instead of failing the page.
    async fn search_users(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SearchResult, DirectoryError>;

    /// Fetch the full profile for one login.
    async fn get_user_detail(&self, login: &str) -> Result<UserSummary, DirectoryError>;
}
