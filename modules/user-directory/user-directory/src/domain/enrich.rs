//! Detail fan-out for a page of search hits.

use futures::StreamExt;
use futures::stream;
use user_directory_sdk::{SearchHit, UserDirectoryClient, UserSummary};

/// Fetch the full profile of every hit, at most `concurrency` at a time.
///
/// Output order matches `hits` regardless of completion order. A failed
/// lookup yields [`UserSummary::degraded_from`] for that hit and never fails
/// the batch.
pub async fn enrich_hits(
    directory: &dyn UserDirectoryClient,
    hits: Vec<SearchHit>,
    concurrency: usize,
) -> Vec<UserSummary> {
    stream::iter(hits)
        .map(|hit| async move {
            match directory.get_user_detail(&hit.login).await {
                Ok(summary) => summary,
                Err(err) => {
                    tracing::warn!(
                        login = %hit.login,
                        category = %err.category(),
                        error = %err,
                        "profile lookup failed; using degraded summary"
                    );
                    UserSummary::degraded_from(&hit)
                }
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}
