//! The search controller: sole owner of [`SearchState`].

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use user_directory_sdk::pagination::{clamp_page, has_next_page, validate_page};
use user_directory_sdk::{
    DirectoryError, ErrorCategory, MAX_PAGE, SearchQuery, SearchResult, UserDirectoryClient,
};

use crate::config::SearchConfig;
use crate::debounce::Debouncer;
use crate::intent::IntentClock;
use crate::state::{SearchError, SearchState};

/// What became of a single `search` call.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The response was applied to the state.
    Applied,
    /// The directory failed and the error was applied to the state.
    Failed(DirectoryError),
    /// A newer intent arrived first; the response was dropped.
    Superseded,
    /// The query was refused before any network call.
    Rejected(DirectoryError),
}

impl SearchOutcome {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Failed(_) => "failed",
            Self::Superseded => "superseded",
            Self::Rejected(_) => "rejected",
        }
    }
}

struct Shared {
    state: SearchState,
    /// Total reported by the last applied response for the current query.
    known_total: Option<u64>,
    last_attempt: Option<(String, u32)>,
}

/// A bad page keeps what is on screen for the same query; anything else
/// starts over empty.
fn apply_rejection(shared: &mut Shared, query: &str, err: &DirectoryError) {
    let keep_results =
        shared.state.query == query && err.category() == ErrorCategory::InvalidPage;
    if !keep_results {
        shared.known_total = None;
        shared.state.query = query.to_owned();
        shared.state.page = 1;
        shared.state.results = SearchResult::empty();
        shared.state.has_next_page = false;
    }
    shared.state.loading = false;
    shared.state.error = Some(SearchError::from(err));
}

struct Inner {
    directory: Arc<dyn UserDirectoryClient>,
    config: SearchConfig,
    intents: IntentClock,
    debouncer: Debouncer,
    shared: Mutex<Shared>,
    updates: watch::Sender<SearchState>,
}

impl Inner {
    fn publish(&self, shared: &Shared) {
        self.updates.send_replace(shared.state.clone());
    }
}

/// Sequences searches against a [`UserDirectoryClient`] and publishes every
/// state change.
///
/// Cheap to clone; clones share one state. Methods that schedule work must be
/// called inside a Tokio runtime.
#[derive(Clone)]
pub struct SearchController {
    inner: Arc<Inner>,
}

impl SearchController {
    #[must_use]
    pub fn new(directory: Arc<dyn UserDirectoryClient>, config: &SearchConfig) -> Self {
        let config = config.normalized();
        let state = SearchState::new(config.page_size);
        let (updates, _) = watch::channel(state.clone());
        Self {
            inner: Arc::new(Inner {
                directory,
                config,
                intents: IntentClock::new(),
                debouncer: Debouncer::new(),
                shared: Mutex::new(Shared {
                    state,
                    known_total: None,
                    last_attempt: None,
                }),
                updates,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.inner.config
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SearchState {
        self.inner.shared.lock().state.clone()
    }

    /// Receiver that observes every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.updates.subscribe()
    }

    /// Record new input and schedule a debounced search for page 1.
    ///
    /// Changed text supersedes any search still in flight. Blank input
    /// also cancels the pending search and clears the results. Never
    /// fetches synchronously.
    pub fn set_query(&self, text: &str) {
        {
            let mut shared = self.inner.shared.lock();
            if shared.state.query != text {
                self.inner.intents.advance();
                shared.known_total = None;
                shared.state.loading = false;
            }
            shared.state.query = text.to_owned();
            shared.state.page = 1;

            if text.trim().is_empty() {
                self.inner.debouncer.cancel();
                self.inner.intents.advance();
                shared.state.results = SearchResult::empty();
                shared.state.error = None;
                shared.state.loading = false;
                shared.state.has_next_page = false;
                self.inner.publish(&shared);
                return;
            }
            self.inner.publish(&shared);
        }

        let controller = self.clone();
        let text = text.to_owned();
        self.inner
            .debouncer
            .schedule(self.inner.config.debounce, async move {
                tracing::debug!(query = %text, "debounce elapsed");
                let outcome = controller.search(&text, 1).await;
                tracing::trace!(outcome = outcome.label(), "debounced search finished");
            });
    }

    /// Fetch `requested`, clamped into the reachable range, for the current
    /// query. Cancels any pending debounced search.
    pub async fn set_page(&self, requested: i64) -> SearchOutcome {
        self.inner.debouncer.cancel();
        let (query, page) = {
            let shared = self.inner.shared.lock();
            let page = clamp_page(requested, shared.known_total, self.inner.config.page_size);
            (shared.state.query.clone(), page)
        };
        self.search(&query, page).await
    }

    pub async fn next_page(&self) -> SearchOutcome {
        let page = self.state().page;
        self.set_page(i64::from(page) + 1).await
    }

    pub async fn previous_page(&self) -> SearchOutcome {
        let page = self.state().page;
        self.set_page(i64::from(page) - 1).await
    }

    pub async fn first_page(&self) -> SearchOutcome {
        self.set_page(1).await
    }

    pub async fn last_page(&self) -> SearchOutcome {
        self.set_page(i64::from(MAX_PAGE)).await
    }

    /// Fetch `page` of `query` and apply the response if it is still the
    /// latest intent when it arrives.
    ///
    /// A page outside `1..=MAX_PAGE` is rejected without a network call and
    /// leaves the current page as it is. A page past the last one known for
    /// this query is clamped before fetching.
    pub async fn search(&self, query: &str, page: u32) -> SearchOutcome {
        let page_size = self.inner.config.page_size;
        let parsed = SearchQuery::parse_with_min_len(query, self.inner.config.min_query_len);

        let (ticket, parsed, page) = {
            let mut shared = self.inner.shared.lock();
            let ticket = self.inner.intents.advance();
            if shared.state.query != query {
                shared.known_total = None;
            }

            let checked = parsed.and_then(|parsed| validate_page(page).map(|()| parsed));
            let parsed = match checked {
                Ok(parsed) => parsed,
                Err(err) => {
                    apply_rejection(&mut shared, query, &err);
                    self.inner.publish(&shared);
                    return SearchOutcome::Rejected(err);
                }
            };

            let page = clamp_page(i64::from(page), shared.known_total, page_size);
            shared.state.query = query.to_owned();
            shared.state.page = page;
            shared.last_attempt = Some((query.to_owned(), page));
            shared.state.loading = true;
            shared.state.error = None;
            self.inner.publish(&shared);
            (ticket, parsed, page)
        };

        let result = self
            .inner
            .directory
            .search_users(parsed.as_str(), page, page_size)
            .await;

        let mut shared = self.inner.shared.lock();
        if !self.inner.intents.is_current(ticket) {
            tracing::debug!(
                query = %parsed,
                page,
                ticket,
                latest = self.inner.intents.latest(),
                "discarding stale search response"
            );
            return SearchOutcome::Superseded;
        }

        let outcome = match result {
            Ok(results) => {
                let total = results.total_count;
                let page = clamp_page(i64::from(page), Some(total), page_size);
                shared.known_total = Some(total);
                shared.state.page = page;
                shared.state.has_next_page = has_next_page(page, page_size, total);
                shared.state.results = results;
                shared.state.error = None;
                SearchOutcome::Applied
            }
            Err(err) => {
                tracing::debug!(
                    query = %parsed,
                    page,
                    category = %err.category(),
                    error = %err,
                    "search failed"
                );
                shared.state.error = Some(SearchError::from(&err));
                SearchOutcome::Failed(err)
            }
        };
        shared.state.loading = false;
        self.inner.publish(&shared);
        outcome
    }

    /// Re-issue the last attempted `(query, page)`. `None` if nothing was
    /// attempted yet.
    pub async fn retry(&self) -> Option<SearchOutcome> {
        let (query, page) = self.inner.shared.lock().last_attempt.clone()?;
        Some(self.search(&query, page).await)
    }

    /// Clear the error, keeping the results.
    pub fn dismiss_error(&self) {
        let mut shared = self.inner.shared.lock();
        if shared.state.error.take().is_some() {
            self.inner.publish(&shared);
        }
    }

    /// Back to the initial empty state. Responses still in flight are
    /// dropped when they arrive.
    pub fn reset(&self) {
        self.inner.debouncer.cancel();
        let mut shared = self.inner.shared.lock();
        self.inner.intents.advance();
        shared.state = SearchState::new(self.inner.config.page_size);
        shared.known_total = None;
        shared.last_attempt = None;
        self.inner.publish(&shared);
    }

    /// Run the pending debounced search now instead of after the delay.
    /// `None` if nothing was pending.
    pub async fn flush(&self) -> Option<SearchOutcome> {
        if !self.inner.debouncer.cancel() {
            return None;
        }
        let query = self.inner.shared.lock().state.query.clone();
        Some(self.search(&query, 1).await)
    }

    /// Whether a debounced search is waiting to fire.
    #[must_use]
    pub fn has_pending_search(&self) -> bool {
        self.inner.debouncer.is_pending()
    }
}
