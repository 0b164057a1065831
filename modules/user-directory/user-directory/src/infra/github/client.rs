use async_trait::async_trait;
use thiserror::Error;
use url::Url;
use user_directory_sdk::pagination::{validate_page, validate_page_size};
use user_directory_sdk::{
    DirectoryError, SearchHit, SearchQuery, SearchResult, UserDirectoryClient, UserSummary,
};
use usersearch_http::{HttpClient, HttpClientBuilder, HttpError, TlsRootConfig, TransportSecurity};
use usersearch_utils::SecretString;

use super::dto::{SearchUsersResponse, UserDetail};
use super::errors::map_http_error;
use crate::config::GithubDirectoryConfig;
use crate::domain::enrich::enrich_hits;
use crate::infra::cache::DetailCache;

const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "x-github-api-version";
const API_VERSION: &str = "2022-11-28";

/// Errors raised while constructing a [`GithubDirectoryClient`].
#[derive(Error, Debug)]
pub enum ClientBuildError {
    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("base URL '{0}' cannot carry a path")]
    BaseUrlNotHierarchical(String),

    #[error("base URL '{0}' uses plain HTTP but allow_insecure_http is off")]
    InsecureBaseUrl(String),

    #[error(transparent)]
    Http(#[from] HttpError),
}

/// [`UserDirectoryClient`] backed by the GitHub REST API.
#[derive(Clone)]
pub struct GithubDirectoryClient {
    http: HttpClient,
    base_url: Url,
    token: Option<SecretString>,
    detail_concurrency: usize,
    cache: Option<DetailCache>,
}

impl GithubDirectoryClient {
    /// Build the client and its HTTP stack. Must run inside a Tokio runtime.
    ///
    /// # Errors
    /// Returns `ClientBuildError` for a malformed or disallowed base URL, or
    /// when the HTTP client cannot be built.
    pub fn new(config: &GithubDirectoryConfig) -> Result<Self, ClientBuildError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|source| ClientBuildError::InvalidBaseUrl {
                url: config.base_url.clone(),
                source,
            })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientBuildError::BaseUrlNotHierarchical(
                config.base_url.clone(),
            ));
        }
        if base_url.scheme() == "http" && !config.allow_insecure_http {
            return Err(ClientBuildError::InsecureBaseUrl(config.base_url.clone()));
        }

        let transport = if config.allow_insecure_http {
            TransportSecurity::AllowInsecureHttp
        } else {
            TransportSecurity::TlsOnly
        };

        let http = HttpClientBuilder::new()
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .default_header("accept", ACCEPT)
            .default_header(API_VERSION_HEADER, API_VERSION)
            .max_body_size(config.max_body_size)
            .transport(transport)
            .tls_roots(if config.use_native_roots {
                TlsRootConfig::Native
            } else {
                TlsRootConfig::WebPki
            })
            .build()?;

        tracing::debug!(
            base_url = %base_url,
            authenticated = config.effective_token().is_some(),
            detail_concurrency = config.detail_concurrency,
            detail_cache = config.detail_cache.enabled,
            "github directory client ready"
        );

        Ok(Self {
            http,
            base_url,
            token: config.effective_token().cloned(),
            detail_concurrency: config.detail_concurrency.max(1),
            cache: DetailCache::from_config(&config.detail_cache),
        })
    }

    /// `base_url` with `segments` appended, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &Url,
        resource: &str,
    ) -> Result<T, DirectoryError> {
        let mut request = self.http.get(url.as_str());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose());
        }
        let response = request
            .send()
            .await
            .map_err(|e| map_http_error(e, resource))?;
        response
            .json::<T>()
            .await
            .map_err(|e| map_http_error(e, resource))
    }

    async fn search_hits(
        &self,
        query: &SearchQuery,
        page: u32,
        page_size: u32,
    ) -> Result<(SearchUsersResponse, Vec<SearchHit>), DirectoryError> {
        let mut url = self.endpoint(&["search", "users"]);
        url.query_pairs_mut()
            .append_pair("q", query.as_str())
            .append_pair("per_page", &page_size.to_string())
            .append_pair("page", &page.to_string());

        let mut response: SearchUsersResponse = self.get_json(&url, query.as_str()).await?;
        let hits = std::mem::take(&mut response.items)
            .into_iter()
            .map(SearchHit::from)
            .collect();
        Ok((response, hits))
    }
}

#[async_trait]
impl UserDirectoryClient for GithubDirectoryClient {
    async fn search_users(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SearchResult, DirectoryError> {
        let query = SearchQuery::parse(query)?;
        validate_page(page)?;
        validate_page_size(page_size)?;

        let (response, hits) = self.search_hits(&query, page, page_size).await?;
        tracing::debug!(
            query = %query,
            page,
            total_count = response.total_count,
            hits = hits.len(),
            "search page received"
        );

        let items = enrich_hits(self, hits, self.detail_concurrency).await;

        Ok(SearchResult {
            items,
            total_count: response.total_count,
            requested_page: page,
            incomplete_results: response.incomplete_results,
        })
    }

    async fn get_user_detail(&self, login: &str) -> Result<UserSummary, DirectoryError> {
        let login = login.trim();
        if login.is_empty() {
            return Err(DirectoryError::EmptyQuery);
        }

        if let Some(cache) = &self.cache
            && let Some(hit) = cache.get(login).await
        {
            tracing::trace!(login, "profile served from cache");
            return Ok(hit);
        }

        let url = self.endpoint(&["users", login]);
        let detail: UserDetail = self.get_json(&url, login).await?;
        let summary = UserSummary::from(detail);

        if let Some(cache) = &self.cache {
            cache.insert(&summary).await;
        }
        Ok(summary)
    }
}
