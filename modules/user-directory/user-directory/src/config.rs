//! Configuration for the GitHub directory client.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use usersearch_utils::SecretString;

/// GitHub directory client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GithubDirectoryConfig {
    /// API root, without a trailing `/search` or `/users`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional personal access token sent as `Authorization: Bearer`.
    /// Never serialized back out.
    #[serde(default, skip_serializing)]
    pub token: Option<SecretString>,

    /// Timeout for each outbound request.
    #[serde(default = "default_request_timeout", with = "usersearch_utils::humantime_serde")]
    pub request_timeout: Duration,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum profile lookups in flight per search.
    #[serde(default = "default_detail_concurrency")]
    pub detail_concurrency: usize,

    /// Maximum decoded response body size in bytes.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Accept `http://` base URLs. Only for local mock servers.
    pub allow_insecure_http: bool,

    /// Trust the OS certificate store instead of the bundled Mozilla roots.
    pub use_native_roots: bool,

    pub detail_cache: DetailCacheConfig,
}

/// Optional TTL cache for profile lookups, keyed by login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetailCacheConfig {
    pub enabled: bool,

    #[serde(default = "default_cache_ttl", with = "usersearch_utils::humantime_serde")]
    pub ttl: Duration,

    #[serde(default = "default_cache_max_entries")]
    pub max_entries: u64,
}

fn default_base_url() -> String {
    "https://api.github.com".to_owned()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_user_agent() -> String {
    concat!("usersearch/", env!("CARGO_PKG_VERSION")).to_owned()
}

fn default_detail_concurrency() -> usize {
    10
}

fn default_max_body_size() -> usize {
    2 * 1024 * 1024
}

fn default_cache_ttl() -> Duration {
    Duration::from_secs(300)
}

fn default_cache_max_entries() -> u64 {
    1_000
}

impl Default for GithubDirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
            detail_concurrency: default_detail_concurrency(),
            max_body_size: default_max_body_size(),
            allow_insecure_http: false,
            use_native_roots: false,
            detail_cache: DetailCacheConfig::default(),
        }
    }
}

impl Default for DetailCacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ttl: default_cache_ttl(),
            max_entries: default_cache_max_entries(),
        }
    }
}

impl GithubDirectoryConfig {
    /// Token if one is configured and not blank.
    #[must_use]
    pub fn effective_token(&self) -> Option<&SecretString> {
        self.token.as_ref().filter(|t| !t.is_empty())
    }
}
