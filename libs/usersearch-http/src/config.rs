//! Settings for [`HttpClient`](crate::HttpClient).

use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("usersearch-http/", env!("CARGO_PKG_VERSION"));

/// Where trusted root certificates come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TlsRootConfig {
    /// Bundled Mozilla roots.
    #[default]
    WebPki,
    /// The operating system store.
    Native,
}

/// Which URL schemes may be dialed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportSecurity {
    #[default]
    TlsOnly,
    /// Plain `http://` is accepted too. Meant for local mock servers.
    AllowInsecureHttp,
}

impl TransportSecurity {
    #[must_use]
    pub fn allows_plain_http(self) -> bool {
        self == Self::AllowInsecureHttp
    }
}

/// Connection reuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// `None` keeps idle connections until the server closes them.
    pub idle_timeout: Option<Duration>,
    pub max_idle_per_host: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Some(Duration::from_secs(90)),
            max_idle_per_host: 16,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Covers connecting, sending and receiving the response head.
    pub request_timeout: Duration,
    /// Upper bound on a decompressed response body.
    pub max_body_size: usize,
    pub user_agent: String,
    /// Added to requests that do not set the header themselves.
    pub default_headers: Vec<(String, String)>,
    pub transport: TransportSecurity,
    pub tls_roots: TlsRootConfig,
    /// Requests that may wait for the worker before `send()` reports
    /// `Overloaded`.
    pub queue_capacity: usize,
    pub pool: PoolConfig,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_body_size: 8 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            default_headers: Vec::new(),
            transport: TransportSecurity::default(),
            tls_roots: TlsRootConfig::default(),
            queue_capacity: 256,
            pool: PoolConfig::default(),
        }
    }
}

impl HttpClientConfig {
    /// Plain HTTP, a short timeout and a small pool, for tests against a
    /// local mock server.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            max_body_size: 1024 * 1024,
            transport: TransportSecurity::AllowInsecureHttp,
            queue_capacity: 64,
            pool: PoolConfig {
                idle_timeout: Some(Duration::from_secs(5)),
                max_idle_per_host: 2,
            },
            ..Self::default()
        }
    }
}
