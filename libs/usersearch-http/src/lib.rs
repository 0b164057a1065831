#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Outbound HTTP client used by the user directory.
//!
//! A hyper-based client wrapped in a tower stack:
//! - TLS via rustls (HTTPS only unless explicitly relaxed)
//! - Connection pooling
//! - Per-request timeout
//! - Default headers (`User-Agent`, `Accept`, API version) injected when absent
//! - Transparent response decompression (gzip, brotli, deflate)
//! - Body size limits applied to decompressed bytes
//!
//! # Example
//!
//! ```ignore
//! use usersearch_http::HttpClient;
//! use std::time::Duration;
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(10))
//!     .user_agent("usersearch/0.1")
//!     .default_header("accept", "application/vnd.github+json")
//!     .build()?;
//!
//! let user: User = client
//!     .get("https://api.github.com/users/octocat")
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//! ```

mod builder;
mod client;
mod config;
mod error;
mod layers;
mod request;
mod response;
mod tls;

pub use builder::HttpClientBuilder;
pub use client::HttpClient;
pub use config::{
    DEFAULT_USER_AGENT, HttpClientConfig, PoolConfig, TlsRootConfig, TransportSecurity,
};
pub use error::HttpError;
pub use layers::{DefaultHeadersLayer, DefaultHeadersService};
pub use request::RequestBuilder;
pub use response::{ERROR_BODY_PREVIEW_LIMIT, HttpResponse, ResponseBody, parse_retry_after};
