//! Errors surfaced by [`HttpClient`](crate::HttpClient).

use std::time::Duration;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HttpError {
    #[error("invalid request: {0}")]
    Request(#[from] http::Error),

    /// A header name or value is not valid HTTP.
    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: &'static str },

    /// `http://` under `TlsOnly`, or any scheme other than http/https.
    #[error("URL scheme '{scheme}' is not allowed")]
    SchemeNotAllowed { scheme: String },

    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Connect, protocol or body stream failure.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    #[error("TLS setup failed: {0}")]
    Tls(#[source] BoxError),

    #[error("response body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// Non-2xx status, reported by the status-checked body readers.
    #[error("HTTP {status}")]
    Status {
        status: http::StatusCode,
        /// First bytes of the body, lossy UTF-8.
        body_preview: String,
        retry_after: Option<Duration>,
    },

    #[error("response is not the expected JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request queue is full; nothing was sent.
    #[error("request queue is full")]
    Overloaded,

    #[error("HTTP client worker has stopped")]
    ServiceClosed,
}

impl HttpError {
    pub(crate) fn invalid_header(name: &str, reason: &dyn std::fmt::Display) -> Self {
        Self::InvalidHeader {
            name: name.to_owned(),
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<http::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `Retry-After` sent with a non-2xx status.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Status { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// No usable response reached the caller: timeout, connection or TLS
    /// failure.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Transport(_) | Self::Tls(_))
    }
}

impl From<hyper::Error> for HttpError {
    fn from(err: hyper::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}

impl From<hyper_util::client::legacy::Error> for HttpError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}
