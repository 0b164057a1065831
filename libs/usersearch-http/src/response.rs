//! Responses and size-limited body reading.

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, Response, StatusCode};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use std::time::{Duration, SystemTime};
use tokio::time::Instant;

use crate::error::{BoxError, HttpError};

/// Bytes of a non-2xx body kept in [`HttpError::Status`].
pub const ERROR_BODY_PREVIEW_LIMIT: usize = 8 * 1024;

/// Body type after the decompression layer.
pub type ResponseBody = http_body_util::combinators::BoxBody<Bytes, BoxError>;

/// `Retry-After` as a delay: delta-seconds or an HTTP-date in the future.
#[must_use]
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(http::header::RETRY_AFTER)?.to_str().ok()?.trim();
    match value.parse::<u64>() {
        Ok(seconds) => Some(Duration::from_secs(seconds)),
        Err(_) => httpdate::parse_http_date(value)
            .ok()?
            .duration_since(SystemTime::now())
            .ok(),
    }
}

/// Point by which the whole exchange, body included, must finish.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    /// `None` when the timeout is too large to represent.
    at: Option<Instant>,
    timeout: Duration,
}

impl Deadline {
    #[must_use]
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now().checked_add(timeout),
            timeout,
        }
    }

    async fn run<F, T>(self, read: F) -> Result<T, HttpError>
    where
        F: Future<Output = Result<T, HttpError>>,
    {
        match self.at {
            Some(at) => tokio::time::timeout_at(at, read)
                .await
                .map_err(|_| HttpError::Timeout(self.timeout))?,
            None => read.await,
        }
    }
}

/// A response whose body has not been read yet.
///
/// Every status comes back from `send()` as a response; [`json`](Self::json)
/// turns non-2xx into [`HttpError::Status`]. Body reads stop at the client's
/// `max_body_size` and must finish within the client timeout counted from
/// `send()`.
#[derive(Debug)]
pub struct HttpResponse {
    inner: Response<ResponseBody>,
    max_body_size: usize,
    deadline: Deadline,
}

impl HttpResponse {
    pub(crate) fn new(
        inner: Response<ResponseBody>,
        max_body_size: usize,
        deadline: Deadline,
    ) -> Self {
        Self {
            inner,
            max_body_size,
            deadline,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Whole body, whatever the status.
    ///
    /// # Errors
    /// `BodyTooLarge` past the size limit, `Timeout` when the body stalls
    /// past the deadline, `Transport` if the stream fails.
    pub async fn bytes(self) -> Result<Bytes, HttpError> {
        let limit = self.max_body_size;
        self.deadline
            .run(collect_limited(self.inner.into_body(), limit, Overflow::Fail))
            .await
    }

    /// Decode a 2xx body as JSON.
    ///
    /// # Errors
    /// `Status` for non-2xx (with a body preview and `Retry-After`),
    /// `BodyTooLarge`, `Timeout`, `Transport`, or `Decode` when the body does
    /// not match `T`.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, HttpError> {
        let status = self.inner.status();
        if !status.is_success() {
            return Err(self.into_status_error().await);
        }
        let body = self.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn into_status_error(self) -> HttpError {
        let status = self.inner.status();
        let retry_after = parse_retry_after(self.inner.headers());
        let limit = self.max_body_size.min(ERROR_BODY_PREVIEW_LIMIT);
        let read = collect_limited(self.inner.into_body(), limit, Overflow::Truncate);
        let body_preview = match self.deadline.run(read).await {
            Ok(body) => String::from_utf8_lossy(&body).into_owned(),
            // The status matters more than the body.
            Err(_) => String::new(),
        };
        HttpError::Status {
            status,
            body_preview,
            retry_after,
        }
    }
}

/// What to do with a body longer than the limit.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Overflow {
    Fail,
    /// Keep the first `limit` bytes and stop reading.
    Truncate,
}

async fn collect_limited(
    body: ResponseBody,
    limit: usize,
    overflow: Overflow,
) -> Result<Bytes, HttpError> {
    let mut body = std::pin::pin!(body);
    let mut buf = BytesMut::new();
    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(HttpError::Transport)?;
        let Some(chunk) = frame.data_ref() else {
            continue;
        };
        let room = limit - buf.len();
        if chunk.len() > room {
            if overflow == Overflow::Fail {
                return Err(HttpError::BodyTooLarge { limit });
            }
            buf.extend_from_slice(&chunk[..room]);
            break;
        }
        buf.extend_from_slice(chunk);
    }
    Ok(buf.freeze())
}
