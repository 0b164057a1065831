use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use std::future::Future;
use std::pin::Pin;
use std::task::Poll;
use std::time::Duration;
use tower::Service;
use tower::buffer::Buffer;

use crate::builder::HttpClientBuilder;
use crate::config::TransportSecurity;
use crate::error::HttpError;
use crate::request::{RequestBuilder, parse_target};
use crate::response::ResponseBody;

pub type ServiceFuture =
    Pin<Box<dyn Future<Output = Result<Response<ResponseBody>, HttpError>> + Send>>;

/// Queue in front of the middleware stack, shared by every clone.
pub type BufferedService = Buffer<Request<Full<Bytes>>, ServiceFuture>;

/// Outbound HTTP client: timeout, default headers and decompression over a
/// pooled hyper connection.
///
/// Cloning shares the same queue and connection pool, so one instance can
/// serve many concurrent requests.
#[derive(Clone)]
pub struct HttpClient {
    pub(crate) service: BufferedService,
    pub(crate) max_body_size: usize,
    pub(crate) request_timeout: Duration,
    pub(crate) transport: TransportSecurity,
}

impl HttpClient {
    /// Client with the default configuration. Must run inside a Tokio
    /// runtime.
    ///
    /// # Errors
    /// `Tls` if the root store cannot be loaded.
    pub fn new() -> Result<Self, HttpError> {
        HttpClientBuilder::new().build()
    }

    #[must_use]
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// Start a GET to an absolute URL.
    pub fn get(&self, url: &str) -> RequestBuilder {
        RequestBuilder::new(
            self.service.clone(),
            self.max_body_size,
            self.request_timeout,
            parse_target(url, self.transport),
        )
    }
}

/// Unwrap an `HttpError` coming through the buffer; anything else means the
/// worker is gone.
pub fn map_buffer_error(err: tower::BoxError) -> HttpError {
    err.downcast::<HttpError>().map_or_else(
        |err| {
            tracing::error!(error = %err, "HTTP buffer worker failed");
            HttpError::ServiceClosed
        },
        |err| *err,
    )
}

/// Claim a queue slot without waiting. A full queue is `Overloaded`.
pub async fn try_acquire_buffer_slot(
    service: &mut BufferedService,
) -> Result<(), HttpError> {
    let ready = std::future::poll_fn(|cx| Poll::Ready(service.poll_ready(cx))).await;
    match ready {
        Poll::Ready(Ok(())) => Ok(()),
        Poll::Ready(Err(err)) => Err(map_buffer_error(err)),
        Poll::Pending => Err(HttpError::Overloaded),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::HttpClientConfig;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::io::Write;
    use std::time::Duration;

    fn test_client() -> HttpClient {
        HttpClientBuilder::with_config(HttpClientConfig::for_testing())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_json() {
        #[derive(serde::Deserialize)]
        struct Login {
            login: String,
            id: u64,
        }

        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(GET).path("/users/octocat");
            then.status(200)
                .json_body(json!({"login": "octocat", "id": 583_231}));
        });

        let url = format!("{}/users/octocat", server.base_url());
        let user: Login = test_client().get(&url).send().await.unwrap().json().await.unwrap();
        assert_eq!(user.login, "octocat");
        assert_eq!(user.id, 583_231);
    }

    #[tokio::test]
    async fn test_default_and_request_headers_sent() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET)
                .path("/h")
                .header("user-agent", "custom/1.0")
                .header("accept", "application/vnd.github+json")
                .header("authorization", "Bearer t0ken")
                .header("x-extra", "1");
            then.status(204);
        });

        let client = HttpClientBuilder::with_config(HttpClientConfig::for_testing())
            .user_agent("custom/1.0")
            .default_header("accept", "application/vnd.github+json")
            .build()
            .unwrap();

        let url = format!("{}/h", server.base_url());
        let resp = client
            .get(&url)
            .bearer_auth("t0ken")
            .header("x-extra", "1")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), http::StatusCode::NO_CONTENT);
        m.assert();
    }

    #[tokio::test]
    async fn test_invalid_header_deferred_to_send() {
        let result = test_client()
            .get("http://127.0.0.1:1/x")
            .header("bad header", "v")
            .send()
            .await;
        assert!(matches!(result, Err(HttpError::InvalidHeader { ref name, .. }) if name == "bad header"));
    }

    #[tokio::test]
    async fn test_body_size_limit() {
        let server = MockServer::start();
        let large_body = "x".repeat(64 * 1024);
        let _m = server.mock(|when, then| {
            when.method(GET).path("/large");
            then.status(200).body(&large_body);
        });

        let client = HttpClientBuilder::with_config(HttpClientConfig::for_testing())
            .max_body_size(1024)
            .build()
            .unwrap();

        let url = format!("{}/large", server.base_url());
        let result = client.get(&url).send().await.unwrap().bytes().await;
        assert!(matches!(result, Err(HttpError::BodyTooLarge { limit: 1024 })));
    }

    #[tokio::test]
    async fn test_non_2xx_is_ok_until_checked() {
        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(GET).path("/limited");
            then.status(403)
                .header("retry-after", "30")
                .json_body(json!({"message": "API rate limit exceeded"}));
        });

        let url = format!("{}/limited", server.base_url());
        let resp = test_client().get(&url).send().await.unwrap();
        assert_eq!(resp.status(), http::StatusCode::FORBIDDEN);

        match resp.json::<serde_json::Value>().await {
            Err(HttpError::Status {
                status,
                body_preview,
                retry_after,
            }) => {
                assert_eq!(status, http::StatusCode::FORBIDDEN);
                assert!(body_preview.contains("rate limit"));
                assert_eq!(retry_after, Some(Duration::from_secs(30)));
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_maps_to_timeout_error() {
        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(GET).path("/slow");
            then.status(200).delay(Duration::from_millis(500));
        });

        let client = HttpClientBuilder::with_config(HttpClientConfig::for_testing())
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();

        let url = format!("{}/slow", server.base_url());
        let result = client.get(&url).send().await;
        match result {
            Err(HttpError::Timeout(d)) => assert_eq!(d, Duration::from_millis(50)),
            other => panic!("expected Timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stalled_body_times_out() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0_u8; 1024];
            let _read = socket.read(&mut request).await.unwrap();
            socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 100\r\n\r\n{\"total")
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let client = HttpClientBuilder::with_config(HttpClientConfig::for_testing())
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        let url = format!("http://{addr}/search/users");
        let read = async { client.get(&url).send().await?.bytes().await };
        let result = tokio::time::timeout(Duration::from_secs(3), read)
            .await
            .unwrap();
        assert!(
            matches!(result, Err(HttpError::Timeout(d)) if d == Duration::from_millis(200)),
            "{result:?}"
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport() {
        // Port 1 is never listening in test environments.
        let result = test_client().get("http://127.0.0.1:1/").send().await;
        assert!(matches!(result, Err(HttpError::Transport(_))), "{result:?}");
    }

    #[tokio::test]
    async fn test_gzip_response_decompressed() {
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(br#"{"total_count":3}"#).unwrap();
        let compressed = encoder.finish().unwrap();

        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(GET).path("/gz");
            then.status(200)
                .header("content-encoding", "gzip")
                .header("content-type", "application/json")
                .body(compressed.clone());
        });

        let url = format!("{}/gz", server.base_url());
        let value: serde_json::Value = test_client().get(&url).send().await.unwrap().json().await.unwrap();
        assert_eq!(value["total_count"], 3);
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_client() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET).path("/c");
            then.status(200).body("ok");
        });

        let client = test_client();
        let url = format!("{}/c", server.base_url());
        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let client = client.clone();
                let url = url.clone();
                tokio::spawn(async move { client.get(&url).send().await.unwrap().bytes().await })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), "ok");
        }
        m.assert_calls(20);
    }

    #[tokio::test]
    async fn test_http_rejected_with_tls_only() {
        let client = HttpClientBuilder::new().build().unwrap();
        match client.get("http://example.com/test").send().await {
            Err(HttpError::SchemeNotAllowed { scheme }) => assert_eq!(scheme, "http"),
            other => panic!("expected SchemeNotAllowed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_relative_and_unknown_scheme_rejected() {
        let client = test_client();
        assert!(matches!(
            client.get("/relative").send().await,
            Err(HttpError::InvalidUrl { ref url, .. }) if url == "/relative"
        ));
        assert!(matches!(
            client.get("ftp://example.com/x").send().await,
            Err(HttpError::SchemeNotAllowed { .. })
        ));
    }

    #[test]
    fn test_map_buffer_error_passes_through_http_error() {
        let err: tower::BoxError = Box::new(HttpError::Overloaded);
        assert!(matches!(map_buffer_error(err), HttpError::Overloaded));
    }

    #[test]
    fn test_map_buffer_error_unknown_is_service_closed() {
        let err: tower::BoxError = "worker gone".into();
        assert!(matches!(map_buffer_error(err), HttpError::ServiceClosed));
    }

    #[test]
    fn test_http_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }
}
