use crate::error::HttpError;
use crate::request::header_pair;
use http::header::USER_AGENT;
use http::{HeaderMap, Request, Response};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Tower layer that adds a fixed set of headers to every request.
///
/// Headers the caller already set on the request are left untouched.
#[derive(Clone)]
pub struct DefaultHeadersLayer {
    headers: Arc<HeaderMap>,
}

impl DefaultHeadersLayer {
    /// Build the layer from a user agent plus extra `(name, value)` pairs.
    ///
    /// # Errors
    /// Returns `HttpError::InvalidHeader` for a malformed name or value.
    pub fn try_new<I, K, V>(user_agent: impl AsRef<str>, extra: I) -> Result<Self, HttpError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut headers = HeaderMap::new();
        let (_, agent) = header_pair(USER_AGENT.as_str(), user_agent.as_ref())?;
        headers.insert(USER_AGENT, agent);
        for (name, value) in extra {
            let (name, value) = header_pair(name.as_ref(), value.as_ref())?;
            headers.insert(name, value);
        }
        Ok(Self {
            headers: Arc::new(headers),
        })
    }
}

impl<S> Layer<S> for DefaultHeadersLayer {
    type Service = DefaultHeadersService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        DefaultHeadersService {
            inner,
            headers: Arc::clone(&self.headers),
        }
    }
}

/// Service that fills in missing default headers
#[derive(Clone)]
pub struct DefaultHeadersService<S> {
    inner: S,
    headers: Arc<HeaderMap>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for DefaultHeadersService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        for (name, value) in self.headers.iter() {
            if !req.headers().contains_key(name) {
                req.headers_mut().insert(name.clone(), value.clone());
            }
        }
        self.inner.call(req)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{Method, StatusCode};
    use http_body_util::Full;
    use tower::ServiceExt;

    /// Echoes the request headers back in the response.
    #[derive(Clone)]
    struct EchoHeaders;

    impl Service<Request<Full<Bytes>>> for EchoHeaders {
        type Response = Response<HeaderMap>;
        type Error = Box<dyn std::error::Error + Send + Sync>;
        type Future = std::future::Ready<Result<Self::Response, Self::Error>>;

        fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: Request<Full<Bytes>>) -> Self::Future {
            let headers = req.headers().clone();
            std::future::ready(Ok(Response::builder()
                .status(StatusCode::OK)
                .body(headers)
                .unwrap()))
        }
    }

    fn request(headers: &[(&str, &str)]) -> Request<Full<Bytes>> {
        let mut builder = Request::builder()
            .method(Method::GET)
            .uri("http://example.com");
        for (k, v) in headers {
            builder = builder.header(*k, *v);
        }
        builder.body(Full::new(Bytes::new())).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_added() {
        let layer = DefaultHeadersLayer::try_new(
            "test-agent/1.0",
            [("accept", "application/vnd.github+json")],
        )
        .unwrap();
        let resp = layer.layer(EchoHeaders).oneshot(request(&[])).await.unwrap();
        let headers = resp.into_body();

        assert_eq!(headers[USER_AGENT], "test-agent/1.0");
        assert_eq!(headers["accept"], "application/vnd.github+json");
    }

    #[tokio::test]
    async fn test_caller_headers_not_overwritten() {
        let layer = DefaultHeadersLayer::try_new("test-agent/1.0", [("accept", "text/plain")])
            .unwrap();
        let resp = layer
            .layer(EchoHeaders)
            .oneshot(request(&[("user-agent", "custom/2.0"), ("accept", "*/*")]))
            .await
            .unwrap();
        let headers = resp.into_body();

        assert_eq!(headers[USER_AGENT], "custom/2.0");
        assert_eq!(headers["accept"], "*/*");
        assert_eq!(headers.get_all("accept").iter().count(), 1);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let no_extra: [(&str, &str); 0] = [];
        assert!(DefaultHeadersLayer::try_new("invalid\x00agent", no_extra).is_err());
        assert!(DefaultHeadersLayer::try_new("ok", [("bad header", "v")]).is_err());
    }
}
