//! Assembles the tower stack behind [`HttpClient`].

use bytes::Bytes;
use http::Response;
use http_body_util::{BodyExt, Full};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use std::time::Duration;
use tower::buffer::Buffer;
use tower::timeout::TimeoutLayer;
use tower::{ServiceBuilder, ServiceExt};
use tower_http::decompression::DecompressionLayer;

use crate::client::HttpClient;
use crate::config::{HttpClientConfig, PoolConfig, TlsRootConfig, TransportSecurity};
use crate::error::HttpError;
use crate::layers::DefaultHeadersLayer;
use crate::response::ResponseBody;
use crate::tls;

type PooledClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

#[derive(Debug, Clone, Default)]
pub struct HttpClientBuilder {
    config: HttpClientConfig,
}

impl HttpClientBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: HttpClientConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Send `name: value` on every request that does not set `name` itself.
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config
            .default_headers
            .push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn max_body_size(mut self, bytes: usize) -> Self {
        self.config.max_body_size = bytes;
        self
    }

    #[must_use]
    pub fn transport(mut self, transport: TransportSecurity) -> Self {
        self.config.transport = transport;
        self
    }

    #[must_use]
    pub fn tls_roots(mut self, roots: TlsRootConfig) -> Self {
        self.config.tls_roots = roots;
        self
    }

    /// Zero becomes 1; the buffer channel cannot be empty.
    #[must_use]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity.max(1);
        self
    }

    /// Build the client. The request queue spawns its worker here, so this
    /// must run inside a Tokio runtime.
    ///
    /// # Errors
    /// `InvalidHeader` for a bad user agent or default header, `Tls` when the
    /// root store cannot be loaded.
    pub fn build(self) -> Result<HttpClient, HttpError> {
        let HttpClientConfig {
            request_timeout,
            max_body_size,
            user_agent,
            default_headers,
            transport,
            tls_roots,
            queue_capacity,
            pool,
        } = self.config;

        if transport.allows_plain_http() {
            tracing::warn!("plain HTTP allowed; traffic to http:// URLs is not encrypted");
        }

        let headers = DefaultHeadersLayer::try_new(
            &user_agent,
            default_headers
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        )?;
        let pooled = pooled_client(https_connector(tls_roots, transport)?, &pool);

        // Buffer -> error mapping -> Timeout -> DefaultHeaders -> Decompression -> hyper.
        // Every HTTP status is a successful response at this level.
        let stack = ServiceBuilder::new()
            .layer(TimeoutLayer::new(request_timeout))
            .layer(headers)
            .layer(DecompressionLayer::new())
            .service(pooled)
            .map_response(box_body)
            .map_err(move |err: tower::BoxError| flatten_error(err, request_timeout))
            .boxed_clone();

        Ok(HttpClient {
            service: Buffer::new(stack, queue_capacity.max(1)),
            max_body_size,
            request_timeout,
            transport,
        })
    }
}

fn pooled_client(connector: HttpsConnector<HttpConnector>, pool: &PoolConfig) -> PooledClient {
    let mut builder = Client::builder(TokioExecutor::new());
    // idle expiry needs a timer
    builder
        .pool_timer(TokioTimer::new())
        .pool_idle_timeout(pool.idle_timeout)
        .pool_max_idle_per_host(pool.max_idle_per_host);
    builder.build(connector)
}

fn https_connector(
    roots: TlsRootConfig,
    transport: TransportSecurity,
) -> Result<HttpsConnector<HttpConnector>, HttpError> {
    let with_roots = match roots {
        TlsRootConfig::WebPki => HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(tls::crypto_provider())
            .map_err(|err| HttpError::Tls(Box::new(err)))?,
        TlsRootConfig::Native => {
            HttpsConnectorBuilder::new().with_tls_config(tls::native_roots_client_config()?)
        }
    };
    let with_schemes = if transport.allows_plain_http() {
        with_roots.https_or_http()
    } else {
        with_roots.https_only()
    };
    Ok(with_schemes.enable_all_versions().build())
}

/// Timeouts become `Timeout`; errors raised as `HttpError` further in pass
/// through unchanged.
fn flatten_error(err: tower::BoxError, timeout: Duration) -> HttpError {
    if err.is::<tower::timeout::error::Elapsed>() {
        return HttpError::Timeout(timeout);
    }
    err.downcast::<HttpError>()
        .map_or_else(HttpError::Transport, |err| *err)
}

fn box_body<B>(response: Response<B>) -> Response<ResponseBody>
where
    B: http_body::Body<Data = Bytes> + Send + Sync + 'static,
    B::Error: Into<tower::BoxError>,
{
    response.map(|body| body.map_err(Into::into).boxed())
}
