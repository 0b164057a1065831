//! GET request builder.

use bytes::Bytes;
use http::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use http::{Request, Uri};
use http_body_util::Full;
use std::time::Duration;
use tower::Service;

use crate::client::{BufferedService, map_buffer_error, try_acquire_buffer_slot};
use crate::config::TransportSecurity;
use crate::error::HttpError;
use crate::response::{Deadline, HttpResponse};

/// Parse a header pair, naming the offending header on failure.
pub fn header_pair(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), HttpError> {
    let header_name =
        HeaderName::try_from(name).map_err(|e| HttpError::invalid_header(name, &e))?;
    let header_value =
        HeaderValue::try_from(value).map_err(|e| HttpError::invalid_header(name, &e))?;
    Ok((header_name, header_value))
}

/// Parse an absolute URL and check its scheme against `transport`.
pub fn parse_target(url: &str, transport: TransportSecurity) -> Result<Uri, HttpError> {
    let invalid = |reason| HttpError::InvalidUrl {
        url: url.to_owned(),
        reason,
    };
    let uri: Uri = url.parse().map_err(|_| invalid("not a valid URI"))?;
    let Some(scheme) = uri.scheme_str() else {
        return Err(invalid("missing scheme"));
    };
    if uri.authority().is_none() {
        return Err(invalid("missing host"));
    }
    match (scheme, transport) {
        ("https", _) | ("http", TransportSecurity::AllowInsecureHttp) => Ok(uri),
        (other, _) => Err(HttpError::SchemeNotAllowed {
            scheme: other.to_owned(),
        }),
    }
}

/// Request builder returned by [`HttpClient::get`](crate::HttpClient::get).
///
/// Problems with the URL or a header are held until [`send`](Self::send), so
/// the chain itself never fails. Encode query parameters into the URL.
#[must_use = "a request does nothing until .send() is called"]
pub struct RequestBuilder {
    service: BufferedService,
    max_body_size: usize,
    timeout: Duration,
    target: Result<Uri, HttpError>,
    headers: HeaderMap,
    error: Option<HttpError>,
}

impl RequestBuilder {
    pub(crate) fn new(
        service: BufferedService,
        max_body_size: usize,
        timeout: Duration,
        target: Result<Uri, HttpError>,
    ) -> Self {
        Self {
            service,
            max_body_size,
            timeout,
            target,
            headers: HeaderMap::new(),
            error: None,
        }
    }

    /// Append a header. Overrides a client default of the same name.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if self.error.is_none() {
            match header_pair(name, value) {
                Ok((name, value)) => {
                    self.headers.append(name, value);
                }
                Err(err) => self.error = Some(err),
            }
        }
        self
    }

    /// `Authorization: Bearer <token>`, flagged sensitive so it never shows
    /// up in `Debug` output.
    pub fn bearer_auth(mut self, token: &str) -> Self {
        if self.error.is_none() {
            match HeaderValue::try_from(format!("Bearer {token}")) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    self.headers.insert(AUTHORIZATION, value);
                }
                Err(_) => {
                    self.error = Some(HttpError::invalid_header(
                        AUTHORIZATION.as_str(),
                        &"token is not a valid header value",
                    ));
                }
            }
        }
        self
    }

    /// Send the request and wait for the response head.
    ///
    /// Any HTTP status is `Ok`; read the body with
    /// [`HttpResponse::json`] to have non-2xx reported as an error. The
    /// client timeout starts here and also bounds the later body read.
    ///
    /// # Errors
    /// A deferred URL or header error, `Overloaded` when the request queue is
    /// full, `Timeout`, or `Transport`.
    pub async fn send(self) -> Result<HttpResponse, HttpError> {
        let Self {
            mut service,
            max_body_size,
            timeout,
            target,
            headers,
            error,
        } = self;
        if let Some(err) = error {
            return Err(err);
        }
        let deadline = Deadline::after(timeout);

        let mut request = Request::get(target?).body(Full::new(Bytes::new()))?;
        *request.headers_mut() = headers;

        try_acquire_buffer_slot(&mut service).await?;
        let response = service.call(request).await.map_err(map_buffer_error)?;
        Ok(HttpResponse::new(response, max_body_size, deadline))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn target_requires_absolute_url() {
        for url in ["/relative", "example.com/x", "not a url"] {
            assert!(
                matches!(
                    parse_target(url, TransportSecurity::AllowInsecureHttp),
                    Err(HttpError::InvalidUrl { .. })
                ),
                "{url}"
            );
        }
    }

    #[test]
    fn target_scheme_follows_transport_policy() {
        assert!(parse_target("https://api.github.com/users", TransportSecurity::TlsOnly).is_ok());
        assert!(parse_target("http://127.0.0.1:8080/", TransportSecurity::AllowInsecureHttp).is_ok());

        match parse_target("http://api.github.com/", TransportSecurity::TlsOnly) {
            Err(HttpError::SchemeNotAllowed { scheme }) => assert_eq!(scheme, "http"),
            other => panic!("expected SchemeNotAllowed, got {other:?}"),
        }
        assert!(matches!(
            parse_target("ftp://example.com/x", TransportSecurity::AllowInsecureHttp),
            Err(HttpError::SchemeNotAllowed { .. })
        ));
    }

    #[test]
    fn header_pair_names_bad_header() {
        assert!(header_pair("x-github-api-version", "2022-11-28").is_ok());
        match header_pair("bad header", "v") {
            Err(HttpError::InvalidHeader { name, .. }) => assert_eq!(name, "bad header"),
            other => panic!("expected InvalidHeader, got {other:?}"),
        }
        assert!(header_pair("x-ok", "line\nbreak").is_err());
    }
}
