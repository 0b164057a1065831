//! Translation of transport errors into directory error categories.

use usersearch_http::HttpError;
use user_directory_sdk::DirectoryError;

use super::dto::ErrorBody;

/// Map an `HttpError` from a call about `resource` onto a `DirectoryError`.
///
/// | status / failure            | result               |
/// |-----------------------------|----------------------|
/// | 403, 429                    | `RateLimited`        |
/// | 404                         | `NotFound`           |
/// | 422                         | `InvalidQuery`       |
/// | 5xx                         | `ServiceUnavailable` |
/// | timeout, connect, TLS       | `Network`            |
/// | anything else               | `Unknown`            |
#[must_use]
pub fn map_http_error(err: HttpError, resource: &str) -> DirectoryError {
    match err {
        HttpError::Status {
            status,
            body_preview,
            retry_after,
        } => match status.as_u16() {
            403 | 429 => {
                tracing::warn!(
                    status = status.as_u16(),
                    retry_after_secs = retry_after.map(|d| d.as_secs()),
                    "directory rate limit hit"
                );
                DirectoryError::rate_limited(retry_after)
            }
            404 => DirectoryError::not_found(resource),
            422 => DirectoryError::invalid_query(upstream_message(&body_preview)),
            code if status.is_server_error() => DirectoryError::service_unavailable(code),
            code => DirectoryError::unknown(format!(
                "{} ({code})",
                upstream_message(&body_preview)
            )),
        },
        err if err.is_network() => DirectoryError::network(err.to_string()),
        other => DirectoryError::unknown(other.to_string()),
    }
}

/// GitHub's `message` field if the body is a JSON error, else the raw preview.
fn upstream_message(body_preview: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body_preview) {
        Ok(body) => body.message,
        Err(_) if body_preview.trim().is_empty() => "API Error".to_owned(),
        Err(_) => body_preview.trim().to_owned(),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::time::Duration;
    use user_directory_sdk::ErrorCategory;

    fn status(code: u16, body: &str) -> HttpError {
        HttpError::Status {
            status: http::StatusCode::from_u16(code).unwrap(),
            body_preview: body.to_owned(),
            retry_after: None,
        }
    }

    #[test]
    fn forbidden_and_too_many_requests_are_rate_limits() {
        assert_eq!(
            map_http_error(status(403, "{}"), "search").category(),
            ErrorCategory::RateLimited
        );
        let err = HttpError::Status {
            status: http::StatusCode::TOO_MANY_REQUESTS,
            body_preview: String::new(),
            retry_after: Some(Duration::from_secs(60)),
        };
        assert_eq!(
            map_http_error(err, "search"),
            DirectoryError::rate_limited(Some(Duration::from_secs(60)))
        );
    }

    #[test]
    fn not_found_names_the_resource() {
        assert_eq!(
            map_http_error(status(404, r#"{"message":"Not Found"}"#), "octocat"),
            DirectoryError::not_found("octocat")
        );
    }

    #[test]
    fn unprocessable_keeps_upstream_message() {
        let err = map_http_error(
            status(422, r#"{"message":"Validation Failed","errors":[]}"#),
            "search",
        );
        assert_eq!(err, DirectoryError::invalid_query("Validation Failed"));
        assert_eq!(err.category(), ErrorCategory::InvalidQuery);
    }

    #[test]
    fn server_errors_are_unavailable() {
        for code in [500, 502, 503] {
            assert_eq!(
                map_http_error(status(code, ""), "search"),
                DirectoryError::service_unavailable(code)
            );
        }
    }

    #[test]
    fn other_statuses_are_unknown_with_message_and_code() {
        assert_eq!(
            map_http_error(status(418, r#"{"message":"teapot"}"#), "search"),
            DirectoryError::unknown("teapot (418)")
        );
        assert_eq!(
            map_http_error(status(400, ""), "search"),
            DirectoryError::unknown("API Error (400)")
        );
    }

    #[test]
    fn timeouts_are_network_errors() {
        let err = map_http_error(HttpError::Timeout(Duration::from_secs(10)), "search");
        assert_eq!(err.category(), ErrorCategory::NetworkError);
    }

    #[test]
    fn decode_failures_are_unknown() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = map_http_error(HttpError::Decode(json_err), "search");
        assert_eq!(err.category(), ErrorCategory::Unknown);
        assert_eq!(
            map_http_error(HttpError::Overloaded, "search").category(),
            ErrorCategory::Unknown
        );
    }
}
