//! HTTP error types.
//!
//! - [`ErrorKind`]: the typed category of a failed response
//! - [`HttpResponseError`]: a final response with status >= 400
//! - [`InvalidHttpRequestError`]: a request rejected before sending
//! - [`HttpError`]: unified error for every transport failure
//!
//! # Example
//!
//! ```rust,ignore
//! use twitter_ads::clients::{ErrorKind, HttpError};
//!
//! match client.perform(request).await {
//!     Ok(response) => println!("{}", response.body),
//!     Err(HttpError::Response(e)) if e.kind == ErrorKind::RateLimit => {
//!         println!("rate limited, reset at {:?}", e.reset_at);
//!     }
//!     Err(e) => println!("request failed: {e}"),
//! }
//! ```

use std::fmt;

use thiserror::Error;

use crate::clients::http_response::HttpResponse;

/// The typed category of an error response, derived from its status code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 400
    BadRequest,
    /// 401
    NotAuthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 429
    RateLimit,
    /// 500
    ServerError,
    /// 503
    ServiceUnavailable,
    /// Any other status >= 400.
    Other,
}

impl ErrorKind {
    /// Maps a status code to its kind.
    ///
    /// ```rust
    /// use twitter_ads::clients::ErrorKind;
    ///
    /// assert_eq!(ErrorKind::from_status(429), ErrorKind::RateLimit);
    /// assert_eq!(ErrorKind::from_status(418), ErrorKind::Other);
    /// ```
    #[must_use]
    pub const fn from_status(code: u16) -> Self {
        match code {
            400 => Self::BadRequest,
            401 => Self::NotAuthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            429 => Self::RateLimit,
            500 => Self::ServerError,
            503 => Self::ServiceUnavailable,
            _ => Self::Other,
        }
    }

    /// Returns `true` for the preventable client errors.
    #[must_use]
    pub const fn is_client_error(self) -> bool {
        matches!(
            self,
            Self::BadRequest | Self::NotAuthorized | Self::Forbidden | Self::NotFound | Self::RateLimit
        )
    }

    /// Returns `true` for server-side failures.
    #[must_use]
    pub const fn is_server_error(self) -> bool {
        matches!(self, Self::ServerError | Self::ServiceUnavailable)
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "BadRequest",
            Self::NotAuthorized => "NotAuthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "NotFound",
            Self::RateLimit => "RateLimit",
            Self::ServerError => "ServerError",
            Self::ServiceUnavailable => "ServiceUnavailable",
            Self::Other => "Error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A final API response with a status code of 400 or above.
///
/// Only built through [`HttpResponseError::from_response`], so the kind
/// always agrees with the code.
#[derive(Clone, Debug, Error)]
#[error("{kind} (HTTP {code}): {message}")]
pub struct HttpResponseError {
    /// The typed category.
    pub kind: ErrorKind,
    /// The HTTP status code.
    pub code: u16,
    /// The first error message from the body, or the kind name.
    pub message: String,
    /// The `errors` array from the response body, if present.
    pub details: Option<serde_json::Value>,
    /// Value of the `retry-after` header (rate limit and service unavailable only).
    pub retry_after: Option<String>,
    /// Rate-limit reset time as epoch seconds (rate limit only).
    pub reset_at: Option<i64>,
    /// The `x-transaction-id` header, for support requests.
    pub request_id: Option<String>,
}

impl HttpResponseError {
    /// Builds the typed error for `response`.
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use twitter_ads::clients::{ErrorKind, HttpResponse, HttpResponseError};
    /// use serde_json::json;
    ///
    /// let body = json!({"errors": [{"code": "NOT_FOUND", "message": "Campaign not found"}]});
    /// let response = HttpResponse::new(404, HashMap::new(), body);
    /// let error = HttpResponseError::from_response(&response);
    ///
    /// assert_eq!(error.kind, ErrorKind::NotFound);
    /// assert_eq!(error.message, "Campaign not found");
    /// assert!(error.details.is_some());
    /// ```
    #[must_use]
    pub fn from_response(response: &HttpResponse) -> Self {
        let kind = ErrorKind::from_status(response.code);
        let details = response.body.get("errors").cloned();

        let message = details
            .as_ref()
            .and_then(|errors| errors.get(0))
            .and_then(|first| first.get("message"))
            .and_then(serde_json::Value::as_str)
            .map_or_else(|| kind.to_string(), ToString::to_string);

        let retry_after = match kind {
            ErrorKind::RateLimit | ErrorKind::ServiceUnavailable => {
                response.header("retry-after").map(ToString::to_string)
            }
            _ => None,
        };

        let reset_at = if kind == ErrorKind::RateLimit {
            response.rate_limits.reset_at()
        } else {
            None
        };

        Self {
            kind,
            code: response.code,
            message,
            details,
            retry_after,
            reset_at,
            request_id: response.request_id().map(ToString::to_string),
        }
    }
}

/// A request rejected before it was sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The HTTP method is not one of get, put, post or delete.
    #[error("Error! {method} is not an allowed HTTP method type.")]
    InvalidMethod {
        /// The rejected method.
        method: String,
    },

    /// A request body was provided without specifying the body type.
    #[error("Cannot set a body without also setting body_type.")]
    MissingBodyType,

    /// The request URL could not be built.
    #[error("Invalid request URL '{url}'.")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The final response had a status code >= 400.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error, including non-retried timeouts.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request signer refused the request.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// A gzip body could not be decompressed.
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] std::io::Error),
}

impl HttpError {
    /// Returns the response error kind, if this is a response error.
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Response(e) => Some(e.kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn response(code: u16, headers: &[(&str, &str)], body: serde_json::Value) -> HttpResponse {
        let headers = headers
            .iter()
            .map(|(k, v)| ((*k).to_string(), vec![(*v).to_string()]))
            .collect::<HashMap<_, _>>();
        HttpResponse::new(code, headers, body)
    }

    #[test]
    fn test_status_mapping_covers_documented_codes() {
        let expected = [
            (400, ErrorKind::BadRequest),
            (401, ErrorKind::NotAuthorized),
            (403, ErrorKind::Forbidden),
            (404, ErrorKind::NotFound),
            (429, ErrorKind::RateLimit),
            (500, ErrorKind::ServerError),
            (503, ErrorKind::ServiceUnavailable),
            (502, ErrorKind::Other),
            (422, ErrorKind::Other),
        ];
        for (code, kind) in expected {
            assert_eq!(ErrorKind::from_status(code), kind, "status {code}");
        }
    }

    #[test]
    fn test_error_families() {
        assert!(ErrorKind::RateLimit.is_client_error());
        assert!(!ErrorKind::RateLimit.is_server_error());
        assert!(ErrorKind::ServiceUnavailable.is_server_error());
        assert!(!ErrorKind::Other.is_client_error());
        assert!(!ErrorKind::Other.is_server_error());
    }

    #[test]
    fn test_rate_limit_error_carries_retry_info() {
        let error = HttpResponseError::from_response(&response(
            429,
            &[("retry-after", "30"), ("x-account-rate-limit-reset", "1700000000")],
            json!({"errors": [{"message": "Rate limit exceeded"}]}),
        ));

        assert_eq!(error.kind, ErrorKind::RateLimit);
        assert_eq!(error.retry_after.as_deref(), Some("30"));
        assert_eq!(error.reset_at, Some(1_700_000_000));
        assert_eq!(error.message, "Rate limit exceeded");
    }

    #[test]
    fn test_service_unavailable_carries_retry_after_only() {
        let error = HttpResponseError::from_response(&response(
            503,
            &[("retry-after", "5"), ("x-rate-limit-reset", "1700000000")],
            json!({}),
        ));

        assert_eq!(error.kind, ErrorKind::ServiceUnavailable);
        assert_eq!(error.retry_after.as_deref(), Some("5"));
        assert!(error.reset_at.is_none());
        assert!(error.details.is_none());
    }

    #[test]
    fn test_error_without_errors_key_uses_kind_name() {
        let error = HttpResponseError::from_response(&response(
            403,
            &[("x-transaction-id", "txn-1")],
            json!("plain text body"),
        ));

        assert_eq!(error.message, "Forbidden");
        assert_eq!(error.request_id.as_deref(), Some("txn-1"));
        assert_eq!(error.to_string(), "Forbidden (HTTP 403): Forbidden");
    }

    #[test]
    fn test_invalid_method_message() {
        let error = InvalidHttpRequestError::InvalidMethod {
            method: "patch".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Error! patch is not an allowed HTTP method type."
        );
    }

    #[test]
    fn test_http_error_kind_accessor() {
        let error: HttpError = HttpResponseError::from_response(&response(500, &[], json!({}))).into();
        assert_eq!(error.kind(), Some(ErrorKind::ServerError));

        let error: HttpError = InvalidHttpRequestError::MissingBodyType.into();
        assert_eq!(error.kind(), None);
    }
}
