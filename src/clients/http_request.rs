//! HTTP request types.
//!
//! An [`HttpRequest`] is immutable once built and performs no I/O until it is
//! handed to [`HttpClient::perform`](crate::clients::HttpClient::perform).

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::clients::errors::InvalidHttpRequestError;

/// HTTP methods accepted by the Ads API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for updating resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Put => write!(f, "put"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

impl FromStr for HttpMethod {
    type Err = InvalidHttpRequestError;

    /// Parses a method name case-insensitively.
    ///
    /// ```rust
    /// use twitter_ads::clients::HttpMethod;
    ///
    /// assert_eq!("PUT".parse::<HttpMethod>().unwrap(), HttpMethod::Put);
    /// assert!("patch".parse::<HttpMethod>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "post" => Ok(Self::Post),
            "put" => Ok(Self::Put),
            "delete" => Ok(Self::Delete),
            other => Err(InvalidHttpRequestError::InvalidMethod {
                method: other.to_string(),
            }),
        }
    }
}

/// Content type for HTTP request bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType {
    /// JSON content type (`application/json`).
    Json,
    /// Form content type (`application/x-www-form-urlencoded`).
    FormUrlEncoded,
}

impl DataType {
    /// Returns the MIME type string for this data type.
    #[must_use]
    pub const fn as_content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
        }
    }
}

/// A request to the Ads API.
///
/// Most endpoints take their parameters in the query string, including
/// `POST` and `PUT`; only batch endpoints send a JSON body.
///
/// # Example
///
/// ```rust
/// use twitter_ads::clients::{DataType, HttpMethod, HttpRequest};
/// use serde_json::json;
///
/// let list = HttpRequest::builder(HttpMethod::Get, "/12/accounts/abc/campaigns")
///     .query_param("count", "200")
///     .build()
///     .unwrap();
///
/// let batch = HttpRequest::builder(HttpMethod::Post, "/12/batch/accounts/abc/campaigns")
///     .body(json!([{"operation_type": "Create", "params": {"name": "x"}}]))
///     .body_type(DataType::Json)
///     .build()
///     .unwrap();
/// # let _ = (list, batch);
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The absolute path, e.g. `/12/accounts/abc/campaigns`.
    pub path: String,
    /// The request body, if any.
    pub body: Option<serde_json::Value>,
    /// The content type of the body.
    pub body_type: Option<DataType>,
    /// Query parameters to append to the URL.
    pub query: Option<HashMap<String, String>>,
    /// Additional headers to include in the request.
    pub extra_headers: Option<HashMap<String, String>>,
    /// Domain overriding the client's domain for this request only.
    pub domain: Option<String>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::MissingBodyType`] if `body` is set
    /// without `body_type`.
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.body.is_some() && self.body_type.is_none() {
            return Err(InvalidHttpRequestError::MissingBodyType);
        }
        Ok(())
    }

    /// Returns a copy of this request with one query parameter set.
    ///
    /// Used to request the next page of a collection.
    #[must_use]
    pub fn with_query_param(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut request = self.clone();
        request
            .query
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        request
    }

    /// Returns the value of a query parameter, if set.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .as_ref()
            .and_then(|query| query.get(key))
            .map(String::as_str)
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    path: String,
    body: Option<serde_json::Value>,
    body_type: Option<DataType>,
    query: Option<HashMap<String, String>>,
    extra_headers: Option<HashMap<String, String>>,
    domain: Option<String>,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            path: path.into(),
            body: None,
            body_type: None,
            query: None,
            extra_headers: None,
            domain: None,
        }
    }

    /// Sets the request body.
    ///
    /// When setting a body, you must also set the body type via [`body_type`](Self::body_type).
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the content type of the request body.
    #[must_use]
    pub const fn body_type(mut self, body_type: DataType) -> Self {
        self.body_type = Some(body_type);
        self
    }

    /// Sets all query parameters at once.
    #[must_use]
    pub fn query(mut self, query: HashMap<String, String>) -> Self {
        self.query = Some(query);
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Adds a single extra header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Sends this request to `domain` (scheme and host) instead of the
    /// client's domain.
    #[must_use]
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let request = HttpRequest {
            http_method: self.http_method,
            path: self.path,
            body: self.body,
            body_type: self.body_type,
            query: self.query,
            extra_headers: self.extra_headers,
            domain: self.domain,
        };
        request.verify()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_method_display_and_parse() {
        for method in [
            HttpMethod::Get,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Delete,
        ] {
            assert_eq!(method.to_string().parse::<HttpMethod>().unwrap(), method);
        }
        assert_eq!("Delete".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
    }

    #[test]
    fn test_unsupported_method_is_rejected() {
        assert_eq!(
            "PATCH".parse::<HttpMethod>(),
            Err(InvalidHttpRequestError::InvalidMethod {
                method: "patch".to_string()
            })
        );
    }

    #[test]
    fn test_data_type_content_type() {
        assert_eq!(DataType::Json.as_content_type(), "application/json");
        assert_eq!(
            DataType::FormUrlEncoded.as_content_type(),
            "application/x-www-form-urlencoded"
        );
    }

    #[test]
    fn test_post_without_body_is_valid() {
        let request = HttpRequest::builder(HttpMethod::Post, "/12/accounts/abc/campaigns")
            .query_param("name", "launch")
            .build()
            .unwrap();

        assert_eq!(request.http_method, HttpMethod::Post);
        assert!(request.body.is_none());
        assert_eq!(request.query_value("name"), Some("launch"));
    }

    #[test]
    fn test_verify_requires_body_type_when_body_present() {
        let result = HttpRequest::builder(HttpMethod::Post, "/x")
            .body(json!({"key": "value"}))
            .build();

        assert_eq!(result.unwrap_err(), InvalidHttpRequestError::MissingBodyType);
    }

    #[test]
    fn test_with_query_param_leaves_original_untouched() {
        let request = HttpRequest::builder(HttpMethod::Get, "/12/accounts")
            .query_param("count", "10")
            .build()
            .unwrap();

        let next = request.with_query_param("cursor", "abc");

        assert_eq!(next.query_value("cursor"), Some("abc"));
        assert_eq!(next.query_value("count"), Some("10"));
        assert!(request.query_value("cursor").is_none());
    }

    #[test]
    fn test_builder_sets_headers_and_domain() {
        let request = HttpRequest::builder(HttpMethod::Get, "/data/job.json.gz")
            .header("Accept", "*/*")
            .domain("https://ton.twimg.com")
            .build()
            .unwrap();

        assert_eq!(request.domain.as_deref(), Some("https://ton.twimg.com"));
        assert_eq!(
            request.extra_headers.unwrap().get("Accept"),
            Some(&"*/*".to_string())
        );
    }
}
