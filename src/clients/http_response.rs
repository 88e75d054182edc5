//! HTTP response types.
//!
//! [`HttpResponse`] carries the status code, lowercase headers, the decoded
//! body and the raw bytes, plus the rate-limit headers parsed into
//! [`RateLimits`].

use std::collections::HashMap;
use std::io::Read;

use flate2::read::GzDecoder;

/// A deprecation notice sent in the `x-api-warn` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiDeprecationInfo {
    /// The warning text.
    pub reason: String,
    /// The request path that triggered the notice, if known.
    pub path: Option<String>,
}

/// One rate-limit bucket parsed from `<prefix>-limit`, `<prefix>-remaining`
/// and `<prefix>-reset` headers.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use twitter_ads::clients::RateLimit;
///
/// let mut headers = HashMap::new();
/// headers.insert("x-rate-limit-limit".to_string(), vec!["450".to_string()]);
/// headers.insert("x-rate-limit-remaining".to_string(), vec!["449".to_string()]);
/// headers.insert("x-rate-limit-reset".to_string(), vec!["1700000000".to_string()]);
///
/// let limit = RateLimit::parse(&headers, "x-rate-limit").unwrap();
/// assert_eq!(limit.limit, Some(450));
/// assert_eq!(limit.remaining, Some(449));
/// assert_eq!(limit.reset, Some(1_700_000_000));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RateLimit {
    /// Requests allowed in the window.
    pub limit: Option<u64>,
    /// Requests left in the window.
    pub remaining: Option<u64>,
    /// Window reset time as epoch seconds.
    pub reset: Option<i64>,
}

impl RateLimit {
    /// Parses the bucket with header prefix `prefix`.
    ///
    /// Returns `None` when none of the three headers is present.
    #[must_use]
    pub fn parse(headers: &HashMap<String, Vec<String>>, prefix: &str) -> Option<Self> {
        let value = |suffix: &str| {
            headers
                .get(&format!("{prefix}-{suffix}"))
                .and_then(|values| values.first())
                .map(|value| value.trim().to_string())
        };

        let limit = value("limit");
        let remaining = value("remaining");
        let reset = value("reset");
        if limit.is_none() && remaining.is_none() && reset.is_none() {
            return None;
        }

        Some(Self {
            limit: limit.and_then(|v| v.parse().ok()),
            remaining: remaining.and_then(|v| v.parse().ok()),
            reset: reset.and_then(|v| parse_reset(&v)),
        })
    }
}

/// Reset headers are epoch seconds; cost limits may send an RFC 3339 time.
fn parse_reset(value: &str) -> Option<i64> {
    value.parse::<i64>().ok().or_else(|| {
        chrono::DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|time| time.timestamp())
    })
}

/// The rate-limit buckets reported on a response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RateLimits {
    /// `x-rate-limit-*`: per user and endpoint.
    pub standard: Option<RateLimit>,
    /// `x-account-rate-limit-*`: per ads account and endpoint.
    pub account: Option<RateLimit>,
    /// `x-cost-rate-limit-*`: cost-based limits.
    pub cost: Option<RateLimit>,
}

impl RateLimits {
    /// Parses every bucket present in `headers`.
    #[must_use]
    pub fn from_headers(headers: &HashMap<String, Vec<String>>) -> Self {
        Self {
            standard: RateLimit::parse(headers, "x-rate-limit"),
            account: RateLimit::parse(headers, "x-account-rate-limit"),
            cost: RateLimit::parse(headers, "x-cost-rate-limit"),
        }
    }

    /// Returns the reset time to wait for: account, then standard, then cost.
    #[must_use]
    pub fn reset_at(&self) -> Option<i64> {
        [self.account, self.standard, self.cost]
            .into_iter()
            .flatten()
            .find_map(|limit| limit.reset)
    }

    /// Returns `true` if no bucket was reported.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.standard.is_none() && self.account.is_none() && self.cost.is_none()
    }
}

/// A response from the Ads API.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, keys lowercased (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed body, or the body text as a JSON string when it is not JSON.
    pub body: serde_json::Value,
    /// The body bytes as received.
    pub raw_body: Vec<u8>,
    /// Rate-limit buckets parsed from the headers.
    pub rate_limits: RateLimits,
}

impl HttpResponse {
    /// Creates a response from an already decoded body.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: serde_json::Value) -> Self {
        let rate_limits = RateLimits::from_headers(&headers);
        Self {
            code,
            headers,
            body,
            raw_body: Vec::new(),
            rate_limits,
        }
    }

    /// Creates a response from the raw body bytes.
    ///
    /// A body labelled `content-type: application/gzip` is decompressed
    /// first. The text is then parsed as JSON; text that is not JSON is kept
    /// as a JSON string and an empty body becomes `null`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if a gzip body cannot be decompressed.
    pub fn from_raw(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        raw_body: Vec<u8>,
    ) -> Result<Self, std::io::Error> {
        let is_gzip = content_type_is_gzip(&headers);

        let text = if is_gzip {
            let mut decoded = String::new();
            GzDecoder::new(raw_body.as_slice()).read_to_string(&mut decoded)?;
            decoded
        } else {
            String::from_utf8_lossy(&raw_body).into_owned()
        };

        let body = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
        };

        let mut response = Self::new(code, headers, body);
        response.raw_body = raw_body;
        Ok(response)
    }

    /// Returns `true` for status codes below 400.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code < 400
    }

    /// Returns `true` for status codes in `400..=599`.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.code >= 400 && self.code <= 599
    }

    /// Returns `true` if the body was served as a gzip file.
    #[must_use]
    pub fn is_gzip(&self) -> bool {
        content_type_is_gzip(&self.headers)
    }

    /// Returns the first value of a header (name is case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `x-transaction-id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-transaction-id")
    }

    /// Returns the `x-api-warn` header value, if present.
    #[must_use]
    pub fn deprecation_reason(&self) -> Option<&str> {
        self.header("x-api-warn")
    }

    /// Returns structured deprecation information, if any.
    #[must_use]
    pub fn deprecation_info(&self, path: Option<&str>) -> Option<ApiDeprecationInfo> {
        self.deprecation_reason().map(|reason| ApiDeprecationInfo {
            reason: reason.to_string(),
            path: path.map(ToString::to_string),
        })
    }

    /// Returns the `data` member of the body.
    #[must_use]
    pub fn data(&self) -> Option<&serde_json::Value> {
        self.body.get("data")
    }

    /// Returns the pagination token, or `None` on the last page.
    #[must_use]
    pub fn next_cursor(&self) -> Option<String> {
        match self.body.get("next_cursor") {
            Some(serde_json::Value::String(cursor)) if !cursor.is_empty() => Some(cursor.clone()),
            Some(serde_json::Value::Number(cursor)) => Some(cursor.to_string()),
            _ => None,
        }
    }

    /// Returns the server-reported collection size, if present.
    #[must_use]
    pub fn total_count(&self) -> Option<u64> {
        match self.body.get("total_count")? {
            serde_json::Value::Number(count) => count.as_u64(),
            serde_json::Value::String(count) => count.parse().ok(),
            _ => None,
        }
    }
}

fn content_type_is_gzip(headers: &HashMap<String, Vec<String>>) -> bool {
    headers
        .get("content-type")
        .and_then(|values| values.first())
        .is_some_and(|value| value.trim().starts_with("application/gzip"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use serde_json::json;
    use std::io::Write;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), vec![(*v).to_string()]))
            .collect()
    }

    #[test]
    fn test_json_body_is_parsed() {
        let response =
            HttpResponse::from_raw(200, HashMap::new(), br#"{"data": [1, 2]}"#.to_vec()).unwrap();

        assert_eq!(response.data(), Some(&json!([1, 2])));
        assert_eq!(response.raw_body, br#"{"data": [1, 2]}"#.to_vec());
    }

    #[test]
    fn test_non_json_body_is_kept_as_text() {
        let response =
            HttpResponse::from_raw(502, HashMap::new(), b"<html>Bad Gateway</html>".to_vec())
                .unwrap();

        assert_eq!(response.body, json!("<html>Bad Gateway</html>"));
        assert!(response.is_error());
    }

    #[test]
    fn test_empty_body_is_null() {
        let response = HttpResponse::from_raw(204, HashMap::new(), Vec::new()).unwrap();
        assert!(response.body.is_null());
        assert!(response.is_success());
    }

    #[test]
    fn test_gzip_body_is_decompressed_before_parsing() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(br#"{"data": [{"id": "job-1"}]}"#)
            .unwrap();
        let compressed = encoder.finish().unwrap();

        let response = HttpResponse::from_raw(
            200,
            headers(&[("content-type", "application/gzip")]),
            compressed,
        )
        .unwrap();

        assert!(response.is_gzip());
        assert_eq!(response.body["data"][0]["id"], "job-1");
    }

    #[test]
    fn test_corrupt_gzip_body_is_an_error() {
        let result = HttpResponse::from_raw(
            200,
            headers(&[("content-type", "application/gzip")]),
            b"not gzip".to_vec(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rate_limit_buckets_are_parsed() {
        let response = HttpResponse::new(
            200,
            headers(&[
                ("x-account-rate-limit-limit", "10000"),
                ("x-account-rate-limit-remaining", "9999"),
                ("x-account-rate-limit-reset", "1700000100"),
                ("x-rate-limit-reset", "1700000200"),
            ]),
            json!({}),
        );

        let account = response.rate_limits.account.unwrap();
        assert_eq!(account.limit, Some(10000));
        assert_eq!(account.remaining, Some(9999));
        assert_eq!(response.rate_limits.standard.unwrap().limit, None);
        assert!(response.rate_limits.cost.is_none());
        assert_eq!(response.rate_limits.reset_at(), Some(1_700_000_100));
    }

    #[test]
    fn test_cost_reset_accepts_rfc3339() {
        let limits = RateLimits::from_headers(&headers(&[(
            "x-cost-rate-limit-reset",
            "2023-11-14T22:13:20Z",
        )]));
        assert_eq!(limits.reset_at(), Some(1_700_000_000));
    }

    #[test]
    fn test_no_rate_limit_headers() {
        let response = HttpResponse::new(200, HashMap::new(), json!({}));
        assert!(response.rate_limits.is_empty());
        assert!(response.rate_limits.reset_at().is_none());
    }

    #[test]
    fn test_pagination_fields() {
        let response = HttpResponse::new(
            200,
            HashMap::new(),
            json!({"data": [], "next_cursor": "abc", "total_count": 42}),
        );
        assert_eq!(response.next_cursor().as_deref(), Some("abc"));
        assert_eq!(response.total_count(), Some(42));

        let last = HttpResponse::new(200, HashMap::new(), json!({"data": [], "next_cursor": null}));
        assert!(last.next_cursor().is_none());
        assert!(last.total_count().is_none());
    }

    #[test]
    fn test_deprecation_header() {
        let response = HttpResponse::new(
            200,
            headers(&[("x-api-warn", "Version 10 is deprecated")]),
            json!({}),
        );

        let info = response.deprecation_info(Some("/10/accounts")).unwrap();
        assert_eq!(info.reason, "Version 10 is deprecated");
        assert_eq!(info.path.as_deref(), Some("/10/accounts"));
    }
}
