//! HTTP transport for Ads API communication.
//!
//! [`HttpClient::perform`] executes one logical request. A logical request
//! may take several attempts: rate-limited responses are waited out when
//! `handle_rate_limit` is on, and transient statuses and timeouts are retried
//! within the [`RetryPolicy`](crate::config::RetryPolicy) budget. Whatever
//! the final response is, a status of 400 or above comes back as a typed
//! [`HttpResponseError`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::clients::errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
use crate::clients::http_request::{DataType, HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::clients::signer::{NoopSigner, RequestSigner, SigningContext};
use crate::config::ClientConfig;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for the Ads API.
///
/// The client handles:
/// - Domain selection (per-request override, configured domain, sandbox)
/// - Default headers including User-Agent
/// - Request signing through the configured [`RequestSigner`]
/// - Rate-limit waits and the retry budget
/// - Gzip and non-JSON response bodies
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`. It never issues requests concurrently on
/// its own: every attempt of one call is awaited before the next starts.
///
/// # Example
///
/// ```rust,ignore
/// use twitter_ads::clients::{HttpClient, HttpMethod, HttpRequest};
///
/// let client = HttpClient::new(config)?;
/// let request = HttpRequest::builder(HttpMethod::Get, "/12/accounts").build()?;
/// let response = client.perform(&request).await?;
/// println!("{}", response.body);
/// ```
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    config: ClientConfig,
    signer: Arc<dyn RequestSigner>,
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates an HTTP client that sends requests unsigned.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the TLS backend cannot be initialized.
    pub fn new(config: ClientConfig) -> Result<Self, HttpError> {
        Self::with_signer(config, Arc::new(NoopSigner))
    }

    /// Creates an HTTP client that signs every attempt with `signer`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the TLS backend cannot be initialized.
    pub fn with_signer(
        config: ClientConfig,
        signer: Arc<dyn RequestSigner>,
    ) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}twitter-ads version: {SDK_VERSION} platform: Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            config,
            signer,
            default_headers,
        })
    }

    /// Returns the configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the full URL `request` is sent to.
    #[must_use]
    pub fn url_for(&self, request: &HttpRequest) -> String {
        let domain = request
            .domain
            .as_deref()
            .unwrap_or_else(|| self.config.base_domain());
        format!("{}{}", domain.trim_end_matches('/'), request.path)
    }

    /// Performs `request`, retrying as configured.
    ///
    /// Each attempt is checked in order: success (status below 400), then
    /// rate-limit handling for 429, then the retry budget for statuses in
    /// `retry_on_status`. Rate-limit waits do not consume the budget.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - The signer fails (`Signing`)
    /// - A network error or non-retried timeout occurs (`Network`)
    /// - A gzip body cannot be decompressed (`Decode`)
    /// - The final response has status >= 400 (`Response`)
    pub async fn perform(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = self.url_for(request);
        reqwest::Url::parse(&url)
            .map_err(|_| InvalidHttpRequestError::InvalidUrl { url: url.clone() })?;

        let mut headers = self.default_headers.clone();
        if let Some(body_type) = &request.body_type {
            headers.insert(
                "Content-Type".to_string(),
                body_type.as_content_type().to_string(),
            );
        }
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.clone(), value.clone());
            }
        }

        let policy = self.config.retry_policy();
        let mut retries: u32 = 0;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            if self.config.trace() {
                tracing::debug!(
                    method = %request.http_method,
                    url = %url,
                    attempt,
                    "Sending Ads API request"
                );
            }

            let req_builder = self.build_attempt(request, &url, &headers)?;

            let (code, res_headers, raw_body) = match Self::execute(req_builder).await {
                Ok(received) => received,
                Err(err) if err.is_timeout() && policy.on_timeouts && retries < policy.max => {
                    retries += 1;
                    tracing::warn!(
                        url = %url,
                        retries,
                        "Request timed out, retrying in {:?}",
                        policy.delay
                    );
                    tokio::time::sleep(policy.delay).await;
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            let response = HttpResponse::from_raw(code, res_headers, raw_body)?;

            if self.config.trace() {
                tracing::debug!(
                    method = %request.http_method,
                    url = %url,
                    status = code,
                    request_id = response.request_id().unwrap_or_default(),
                    "Received Ads API response"
                );
            }

            if let Some(reason) = response.deprecation_reason() {
                tracing::warn!(
                    "Deprecated request to Ads API at {}, received warning: {}",
                    request.path,
                    reason
                );
            }

            if response.is_success() {
                return Ok(response);
            }

            if code == 429 && self.config.handle_rate_limit() {
                if let Some(wait) = self.rate_limit_wait(&response) {
                    tracing::warn!(
                        url = %url,
                        "Rate limit reached, sleeping {:?} before retrying",
                        wait
                    );
                    tokio::time::sleep(wait).await;
                    continue;
                }
            }

            if policy.retries_status(code) && retries < policy.max {
                retries += 1;
                tracing::warn!(
                    url = %url,
                    status = code,
                    retries,
                    "Retrying request in {:?}",
                    policy.delay
                );
                tokio::time::sleep(policy.delay).await;
                continue;
            }

            return Err(HttpResponseError::from_response(&response).into());
        }
    }

    /// Sends one attempt and reads its whole body. The client timeout covers
    /// both steps.
    async fn execute(
        req_builder: reqwest::RequestBuilder,
    ) -> Result<(u16, HashMap<String, Vec<String>>, Vec<u8>), reqwest::Error> {
        let res = req_builder.send().await?;
        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body = res.bytes().await?.to_vec();
        Ok((code, headers, body))
    }

    /// Builds one attempt, signing it with the configured signer.
    fn build_attempt(
        &self,
        request: &HttpRequest,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<reqwest::RequestBuilder, HttpError> {
        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Put => self.client.put(url),
            HttpMethod::Delete => self.client.delete(url),
        };

        for (key, value) in headers {
            req_builder = req_builder.header(key, value);
        }

        let context = SigningContext {
            method: request.http_method,
            url,
            query: request.query.as_ref(),
        };
        if let Some(authorization) = self
            .signer
            .authorization(self.config.credentials(), &context)
            .map_err(HttpError::Signing)?
        {
            req_builder = req_builder.header("Authorization", authorization);
        }

        if let Some(query) = &request.query {
            req_builder = req_builder.query(query);
        }

        if let Some(body) = &request.body {
            let encoded = match request.body_type {
                Some(DataType::FormUrlEncoded) => encode_form(body),
                _ => body.to_string(),
            };
            req_builder = req_builder.body(encoded);
        }

        Ok(req_builder)
    }

    /// Time to sleep before retrying a 429: until the reset time (or for
    /// `retry-after` seconds) plus the configured margin.
    fn rate_limit_wait(&self, response: &HttpResponse) -> Option<Duration> {
        let base = if let Some(reset_at) = response.rate_limits.reset_at() {
            let now = chrono::Utc::now().timestamp();
            Duration::from_secs(u64::try_from(reset_at - now).unwrap_or(0))
        } else {
            let retry_after = response.header("retry-after")?.trim().parse::<f64>().ok()?;
            Duration::try_from_secs_f64(retry_after).ok()?
        };
        Some(base + self.config.rate_limit_margin())
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

/// Encodes a flat JSON object as `application/x-www-form-urlencoded`.
fn encode_form(body: &serde_json::Value) -> String {
    let Some(object) = body.as_object() else {
        return body.to_string();
    };

    object
        .iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(&value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
