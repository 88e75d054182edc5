//! Configuration types for the Ads API client.
//!
//! # Overview
//!
//! - [`ClientConfig`]: credentials plus every request option
//! - [`ClientConfigBuilder`]: builder validating the options on `build`
//! - [`RetryPolicy`]: the retry budget applied by the transport
//! - [`Credentials`] and its validated parts
//! - [`DomainUrl`]: validated domain override
//! - [`ApiVersion`]: the API version path segment
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use twitter_ads::{ApiVersion, ClientConfig, Credentials};
//!
//! let config = ClientConfig::builder()
//!     .credentials(Credentials::new("ck", "cs", "at", "ats").unwrap())
//!     .api_version(ApiVersion::V12)
//!     .sandbox(true)
//!     .retry_max(2)
//!     .retry_delay(Duration::from_millis(500))
//!     .build()
//!     .unwrap();
//!
//! assert!(config.sandbox());
//! assert_eq!(config.retry_policy().max, 2);
//! ```

mod newtypes;
mod version;

pub use newtypes::{
    AccessToken, AccessTokenSecret, ConsumerKey, ConsumerSecret, Credentials, DomainUrl,
};
pub use version::ApiVersion;

use std::time::Duration;

use crate::error::ConfigError;

/// Production API domain.
pub const DEFAULT_DOMAIN: &str = "https://ads-api.twitter.com";

/// Sandbox API domain.
pub const SANDBOX_DOMAIN: &str = "https://ads-api-sandbox.twitter.com";

/// Retry budget for transient failures.
///
/// Rate-limit waits (see [`ClientConfig::handle_rate_limit`]) never consume
/// this budget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts allowed after the first one.
    pub max: u32,
    /// Fixed wait between attempts.
    pub delay: Duration,
    /// Status codes that trigger a retry.
    pub on_status: Vec<u16>,
    /// Whether timeouts share the retry budget instead of failing at once.
    pub on_timeouts: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max: 0,
            delay: Duration::from_millis(1500),
            on_status: vec![500, 503],
            on_timeouts: false,
        }
    }
}

impl RetryPolicy {
    /// Returns `true` if `status` is in the retryable set.
    #[must_use]
    pub fn retries_status(&self, status: u16) -> bool {
        self.on_status.contains(&status)
    }
}

/// Credentials and request options for a [`Client`](crate::Client).
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    credentials: Credentials,
    api_version: ApiVersion,
    sandbox: bool,
    trace: bool,
    api_domain: Option<DomainUrl>,
    user_agent_prefix: Option<String>,
    handle_rate_limit: bool,
    rate_limit_margin: Duration,
    retry_policy: RetryPolicy,
    timeout: Option<Duration>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns a configuration with default options for `credentials`.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            api_version: ApiVersion::latest(),
            sandbox: false,
            trace: false,
            api_domain: None,
            user_agent_prefix: None,
            handle_rate_limit: false,
            rate_limit_margin: Duration::from_secs(1),
            retry_policy: RetryPolicy::default(),
            timeout: None,
        }
    }

    /// Returns the OAuth credentials.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the API version.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns whether requests go to the sandbox domain.
    #[must_use]
    pub const fn sandbox(&self) -> bool {
        self.sandbox
    }

    /// Returns whether each attempt is logged at debug level.
    #[must_use]
    pub const fn trace(&self) -> bool {
        self.trace
    }

    /// Returns the domain override, if configured.
    #[must_use]
    pub const fn api_domain(&self) -> Option<&DomainUrl> {
        self.api_domain.as_ref()
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns whether 429 responses are waited out and retried.
    #[must_use]
    pub const fn handle_rate_limit(&self) -> bool {
        self.handle_rate_limit
    }

    /// Returns the extra wait added after a rate-limit reset time.
    #[must_use]
    pub const fn rate_limit_margin(&self) -> Duration {
        self.rate_limit_margin
    }

    /// Returns the retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Returns the per-attempt timeout, if configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the domain requests are sent to when no per-request override
    /// is given: the configured override, then sandbox, then production.
    #[must_use]
    pub fn base_domain(&self) -> &str {
        match (&self.api_domain, self.sandbox) {
            (Some(domain), _) => domain.as_ref(),
            (None, true) => SANDBOX_DOMAIN,
            (None, false) => DEFAULT_DOMAIN,
        }
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for [`ClientConfig`].
///
/// `credentials` is required. Defaults:
///
/// - `api_version`: [`ApiVersion::latest`]
/// - `sandbox`, `trace`, `handle_rate_limit`, `retry_on_timeouts`: `false`
/// - `retry_max`: `0`
/// - `retry_delay`: 1500 ms
/// - `retry_on_status`: `[500, 503]`
/// - `rate_limit_margin`: 1 s
/// - `timeout`, `api_domain`, `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    credentials: Option<Credentials>,
    api_version: Option<ApiVersion>,
    sandbox: bool,
    trace: bool,
    api_domain: Option<DomainUrl>,
    user_agent_prefix: Option<String>,
    handle_rate_limit: bool,
    rate_limit_margin: Option<Duration>,
    retry_max: Option<u32>,
    retry_delay: Option<Duration>,
    retry_on_status: Option<Vec<u16>>,
    retry_on_timeouts: bool,
    timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the OAuth credentials (required).
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the API version.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Routes requests to the sandbox domain.
    #[must_use]
    pub const fn sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    /// Logs every attempt and response status at debug level.
    #[must_use]
    pub const fn trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Sends requests to `domain` instead of the production or sandbox host.
    #[must_use]
    pub fn api_domain(mut self, domain: DomainUrl) -> Self {
        self.api_domain = Some(domain);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Waits out 429 responses until the rate-limit reset time and retries.
    #[must_use]
    pub const fn handle_rate_limit(mut self, enabled: bool) -> Self {
        self.handle_rate_limit = enabled;
        self
    }

    /// Sets the extra wait added after a rate-limit reset time.
    #[must_use]
    pub const fn rate_limit_margin(mut self, margin: Duration) -> Self {
        self.rate_limit_margin = Some(margin);
        self
    }

    /// Sets how many extra attempts a transient failure may use.
    #[must_use]
    pub const fn retry_max(mut self, retry_max: u32) -> Self {
        self.retry_max = Some(retry_max);
        self
    }

    /// Sets the fixed wait between retry attempts.
    #[must_use]
    pub const fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    /// Sets the status codes that are retried.
    #[must_use]
    pub fn retry_on_status(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.retry_on_status = Some(statuses.into_iter().collect());
        self
    }

    /// Lets timeouts consume the retry budget instead of failing at once.
    #[must_use]
    pub const fn retry_on_timeouts(mut self, enabled: bool) -> Self {
        self.retry_on_timeouts = enabled;
        self
    }

    /// Sets the timeout applied to each attempt.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] without credentials and
    /// [`ConfigError::InvalidRetryOption`] when `retry_on_status` contains a
    /// code outside `400..=599`.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let credentials = self
            .credentials
            .ok_or(ConfigError::MissingRequiredField {
                field: "credentials",
            })?;

        let defaults = RetryPolicy::default();
        let on_status = self.retry_on_status.unwrap_or(defaults.on_status);
        if let Some(code) = on_status.iter().find(|code| !(400..=599).contains(*code)) {
            return Err(ConfigError::InvalidRetryOption {
                option: "retry_on_status",
                reason: format!("{code} is not an error status"),
            });
        }

        Ok(ClientConfig {
            credentials,
            api_version: self.api_version.unwrap_or_else(ApiVersion::latest),
            sandbox: self.sandbox,
            trace: self.trace,
            api_domain: self.api_domain,
            user_agent_prefix: self.user_agent_prefix,
            handle_rate_limit: self.handle_rate_limit,
            rate_limit_margin: self.rate_limit_margin.unwrap_or(Duration::from_secs(1)),
            retry_policy: RetryPolicy {
                max: self.retry_max.unwrap_or(defaults.max),
                delay: self.retry_delay.unwrap_or(defaults.delay),
                on_status,
                on_timeouts: self.retry_on_timeouts,
            },
            timeout: self.timeout,
        })
    }
}
