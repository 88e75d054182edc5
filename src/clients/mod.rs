//! HTTP transport layer for the Ads API.
//!
//! # Overview
//!
//! - [`HttpClient`]: performs requests with rate-limit and retry handling
//! - [`HttpRequest`]: a request to be sent to the API
//! - [`HttpResponse`]: a decoded response with parsed rate-limit headers
//! - [`HttpMethod`]: supported HTTP methods (GET, POST, PUT, DELETE)
//! - [`RequestSigner`]: the capability that signs each attempt
//! - [`HttpError`] and [`ErrorKind`]: the error taxonomy
//!
//! # Retry Behavior
//!
//! - **429**: with `handle_rate_limit` on, sleeps until the rate-limit reset
//!   time plus a margin and retries; these waits are not counted
//! - **`retry_on_status`** (default 500 and 503): retried after `retry_delay`
//!   while fewer than `retry_max` retries were used
//! - **Timeouts**: share the `retry_max` budget when `retry_on_timeouts` is
//!   on, otherwise fail at once
//! - **Anything else >= 400**: returned immediately as a typed error

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod signer;

pub use errors::{ErrorKind, HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{DataType, HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{ApiDeprecationInfo, HttpResponse, RateLimit, RateLimits};
pub use signer::{NoopSigner, RequestSigner, SigningContext};
