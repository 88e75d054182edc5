//! Error types for client configuration.
//!
//! Configuration constructors return `Result<T, ConfigError>` so invalid
//! credentials or options are rejected before any request is built.
//!
//! # Example
//!
//! ```rust
//! use twitter_ads::{ConsumerKey, ConfigError};
//!
//! let result = ConsumerKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyCredential { field: "consumer_key" })));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring a [`Client`](crate::Client).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// One of the four OAuth credentials was empty.
    #[error("Credential '{field}' cannot be empty. Please provide the value issued for your Ads API app.")]
    EmptyCredential {
        /// The name of the empty credential.
        field: &'static str,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected a numeric version (e.g., '12').")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// Domain override is not an absolute http(s) URL.
    #[error("Invalid domain URL '{url}'. Please provide a scheme and host (e.g., 'https://ads-api.twitter.com').")]
    InvalidDomainUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A retry option was out of range.
    #[error("Invalid retry option '{option}': {reason}")]
    InvalidRetryOption {
        /// The option name.
        option: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}
