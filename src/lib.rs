//! # Twitter Ads API Rust SDK
//!
//! A Rust client for the Twitter Ads API, providing typed configuration,
//! a retrying HTTP transport and a resource layer over the API's JSON
//! entities.
//!
//! ## Overview
//!
//! This SDK provides:
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Validated newtypes for the four OAuth 1.0a credentials
//! - An async HTTP transport with rate-limit waiting and bounded retries
//! - Pluggable request signing via [`clients::RequestSigner`]
//! - Accounts, resources with schema-checked properties, cursors, batch
//!   mutations and analytics queries in [`rest`]
//!
//! ## Quick Start
//!
//! ```rust
//! use twitter_ads::{ApiVersion, ClientConfig, Credentials};
//!
//! let config = ClientConfig::builder()
//!     .credentials(Credentials::new("consumer-key", "consumer-secret", "token", "token-secret").unwrap())
//!     .api_version(ApiVersion::V12)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.base_domain(), "https://ads-api.twitter.com");
//! ```
//!
//! ## Working with Resources
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use twitter_ads::{Client, ClientConfig, Credentials};
//! use twitter_ads::rest::resources::Campaign;
//! use twitter_ads::rest::{Params, Resource};
//!
//! let config = ClientConfig::new(Credentials::new("ck", "cs", "at", "ats")?);
//! let client = Client::with_signer(config, Arc::new(MyOAuthSigner))?;
//!
//! let account = client.account("18ce54d4x5t").await?;
//!
//! let mut campaign = Resource::<Campaign>::new(&account);
//! campaign
//!     .set("name", "Launch")?
//!     .set("funding_instrument_id", "lygyi")?
//!     .set("daily_budget_amount_local_micro", 5_000_000)?;
//! campaign.save().await?;
//!
//! let mut campaigns = account.campaigns(Params::new()).await?;
//! while let Some(campaign) = campaigns.next().await? {
//!     println!("{:?} {:?}", campaign.id(), campaign.get("name"));
//! }
//! ```
//!
//! ## Making Raw Requests
//!
//! ```rust,ignore
//! use twitter_ads::clients::{HttpMethod, HttpRequest};
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "/12/accounts")
//!     .query_param("count", "10")
//!     .build()?;
//!
//! let response = client.perform(&request).await?;
//! println!("{}", response.body);
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime

pub mod client;
pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use client::Client;
pub use config::{
    AccessToken, AccessTokenSecret, ApiVersion, ClientConfig, ClientConfigBuilder, ConsumerKey,
    ConsumerSecret, Credentials, DomainUrl, RetryPolicy,
};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    DataType, ErrorKind, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder,
    HttpResponse, HttpResponseError, InvalidHttpRequestError, RateLimit, RateLimits,
    RequestSigner,
};

// Re-export the resource layer entry points
pub use rest::{Account, Cursor, Params, Resource, ResourceError};
