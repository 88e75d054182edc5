//! Validated newtype wrappers for configuration values.
//!
//! Credentials are rejected when empty. The two secrets mask their value in
//! `Debug` output so they never end up in logs.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The OAuth consumer key of the Ads API app.
///
/// # Example
///
/// ```rust
/// use twitter_ads::ConsumerKey;
///
/// let key = ConsumerKey::new("ck").unwrap();
/// assert_eq!(key.as_ref(), "ck");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsumerKey(String);

impl ConsumerKey {
    /// Creates a new validated consumer key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCredential`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        non_empty(key.into(), "consumer_key").map(Self)
    }
}

impl AsRef<str> for ConsumerKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The OAuth consumer secret.
///
/// # Security
///
/// The `Debug` implementation masks the value, displaying only
/// `ConsumerSecret(*****)`.
///
/// ```rust
/// use twitter_ads::ConsumerSecret;
///
/// let secret = ConsumerSecret::new("cs").unwrap();
/// assert_eq!(format!("{secret:?}"), "ConsumerSecret(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ConsumerSecret(String);

impl ConsumerSecret {
    /// Creates a new validated consumer secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCredential`] if the secret is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        non_empty(secret.into(), "consumer_secret").map(Self)
    }
}

impl AsRef<str> for ConsumerSecret {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ConsumerSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConsumerSecret(*****)")
    }
}

/// The user access token the requests are made on behalf of.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a new validated access token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCredential`] if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        non_empty(token.into(), "access_token").map(Self)
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The user access token secret. Masked in debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessTokenSecret(String);

impl AccessTokenSecret {
    /// Creates a new validated access token secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCredential`] if the secret is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        non_empty(secret.into(), "access_token_secret").map(Self)
    }
}

impl AsRef<str> for AccessTokenSecret {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessTokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessTokenSecret(*****)")
    }
}

fn non_empty(value: String, field: &'static str) -> Result<String, ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::EmptyCredential { field });
    }
    Ok(value)
}

/// The immutable credential bundle held by a [`Client`](crate::Client).
///
/// The library never signs requests itself; a
/// [`RequestSigner`](crate::clients::RequestSigner) receives these values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    /// OAuth consumer key.
    pub consumer_key: ConsumerKey,
    /// OAuth consumer secret.
    pub consumer_secret: ConsumerSecret,
    /// OAuth access token.
    pub access_token: AccessToken,
    /// OAuth access token secret.
    pub access_token_secret: AccessTokenSecret,
}

impl Credentials {
    /// Validates and bundles the four OAuth credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCredential`] naming the first empty value.
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        access_token: impl Into<String>,
        access_token_secret: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            consumer_key: ConsumerKey::new(consumer_key)?,
            consumer_secret: ConsumerSecret::new(consumer_secret)?,
            access_token: AccessToken::new(access_token)?,
            access_token_secret: AccessTokenSecret::new(access_token_secret)?,
        })
    }
}

/// A validated API domain such as `https://ads-api.twitter.com`.
///
/// Stored without a trailing slash so paths can be appended directly.
///
/// ```rust
/// use twitter_ads::DomainUrl;
///
/// let domain = DomainUrl::new("https://proxy.example.com/").unwrap();
/// assert_eq!(domain.as_ref(), "https://proxy.example.com");
/// assert!(DomainUrl::new("proxy.example.com").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainUrl(String);

impl DomainUrl {
    /// Creates a new validated domain.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDomainUrl`] unless the value parses as
    /// an `http` or `https` URL with a host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let parsed = reqwest::Url::parse(&url)
            .map_err(|_| ConfigError::InvalidDomainUrl { url: url.clone() })?;

        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ConfigError::InvalidDomainUrl { url });
        }

        Ok(Self(url.trim_end_matches('/').to_string()))
    }
}

impl AsRef<str> for DomainUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for DomainUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DomainUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}
