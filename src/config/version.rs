//! Ads API version definitions.
//!
//! The version is the first path segment of every request
//! (`/12/accounts/...`).

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Ads API version.
///
/// Known versions have their own variant; any other numeric version is
/// accepted as [`ApiVersion::Custom`].
///
/// # Example
///
/// ```rust
/// use twitter_ads::ApiVersion;
///
/// let version: ApiVersion = "11".parse().unwrap();
/// assert_eq!(version, ApiVersion::V11);
/// assert_eq!(ApiVersion::latest().to_string(), "12");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// Ads API v10.
    V10,
    /// Ads API v11.
    V11,
    /// Ads API v12.
    V12,
    /// Any other numeric version.
    Custom(String),
}

impl ApiVersion {
    /// Returns the version used when none is configured.
    #[must_use]
    pub const fn latest() -> Self {
        Self::V12
    }

    /// Returns `true` for versions with a dedicated variant.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::latest()
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version_str = match self {
            Self::V10 => "10",
            Self::V11 => "11",
            Self::V12 => "12",
            Self::Custom(s) => s,
        };
        f.write_str(version_str)
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_start_matches(['v', 'V']);

        match s {
            "10" => Ok(Self::V10),
            "11" => Ok(Self::V11),
            "12" => Ok(Self::V12),
            _ if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) => {
                Ok(Self::Custom(s.to_string()))
            }
            _ => Err(ConfigError::InvalidApiVersion {
                version: s.to_string(),
            }),
        }
    }
}
