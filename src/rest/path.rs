//! Path templates for Ads API endpoints.
//!
//! Resource kinds declare their endpoints as templates with `{name}`
//! placeholders:
//!
//! - `/{version}/accounts/{account_id}/campaigns` (collection)
//! - `/{version}/accounts/{account_id}/campaigns/{id}` (item)
//! - `/{version}/batch/accounts/{account_id}/campaigns` (batch)
//!
//! Placeholder values are percent-encoded when interpolated.
//!
//! # Example
//!
//! ```rust
//! use twitter_ads::rest::{build_path, resource_path};
//! use twitter_ads::ApiVersion;
//! use std::collections::HashMap;
//!
//! let mut ids = HashMap::new();
//! ids.insert("account_id", "18ce54d4x5t");
//! ids.insert("id", "8wku2");
//! let url = build_path("/accounts/{account_id}/campaigns/{id}", &ids);
//! assert_eq!(url, "/accounts/18ce54d4x5t/campaigns/8wku2");
//!
//! let url = resource_path(
//!     "/{version}/accounts/{account_id}/line_items",
//!     &ApiVersion::V12,
//!     "18ce54d4x5t",
//!     None,
//! );
//! assert_eq!(url, "/12/accounts/18ce54d4x5t/line_items");
//! ```

use std::collections::HashMap;
use std::fmt::{self, Display};

use crate::clients::HttpMethod;
use crate::config::ApiVersion;

/// Operations that can be performed on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceOperation {
    /// Fetch one entity (GET item).
    Load,
    /// List a collection (GET collection).
    All,
    /// Create an entity (POST collection).
    Create,
    /// Update an entity (PUT item).
    Update,
    /// Delete an entity (DELETE item).
    Delete,
    /// Mutate several entities at once (POST batch).
    Batch,
}

impl ResourceOperation {
    /// Returns the HTTP method for this operation.
    #[must_use]
    pub const fn default_http_method(&self) -> HttpMethod {
        match self {
            Self::Load | Self::All => HttpMethod::Get,
            Self::Create | Self::Batch => HttpMethod::Post,
            Self::Update => HttpMethod::Put,
            Self::Delete => HttpMethod::Delete,
        }
    }

    /// Returns the operation name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::All => "all",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Batch => "batch",
        }
    }
}

impl fmt::Display for ResourceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds a path from a template by interpolating values.
///
/// Replaces `{name}` placeholders with the percent-encoded values from the
/// map. Placeholders without a value are left in place.
#[must_use]
#[allow(clippy::implicit_hasher)]
pub fn build_path<V: Display>(template: &str, ids: &HashMap<&str, V>) -> String {
    let mut result = template.to_string();

    for (key, value) in ids {
        let placeholder = format!("{{{key}}}");
        let value = value.to_string();
        result = result.replace(&placeholder, &urlencoding::encode(&value));
    }

    result
}

/// Builds an account-scoped path, filling `{version}`, `{account_id}` and,
/// when given, `{id}`.
#[must_use]
pub fn resource_path(
    template: &str,
    version: &ApiVersion,
    account_id: &str,
    id: Option<&str>,
) -> String {
    let version = version.to_string();
    let mut ids: HashMap<&str, &str> = HashMap::new();
    ids.insert("version", &version);
    ids.insert("account_id", account_id);
    if let Some(id) = id {
        ids.insert("id", id);
    }
    build_path(template, &ids)
}

// Verify types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceOperation>();
};
