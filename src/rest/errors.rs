//! Error types for resource operations.
//!
//! Transport failures arrive wrapped in [`ResourceError::Http`] with their
//! typed [`ErrorKind`]. The other variants are raised locally, before any
//! request is sent.
//!
//! # Example
//!
//! ```rust,ignore
//! use twitter_ads::clients::ErrorKind;
//! use twitter_ads::rest::ResourceError;
//!
//! match Resource::<Campaign>::load(&account, "8wku2", Params::new()).await {
//!     Ok(campaign) => println!("{:?}", campaign.get("name")),
//!     Err(e) if e.kind() == Some(ErrorKind::NotFound) => println!("no such campaign"),
//!     Err(ResourceError::Validation(reason)) => println!("rejected: {reason}"),
//!     Err(e) => println!("other error: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::clients::{ErrorKind, HttpError, InvalidHttpRequestError};

/// Error type for resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// An operation that needs an id was called on an unsaved instance.
    #[error("Error! {resource} object not yet initialized, call load first.")]
    NotLoaded {
        /// The resource type name.
        resource: &'static str,
    },

    /// A write to a read-only property.
    #[error("Property '{property}' of {resource} is read-only.")]
    ReadOnlyProperty {
        /// The resource type name.
        resource: &'static str,
        /// The property that was written.
        property: String,
    },

    /// A read or write of a property the type does not declare.
    #[error("{resource} has no property named '{property}'.")]
    UnknownProperty {
        /// The resource type name.
        resource: &'static str,
        /// The undeclared property name.
        property: String,
    },

    /// Arguments rejected before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// The resource type has no endpoint for this operation.
    #[error("'{resource}' does not support '{operation}'.")]
    Unsupported {
        /// The resource type name.
        resource: &'static str,
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// A success response without the expected shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl From<InvalidHttpRequestError> for ResourceError {
    fn from(error: InvalidHttpRequestError) -> Self {
        Self::Http(HttpError::InvalidRequest(error))
    }
}

impl ResourceError {
    /// Returns the typed kind of an API error response.
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Http(e) => e.kind(),
            _ => None,
        }
    }

    /// Returns the API `errors` payload of an error response.
    #[must_use]
    pub const fn details(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Http(HttpError::Response(e)) => e.details.as_ref(),
            _ => None,
        }
    }

    /// Returns the transaction id of an error response, for support requests.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Http(HttpError::Response(e)) => e.request_id.as_deref(),
            _ => None,
        }
    }

    /// Returns `true` if the error was raised before any request was sent.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        match self {
            Self::Http(HttpError::InvalidRequest(_)) => true,
            Self::Http(_) | Self::UnexpectedResponse(_) => false,
            _ => true,
        }
    }
}
