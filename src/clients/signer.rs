//! Request signing capability.
//!
//! The Ads API requires OAuth 1.0a signed requests. Producing the signature
//! is left to an implementation of [`RequestSigner`]; the transport calls it
//! once per attempt and sends the returned value as the `Authorization`
//! header.

use std::collections::HashMap;
use std::fmt;

use crate::clients::http_request::HttpMethod;
use crate::config::Credentials;

/// The parts of an attempt that an OAuth 1.0a signature covers.
#[derive(Clone, Copy, Debug)]
pub struct SigningContext<'a> {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The URL without query string.
    pub url: &'a str,
    /// Query parameters sent with the request.
    pub query: Option<&'a HashMap<String, String>>,
}

/// Produces the `Authorization` header for a request.
///
/// # Example
///
/// ```rust
/// use twitter_ads::clients::{RequestSigner, SigningContext};
/// use twitter_ads::Credentials;
///
/// #[derive(Debug)]
/// struct BearerSigner(String);
///
/// impl RequestSigner for BearerSigner {
///     fn authorization(
///         &self,
///         _credentials: &Credentials,
///         _context: &SigningContext<'_>,
///     ) -> Result<Option<String>, String> {
///         Ok(Some(format!("Bearer {}", self.0)))
///     }
/// }
/// ```
pub trait RequestSigner: fmt::Debug + Send + Sync {
    /// Returns the `Authorization` header value, or `None` to send the
    /// request unsigned.
    ///
    /// # Errors
    ///
    /// Returns a description of the failure; the request is not sent.
    fn authorization(
        &self,
        credentials: &Credentials,
        context: &SigningContext<'_>,
    ) -> Result<Option<String>, String>;
}

/// A signer that leaves requests unsigned.
///
/// Used when no signer is supplied, for example against a local proxy that
/// signs on the caller's behalf.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSigner;

impl RequestSigner for NoopSigner {
    fn authorization(
        &self,
        _credentials: &Credentials,
        _context: &SigningContext<'_>,
    ) -> Result<Option<String>, String> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_signer_returns_no_header() {
        let credentials = Credentials::new("ck", "cs", "at", "ats").unwrap();
        let context = SigningContext {
            method: HttpMethod::Get,
            url: "https://ads-api.twitter.com/12/accounts",
            query: None,
        };

        assert_eq!(NoopSigner.authorization(&credentials, &context), Ok(None));
    }

    #[test]
    fn test_signer_is_object_safe() {
        let signer: Box<dyn RequestSigner> = Box::new(NoopSigner);
        assert!(format!("{signer:?}").contains("NoopSigner"));
    }
}
