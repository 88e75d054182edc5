//! The API client root object.

use std::sync::Arc;

use crate::clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, InvalidHttpRequestError,
    RequestSigner,
};
use crate::config::{ApiVersion, ClientConfig};
use crate::rest::{Account, Cursor, Params, ResourceError};

/// Client for the Ads API.
///
/// Holds the configuration (credentials and options) and the transport.
/// Cloning is cheap: clones share one connection pool. Every resource keeps
/// a clone through its [`Account`].
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use twitter_ads::{Client, ClientConfig, Credentials};
/// use twitter_ads::rest::Params;
///
/// let config = ClientConfig::builder()
///     .credentials(Credentials::new("ck", "cs", "at", "ats")?)
///     .handle_rate_limit(true)
///     .retry_max(3)
///     .build()?;
/// let client = Client::with_signer(config, Arc::new(MyOAuthSigner::new()))?;
///
/// let account = client.account("18ce54d4x5t").await?;
/// let mut campaigns = account.campaigns(Params::new()).await?;
/// while let Some(campaign) = campaigns.next().await? {
///     println!("{:?}", campaign.get("name"));
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    http: Arc<HttpClient>,
}

// Verify Client is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Client>();
};

impl Client {
    /// Creates a client that sends requests unsigned.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the HTTP backend cannot be
    /// initialized.
    pub fn new(config: ClientConfig) -> Result<Self, HttpError> {
        Ok(Self {
            http: Arc::new(HttpClient::new(config)?),
        })
    }

    /// Creates a client that signs every request with `signer`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the HTTP backend cannot be
    /// initialized.
    pub fn with_signer(
        config: ClientConfig,
        signer: Arc<dyn RequestSigner>,
    ) -> Result<Self, HttpError> {
        Ok(Self {
            http: Arc::new(HttpClient::with_signer(config, signer)?),
        })
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        self.http.config()
    }

    /// Returns the API version used in request paths.
    #[must_use]
    pub fn version(&self) -> &ApiVersion {
        self.http.config().api_version()
    }

    /// Returns the transport.
    #[must_use]
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Performs a request built by the caller.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::perform`].
    pub async fn perform(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        self.http.perform(request).await
    }

    /// Loads one advertising account.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] for an empty id, or any
    /// transport error.
    pub async fn account(&self, id: &str) -> Result<Account, ResourceError> {
        Account::load(self, id, Params::new()).await
    }

    /// Lists the advertising accounts available to the credentials.
    ///
    /// # Errors
    ///
    /// Returns any transport error from the first page.
    pub async fn accounts(&self, params: Params) -> Result<Cursor<Account>, ResourceError> {
        Account::all(self, params).await
    }

    /// Builds a request with `params` in the query string.
    pub(crate) fn build_request(
        &self,
        method: HttpMethod,
        path: String,
        params: &Params,
    ) -> Result<HttpRequest, InvalidHttpRequestError> {
        let mut builder = HttpRequest::builder(method, path);
        if !params.is_empty() {
            builder = builder.query(params.to_query());
        }
        builder.build()
    }

    /// Builds and performs a request with `params` in the query string.
    pub(crate) async fn send(
        &self,
        method: HttpMethod,
        path: String,
        params: &Params,
    ) -> Result<HttpResponse, HttpError> {
        let request = self.build_request(method, path, params)?;
        self.perform(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;

    fn client() -> Client {
        let credentials = Credentials::new("ck", "cs", "at", "ats").unwrap();
        Client::new(ClientConfig::new(credentials)).unwrap()
    }

    #[test]
    fn test_version_comes_from_config() {
        assert_eq!(client().version(), &ApiVersion::latest());
    }

    #[test]
    fn test_build_request_puts_params_in_query() {
        let request = client()
            .build_request(
                HttpMethod::Post,
                "/12/accounts/abc/campaigns".to_string(),
                &Params::new().with("name", "launch").with("paused", true),
            )
            .unwrap();

        assert_eq!(request.http_method, HttpMethod::Post);
        assert!(request.body.is_none());
        assert_eq!(request.query_value("name"), Some("launch"));
        assert_eq!(request.query_value("paused"), Some("true"));
    }

    #[test]
    fn test_build_request_without_params_has_no_query() {
        let request = client()
            .build_request(HttpMethod::Get, "/12/accounts".to_string(), &Params::new())
            .unwrap();
        assert!(request.query.is_none());
    }

    #[test]
    fn test_clones_share_transport() {
        let a = client();
        let b = a.clone();
        assert!(std::ptr::eq(a.http(), b.http()));
    }

    #[tokio::test]
    async fn test_account_rejects_empty_id() {
        let result = client().account("").await;
        assert!(matches!(result, Err(ResourceError::Validation(_))));
    }
}
