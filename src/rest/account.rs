//! The advertising account scope.
//!
//! Nearly every endpoint is scoped to an advertising account. An
//! [`Account`] carries the [`Client`] and the account id, and offers
//! factories for the collections it owns.

use serde_json::Value;

use crate::client::Client;
use crate::clients::{HttpMethod, HttpResponse, RateLimits};
use crate::rest::cursor::Cursor;
use crate::rest::errors::ResourceError;
use crate::rest::params::Params;
use crate::rest::path::build_path;
use crate::rest::property::{Properties, Property, PropertyValue, Transform};
use crate::rest::resource::{response_data, Resource, ResourceKind};
use crate::rest::resources::{
    AccountMedia, AppList, Campaign, FundingInstrument, LineItem, MediaCreative, PromotableUser,
    TailoredAudience,
};

const ACCOUNTS_PATH: &str = "/{version}/accounts";
const ACCOUNT_PATH: &str = "/{version}/accounts/{id}";
const FEATURES_PATH: &str = "/{version}/accounts/{id}/features";

/// Properties of an advertising account; all are read-only.
pub const ACCOUNT_PROPERTIES: &[Property] = &[
    Property::readonly("id"),
    Property::readonly("name"),
    Property::readonly("salt"),
    Property::readonly("timezone"),
    Property::readonly("approval_status"),
    Property::readonly("deleted").transform(Transform::Bool),
    Property::readonly("timezone_switch_at").transform(Transform::Time),
    Property::readonly("created_at").transform(Transform::Time),
    Property::readonly("updated_at").transform(Transform::Time),
];

/// An advertising account.
///
/// # Example
///
/// ```rust,ignore
/// let account = client.account("18ce54d4x5t").await?;
/// println!("{:?}", account.get("name"));
///
/// let campaign = account.campaign("8wku2").await?;
/// let mut line_items = account.line_items(Params::new().with("campaign_ids", "8wku2")).await?;
/// ```
#[derive(Clone, Debug)]
pub struct Account {
    client: Client,
    id: String,
    properties: Properties,
    rate_limits: RateLimits,
}

impl Account {
    /// Creates an account handle for `id` without loading it.
    #[must_use]
    pub fn new(client: Client, id: impl Into<String>) -> Self {
        let id = id.into();
        let mut properties = Properties::new("Account", ACCOUNT_PROPERTIES);
        properties.set_unchecked("id", Some(PropertyValue::String(id.clone())));
        Self {
            client,
            id,
            properties,
            rate_limits: RateLimits::default(),
        }
    }

    /// Loads the account `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] for an empty id, or any
    /// transport error.
    pub async fn load(client: &Client, id: &str, params: Params) -> Result<Self, ResourceError> {
        if id.is_empty() {
            return Err(ResourceError::Validation(
                "Account id must not be empty.".to_string(),
            ));
        }
        let response = client
            .send(HttpMethod::Get, Self::path(client, ACCOUNT_PATH, id), &params)
            .await?;

        let mut account = Self::new(client.clone(), id);
        account.apply_response(&response)?;
        Ok(account)
    }

    /// Lists the accounts available to the client's credentials.
    ///
    /// # Errors
    ///
    /// Returns any transport error from the first page.
    pub async fn all(client: &Client, params: Params) -> Result<Cursor<Self>, ResourceError> {
        let request = client.build_request(
            HttpMethod::Get,
            Self::path(client, ACCOUNTS_PATH, ""),
            &params,
        )?;

        let bound = client.clone();
        Cursor::new(client.clone(), request, move |item| {
            let mut account = Self::new(bound.clone(), "");
            account.from_response(item);
            account
        })
        .await
    }

    /// Re-fetches the account, including deleted state.
    ///
    /// An account without id is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns any transport error.
    pub async fn reload(&mut self, params: Params) -> Result<&mut Self, ResourceError> {
        if self.id.is_empty() {
            return Ok(self);
        }
        let mut query = Params::new().with("with_deleted", true);
        query.extend(params);

        let path = Self::path(&self.client, ACCOUNT_PATH, &self.id);
        let response = self.client.send(HttpMethod::Get, path, &query).await?;
        self.apply_response(&response)?;
        Ok(self)
    }

    /// Returns the features enabled for this account.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotLoaded`] without an id, or any transport
    /// error.
    pub async fn features(&self) -> Result<Vec<Value>, ResourceError> {
        let id = self.require_loaded()?;
        let path = Self::path(&self.client, FEATURES_PATH, id);
        let response = self
            .client
            .send(HttpMethod::Get, path, &Params::new())
            .await?;

        response_data(&response)?
            .as_array()
            .cloned()
            .ok_or_else(|| ResourceError::UnexpectedResponse("`data` is not an array".to_string()))
    }

    /// Returns the client.
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// Returns the account id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns a property value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Returns all property values.
    #[must_use]
    pub const fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Returns the rate limits reported by the last request for this account.
    #[must_use]
    pub const fn rate_limits(&self) -> &RateLimits {
        &self.rate_limits
    }

    /// Populates the properties from a JSON object.
    #[allow(clippy::wrong_self_convention)]
    pub fn from_response(&mut self, data: &Value) -> &mut Self {
        self.properties.from_response(data);
        if let Some(id) = self.properties.id() {
            self.id = id;
        }
        self
    }

    /// Lists resources of kind `K` in this account.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotLoaded`] without an account id, or any
    /// error of [`Resource::all`].
    pub async fn all_of<K: ResourceKind>(
        &self,
        params: Params,
    ) -> Result<Cursor<Resource<K>>, ResourceError> {
        self.require_loaded()?;
        Resource::<K>::all(self, params).await
    }

    /// Loads one resource of kind `K` from this account.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotLoaded`] without an account id, or any
    /// error of [`Resource::load`].
    pub async fn load_one<K: ResourceKind>(
        &self,
        id: &str,
        params: Params,
    ) -> Result<Resource<K>, ResourceError> {
        self.require_loaded()?;
        Resource::<K>::load(self, id, params).await
    }

    fn require_loaded(&self) -> Result<&str, ResourceError> {
        if self.id.is_empty() {
            return Err(ResourceError::NotLoaded {
                resource: "Account",
            });
        }
        Ok(&self.id)
    }

    fn apply_response(&mut self, response: &HttpResponse) -> Result<(), ResourceError> {
        self.rate_limits = response.rate_limits;
        let data = response_data(response)?;
        self.from_response(data);
        Ok(())
    }

    fn path(client: &Client, template: &str, id: &str) -> String {
        let version = client.version().to_string();
        let mut ids = std::collections::HashMap::new();
        ids.insert("version", version.as_str());
        ids.insert("id", id);
        build_path(template, &ids)
    }
}

// Collection factories: the plural form lists, the singular form loads by id.
impl Account {
    /// Lists the campaigns of this account.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotLoaded`] without an account id, or any
    /// transport error from the first page.
    pub async fn campaigns(
        &self,
        params: Params,
    ) -> Result<Cursor<Resource<Campaign>>, ResourceError> {
        self.all_of::<Campaign>(params).await
    }

    /// Loads one campaign of this account.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotLoaded`] without an account id,
    /// [`ResourceError::Validation`] for an empty id, or any transport error.
    pub async fn campaign(&self, id: &str) -> Result<Resource<Campaign>, ResourceError> {
        self.load_one::<Campaign>(id, Params::new()).await
    }

    /// Lists the `LineItem` resources of this account.
    ///
    /// # Errors
    ///
    /// See [`campaigns`](Self::campaigns).
    pub async fn line_items(
        &self,
        params: Params,
    ) -> Result<Cursor<Resource<LineItem>>, ResourceError> {
        self.all_of::<LineItem>(params).await
    }

    /// Loads one `LineItem` of this account.
    ///
    /// # Errors
    ///
    /// See [`campaign`](Self::campaign).
    pub async fn line_item(&self, id: &str) -> Result<Resource<LineItem>, ResourceError> {
        self.load_one::<LineItem>(id, Params::new()).await
    }

    /// Lists the `FundingInstrument` resources of this account.
    ///
    /// # Errors
    ///
    /// See [`campaigns`](Self::campaigns).
    pub async fn funding_instruments(
        &self,
        params: Params,
    ) -> Result<Cursor<Resource<FundingInstrument>>, ResourceError> {
        self.all_of::<FundingInstrument>(params).await
    }

    /// Loads one `FundingInstrument` of this account.
    ///
    /// # Errors
    ///
    /// See [`campaign`](Self::campaign).
    pub async fn funding_instrument(
        &self,
        id: &str,
    ) -> Result<Resource<FundingInstrument>, ResourceError> {
        self.load_one::<FundingInstrument>(id, Params::new()).await
    }

    /// Lists the `PromotableUser` resources of this account.
    ///
    /// # Errors
    ///
    /// See [`campaigns`](Self::campaigns).
    pub async fn promotable_users(
        &self,
        params: Params,
    ) -> Result<Cursor<Resource<PromotableUser>>, ResourceError> {
        self.all_of::<PromotableUser>(params).await
    }

    /// Loads one `PromotableUser` of this account.
    ///
    /// # Errors
    ///
    /// See [`campaign`](Self::campaign).
    pub async fn promotable_user(
        &self,
        id: &str,
    ) -> Result<Resource<PromotableUser>, ResourceError> {
        self.load_one::<PromotableUser>(id, Params::new()).await
    }

    /// Lists the `TailoredAudience` resources of this account.
    ///
    /// # Errors
    ///
    /// See [`campaigns`](Self::campaigns).
    pub async fn tailored_audiences(
        &self,
        params: Params,
    ) -> Result<Cursor<Resource<TailoredAudience>>, ResourceError> {
        self.all_of::<TailoredAudience>(params).await
    }

    /// Loads one `TailoredAudience` of this account.
    ///
    /// # Errors
    ///
    /// See [`campaign`](Self::campaign).
    pub async fn tailored_audience(
        &self,
        id: &str,
    ) -> Result<Resource<TailoredAudience>, ResourceError> {
        self.load_one::<TailoredAudience>(id, Params::new()).await
    }

    /// Lists the `MediaCreative` resources of this account.
    ///
    /// # Errors
    ///
    /// See [`campaigns`](Self::campaigns).
    pub async fn media_creatives(
        &self,
        params: Params,
    ) -> Result<Cursor<Resource<MediaCreative>>, ResourceError> {
        self.all_of::<MediaCreative>(params).await
    }

    /// Loads one `MediaCreative` of this account.
    ///
    /// # Errors
    ///
    /// See [`campaign`](Self::campaign).
    pub async fn media_creative(&self, id: &str) -> Result<Resource<MediaCreative>, ResourceError> {
        self.load_one::<MediaCreative>(id, Params::new()).await
    }

    /// Lists the `AccountMedia` resources of this account.
    ///
    /// # Errors
    ///
    /// See [`campaigns`](Self::campaigns).
    pub async fn account_media(
        &self,
        params: Params,
    ) -> Result<Cursor<Resource<AccountMedia>>, ResourceError> {
        self.all_of::<AccountMedia>(params).await
    }

    /// Loads one `AccountMedia` of this account.
    ///
    /// # Errors
    ///
    /// See [`campaign`](Self::campaign).
    pub async fn account_media_item(
        &self,
        id: &str,
    ) -> Result<Resource<AccountMedia>, ResourceError> {
        self.load_one::<AccountMedia>(id, Params::new()).await
    }

    /// Lists the `AppList` resources of this account.
    ///
    /// # Errors
    ///
    /// See [`campaigns`](Self::campaigns).
    pub async fn app_lists(
        &self,
        params: Params,
    ) -> Result<Cursor<Resource<AppList>>, ResourceError> {
        self.all_of::<AppList>(params).await
    }

    /// Loads one `AppList` of this account.
    ///
    /// # Errors
    ///
    /// See [`campaign`](Self::campaign).
    pub async fn app_list(&self, id: &str) -> Result<Resource<AppList>, ResourceError> {
        self.load_one::<AppList>(id, Params::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientConfig, Credentials};
    use serde_json::json;

    fn client() -> Client {
        let credentials = Credentials::new("ck", "cs", "at", "ats").unwrap();
        Client::new(ClientConfig::new(credentials)).unwrap()
    }

    #[test]
    fn test_new_account_carries_id() {
        let account = Account::new(client(), "18ce54d4x5t");
        assert_eq!(account.id(), "18ce54d4x5t");
        assert_eq!(
            account.get("id"),
            Some(&PropertyValue::String("18ce54d4x5t".to_string()))
        );
    }

    #[test]
    fn test_from_response_updates_id_and_properties() {
        let mut account = Account::new(client(), "");
        account.from_response(&json!({
            "id": "gq1844",
            "name": "Ads",
            "deleted": false,
            "created_at": "2015-01-01T00:00:00Z",
        }));

        assert_eq!(account.id(), "gq1844");
        assert_eq!(
            account.get("deleted").and_then(PropertyValue::as_bool),
            Some(false)
        );
        assert!(account
            .get("created_at")
            .and_then(PropertyValue::as_time)
            .is_some());
    }

    #[test]
    fn test_paths() {
        let client = client();
        assert_eq!(Account::path(&client, ACCOUNTS_PATH, ""), "/12/accounts");
        assert_eq!(
            Account::path(&client, FEATURES_PATH, "abc"),
            "/12/accounts/abc/features"
        );
    }

    #[tokio::test]
    async fn test_factories_require_account_id() {
        let account = Account::new(client(), "");

        assert!(matches!(
            account.campaigns(Params::new()).await,
            Err(ResourceError::NotLoaded {
                resource: "Account"
            })
        ));
        assert!(matches!(
            account.features().await,
            Err(ResourceError::NotLoaded { .. })
        ));
    }

    #[tokio::test]
    async fn test_reload_without_id_is_noop() {
        let mut account = Account::new(client(), "");
        assert!(account.reload(Params::new()).await.is_ok());
    }
}
