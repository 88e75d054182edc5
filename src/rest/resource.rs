//! Generic resources and the persistence capability.
//!
//! A resource kind is a zero-sized type implementing [`ResourceKind`]: its
//! name, property schema and endpoint templates. [`Resource<K>`] is one
//! entity of that kind, bound to the [`Account`] it belongs to. Capabilities
//! are opt-in traits on the kind:
//!
//! - [`Persistence`]: `save` (create or update) and `delete`
//! - [`Batch`](crate::rest::Batch): several mutations in one request
//! - [`Analytics`](crate::rest::Analytics): metrics queries
//!
//! # Example
//!
//! ```rust,ignore
//! use twitter_ads::rest::resources::Campaign;
//! use twitter_ads::rest::{Params, Resource};
//!
//! let mut campaign = Resource::<Campaign>::new(&account);
//! campaign.set("name", "launch")?;
//! campaign.set("funding_instrument_id", "lygyi")?;
//! campaign.save().await?;            // POST, id assigned from the response
//!
//! campaign.set("entity_status", "PAUSED")?;
//! campaign.save().await?;            // PUT to the item endpoint
//!
//! let mut cursor = Resource::<Campaign>::all(&account, Params::new()).await?;
//! while let Some(campaign) = cursor.next().await? {
//!     println!("{:?}", campaign.id());
//! }
//! ```

use std::fmt;
use std::marker::PhantomData;

use serde_json::Value;

use crate::clients::{HttpRequest, HttpResponse, RateLimits};
use crate::rest::account::Account;
use crate::rest::cursor::Cursor;
use crate::rest::errors::ResourceError;
use crate::rest::params::Params;
use crate::rest::path::{resource_path, ResourceOperation};
use crate::rest::property::{Properties, Property, PropertyValue};

/// Static description of a resource kind.
///
/// Paths are templates with `{version}`, `{account_id}` and `{id}`
/// placeholders. A kind without a collection path cannot be listed; a kind
/// without an item path cannot be loaded, updated or deleted.
pub trait ResourceKind: Sized + Send + Sync + 'static {
    /// The type name used in errors and logs.
    const NAME: &'static str;
    /// The declared properties.
    const PROPERTIES: &'static [Property];
    /// The collection endpoint (list and create).
    const COLLECTION_PATH: Option<&'static str>;
    /// The item endpoint (load, update and delete).
    const ITEM_PATH: Option<&'static str>;
}

/// One entity of kind `K`.
pub struct Resource<K: ResourceKind> {
    account: Account,
    properties: Properties,
    marked_for_deletion: bool,
    rate_limits: RateLimits,
    kind: PhantomData<fn() -> K>,
}

impl<K: ResourceKind> Clone for Resource<K> {
    fn clone(&self) -> Self {
        Self {
            account: self.account.clone(),
            properties: self.properties.clone(),
            marked_for_deletion: self.marked_for_deletion,
            rate_limits: self.rate_limits,
            kind: PhantomData,
        }
    }
}

impl<K: ResourceKind> fmt::Debug for Resource<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(K::NAME)
            .field("account_id", &self.account.id())
            .field("id", &self.id())
            .field("properties", &self.properties)
            .field("marked_for_deletion", &self.marked_for_deletion)
            .finish_non_exhaustive()
    }
}

impl<K: ResourceKind> Resource<K> {
    /// Creates an unsaved instance bound to `account`, with declared
    /// defaults applied.
    #[must_use]
    pub fn new(account: &Account) -> Self {
        Self {
            account: account.clone(),
            properties: Properties::new(K::NAME, K::PROPERTIES),
            marked_for_deletion: false,
            rate_limits: RateLimits::default(),
            kind: PhantomData,
        }
    }

    /// Creates an instance referring to an existing entity without loading
    /// it.
    #[must_use]
    pub fn with_id(account: &Account, id: impl Into<String>) -> Self {
        let mut resource = Self::new(account);
        resource
            .properties
            .set_unchecked("id", Some(PropertyValue::String(id.into())));
        resource
    }

    /// Returns the owning account.
    #[must_use]
    pub const fn account(&self) -> &Account {
        &self.account
    }

    /// Returns the entity id, or `None` if it has not been saved.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.properties.id()
    }

    /// Returns a property value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Sets a writable property.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ReadOnlyProperty`] or
    /// [`ResourceError::UnknownProperty`].
    pub fn set(
        &mut self,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<&mut Self, ResourceError> {
        self.properties.set(name, value)?;
        Ok(self)
    }

    /// Unsets a writable property.
    ///
    /// # Errors
    ///
    /// Same as [`set`](Self::set).
    pub fn clear(&mut self, name: &str) -> Result<&mut Self, ResourceError> {
        self.properties.clear(name)?;
        Ok(self)
    }

    /// Returns all property values.
    #[must_use]
    pub const fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Returns the rate limits reported by the last request for this
    /// instance.
    #[must_use]
    pub const fn rate_limits(&self) -> &RateLimits {
        &self.rate_limits
    }

    /// Marks the instance for deletion by the next batch save.
    pub fn mark_for_deletion(&mut self) -> &mut Self {
        self.marked_for_deletion = true;
        self
    }

    /// Returns `true` if the instance is marked for deletion.
    #[must_use]
    pub const fn is_marked_for_deletion(&self) -> bool {
        self.marked_for_deletion
    }

    /// Populates the properties from a JSON object.
    ///
    /// See [`Properties::from_response`].
    #[allow(clippy::wrong_self_convention)]
    pub fn from_response(&mut self, data: &Value) -> &mut Self {
        self.properties.from_response(data);
        self
    }

    /// Serializes the writable properties that are set.
    #[must_use]
    pub fn to_params(&self) -> Params {
        self.properties.to_params()
    }

    /// Returns the id, or fails if the instance has not been saved.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotLoaded`] if there is no id.
    pub fn require_loaded(&self) -> Result<String, ResourceError> {
        self.id()
            .ok_or(ResourceError::NotLoaded { resource: K::NAME })
    }

    /// Lists the collection of kind `K` in `account`.
    ///
    /// The first page is fetched before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Unsupported`] if the kind has no collection
    /// endpoint, or any transport error from the first page.
    pub async fn all(account: &Account, params: Params) -> Result<Cursor<Self>, ResourceError> {
        let path = Self::collection_path(account, ResourceOperation::All)?;
        let request = account
            .client()
            .build_request(ResourceOperation::All.default_http_method(), path, &params)?;
        Self::cursor(account, request).await
    }

    /// Pages over `request`, decoding every element as a `K` bound to
    /// `account`.
    pub(crate) async fn cursor(
        account: &Account,
        request: HttpRequest,
    ) -> Result<Cursor<Self>, ResourceError> {
        let bound = account.clone();
        Cursor::new(account.client().clone(), request, move |item| {
            let mut resource = Self::new(&bound);
            resource.from_response(item);
            resource
        })
        .await
    }

    /// Loads one entity by id.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] for an empty id,
    /// [`ResourceError::Unsupported`] if the kind has no item endpoint, or
    /// any transport error.
    pub async fn load(account: &Account, id: &str, params: Params) -> Result<Self, ResourceError> {
        if id.is_empty() {
            return Err(ResourceError::Validation(format!(
                "{} id must not be empty.",
                K::NAME
            )));
        }
        let path = Self::item_path(account, id, ResourceOperation::Load)?;
        let response = account
            .client()
            .send(ResourceOperation::Load.default_http_method(), path, &params)
            .await?;

        let mut resource = Self::new(account);
        resource.apply_response(&response)?;
        Ok(resource)
    }

    /// Re-fetches the entity and replaces the property values.
    ///
    /// An unsaved instance is returned unchanged without a request.
    ///
    /// # Errors
    ///
    /// Returns any transport error.
    pub async fn reload(&mut self, params: Params) -> Result<&mut Self, ResourceError> {
        let Some(id) = self.id() else {
            return Ok(self);
        };
        let path = Self::item_path(&self.account, &id, ResourceOperation::Load)?;
        let response = self
            .account
            .client()
            .send(ResourceOperation::Load.default_http_method(), path, &params)
            .await?;
        self.apply_response(&response)?;
        Ok(self)
    }

    /// Records the rate limits of `response` and reads its `data` object.
    pub(crate) fn apply_response(&mut self, response: &HttpResponse) -> Result<(), ResourceError> {
        self.rate_limits = response.rate_limits;
        let data = response_data(response)?;
        self.from_response(data);
        Ok(())
    }

    pub(crate) fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    /// Sets the rate limits reported for this instance.
    pub(crate) fn set_rate_limits(&mut self, rate_limits: RateLimits) {
        self.rate_limits = rate_limits;
    }

    /// Builds the collection path for `account`.
    pub(crate) fn collection_path(
        account: &Account,
        operation: ResourceOperation,
    ) -> Result<String, ResourceError> {
        let template = K::COLLECTION_PATH.ok_or(ResourceError::Unsupported {
            resource: K::NAME,
            operation: operation.as_str(),
        })?;
        Ok(resource_path(
            template,
            account.client().version(),
            account.id(),
            None,
        ))
    }

    /// Builds the item path for `id` in `account`.
    pub(crate) fn item_path(
        account: &Account,
        id: &str,
        operation: ResourceOperation,
    ) -> Result<String, ResourceError> {
        let template = K::ITEM_PATH.ok_or(ResourceError::Unsupported {
            resource: K::NAME,
            operation: operation.as_str(),
        })?;
        Ok(resource_path(
            template,
            account.client().version(),
            account.id(),
            Some(id),
        ))
    }
}

impl<K: Persistence> Resource<K> {
    /// Creates the entity (no id) or updates it (id present).
    ///
    /// # Errors
    ///
    /// See [`Persistence::save`].
    pub async fn save(&mut self) -> Result<&mut Self, ResourceError> {
        K::save(self).await?;
        Ok(self)
    }

    /// Deletes the entity. The instance stays usable and reflects the
    /// response (typically `deleted = true`).
    ///
    /// # Errors
    ///
    /// See [`Persistence::delete`].
    pub async fn delete(&mut self) -> Result<&mut Self, ResourceError> {
        K::delete(self).await?;
        Ok(self)
    }
}

/// Returns the `data` member of a success response.
pub(crate) fn response_data(response: &HttpResponse) -> Result<&Value, ResourceError> {
    response
        .data()
        .ok_or_else(|| ResourceError::UnexpectedResponse("response has no `data` member".to_string()))
}

/// Save and delete for kinds with writable endpoints.
///
/// Kinds override [`before_save`](Self::before_save) to normalize their
/// parameters, or [`save`](Self::save) entirely when the endpoint differs
/// from the create/update convention.
#[allow(async_fn_in_trait)]
pub trait Persistence: ResourceKind {
    /// Adjusts the instance before it is serialized for saving.
    fn before_save(_resource: &mut Resource<Self>) {}

    /// POSTs the parameters to the collection endpoint when the instance has
    /// no id, otherwise PUTs them to the item endpoint, then reads the
    /// response `data` onto the instance.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Unsupported`] if the needed endpoint is not
    /// declared, or any transport error.
    async fn save(resource: &mut Resource<Self>) -> Result<(), ResourceError> {
        Self::before_save(resource);
        let params = resource.to_params();

        let (operation, path) = match resource.id() {
            Some(id) => (
                ResourceOperation::Update,
                Resource::<Self>::item_path(resource.account(), &id, ResourceOperation::Update)?,
            ),
            None => (
                ResourceOperation::Create,
                Resource::<Self>::collection_path(resource.account(), ResourceOperation::Create)?,
            ),
        };

        let response = resource
            .account()
            .client()
            .send(operation.default_http_method(), path, &params)
            .await?;
        resource.apply_response(&response)
    }

    /// DELETEs the entity and reads the response `data` onto the instance.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotLoaded`] for an unsaved instance, or any
    /// transport error.
    async fn delete(resource: &mut Resource<Self>) -> Result<(), ResourceError> {
        let id = resource.require_loaded()?;
        let path = Resource::<Self>::item_path(resource.account(), &id, ResourceOperation::Delete)?;

        let response = resource
            .account()
            .client()
            .send(
                ResourceOperation::Delete.default_http_method(),
                path,
                &Params::new(),
            )
            .await?;
        resource.apply_response(&response)
    }
}
