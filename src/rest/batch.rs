//! Batch mutation of several entities in one request.

use serde_json::{json, Value};

use crate::clients::{DataType, HttpRequest};
use crate::rest::account::Account;
use crate::rest::errors::ResourceError;
use crate::rest::path::{resource_path, ResourceOperation};
use crate::rest::resource::{Resource, ResourceKind};

/// The operation sent for one entity of a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchOperation {
    /// The entity has no id.
    Create,
    /// The entity has an id and is not marked for deletion.
    Update,
    /// The entity is marked for deletion.
    Delete,
}

impl BatchOperation {
    /// Returns the `operation_type` value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }

    /// Chooses the operation for `resource`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotLoaded`] if an entity without an id is
    /// marked for deletion.
    pub fn for_resource<K: ResourceKind>(resource: &Resource<K>) -> Result<Self, ResourceError> {
        match (resource.id(), resource.is_marked_for_deletion()) {
            (None, false) => Ok(Self::Create),
            (None, true) => Err(ResourceError::NotLoaded { resource: K::NAME }),
            (Some(_), false) => Ok(Self::Update),
            (Some(_), true) => Ok(Self::Delete),
        }
    }
}

/// Batch create, update and delete.
///
/// # Example
///
/// ```rust,ignore
/// use twitter_ads::rest::resources::Campaign;
/// use twitter_ads::rest::{Batch, Resource};
///
/// let mut draft = Resource::<Campaign>::new(&account);
/// draft.set("name", "new")?;
/// let mut stale = Resource::<Campaign>::with_id(&account, "8wku2");
/// stale.mark_for_deletion();
///
/// let mut campaigns = vec![draft, stale];
/// Campaign::batch_save(&account, &mut campaigns).await?;
/// ```
#[allow(async_fn_in_trait)]
pub trait Batch: ResourceKind {
    /// The batch endpoint template.
    const BATCH_PATH: &'static str;
    /// The parameter naming the entity in update and delete operations,
    /// e.g. `campaign_id`.
    const BATCH_ID_KEY: &'static str;

    /// Builds the JSON body for `items`, one operation per entity in order.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotLoaded`] if an entity without an id is
    /// marked for deletion.
    fn batch_body(items: &[Resource<Self>]) -> Result<Value, ResourceError> {
        let operations = items
            .iter()
            .map(|item| {
                let operation = BatchOperation::for_resource(item)?;
                let mut params = item.to_params();
                if let Some(id) = item.id() {
                    params.insert(Self::BATCH_ID_KEY, id);
                }
                Ok(json!({
                    "operation_type": operation.as_str(),
                    "params": Value::from(params),
                }))
            })
            .collect::<Result<Vec<_>, ResourceError>>()?;
        Ok(Value::Array(operations))
    }

    /// Sends every entity of `items` in one request and reads the results
    /// back onto them in order.
    ///
    /// The call is all-or-nothing: an error status fails the whole batch and
    /// leaves `items` untouched. An empty slice sends nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotLoaded`] for a deletion without id,
    /// [`ResourceError::UnexpectedResponse`] if the response does not hold
    /// one result per entity, or any transport error.
    async fn batch_save(account: &Account, items: &mut [Resource<Self>]) -> Result<(), ResourceError> {
        if items.is_empty() {
            return Ok(());
        }

        let body = Self::batch_body(items)?;
        let path = resource_path(
            Self::BATCH_PATH,
            account.client().version(),
            account.id(),
            None,
        );
        let request = HttpRequest::builder(ResourceOperation::Batch.default_http_method(), path)
            .body(body)
            .body_type(DataType::Json)
            .build()?;

        let response = account.client().perform(&request).await?;
        let results = response
            .data()
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ResourceError::UnexpectedResponse("batch response has no `data` array".to_string())
            })?;
        if results.len() != items.len() {
            return Err(ResourceError::UnexpectedResponse(format!(
                "batch of {} {} entities returned {} results",
                items.len(),
                Self::NAME,
                results.len()
            )));
        }

        for (item, result) in items.iter_mut().zip(results) {
            item.from_response(result);
            item.set_rate_limits(response.rate_limits);
        }
        Ok(())
    }
}
