//! Campaign management: campaigns, line items, funding instruments,
//! promotable users and app lists.

use crate::rest::analytics::{Analytics, Entity};
use crate::rest::batch::Batch;
use crate::rest::cursor::Cursor;
use crate::rest::errors::ResourceError;
use crate::rest::params::Params;
use crate::rest::property::{Property, PropertyValue, Transform};
use crate::rest::resource::{Persistence, Resource, ResourceKind};
use crate::rest::resources::targeting::TargetingCriteria;

/// A campaign.
#[derive(Debug)]
pub struct Campaign;

impl ResourceKind for Campaign {
    const NAME: &'static str = "Campaign";
    const PROPERTIES: &'static [Property] = &[
        Property::readonly("created_at").transform(Transform::Time),
        Property::readonly("currency"),
        Property::readonly("deleted").transform(Transform::Bool),
        Property::readonly("id"),
        Property::readonly("reasons_not_servable").transform(Transform::List),
        Property::readonly("servable").transform(Transform::Bool),
        Property::readonly("updated_at").transform(Transform::Time),
        Property::writable("daily_budget_amount_local_micro").transform(Transform::Int),
        Property::writable("duration_in_days").transform(Transform::Int),
        Property::writable("end_time").transform(Transform::Time),
        Property::writable("entity_status"),
        Property::writable("frequency_cap").transform(Transform::Int),
        Property::writable("funding_instrument_id"),
        Property::writable("name"),
        Property::writable("standard_delivery").transform(Transform::Bool),
        Property::writable("start_time").transform(Transform::Time),
        Property::writable("total_budget_amount_local_micro").transform(Transform::Int),
    ];
    const COLLECTION_PATH: Option<&'static str> =
        Some("/{version}/accounts/{account_id}/campaigns");
    const ITEM_PATH: Option<&'static str> = Some("/{version}/accounts/{account_id}/campaigns/{id}");
}

impl Persistence for Campaign {}

impl Batch for Campaign {
    const BATCH_PATH: &'static str = "/{version}/batch/accounts/{account_id}/campaigns";
    const BATCH_ID_KEY: &'static str = "campaign_id";
}

impl Analytics for Campaign {
    const ENTITY: Entity = Entity::Campaign;
}

/// A line item.
///
/// `automatically_select_bid` and `bid_type` are exclusive: on save, a
/// `bid_type` of `AUTO` is dropped in favour of automatic bidding, and any
/// other `bid_type` drops `automatically_select_bid`.
#[derive(Debug)]
pub struct LineItem;

impl ResourceKind for LineItem {
    const NAME: &'static str = "LineItem";
    const PROPERTIES: &'static [Property] = &[
        Property::readonly("created_at").transform(Transform::Time),
        Property::readonly("deleted").transform(Transform::Bool),
        Property::readonly("id"),
        Property::readonly("updated_at").transform(Transform::Time),
        Property::writable("advertiser_domain"),
        Property::writable("advertiser_user_id"),
        Property::writable("automatically_select_bid").transform(Transform::Bool),
        Property::writable("bid_amount_local_micro").transform(Transform::Int),
        Property::writable("bid_type"),
        Property::writable("bid_unit"),
        Property::writable("campaign_id"),
        Property::writable("categories").transform(Transform::List),
        Property::writable("charge_by"),
        Property::writable("end_time").transform(Transform::Time),
        Property::writable("entity_status"),
        Property::writable("include_sentiment"),
        Property::writable("audience_expansion"),
        Property::writable("name"),
        Property::writable("objective"),
        Property::writable("optimization"),
        Property::writable("placements").transform(Transform::List),
        Property::writable("primary_web_event_tag"),
        Property::writable("product_type"),
        Property::writable("start_time").transform(Transform::Time),
        Property::writable("total_budget_amount_local_micro").transform(Transform::Int),
        Property::writable("tracking_tags"),
    ];
    const COLLECTION_PATH: Option<&'static str> =
        Some("/{version}/accounts/{account_id}/line_items");
    const ITEM_PATH: Option<&'static str> =
        Some("/{version}/accounts/{account_id}/line_items/{id}");
}

impl Persistence for LineItem {
    fn before_save(resource: &mut Resource<Self>) {
        let automatic = resource
            .get("automatically_select_bid")
            .and_then(PropertyValue::as_bool)
            .unwrap_or(false);
        let Some(bid_type) = resource
            .get("bid_type")
            .and_then(PropertyValue::as_str)
            .map(str::to_owned)
        else {
            return;
        };
        if !automatic || bid_type.is_empty() {
            return;
        }

        let dropped = if bid_type == "AUTO" {
            "bid_type"
        } else {
            "automatically_select_bid"
        };
        tracing::debug!(
            line_item = resource.id().unwrap_or_default(),
            bid_type = %bid_type,
            "automatically_select_bid and bid_type are exclusive, dropping {}",
            dropped
        );
        resource.properties_mut().set_unchecked(dropped, None);
    }
}

impl Batch for LineItem {
    const BATCH_PATH: &'static str = "/{version}/batch/accounts/{account_id}/line_items";
    const BATCH_ID_KEY: &'static str = "line_item_id";
}

impl Analytics for LineItem {
    const ENTITY: Entity = Entity::LineItem;
}

impl Resource<LineItem> {
    /// Lists the targeting criteria of this line item.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotLoaded`] for an unsaved line item, or any
    /// transport error from the first page.
    pub async fn targeting_criteria(
        &self,
        params: Params,
    ) -> Result<Cursor<Resource<TargetingCriteria>>, ResourceError> {
        let id = self.require_loaded()?;
        let mut query = Params::new().with("line_item_ids", id);
        query.extend(params);
        Resource::<TargetingCriteria>::all(self.account(), query).await
    }
}

/// A funding instrument. Read-only.
#[derive(Debug)]
pub struct FundingInstrument;

impl ResourceKind for FundingInstrument {
    const NAME: &'static str = "FundingInstrument";
    const PROPERTIES: &'static [Property] = &[
        Property::readonly("id"),
        Property::readonly("name"),
        Property::readonly("credit_limit_local_micro").transform(Transform::Int),
        Property::readonly("currency"),
        Property::readonly("description"),
        Property::readonly("funded_amount_local_micro").transform(Transform::Int),
        Property::readonly("type"),
        Property::readonly("created_at").transform(Transform::Time),
        Property::readonly("updated_at").transform(Transform::Time),
        Property::readonly("deleted").transform(Transform::Bool),
        Property::readonly("able_to_fund").transform(Transform::Bool),
        Property::readonly("entity_status"),
        Property::readonly("io_header"),
        Property::readonly("reasons_not_able_to_fund").transform(Transform::List),
        Property::readonly("start_time").transform(Transform::Time),
        Property::readonly("end_time").transform(Transform::Time),
        Property::readonly("credit_remaining_local_micro").transform(Transform::Int),
    ];
    const COLLECTION_PATH: Option<&'static str> =
        Some("/{version}/accounts/{account_id}/funding_instruments");
    const ITEM_PATH: Option<&'static str> =
        Some("/{version}/accounts/{account_id}/funding_instruments/{id}");
}

impl Persistence for FundingInstrument {}

impl Analytics for FundingInstrument {
    const ENTITY: Entity = Entity::FundingInstrument;
}

/// A user whose content the account may promote.
#[derive(Debug)]
pub struct PromotableUser;

impl ResourceKind for PromotableUser {
    const NAME: &'static str = "PromotableUser";
    const PROPERTIES: &'static [Property] = &[
        Property::readonly("id"),
        Property::readonly("promotable_user_type"),
        Property::readonly("user_id"),
        Property::readonly("created_at").transform(Transform::Time),
        Property::readonly("updated_at").transform(Transform::Time),
        Property::readonly("deleted").transform(Transform::Bool),
    ];
    const COLLECTION_PATH: Option<&'static str> =
        Some("/{version}/accounts/{account_id}/promotable_users");
    const ITEM_PATH: Option<&'static str> =
        Some("/{version}/accounts/{account_id}/promotable_users/{id}");
}

/// A list of mobile apps.
#[derive(Debug)]
pub struct AppList;

impl ResourceKind for AppList {
    const NAME: &'static str = "AppList";
    const PROPERTIES: &'static [Property] = &[
        Property::readonly("id"),
        Property::readonly("name"),
        Property::readonly("apps").transform(Transform::List),
    ];
    const COLLECTION_PATH: Option<&'static str> =
        Some("/{version}/accounts/{account_id}/app_lists");
    const ITEM_PATH: Option<&'static str> = Some("/{version}/accounts/{account_id}/app_lists/{id}");
}

impl Persistence for AppList {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Client;
    use crate::config::{ClientConfig, Credentials};
    use crate::rest::account::Account;

    fn account() -> Account {
        let credentials = Credentials::new("ck", "cs", "at", "ats").unwrap();
        Account::new(Client::new(ClientConfig::new(credentials)).unwrap(), "abc")
    }

    fn line_item(automatic: bool, bid_type: &str) -> Resource<LineItem> {
        let mut line_item = Resource::<LineItem>::new(&account());
        line_item.set("automatically_select_bid", automatic).unwrap();
        line_item.set("bid_type", bid_type).unwrap();
        line_item
    }

    #[test]
    fn test_auto_bid_type_is_dropped() {
        let mut item = line_item(true, "AUTO");
        LineItem::before_save(&mut item);

        let params = item.to_params();
        assert!(!params.contains_key("bid_type"));
        assert_eq!(
            params.get("automatically_select_bid"),
            Some(&serde_json::json!("true"))
        );
    }

    #[test]
    fn test_explicit_bid_type_drops_automatic_bidding() {
        let mut item = line_item(true, "MAX");
        LineItem::before_save(&mut item);

        let params = item.to_params();
        assert!(!params.contains_key("automatically_select_bid"));
        assert_eq!(params.get("bid_type"), Some(&serde_json::json!("MAX")));
    }

    #[test]
    fn test_bid_fields_untouched_without_automatic_bidding() {
        let mut item = line_item(false, "AUTO");
        LineItem::before_save(&mut item);

        let params = item.to_params();
        assert!(params.contains_key("bid_type"));
        assert!(params.contains_key("automatically_select_bid"));
    }

    #[test]
    fn test_funding_instrument_is_read_only() {
        assert!(FundingInstrument::PROPERTIES.iter().all(|p| p.readonly));
    }

    #[tokio::test]
    async fn test_targeting_criteria_requires_saved_line_item() {
        let item = Resource::<LineItem>::new(&account());
        assert!(matches!(
            item.targeting_criteria(Params::new()).await,
            Err(ResourceError::NotLoaded {
                resource: "LineItem"
            })
        ));
    }
}
