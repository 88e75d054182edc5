//! Targeting criteria and the lookup of targeting options.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::clients::HttpMethod;
use crate::rest::account::Account;
use crate::rest::batch::Batch;
use crate::rest::cursor::Cursor;
use crate::rest::errors::ResourceError;
use crate::rest::params::Params;
use crate::rest::path::build_path;
use crate::rest::property::{Property, Transform};
use crate::rest::resource::{Persistence, ResourceKind};

const OPTIONS_PATH: &str = "/{version}/targeting_criteria/{option}";

/// One targeting criterion of a line item.
#[derive(Debug)]
pub struct TargetingCriteria;

impl ResourceKind for TargetingCriteria {
    const NAME: &'static str = "TargetingCriteria";
    const PROPERTIES: &'static [Property] = &[
        Property::readonly("created_at").transform(Transform::Time),
        Property::readonly("deleted").transform(Transform::Bool),
        Property::readonly("id"),
        Property::readonly("localized_name"),
        Property::readonly("name"),
        Property::readonly("updated_at").transform(Transform::Time),
        Property::writable("line_item_id"),
        Property::writable("operator_type"),
        Property::writable("tailored_audience_expansion").transform(Transform::Bool),
        Property::writable("targeting_type"),
        Property::writable("targeting_value"),
    ];
    const COLLECTION_PATH: Option<&'static str> =
        Some("/{version}/accounts/{account_id}/targeting_criteria");
    const ITEM_PATH: Option<&'static str> =
        Some("/{version}/accounts/{account_id}/targeting_criteria/{id}");
}

impl Persistence for TargetingCriteria {}

impl Batch for TargetingCriteria {
    const BATCH_PATH: &'static str = "/{version}/batch/accounts/{account_id}/targeting_criteria";
    const BATCH_ID_KEY: &'static str = "targeting_criterion_id";
}

/// A family of values a targeting criterion can refer to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetingOption {
    /// App store categories.
    AppStoreCategories,
    /// Behavior taxonomy nodes.
    BehaviorTaxonomies,
    /// Behaviors.
    Behaviors,
    /// Conversation topics.
    Conversations,
    /// Mobile devices.
    Devices,
    /// Events.
    Events,
    /// Interests.
    Interests,
    /// Languages.
    Languages,
    /// Countries, regions, cities and postal codes.
    Locations,
    /// Mobile network operators.
    NetworkOperators,
    /// Platforms.
    Platforms,
    /// Platform versions.
    PlatformVersions,
    /// TV markets.
    TvMarkets,
    /// TV shows.
    TvShows,
}

impl TargetingOption {
    /// Every option, in endpoint name order.
    pub const ALL: [Self; 14] = [
        Self::AppStoreCategories,
        Self::BehaviorTaxonomies,
        Self::Behaviors,
        Self::Conversations,
        Self::Devices,
        Self::Events,
        Self::Interests,
        Self::Languages,
        Self::Locations,
        Self::NetworkOperators,
        Self::Platforms,
        Self::PlatformVersions,
        Self::TvMarkets,
        Self::TvShows,
    ];

    /// Returns the endpoint segment, e.g. `tv_shows`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AppStoreCategories => "app_store_categories",
            Self::BehaviorTaxonomies => "behavior_taxonomies",
            Self::Behaviors => "behaviors",
            Self::Conversations => "conversations",
            Self::Devices => "devices",
            Self::Events => "events",
            Self::Interests => "interests",
            Self::Languages => "languages",
            Self::Locations => "locations",
            Self::NetworkOperators => "network_operators",
            Self::Platforms => "platforms",
            Self::PlatformVersions => "platform_versions",
            Self::TvMarkets => "tv_markets",
            Self::TvShows => "tv_shows",
        }
    }

    fn path(self, account: &Account) -> String {
        let version = account.client().version().to_string();
        let mut ids = HashMap::new();
        ids.insert("version", version.as_str());
        ids.insert("option", self.as_str());
        build_path(OPTIONS_PATH, &ids)
    }
}

impl fmt::Display for TargetingOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TargetingCriteria {
    /// Lists the values available for `option`, e.g. locations matching
    /// `q=New York`. Elements are returned as raw JSON.
    ///
    /// # Errors
    ///
    /// Returns any transport error from the first page.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use twitter_ads::rest::resources::{TargetingCriteria, TargetingOption};
    ///
    /// let mut locations = TargetingCriteria::options(
    ///     &account,
    ///     TargetingOption::Locations,
    ///     Params::new().with("q", "New York"),
    /// )
    /// .await?;
    /// ```
    pub async fn options(
        account: &Account,
        option: TargetingOption,
        params: Params,
    ) -> Result<Cursor<Value>, ResourceError> {
        let request = account
            .client()
            .build_request(HttpMethod::Get, option.path(account), &params)?;
        Cursor::raw(account.client().clone(), request).await
    }
}
