//! The resource layer of the Ads API.
//!
//! This module turns JSON endpoints into typed entities:
//!
//! - **[`Account`]**: the advertising account scope and its collection factories
//! - **[`Resource<K>`]**: one entity of a [`ResourceKind`], with a property bag
//!   governed by a static schema of [`Property`] descriptors
//! - **[`Cursor<T>`]**: lazy pagination over a collection endpoint
//! - **[`Persistence`]**, **[`Batch`]** and **[`Analytics`]**: opt-in
//!   capabilities of a kind
//! - **[`Params`]**: request parameters and their query serialization
//! - **[`ResourceError`]**: errors of resource operations, wrapping transport
//!   errors
//!
//! Concrete kinds live in [`resources`].
//!
//! # Example
//!
//! ```rust,ignore
//! use twitter_ads::{Client, ClientConfig, Credentials};
//! use twitter_ads::rest::analytics::{Granularity, MetricGroup, StatsOptions};
//! use twitter_ads::rest::resources::Campaign;
//! use twitter_ads::rest::{Analytics, Params};
//!
//! let client = Client::new(ClientConfig::new(Credentials::new("ck", "cs", "at", "ats")?))?;
//! let account = client.account("18ce54d4x5t").await?;
//!
//! let mut campaigns = account.campaigns(Params::new().with("count", 100)).await?;
//! while let Some(campaign) = campaigns.next().await? {
//!     let stats = campaign
//!         .stats(&[MetricGroup::Engagement], &StatsOptions::new().granularity(Granularity::Day))
//!         .await?;
//!     println!("{:?}: {stats:?}", campaign.id());
//! }
//! ```

mod account;
pub mod analytics;
mod batch;
mod cursor;
mod errors;
mod params;
mod path;
mod property;
mod resource;

pub mod resources;

pub use account::{Account, ACCOUNT_PROPERTIES};
pub use analytics::{Analytics, AsyncStatsJob};
pub use batch::{Batch, BatchOperation};
pub use cursor::Cursor;
pub use errors::ResourceError;
pub use params::Params;
pub use path::{build_path, resource_path, ResourceOperation};
pub use property::{
    Properties, Property, PropertyDefault, PropertyValue, Transform, TIME_FORMAT,
};
pub use resource::{Persistence, Resource, ResourceKind};
