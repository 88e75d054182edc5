//! Resource kinds of the Ads API.
//!
//! Each kind is a unit struct implementing [`ResourceKind`](crate::rest::ResourceKind)
//! plus the capabilities its endpoints support:
//!
//! | Kind | Persistence | Batch | Analytics |
//! |------|:-:|:-:|:-:|
//! | [`Campaign`] | yes | yes | yes |
//! | [`LineItem`] | yes | yes | yes |
//! | [`FundingInstrument`] | yes | | yes |
//! | [`PromotableUser`] | | | |
//! | [`AppList`] | yes | | |
//! | [`TargetingCriteria`] | yes | yes | |
//! | [`PromotedTweet`] | create only | | yes |
//! | [`AccountMedia`] | yes | | |
//! | [`MediaCreative`] | yes | | yes |
//! | [`CardsFetch`] | | | |
//! | [`TailoredAudience`] | yes | | |
//!
//! Instances are [`Resource<K>`](crate::rest::Resource) values:
//!
//! ```rust,ignore
//! use twitter_ads::rest::resources::LineItem;
//! use twitter_ads::rest::Resource;
//!
//! let mut line_item = Resource::<LineItem>::new(&account);
//! line_item
//!     .set("campaign_id", "8wku2")?
//!     .set("objective", "WEBSITE_CLICKS")?
//!     .set("placements", vec!["ALL_ON_TWITTER"])?;
//! line_item.save().await?;
//! ```

mod audience;
mod campaign;
mod creative;
mod targeting;

pub use audience::TailoredAudience;
pub use campaign::{AppList, Campaign, FundingInstrument, LineItem, PromotableUser};
pub use creative::{AccountMedia, CardsFetch, CardsFetchResult, MediaCreative, PromotedTweet};
pub use targeting::{TargetingCriteria, TargetingOption};
