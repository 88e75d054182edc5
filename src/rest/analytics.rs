//! Metrics queries.
//!
//! Kinds implementing [`Analytics`] can request metrics synchronously
//! ([`Analytics::all_stats`]), through asynchronous jobs
//! ([`Analytics::queue_async_stats_job`], [`async_stats_job_result`],
//! [`async_stats_job_data`]) and ask which entities changed in a window
//! ([`Analytics::active_entities`]).
//!
//! Id lists are sent as given; callers chunk them to at most
//! [`MAX_ENTITY_IDS`] per request.
//!
//! # Example
//!
//! ```rust,ignore
//! use twitter_ads::rest::analytics::{Granularity, MetricGroup, StatsOptions};
//! use twitter_ads::rest::resources::LineItem;
//! use twitter_ads::rest::Analytics;
//!
//! let options = StatsOptions::new()
//!     .start_time(start)
//!     .end_time(end)
//!     .granularity(Granularity::Day);
//! let metrics = LineItem::all_stats(
//!     &account,
//!     &["8u94t", "8u94u"],
//!     &[MetricGroup::Engagement, MetricGroup::Billing],
//!     &options,
//! )
//! .await?;
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, DurationRound, Timelike, Utc};
use serde_json::Value;

use crate::clients::{HttpMethod, HttpRequest};
use crate::rest::account::Account;
use crate::rest::cursor::Cursor;
use crate::rest::errors::ResourceError;
use crate::rest::params::Params;
use crate::rest::path::resource_path;
use crate::rest::property::{Property, Transform};
use crate::rest::resource::{response_data, Resource, ResourceKind};

/// Maximum number of entity ids the API accepts in one stats request.
pub const MAX_ENTITY_IDS: usize = 20;

const STATS_PATH: &str = "/{version}/stats/accounts/{account_id}";
const STATS_JOBS_PATH: &str = "/{version}/stats/jobs/accounts/{account_id}";
const ACTIVE_ENTITIES_PATH: &str = "/{version}/stats/accounts/{account_id}/active_entities";

/// Default stats window when no start time is given.
const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Time bucket of returned metrics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Granularity {
    /// Hourly buckets.
    #[default]
    Hour,
    /// Daily buckets.
    Day,
    /// One bucket for the whole window.
    Total,
}

impl Granularity {
    /// Returns the value sent to the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hour => "HOUR",
            Self::Day => "DAY",
            Self::Total => "TOTAL",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "HOUR" => Ok(Self::Hour),
            "DAY" => Ok(Self::Day),
            "TOTAL" => Ok(Self::Total),
            other => Err(invalid_value("granularity", other)),
        }
    }
}

/// Where the promoted content was shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Everywhere on the platform.
    #[default]
    AllOnTwitter,
    /// The publisher network.
    PublisherNetwork,
    /// Search results.
    TwitterSearch,
    /// Timelines.
    TwitterTimeline,
}

impl Placement {
    /// Returns the value sent to the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AllOnTwitter => "ALL_ON_TWITTER",
            Self::PublisherNetwork => "PUBLISHER_NETWORK",
            Self::TwitterSearch => "TWITTER_SEARCH",
            Self::TwitterTimeline => "TWITTER_TIMELINE",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Placement {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ALL_ON_TWITTER" => Ok(Self::AllOnTwitter),
            "PUBLISHER_NETWORK" => Ok(Self::PublisherNetwork),
            "TWITTER_SEARCH" => Ok(Self::TwitterSearch),
            "TWITTER_TIMELINE" => Ok(Self::TwitterTimeline),
            other => Err(invalid_value("placement", other)),
        }
    }
}

/// Entity type of a metrics request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entity {
    /// Advertising account.
    Account,
    /// Funding instrument.
    FundingInstrument,
    /// Campaign.
    Campaign,
    /// Line item.
    LineItem,
    /// Media creative.
    MediaCreative,
    /// Promoted tweet.
    PromotedTweet,
    /// Organic tweet.
    OrganicTweet,
    /// Targeting criterion.
    TargetingCriterion,
    /// Promoted account.
    PromotedAccount,
}

impl Entity {
    /// Returns the value sent to the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Account => "ACCOUNT",
            Self::FundingInstrument => "FUNDING_INSTRUMENT",
            Self::Campaign => "CAMPAIGN",
            Self::LineItem => "LINE_ITEM",
            Self::MediaCreative => "MEDIA_CREATIVE",
            Self::PromotedTweet => "PROMOTED_TWEET",
            Self::OrganicTweet => "ORGANIC_TWEET",
            Self::TargetingCriterion => "TARGETING_CRITERION",
            Self::PromotedAccount => "PROMOTED_ACCOUNT",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Entity {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ACCOUNT" => Ok(Self::Account),
            "FUNDING_INSTRUMENT" => Ok(Self::FundingInstrument),
            "CAMPAIGN" => Ok(Self::Campaign),
            "LINE_ITEM" => Ok(Self::LineItem),
            "MEDIA_CREATIVE" => Ok(Self::MediaCreative),
            "PROMOTED_TWEET" => Ok(Self::PromotedTweet),
            "ORGANIC_TWEET" => Ok(Self::OrganicTweet),
            "TARGETING_CRITERION" => Ok(Self::TargetingCriterion),
            "PROMOTED_ACCOUNT" => Ok(Self::PromotedAccount),
            other => Err(invalid_value("entity", other)),
        }
    }
}

/// Group of metrics to return.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetricGroup {
    /// Engagement metrics.
    Engagement,
    /// Web conversion metrics.
    WebConversion,
    /// Mobile conversion metrics.
    MobileConversion,
    /// Media metrics.
    Media,
    /// Video metrics.
    Video,
    /// Billing metrics.
    Billing,
    /// Lifetime value mobile conversion metrics.
    LifeTimeValueMobileConversion,
}

impl MetricGroup {
    /// Returns the value sent to the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Engagement => "ENGAGEMENT",
            Self::WebConversion => "WEB_CONVERSION",
            Self::MobileConversion => "MOBILE_CONVERSION",
            Self::Media => "MEDIA",
            Self::Video => "VIDEO",
            Self::Billing => "BILLING",
            Self::LifeTimeValueMobileConversion => "LIFE_TIME_VALUE_MOBILE_CONVERSION",
        }
    }
}

impl fmt::Display for MetricGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricGroup {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ENGAGEMENT" => Ok(Self::Engagement),
            "WEB_CONVERSION" => Ok(Self::WebConversion),
            "MOBILE_CONVERSION" => Ok(Self::MobileConversion),
            "MEDIA" => Ok(Self::Media),
            "VIDEO" => Ok(Self::Video),
            "BILLING" => Ok(Self::Billing),
            "LIFE_TIME_VALUE_MOBILE_CONVERSION" => Ok(Self::LifeTimeValueMobileConversion),
            other => Err(invalid_value("metric group", other)),
        }
    }
}

fn invalid_value(what: &str, value: &str) -> ResourceError {
    ResourceError::Validation(format!("'{value}' is not a valid {what}."))
}

/// Optional parameters of a metrics request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatsOptions {
    /// Window start; defaults to seven days before `end_time`.
    pub start_time: Option<DateTime<Utc>>,
    /// Window end; defaults to now.
    pub end_time: Option<DateTime<Utc>>,
    /// Defaults to [`Granularity::Hour`].
    pub granularity: Option<Granularity>,
    /// Defaults to [`Placement::AllOnTwitter`].
    pub placement: Option<Placement>,
    /// Overrides the kind's entity.
    pub entity: Option<Entity>,
    /// Async jobs only.
    pub platform: Option<String>,
    /// Async jobs only.
    pub country: Option<String>,
    /// Async jobs only.
    pub segmentation_type: Option<String>,
}

impl StatsOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the window start.
    #[must_use]
    pub const fn start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Sets the window end.
    #[must_use]
    pub const fn end_time(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Sets the granularity.
    #[must_use]
    pub const fn granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = Some(granularity);
        self
    }

    /// Sets the placement.
    #[must_use]
    pub const fn placement(mut self, placement: Placement) -> Self {
        self.placement = Some(placement);
        self
    }

    /// Overrides the entity type.
    #[must_use]
    pub const fn entity(mut self, entity: Entity) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Sets the platform segment (async jobs).
    #[must_use]
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Sets the country segment (async jobs).
    #[must_use]
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Sets the segmentation type (async jobs).
    #[must_use]
    pub fn segmentation_type(mut self, segmentation_type: impl Into<String>) -> Self {
        self.segmentation_type = Some(segmentation_type.into());
        self
    }
}

/// Formats `time` for a stats request.
///
/// `HOUR` truncates to the hour, `DAY` truncates to the day and drops the
/// time part, `TOTAL` or no granularity formats the time unchanged.
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use twitter_ads::rest::analytics::{to_time, Granularity};
///
/// let time = Utc.with_ymd_and_hms(2006, 3, 21, 15, 47, 33).unwrap();
/// assert_eq!(to_time(time, Some(Granularity::Hour)), "2006-03-21T15:00:00Z");
/// assert_eq!(to_time(time, Some(Granularity::Day)), "2006-03-21");
/// assert_eq!(to_time(time, Some(Granularity::Total)), "2006-03-21T15:47:33Z");
/// assert_eq!(to_time(time, None), "2006-03-21T15:47:33Z");
/// ```
#[must_use]
pub fn to_time(time: DateTime<Utc>, granularity: Option<Granularity>) -> String {
    match granularity {
        Some(Granularity::Hour) => time
            .duration_trunc(Duration::hours(1))
            .unwrap_or(time)
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string(),
        Some(Granularity::Day) => time.format("%Y-%m-%d").to_string(),
        Some(Granularity::Total) | None => time.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    }
}

/// Checks that `time` falls on a whole hour.
///
/// # Errors
///
/// Returns [`ResourceError::Validation`] if minutes, seconds or
/// sub-seconds are non-zero.
pub fn validate_whole_hours(time: &DateTime<Utc>) -> Result<(), ResourceError> {
    if time.minute() != 0 || time.second() != 0 || time.nanosecond() != 0 {
        return Err(ResourceError::Validation(format!(
            "'{}' is not on a whole hour. Start and end times must be expressed in whole hours.",
            time.format("%Y-%m-%dT%H:%M:%SZ")
        )));
    }
    Ok(())
}

/// Builds the parameters shared by sync and async stats requests.
///
/// `now` is used as the end of the window when none is given.
#[must_use]
pub fn standard_params<S: AsRef<str>>(
    entity: Entity,
    ids: &[S],
    metric_groups: &[MetricGroup],
    options: &StatsOptions,
    now: DateTime<Utc>,
) -> Params {
    let end_time = options.end_time.unwrap_or(now);
    let start_time = options
        .start_time
        .unwrap_or_else(|| end_time - Duration::days(DEFAULT_WINDOW_DAYS));
    let granularity = options.granularity.unwrap_or_default();

    Params::new()
        .with_list("metric_groups", metric_groups.iter().map(MetricGroup::as_str))
        .with("start_time", to_time(start_time, Some(granularity)))
        .with("end_time", to_time(end_time, Some(granularity)))
        .with("granularity", granularity.as_str())
        .with("entity", options.entity.unwrap_or(entity).as_str())
        .with("placement", options.placement.unwrap_or_default().as_str())
        .with_list("entity_ids", ids.iter().map(|id| id.as_ref()))
}

/// Metrics capability of a resource kind.
#[allow(async_fn_in_trait)]
pub trait Analytics: ResourceKind {
    /// The entity type sent with metrics requests for this kind.
    const ENTITY: Entity;

    /// Fetches metrics for `ids` synchronously and returns the `data` array.
    ///
    /// # Errors
    ///
    /// Returns any transport error, or
    /// [`ResourceError::UnexpectedResponse`] without a `data` array.
    async fn all_stats<S: AsRef<str>>(
        account: &Account,
        ids: &[S],
        metric_groups: &[MetricGroup],
        options: &StatsOptions,
    ) -> Result<Vec<Value>, ResourceError> {
        let params = standard_params(Self::ENTITY, ids, metric_groups, options, Utc::now());
        let path = resource_path(STATS_PATH, account.client().version(), account.id(), None);

        let response = account.client().send(HttpMethod::Get, path, &params).await?;
        data_array(response_data(&response)?)
    }

    /// Queues an asynchronous metrics job and returns its descriptor.
    ///
    /// # Errors
    ///
    /// Returns any transport error.
    async fn queue_async_stats_job<S: AsRef<str>>(
        account: &Account,
        ids: &[S],
        metric_groups: &[MetricGroup],
        options: &StatsOptions,
    ) -> Result<Resource<AsyncStatsJob>, ResourceError> {
        let mut params = standard_params(Self::ENTITY, ids, metric_groups, options, Utc::now());
        params.insert("platform", options.platform.clone());
        params.insert("country", options.country.clone());
        params.insert("segmentation_type", options.segmentation_type.clone());

        let path = resource_path(STATS_JOBS_PATH, account.client().version(), account.id(), None);
        let response = account.client().send(HttpMethod::Post, path, &params).await?;

        let mut job = Resource::<AsyncStatsJob>::new(account);
        job.apply_response(&response)?;
        Ok(job)
    }

    /// Returns the entities of this kind whose metrics changed between
    /// `start_time` and `end_time`.
    ///
    /// Both times must be whole hours. Organic tweets are not supported.
    /// These checks happen before any request is sent.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] if a check fails, or any
    /// transport error.
    async fn active_entities(
        account: &Account,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        params: Params,
    ) -> Result<Vec<Value>, ResourceError> {
        let entity = match params.get("entity").and_then(Value::as_str) {
            Some(entity) => entity.parse::<Entity>()?,
            None => Self::ENTITY,
        };
        if entity == Entity::OrganicTweet {
            return Err(ResourceError::Validation(
                "'OrganicTweet' is not supported by 'active_entities'".to_string(),
            ));
        }
        validate_whole_hours(&start_time)?;
        validate_whole_hours(&end_time)?;

        let mut query = Params::new()
            .with("entity", entity.as_str())
            .with("start_time", to_time(start_time, None))
            .with("end_time", to_time(end_time, None));
        query.extend(params);
        query.insert("entity", entity.as_str());

        let path = resource_path(
            ACTIVE_ENTITIES_PATH,
            account.client().version(),
            account.id(),
            None,
        );
        let response = account.client().send(HttpMethod::Get, path, &query).await?;
        data_array(response_data(&response)?)
    }
}

impl<K: Analytics> Resource<K> {
    /// Fetches metrics for this entity.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotLoaded`] for an unsaved instance, or any
    /// error of [`Analytics::all_stats`].
    pub async fn stats(
        &self,
        metric_groups: &[MetricGroup],
        options: &StatsOptions,
    ) -> Result<Vec<Value>, ResourceError> {
        let id = self.require_loaded()?;
        K::all_stats(self.account(), &[id], metric_groups, options).await
    }
}

fn data_array(data: &Value) -> Result<Vec<Value>, ResourceError> {
    data.as_array()
        .cloned()
        .ok_or_else(|| ResourceError::UnexpectedResponse("`data` is not an array".to_string()))
}

/// Descriptor of an asynchronous metrics job.
#[derive(Debug)]
pub struct AsyncStatsJob;

impl ResourceKind for AsyncStatsJob {
    const NAME: &'static str = "AsyncStatsJob";
    const PROPERTIES: &'static [Property] = &[
        Property::readonly("id"),
        Property::readonly("id_str"),
        Property::readonly("status"),
        Property::readonly("url"),
        Property::readonly("created_at").transform(Transform::Time),
        Property::readonly("expires_at").transform(Transform::Time),
        Property::readonly("updated_at").transform(Transform::Time),
        Property::readonly("start_time").transform(Transform::Time),
        Property::readonly("end_time").transform(Transform::Time),
        Property::readonly("entity"),
        Property::readonly("entity_ids"),
        Property::readonly("placement"),
        Property::readonly("granularity"),
        Property::readonly("metric_groups"),
    ];
    const COLLECTION_PATH: Option<&'static str> = Some(STATS_JOBS_PATH);
    const ITEM_PATH: Option<&'static str> = None;
}

/// Returns the descriptors of the given jobs.
///
/// # Errors
///
/// Returns any transport error from the first page.
pub async fn async_stats_job_result<S: AsRef<str>>(
    account: &Account,
    job_ids: &[S],
) -> Result<Cursor<Resource<AsyncStatsJob>>, ResourceError> {
    let params = Params::new().with_list("job_ids", job_ids.iter().map(|id| id.as_ref()));
    Resource::<AsyncStatsJob>::all(account, params).await
}

/// Downloads the result of a finished job from its `url`.
///
/// The result lives on a different host; gzip bodies are decompressed by
/// the transport.
///
/// # Errors
///
/// Returns [`ResourceError::Validation`] for an unparseable URL, or any
/// transport error.
pub async fn async_stats_job_data(account: &Account, url: &str) -> Result<Value, ResourceError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| ResourceError::Validation(format!("invalid job data url '{url}': {e}")))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| ResourceError::Validation(format!("job data url '{url}' has no host")))?;
    let domain = parsed.port().map_or_else(
        || format!("{}://{host}", parsed.scheme()),
        |port| format!("{}://{host}:{port}", parsed.scheme()),
    );

    let mut builder = HttpRequest::builder(HttpMethod::Get, parsed.path()).domain(domain);
    for (key, value) in parsed.query_pairs() {
        builder = builder.query_param(key, value);
    }
    let request = builder.build()?;

    let response = account.client().perform(&request).await?;
    Ok(response.body)
}
