//! Creatives: promoted tweets, account media, media creatives and cards.

use crate::rest::account::Account;
use crate::rest::analytics::{Analytics, Entity};
use crate::rest::cursor::Cursor;
use crate::rest::errors::ResourceError;
use crate::rest::params::{value_to_string, Params};
use crate::rest::path::{resource_path, ResourceOperation};
use crate::rest::property::{Property, Transform};
use crate::rest::resource::{Persistence, Resource, ResourceKind};

/// A tweet promoted by a line item.
///
/// Promoted tweets are created but never updated: saving an instance that
/// already has an id fails without a request.
#[derive(Debug)]
pub struct PromotedTweet;

impl ResourceKind for PromotedTweet {
    const NAME: &'static str = "PromotedTweet";
    const PROPERTIES: &'static [Property] = &[
        Property::readonly("approval_status"),
        Property::readonly("created_at").transform(Transform::Time),
        Property::readonly("deleted").transform(Transform::Bool),
        Property::readonly("entity_status"),
        Property::readonly("id"),
        Property::readonly("updated_at").transform(Transform::Time),
        Property::writable("line_item_id"),
        Property::writable("tweet_id"),
    ];
    const COLLECTION_PATH: Option<&'static str> =
        Some("/{version}/accounts/{account_id}/promoted_tweets");
    const ITEM_PATH: Option<&'static str> =
        Some("/{version}/accounts/{account_id}/promoted_tweets/{id}");
}

impl Persistence for PromotedTweet {
    /// POSTs the tweet as a one-element `tweet_ids` list and reads the
    /// first created entity back.
    async fn save(resource: &mut Resource<Self>) -> Result<(), ResourceError> {
        if resource.id().is_some() {
            return Err(ResourceError::Validation("Method PUT not allowed.".to_string()));
        }

        let mut params = resource.to_params();
        if let Some(tweet_id) = params.remove("tweet_id") {
            params = params.with_list("tweet_ids", [value_to_string(&tweet_id)]);
        }
        let path = Resource::<Self>::collection_path(resource.account(), ResourceOperation::Create)?;

        let response = resource
            .account()
            .client()
            .send(ResourceOperation::Create.default_http_method(), path, &params)
            .await?;
        let created = response
            .data()
            .and_then(|data| data.get(0))
            .ok_or_else(|| {
                ResourceError::UnexpectedResponse(
                    "promoted tweet response has no created entity".to_string(),
                )
            })?;
        resource.from_response(created);
        resource.set_rate_limits(response.rate_limits);
        Ok(())
    }
}

impl Analytics for PromotedTweet {
    const ENTITY: Entity = Entity::PromotedTweet;
}

/// Media in the account's library.
#[derive(Debug)]
pub struct AccountMedia;

impl ResourceKind for AccountMedia {
    const NAME: &'static str = "AccountMedia";
    const PROPERTIES: &'static [Property] = &[
        Property::readonly("created_at").transform(Transform::Time),
        Property::readonly("deleted").transform(Transform::Bool),
        Property::readonly("id"),
        Property::readonly("media_url"),
        Property::readonly("updated_at").transform(Transform::Time),
        Property::writable("creative_type"),
        Property::writable("media_id"),
        Property::writable("video_id"),
    ];
    const COLLECTION_PATH: Option<&'static str> =
        Some("/{version}/accounts/{account_id}/account_media");
    const ITEM_PATH: Option<&'static str> =
        Some("/{version}/accounts/{account_id}/account_media/{id}");
}

impl Persistence for AccountMedia {}

/// Account media attached to a line item.
#[derive(Debug)]
pub struct MediaCreative;

impl ResourceKind for MediaCreative {
    const NAME: &'static str = "MediaCreative";
    const PROPERTIES: &'static [Property] = &[
        Property::readonly("approval_status"),
        Property::readonly("created_at").transform(Transform::Time),
        Property::readonly("deleted").transform(Transform::Bool),
        Property::readonly("id"),
        Property::readonly("serving_status"),
        Property::readonly("updated_at").transform(Transform::Time),
        Property::writable("account_media_id"),
        Property::writable("landing_url"),
        Property::writable("line_item_id"),
    ];
    const COLLECTION_PATH: Option<&'static str> =
        Some("/{version}/accounts/{account_id}/media_creatives");
    const ITEM_PATH: Option<&'static str> =
        Some("/{version}/accounts/{account_id}/media_creatives/{id}");
}

impl Persistence for MediaCreative {}

impl Analytics for MediaCreative {
    const ENTITY: Entity = Entity::MediaCreative;
}

const CARDS_FETCH_PATH: &str = "/{version}/accounts/{account_id}/cards/all";

/// Cards of any type, looked up by card URI or by id. Read-only.
///
/// The kind has no collection endpoint, so [`Resource::all`] is not
/// supported; use [`CardsFetch::load`].
#[derive(Debug)]
pub struct CardsFetch;

impl ResourceKind for CardsFetch {
    const NAME: &'static str = "CardsFetch";
    const PROPERTIES: &'static [Property] = &[
        Property::readonly("country_code"),
        Property::readonly("app_cta"),
        Property::readonly("card_type"),
        Property::readonly("card_uri"),
        Property::readonly("content_duration_seconds"),
        Property::readonly("created_at").transform(Transform::Time),
        Property::readonly("deleted").transform(Transform::Bool),
        Property::readonly("duration_in_minutes"),
        Property::readonly("end_time").transform(Transform::Time),
        Property::readonly("first_choice"),
        Property::readonly("first_cta"),
        Property::readonly("first_cta_tweet"),
        Property::readonly("first_cta_welcome_message_id"),
        Property::readonly("fouth_choice"),
        Property::readonly("fouth_cta"),
        Property::readonly("fouth_cta_tweet"),
        Property::readonly("fourth_cta_welcome_message_id"),
        Property::readonly("googleplay_app_id"),
        Property::readonly("googleplay_deep_link"),
        Property::readonly("id"),
        Property::readonly("image"),
        Property::readonly("image_display_height"),
        Property::readonly("image_display_width"),
        Property::readonly("ipad_app_id"),
        Property::readonly("ipad_deep_link"),
        Property::readonly("iphone_app_id"),
        Property::readonly("iphone_deep_link"),
        Property::readonly("name"),
        Property::readonly("recipient_user_id"),
        Property::readonly("second_choice"),
        Property::readonly("second_cta"),
        Property::readonly("second_cta_tweet"),
        Property::readonly("second_cta_welcome_message_id"),
        Property::readonly("start_time").transform(Transform::Time),
        Property::readonly("thank_you_text"),
        Property::readonly("thank_you_url"),
        Property::readonly("third_choice"),
        Property::readonly("third_cta"),
        Property::readonly("third_cta_tweet"),
        Property::readonly("third_cta_welcome_message_id"),
        Property::readonly("title"),
        Property::readonly("updated_at").transform(Transform::Time),
        Property::readonly("video_content_id"),
        Property::readonly("video_height"),
        Property::readonly("video_hls_url"),
        Property::readonly("video_owner_id"),
        Property::readonly("video_poster_height"),
        Property::readonly("video_poster_url"),
        Property::readonly("video_poster_width"),
        Property::readonly("video_width"),
        Property::readonly("video_url"),
        Property::readonly("website_dest_url"),
        Property::readonly("website_display_url"),
        Property::readonly("website_shortened_url"),
        Property::readonly("website_title"),
        Property::readonly("website_url"),
        Property::readonly("wide_app_image"),
    ];
    const COLLECTION_PATH: Option<&'static str> = None;
    const ITEM_PATH: Option<&'static str> = Some("/{version}/accounts/{account_id}/cards/all/{id}");
}

/// The outcome of [`CardsFetch::load`].
#[derive(Debug)]
pub enum CardsFetchResult {
    /// Cards matched by URI.
    Many(Cursor<Resource<CardsFetch>>),
    /// The card matched by id.
    One(Resource<CardsFetch>),
}

impl CardsFetch {
    /// Fetches cards either by `card_uris` or by `card_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] unless exactly one of
    /// `card_uris` (non-empty) and `card_id` is given, or any transport
    /// error.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use twitter_ads::rest::resources::{CardsFetch, CardsFetchResult};
    ///
    /// let result = CardsFetch::load(&account, &["card://85"], None, false).await?;
    /// if let CardsFetchResult::Many(mut cards) = result {
    ///     while let Some(card) = cards.next().await? {
    ///         println!("{:?}", card.get("name"));
    ///     }
    /// }
    /// ```
    pub async fn load<S: AsRef<str>>(
        account: &Account,
        card_uris: &[S],
        card_id: Option<&str>,
        with_deleted: bool,
    ) -> Result<CardsFetchResult, ResourceError> {
        let card_id = card_id.filter(|id| !id.is_empty());
        if card_uris.is_empty() == card_id.is_none() {
            return Err(ResourceError::Validation(
                "card_uris and card_id are exclusive parameters. \
                 Please supply one or the other, but not both."
                    .to_string(),
            ));
        }

        let mut params = Params::new();
        if with_deleted {
            params.insert("with_deleted", true);
        }

        if let Some(id) = card_id {
            params.insert("card_id", id);
            let path = Resource::<Self>::item_path(account, id, ResourceOperation::Load)?;
            let response = account
                .client()
                .send(ResourceOperation::Load.default_http_method(), path, &params)
                .await?;

            let mut card = Resource::<Self>::new(account);
            card.apply_response(&response)?;
            return Ok(CardsFetchResult::One(card));
        }

        params = params.with_list("card_uris", card_uris.iter().map(|uri| uri.as_ref()));
        let path = resource_path(
            CARDS_FETCH_PATH,
            account.client().version(),
            account.id(),
            None,
        );
        let request = account
            .client()
            .build_request(ResourceOperation::All.default_http_method(), path, &params)?;
        Ok(CardsFetchResult::Many(Resource::<Self>::cursor(account, request).await?))
    }
}

impl CardsFetchResult {
    /// Returns the single card, if the lookup was by id.
    #[must_use]
    pub fn into_one(self) -> Option<Resource<CardsFetch>> {
        match self {
            Self::One(card) => Some(card),
            Self::Many(_) => None,
        }
    }

    /// Returns the cursor, if the lookup was by URI.
    #[must_use]
    pub fn into_many(self) -> Option<Cursor<Resource<CardsFetch>>> {
        match self {
            Self::Many(cards) => Some(cards),
            Self::One(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Client;
    use crate::config::{ClientConfig, Credentials};

    fn account() -> Account {
        let credentials = Credentials::new("ck", "cs", "at", "ats").unwrap();
        Account::new(Client::new(ClientConfig::new(credentials)).unwrap(), "abc")
    }

    #[tokio::test]
    async fn test_promoted_tweet_cannot_be_updated() {
        let mut tweet = Resource::<PromotedTweet>::with_id(&account(), "6c62d");
        let result = tweet.save().await;
        assert!(matches!(
            result,
            Err(ResourceError::Validation(ref message)) if message == "Method PUT not allowed."
        ));
    }

    #[tokio::test]
    async fn test_cards_fetch_needs_exactly_one_selector() {
        let account = account();

        let neither = CardsFetch::load::<&str>(&account, &[], None, false).await;
        assert!(matches!(neither, Err(ResourceError::Validation(_))));

        let both = CardsFetch::load(&account, &["card://85"], Some("508pf"), false).await;
        assert!(matches!(both, Err(ResourceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_cards_fetch_cannot_be_listed() {
        let result = Resource::<CardsFetch>::all(&account(), Params::new()).await;
        assert!(matches!(
            result,
            Err(ResourceError::Unsupported {
                resource: "CardsFetch",
                operation: "all"
            })
        ));
    }

    #[test]
    fn test_cards_are_read_only() {
        assert!(CardsFetch::PROPERTIES.iter().all(|p| p.readonly));
    }
}
