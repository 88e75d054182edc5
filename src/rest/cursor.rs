//! Paginated collections.
//!
//! A [`Cursor`] wraps a collection endpoint. The first page is fetched when
//! the cursor is created; further pages are requested on demand with the
//! same request plus `cursor=<next_cursor>`, until a page arrives without a
//! `next_cursor`. A cursor cannot be restarted.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut cursor = account.line_items(Params::new().with("count", 200)).await?;
//! println!("{} line items", cursor.count());
//!
//! while let Some(line_item) = cursor.next().await? {
//!     println!("{:?}", line_item.get("name"));
//! }
//! assert!(cursor.is_exhausted());
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::client::Client;
use crate::clients::{HttpRequest, HttpResponse, RateLimits};
use crate::rest::errors::ResourceError;

type Decoder<T> = Arc<dyn Fn(&Value) -> T + Send + Sync>;

/// A lazily paginated sequence of `T`.
pub struct Cursor<T> {
    client: Client,
    request: HttpRequest,
    decode: Decoder<T>,
    collection: Vec<T>,
    position: usize,
    next_cursor: Option<String>,
    total_count: Option<u64>,
    rate_limits: RateLimits,
}

impl<T> fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("path", &self.request.path)
            .field("fetched", &self.collection.len())
            .field("position", &self.position)
            .field("next_cursor", &self.next_cursor)
            .field("total_count", &self.total_count)
            .finish_non_exhaustive()
    }
}

impl Cursor<Value> {
    /// Creates a cursor yielding the raw JSON elements of each page.
    ///
    /// # Errors
    ///
    /// Same as [`Cursor::new`].
    pub async fn raw(client: Client, request: HttpRequest) -> Result<Self, ResourceError> {
        Self::new(client, request, Value::clone).await
    }
}

impl<T> Cursor<T> {
    /// Creates a cursor over `request`, decoding each element with `decode`,
    /// and fetches the first page.
    ///
    /// # Errors
    ///
    /// Returns any transport error, or [`ResourceError::UnexpectedResponse`]
    /// if the page has no `data` array.
    pub async fn new<F>(client: Client, request: HttpRequest, decode: F) -> Result<Self, ResourceError>
    where
        F: Fn(&Value) -> T + Send + Sync + 'static,
    {
        let response = client.perform(&request).await?;

        let mut cursor = Self {
            client,
            request,
            decode: Arc::new(decode),
            collection: Vec::new(),
            position: 0,
            next_cursor: None,
            total_count: None,
            rate_limits: RateLimits::default(),
        };
        cursor.ingest(&response)?;
        Ok(cursor)
    }

    /// Returns the first element without advancing.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.collection.first()
    }

    /// Returns the server-reported total, or the number of elements fetched
    /// so far when the server reports none.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.total_count
            .filter(|total| *total > 0)
            .unwrap_or_else(|| u64::try_from(self.collection.len()).unwrap_or(u64::MAX))
    }

    /// Returns the number of elements fetched so far.
    #[must_use]
    pub fn fetched(&self) -> usize {
        self.collection.len()
    }

    /// Returns `true` when no further page remains to be fetched.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.next_cursor.is_none()
    }

    /// Returns the continuation token of the next page.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    /// Returns the rate limits reported by the last page.
    #[must_use]
    pub const fn rate_limits(&self) -> &RateLimits {
        &self.rate_limits
    }

    /// Returns the request this cursor pages over.
    #[must_use]
    pub const fn request(&self) -> &HttpRequest {
        &self.request
    }

    fn ingest(&mut self, response: &HttpResponse) -> Result<(), ResourceError> {
        let data = response
            .data()
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ResourceError::UnexpectedResponse(format!(
                    "collection response from {} has no `data` array",
                    self.request.path
                ))
            })?;

        self.collection.extend(data.iter().map(|item| (self.decode)(item)));
        self.next_cursor = response.next_cursor();
        if let Some(total) = response.total_count() {
            self.total_count = Some(total);
        }
        self.rate_limits = response.rate_limits;
        Ok(())
    }

    async fn fetch_next(&mut self, token: String) -> Result<(), ResourceError> {
        let request = self.request.with_query_param("cursor", token);
        let response = self.client.perform(&request).await?;
        self.ingest(&response)
    }
}

impl<T: Clone> Cursor<T> {
    /// Returns the next element, fetching the next page when the buffered
    /// ones are used up. Returns `Ok(None)` once the collection is exhausted.
    ///
    /// # Errors
    ///
    /// Returns any transport error from a page fetch. The cursor stays
    /// positioned so the call can be repeated.
    pub async fn next(&mut self) -> Result<Option<T>, ResourceError> {
        loop {
            if let Some(item) = self.collection.get(self.position) {
                self.position += 1;
                return Ok(Some(item.clone()));
            }
            let Some(token) = self.next_cursor.clone() else {
                return Ok(None);
            };
            self.fetch_next(token).await?;
        }
    }

    /// Drains the cursor, fetching every remaining page.
    ///
    /// # Errors
    ///
    /// Returns the first transport error encountered.
    pub async fn collect_remaining(&mut self) -> Result<Vec<T>, ResourceError> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }
}
