//! Lazy pagination over HAL collections.
//!
//! Search endpoints return pages shaped like:
//!
//! ```json
//! {
//!   "count": 37,
//!   "_embedded": { "calls": [ ... ] },
//!   "_links": { "self": {"href": "..."}, "next": {"href": "..."} }
//! }
//! ```
//!
//! [`Pager`] walks these pages one HTTP round trip at a time. Nothing is
//! fetched until the pager is first advanced, and the next page is only
//! requested when iteration crosses the current page boundary. Disabling
//! auto-advance pins the pager to the pages explicitly requested. A pager
//! is restartable only by reconstructing it from the resource.

use std::collections::VecDeque;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::errors::{ApiError, ResponseError};
use crate::client::http_response::HttpResponse;
use crate::client::resource::ApiResource;

/// One fetched page of a HAL collection.
#[derive(Clone, Debug)]
pub struct Page<T> {
    /// The decoded members of this page.
    pub items: Vec<T>,
    /// The collection-wide total, when the body declares one.
    pub total: Option<u64>,
    /// Whether the page links to a successor.
    pub has_next: bool,
}

enum PagerState {
    /// No request made yet; holds the initial filter.
    NotStarted(Value),
    /// At least one page fetched; holds the next page URL, if any.
    Started { next_url: Option<String> },
}

/// A lazy cursor over a paginated HAL collection.
///
/// # Example
///
/// ```rust,ignore
/// let mut pager = client.voice().call_pager(&CallFilter::default());
/// while let Some(call) = pager.try_next().await? {
///     println!("{}", call.uuid);
/// }
/// ```
pub struct Pager<T> {
    resource: ApiResource,
    collection: &'static str,
    state: PagerState,
    buffer: VecDeque<T>,
    auto_advance: bool,
}

impl<T: DeserializeOwned> Pager<T> {
    /// Creates a pager; no request is made until the first advance.
    #[must_use]
    pub fn new(resource: ApiResource, collection: &'static str, filter: Value) -> Self {
        Self {
            resource,
            collection,
            state: PagerState::NotStarted(filter),
            buffer: VecDeque::new(),
            auto_advance: true,
        }
    }

    /// Disables (or re-enables) automatic page advancement.
    ///
    /// With auto-advance off, [`try_next`](Self::try_next) stops at the end
    /// of the current page even when more pages exist; the caller advances
    /// explicitly with [`next_page`](Self::next_page).
    pub fn set_auto_advance(&mut self, enabled: bool) {
        self.auto_advance = enabled;
    }

    /// Returns `true` once every page has been fetched and consumed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, PagerState::Started { next_url: None }) && self.buffer.is_empty()
    }

    /// Fetches the next page.
    ///
    /// Returns `Ok(None)` when no pages remain. The page's items are
    /// returned to the caller, not buffered; mixing `next_page` with
    /// [`try_next`](Self::try_next) hands each item out exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures, or
    /// [`ResponseError::Malformed`] when a page member does not decode.
    pub async fn next_page(&mut self) -> Result<Option<Page<T>>, ApiError> {
        let response = match &self.state {
            PagerState::NotStarted(filter) => {
                let filter = filter.clone();
                self.resource.search(&filter, "").await?
            }
            PagerState::Started { next_url: None } => return Ok(None),
            PagerState::Started {
                next_url: Some(url),
            } => {
                let url = url.clone();
                self.resource.get_absolute(&url).await?
            }
        };

        let page = self.decode_page(&response)?;
        self.state = PagerState::Started {
            next_url: response.next_page_url().map(ToString::to_string),
        };
        Ok(Some(page))
    }

    /// Returns the next item, fetching pages lazily as needed.
    ///
    /// The first call fetches the first page. Later calls only touch the
    /// network when the buffered page is spent and auto-advance permits
    /// following `_links.next`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for dispatch failures, or
    /// [`ResponseError::Malformed`] when a page member does not decode.
    pub async fn try_next(&mut self) -> Result<Option<T>, ApiError> {
        if let Some(item) = self.buffer.pop_front() {
            return Ok(Some(item));
        }

        let may_fetch = match &self.state {
            PagerState::NotStarted(_) => true,
            PagerState::Started { next_url } => self.auto_advance && next_url.is_some(),
        };
        if !may_fetch {
            return Ok(None);
        }

        if let Some(page) = self.next_page().await? {
            self.buffer.extend(page.items);
        }
        Ok(self.buffer.pop_front())
    }

    fn decode_page(&self, response: &HttpResponse) -> Result<Page<T>, ApiError> {
        let members = response.embedded(self.collection).ok_or_else(|| {
            ResponseError::MissingKeys {
                missing: vec![format!("_embedded.{}", self.collection)],
            }
        })?;

        let items = members
            .iter()
            .map(|member| {
                serde_json::from_value(member.clone()).map_err(|e| ResponseError::Malformed {
                    reason: format!("could not decode {} member: {e}", self.collection),
                })
            })
            .collect::<Result<Vec<T>, _>>()?;

        let total = response
            .body
            .get("count")
            .or_else(|| response.body.get("total_items"))
            .and_then(Value::as_u64);

        Ok(Page {
            items,
            total,
            has_next: response.next_page_url().is_some(),
        })
    }
}
