//! Paginated collection fetching
//!
//! [`fetch_all`] walks a list endpoint page by page, following the
//! server-supplied `next_page` cursor until it is absent, and returns the
//! concatenated items. Pages are requested strictly one after another.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use shared::{ApiResponse, CommonError, PageEnvelope, PageRequest, PageResponse, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::http::ApiTransport;

/// Loads one page of a collection
#[async_trait]
pub trait PageLoader<T>: Send + Sync {
    async fn load_page(&self, request: PageRequest) -> Result<PageResponse<T>>;
}

/// Result of a fetch session that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    /// Every page was visited
    Complete(Vec<T>),
    /// The caller cancelled; partial results were dropped
    Cancelled,
}

impl<T> FetchOutcome<T> {
    pub fn into_items(self) -> Option<Vec<T>> {
        match self {
            FetchOutcome::Complete(items) => Some(items),
            FetchOutcome::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchOutcome::Cancelled)
    }
}

/// Fetch every page starting at page 1.
///
/// The token is checked before each request. A failed page aborts the whole
/// session with [`CommonError::SessionAborted`]; nothing is retried and no
/// partial collection is returned.
pub async fn fetch_all<T, L>(
    loader: &L,
    limit: u32,
    cancel: &CancellationToken,
) -> Result<FetchOutcome<T>>
where
    L: PageLoader<T> + ?Sized,
    T: Send,
{
    let mut accumulator = Vec::new();
    let mut request = PageRequest::first(limit);
    let mut pages_visited = 0u32;

    loop {
        if cancel.is_cancelled() {
            debug!("Fetch cancelled before page {}", request.page);
            return Ok(FetchOutcome::Cancelled);
        }

        let page = loader.load_page(request).await.map_err(|e| {
            warn!("Page {} failed, aborting fetch: {}", request.page, e);
            CommonError::SessionAborted {
                page: request.page,
                reason: e.to_string(),
            }
        })?;

        pages_visited += 1;
        accumulator.extend(page.items);

        match page.next_page {
            Some(next) => request = request.with_page(next),
            None => break,
        }
    }

    // Cancelled while the last page was in flight
    if cancel.is_cancelled() {
        debug!("Fetch cancelled after page {}", request.page);
        return Ok(FetchOutcome::Cancelled);
    }

    debug!(
        "Fetched {} items across {} pages",
        accumulator.len(),
        pages_visited
    );
    Ok(FetchOutcome::Complete(accumulator))
}

/// [`PageLoader`] for a `GET <path>?page=&limit=` list endpoint
pub struct EndpointPager<T> {
    transport: ApiTransport,
    path: String,
    _item: PhantomData<fn() -> T>,
}

impl<T> EndpointPager<T> {
    pub fn new(transport: ApiTransport, path: impl Into<String>) -> Self {
        Self {
            transport,
            path: path.into(),
            _item: PhantomData,
        }
    }
}

#[async_trait]
impl<T> PageLoader<T> for EndpointPager<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn load_page(&self, request: PageRequest) -> Result<PageResponse<T>> {
        let query = [
            ("page", request.page.to_string()),
            ("limit", request.limit.to_string()),
        ];
        let response: ApiResponse<PageEnvelope<T>> = self.transport.get(&self.path, &query).await?;
        let response = response.ensure_success("Failed to load page")?;

        Ok(match response.data {
            Some(envelope) => envelope.into_page(),
            None => PageResponse::last(Vec::new()),
        })
    }
}
