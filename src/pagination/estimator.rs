//! Paginated count estimator
//!
//! Two dependent fetches per count, no retries, no fallback to walking every
//! page. Each call is an independent transaction; counts for different
//! endpoints can run concurrently against a shared fetcher.

use super::types::PaginationHint;
use crate::error::{Error, Result};
use crate::http::Fetch;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Count every item behind a paginated collection endpoint
///
/// The first page must be a non-empty JSON array and carry a `Link` header
/// with a `rel="last"` entry whose URL has a `page` query parameter.
pub async fn count_all<F>(fetcher: &F, url: &str) -> Result<u64>
where
    F: Fetch + ?Sized,
{
    let first = fetcher.fetch(url).await?;
    let hint = PaginationHint::from_first_page(url, &first)?;
    let last_url = resolve_link(url, &hint.last_url);

    debug!(
        "{} holds {} items per page, last page {} at {}",
        url, hint.per_page, hint.last_page, last_url
    );

    let last = fetcher.fetch(&last_url).await?;
    let last_page_count = last
        .item_count()
        .ok_or_else(|| Error::empty_result(&last_url))? as u64;

    if last_page_count > hint.per_page {
        warn!(
            "Last page of {} holds {} items, more than the first page's {}",
            url, last_page_count, hint.per_page
        );
    }

    let total = hint.total(last_page_count)?;
    info!("Counted {} items at {}", total, url);
    Ok(total)
}

/// Resolve a Link target against the URL of the request that returned it
///
/// Absolute targets are kept as written. When the request URL is itself
/// relative, the target is left for the fetcher to place under its base URL.
fn resolve_link(request_url: &str, target: &str) -> String {
    if Url::parse(target).is_ok() {
        return target.to_string();
    }

    match Url::parse(request_url).and_then(|base| base.join(target)) {
        Ok(resolved) => resolved.into(),
        Err(_) => target.to_string(),
    }
}

/// Counter bound to a fetcher, for callers that count many endpoints
#[derive(Debug)]
pub struct PageCounter<F: ?Sized> {
    fetcher: Arc<F>,
}

impl<F: ?Sized> Clone for PageCounter<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
        }
    }
}

impl<F: Fetch + ?Sized> PageCounter<F> {
    /// Create a counter over a shared fetcher
    pub fn new(fetcher: Arc<F>) -> Self {
        Self { fetcher }
    }

    /// Count every item behind `url`
    pub async fn count_all(&self, url: &str) -> Result<u64> {
        count_all(self.fetcher.as_ref(), url).await
    }

    /// Fetch the first page only and derive its pagination hint
    pub async fn hint(&self, url: &str) -> Result<PaginationHint> {
        let first = self.fetcher.fetch(url).await?;
        PaginationHint::from_first_page(url, &first)
    }
}
