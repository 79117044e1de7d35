//! Pagination hint derived from a first page

use crate::error::{Error, Result};
use crate::http::FetchResult;
use serde::Serialize;

use super::link::{find_rel, page_number};

/// Page size and last page of a collection, read from its first page
///
/// Derived afresh for every count; nothing about it is cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationHint {
    /// Items on the first page
    pub per_page: u64,
    /// 1-indexed number of the last page
    pub last_page: u64,
    /// URL of the last page
    pub last_url: String,
}

impl PaginationHint {
    /// Derive the hint from the first page fetched from `url`
    pub fn from_first_page(url: &str, first: &FetchResult) -> Result<Self> {
        let per_page = match first.item_count() {
            Some(count) if count > 0 => count as u64,
            _ => return Err(Error::empty_result(url)),
        };

        let header = first
            .headers
            .link()
            .ok_or_else(|| Error::missing_pagination(url))?;

        let last_url = find_rel(header, "last").ok_or_else(|| Error::no_last_link(header))?;

        let last_page = page_number(&last_url)
            .filter(|page| *page >= 1)
            .ok_or_else(|| Error::unparsable_page(&last_url))?;

        Ok(Self {
            per_page,
            last_page,
            last_url,
        })
    }

    /// Total item count given the number of items on the last page
    pub fn total(&self, last_page_count: u64) -> Result<u64> {
        if self.last_page == 0 {
            return Err(Error::unparsable_page(&self.last_url));
        }

        self.per_page
            .checked_mul(self.last_page - 1)
            .and_then(|full| full.checked_add(last_page_count))
            .ok_or(Error::CountOverflow {
                per_page: self.per_page,
                last_page: self.last_page,
            })
    }

    /// Whether the collection fits on a single page
    pub fn is_single_page(&self) -> bool {
        self.last_page == 1
    }
}
