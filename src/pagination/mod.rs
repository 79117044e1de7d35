//! Pagination module
//!
//! Counts the items behind a paginated collection endpoint from two fetches:
//! the first page and the page its `Link` header names as `rel="last"`.
//!
//! # Overview
//!
//! ```text
//! GET url            -> per_page = len(body), Link: <...?page=N>; rel="last"
//! GET last_url       -> last_count = len(body)
//! total = per_page * (N - 1) + last_count
//! ```
//!
//! The formula assumes every page but the last holds `per_page` items, which
//! is how GitHub's REST collections behave. It is not valid for APIs that
//! return ragged pages.

mod estimator;
mod link;
mod types;

pub use estimator::{count_all, PageCounter};
pub use link::{find_rel, page_number, parse_link_header, Link};
pub use types::PaginationHint;
