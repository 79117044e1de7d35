// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]

//! # gh-tally
//!
//! Counts the items behind paginated REST collections (commits, pull
//! requests, issues, repositories) without walking every page.
//!
//! ## Features
//!
//! - **Two-fetch counts**: first page size plus the `rel="last"` page from the
//!   `Link` header
//! - **Explicit credentials**: token, bearer, or deliberate anonymous access
//! - **Batch runs**: paced, optionally concurrent, failures skipped per target
//! - **GitHub endpoints**: builders for the usual repository collections
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gh_tally::auth::Credential;
//! use gh_tally::http::HttpClient;
//! use gh_tally::pagination::count_all;
//!
//! #[tokio::main]
//! async fn main() -> gh_tally::Result<()> {
//!     let client = HttpClient::new(Credential::token("ghp_..."))?;
//!     let commits = count_all(&client, "/repos/rust-lang/rust/commits?per_page=100").await?;
//!     println!("{commits} commits");
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │  CLI: count / fetch / repo / batch                    │
//! └───────────────────────────────────────────────────────┘
//!                 │                         │
//! ┌───────────────┴──────────┐  ┌───────────┴────────────┐
//! │ Stats (batch, pacing)    │  │ Config (targets YAML)  │
//! └──────────────────────────┘  └────────────────────────┘
//!                 │
//! ┌───────────────┴──────────┬───────────────┬───────────┐
//! │ Pagination               │ HTTP          │ Auth      │
//! ├──────────────────────────┼───────────────┼───────────┤
//! │ Link header              │ Single GET    │ Token     │
//! │ Last page number         │ Raw headers   │ Bearer    │
//! │ count_all                │ Rate limiter  │ Anonymous │
//! └──────────────────────────┴───────────────┴───────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Credentials and request authentication
pub mod auth;

/// Authenticated fetcher and request pacing
pub mod http;

/// Link header parsing and the count estimator
pub mod pagination;

/// GitHub collection endpoints
pub mod endpoints;

/// Batch statistics collection
pub mod stats;

/// Targets file configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use pagination::count_all;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
