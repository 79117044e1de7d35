//! HTTP client module
//!
//! Provides the single-shot authenticated fetcher and request pacing.
//!
//! # Features
//!
//! - **Versioned JSON**: every request asks for the API's versioned media type
//! - **Authentication**: optional credential via the auth module
//! - **Raw Headers**: responses expose their header mapping alongside the body
//! - **Rate Limiting**: token bucket pacing using governor, for callers

mod client;
mod rate_limit;

pub use client::{
    Fetch, FetchResult, HttpClient, HttpClientConfig, HttpClientConfigBuilder, ResponseHeaders,
    DEFAULT_ACCEPT, DEFAULT_API_URL,
};
pub use rate_limit::{PacedFetcher, RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
