//! Rate limiting implementation
//!
//! Uses the governor crate for token bucket rate limiting. The fetcher never
//! paces itself; batch callers wait on a limiter before each count.

use super::client::{Fetch, FetchResult};
use crate::error::Result;
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for rate limiting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Time between permits
    #[serde(with = "millis", rename = "interval_ms")]
    pub interval: Duration,
    /// Burst size (max tokens in bucket)
    #[serde(default = "default_burst")]
    pub burst_size: u32,
}

fn default_burst() -> u32 {
    1
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            burst_size: 1,
        }
    }
}

impl RateLimiterConfig {
    /// One permit every `interval`, no burst
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            burst_size: 1,
        }
    }

    /// Permit `requests_per_second` permits per second with the given burst
    pub fn per_second(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / requests_per_second.max(1),
            burst_size,
        }
    }
}

type DirectLimiter = Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Token bucket rate limiter
#[derive(Clone)]
pub struct RateLimiter {
    // None when the interval is zero
    limiter: Option<Arc<DirectLimiter>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    ///
    /// A zero interval yields a limiter that never blocks.
    pub fn new(config: &RateLimiterConfig) -> Self {
        let burst = NonZeroU32::new(config.burst_size).unwrap_or(NonZeroU32::MIN);
        let limiter = Quota::with_period(config.interval)
            .map(|quota| Arc::new(Governor::direct(quota.allow_burst(burst))));

        Self { limiter }
    }

    /// Wait until a request can be made
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    /// Try to acquire a permit, returning immediately
    pub fn try_acquire(&self) -> bool {
        self.limiter
            .as_ref()
            .map_or(true, |limiter| limiter.check().is_ok())
    }

    /// Wait with a timeout
    pub async fn wait_with_timeout(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.wait()).await.is_ok()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(&RateLimiterConfig::default())
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("enabled", &self.limiter.is_some())
            .finish()
    }
}

/// Fetcher that waits for a rate limiter permit before every request
pub struct PacedFetcher<F: ?Sized> {
    limiter: RateLimiter,
    inner: Arc<F>,
}

impl<F: Fetch + ?Sized> PacedFetcher<F> {
    /// Wrap a fetcher with the given limiter
    pub fn new(inner: Arc<F>, limiter: RateLimiter) -> Self {
        Self { limiter, inner }
    }
}

#[async_trait]
impl<F: Fetch + ?Sized> Fetch for PacedFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<FetchResult> {
        self.limiter.wait().await;
        self.inner.fetch(url).await
    }
}

impl<F: ?Sized> std::fmt::Debug for PacedFetcher<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PacedFetcher")
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod rate_limit_tests {
    use super::*;

    #[test]
    fn test_rate_limiter_config_default() {
        let config = RateLimiterConfig::default();
        assert_eq!(config.interval, Duration::from_secs(1));
        assert_eq!(config.burst_size, 1);
    }

    #[test]
    fn test_rate_limiter_config_per_second() {
        let config = RateLimiterConfig::per_second(4, 2);
        assert_eq!(config.interval, Duration::from_millis(250));
        assert_eq!(config.burst_size, 2);

        let config = RateLimiterConfig::per_second(0, 1);
        assert_eq!(config.interval, Duration::from_secs(1));
    }

    #[test]
    fn test_rate_limiter_config_yaml() {
        let config: RateLimiterConfig = serde_yaml::from_str("interval_ms: 1500").unwrap();
        assert_eq!(config, RateLimiterConfig::every(Duration::from_millis(1500)));
    }

    #[tokio::test]
    async fn test_rate_limiter_allows_burst() {
        let limiter = RateLimiter::new(&RateLimiterConfig::per_second(10, 5));

        for _ in 0..5 {
            assert!(limiter.try_acquire());
        }
        assert!(!limiter.try_acquire());
    }

    #[tokio::test]
    async fn test_rate_limiter_zero_interval_never_blocks() {
        let limiter = RateLimiter::new(&RateLimiterConfig::every(Duration::ZERO));

        for _ in 0..50 {
            assert!(limiter.try_acquire());
        }
    }

    struct Echo;

    #[async_trait]
    impl Fetch for Echo {
        async fn fetch(&self, url: &str) -> Result<FetchResult> {
            Ok(FetchResult::new(
                Default::default(),
                serde_json::Value::String(url.to_string()),
            ))
        }
    }

    #[tokio::test]
    async fn test_paced_fetcher_consumes_permits() {
        let limiter = RateLimiter::new(&RateLimiterConfig::every(Duration::from_secs(60)));
        let paced = PacedFetcher::new(Arc::new(Echo), limiter.clone());

        let result = paced.fetch("https://x/items").await.unwrap();
        assert_eq!(result.body, "https://x/items");
        // The single permit went to the fetch
        assert!(!limiter.try_acquire());
    }

    #[tokio::test]
    async fn test_rate_limiter_wait_with_timeout() {
        let limiter = RateLimiter::new(&RateLimiterConfig::every(Duration::from_secs(60)));

        assert!(limiter.wait_with_timeout(Duration::from_millis(100)).await);
        // Second permit is a minute away
        assert!(!limiter.wait_with_timeout(Duration::from_millis(50)).await);
    }
}
