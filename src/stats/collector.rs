//! Batch collector

use super::types::{BatchReport, StatOutcome, StatResult, StatTarget};
use crate::http::{Fetch, PacedFetcher, RateLimiter, RateLimiterConfig};
use crate::pagination::PageCounter;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{info, warn};

/// Pacing and concurrency for a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorConfig {
    /// Pacing applied to every fetch; `None` disables it
    pub pacing: Option<RateLimiterConfig>,
    /// Targets counted at the same time
    pub max_concurrent: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            pacing: Some(RateLimiterConfig::default()),
            max_concurrent: 1,
        }
    }
}

impl CollectorConfig {
    /// No pacing, sequential
    pub fn unpaced() -> Self {
        Self {
            pacing: None,
            max_concurrent: 1,
        }
    }
}

/// Counts a batch of targets, recording failures instead of aborting
pub struct StatsCollector {
    counter: PageCounter<dyn Fetch>,
    max_concurrent: usize,
}

impl StatsCollector {
    /// Create a collector over a fetcher
    pub fn new(fetcher: Arc<dyn Fetch>, config: CollectorConfig) -> Self {
        let fetcher: Arc<dyn Fetch> = match &config.pacing {
            Some(pacing) => Arc::new(PacedFetcher::new(fetcher, RateLimiter::new(pacing))),
            None => fetcher,
        };

        Self {
            counter: PageCounter::new(fetcher),
            max_concurrent: config.max_concurrent.max(1),
        }
    }

    /// Count one target
    pub async fn collect_one(&self, target: &StatTarget) -> StatResult {
        let result = self.counter.count_all(&target.url).await;
        if let Err(e) = &result {
            warn!("Skipping '{}': {}", target.label, e);
        }

        StatResult {
            label: target.label.clone(),
            url: target.url.clone(),
            outcome: StatOutcome::from_result(&result),
        }
    }

    /// Count every target; results keep the order of `targets`
    pub async fn collect(&self, targets: &[StatTarget]) -> BatchReport {
        let started_at = Utc::now();

        let results: Vec<StatResult> = stream::iter(targets)
            .map(|target| self.collect_one(target))
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let report = BatchReport {
            started_at,
            finished_at: Utc::now(),
            results,
        };

        info!(
            "Batch finished: {} counted, {} failed",
            report.succeeded(),
            report.failed()
        );
        report
    }
}

impl std::fmt::Debug for StatsCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsCollector")
            .field("max_concurrent", &self.max_concurrent)
            .finish_non_exhaustive()
    }
}
