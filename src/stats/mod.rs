//! Statistics collection
//!
//! Runs the count estimator over a batch of labelled endpoints. The batch
//! owns the policies the estimator leaves to its caller: pacing requests
//! against the API's rate limit, and skipping an endpoint whose count fails
//! instead of aborting the whole run.

mod collector;
mod types;

pub use collector::{CollectorConfig, StatsCollector};
pub use types::{BatchReport, StatOutcome, StatResult, StatTarget};
