//! Batch targets and results

use crate::endpoints::Endpoint;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One endpoint to count, with the label downstream consumers know it by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatTarget {
    pub label: String,
    pub url: String,
}

impl StatTarget {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }

    /// Target for a known endpoint, labelled after it
    pub fn from_endpoint(endpoint: &Endpoint, base: &str, per_page: u32) -> Result<Self> {
        Ok(Self::new(endpoint.label(), endpoint.url(base, per_page)?))
    }
}

/// Outcome of counting one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StatOutcome {
    Counted {
        count: u64,
    },
    Failed {
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
    },
}

impl StatOutcome {
    pub(crate) fn from_result(result: &Result<u64>) -> Self {
        match result {
            Ok(count) => Self::Counted { count: *count },
            Err(e) => Self::failed(e),
        }
    }

    fn failed(error: &Error) -> Self {
        Self::Failed {
            error: error.to_string(),
            status: error.status(),
        }
    }

    /// The count, if the target succeeded
    pub fn count(&self) -> Option<u64> {
        match self {
            Self::Counted { count } => Some(*count),
            Self::Failed { .. } => None,
        }
    }
}

/// Result for one target of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatResult {
    pub label: String,
    pub url: String,
    #[serde(flatten)]
    pub outcome: StatOutcome,
}

impl StatResult {
    pub fn is_success(&self) -> bool {
        self.outcome.count().is_some()
    }
}

/// Results of a batch, in target order
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<StatResult>,
}

impl BatchReport {
    /// Counts of the successful targets, by label
    ///
    /// When labels repeat, the later target wins.
    pub fn totals(&self) -> BTreeMap<String, u64> {
        self.results
            .iter()
            .filter_map(|r| r.outcome.count().map(|count| (r.label.clone(), count)))
            .collect()
    }

    /// Targets whose count failed
    pub fn failures(&self) -> Vec<&StatResult> {
        self.results.iter().filter(|r| !r.is_success()).collect()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}
