//! Batch targets file
//!
//! A YAML file listing the endpoints a statistics run counts, plus the
//! pacing to apply. Example:
//!
//! ```yaml
//! per_page: 100
//! pacing:
//!   interval_ms: 1000
//! max_concurrent: 1
//! targets:
//!   - endpoint: { kind: commits, owner: python, repo: cpython }
//!   - label: go pulls
//!     endpoint: { kind: pull_requests, owner: golang, repo: go, state: all }
//!   - label: stargazers
//!     url: https://api.github.com/repos/rust-lang/rust/stargazers?per_page=100
//! ```

use crate::endpoints::{Endpoint, MAX_PER_PAGE};
use crate::error::{Error, Result};
use crate::http::{RateLimiterConfig, DEFAULT_API_URL};
use crate::stats::{CollectorConfig, StatTarget};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

// ============================================================================
// Targets File
// ============================================================================

/// Batch definition loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetsFile {
    /// API root endpoint targets are built against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Page size requested from endpoint targets
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Pacing between fetches; omit for the default, `null` to disable
    #[serde(default = "default_pacing")]
    pub pacing: Option<RateLimiterConfig>,

    /// Targets counted at the same time
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// What to count
    pub targets: Vec<TargetDef>,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_per_page() -> u32 {
    MAX_PER_PAGE
}

fn default_pacing() -> Option<RateLimiterConfig> {
    Some(RateLimiterConfig::default())
}

fn default_max_concurrent() -> usize {
    1
}

/// One entry of the targets list: either a known endpoint or a raw URL
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetDef {
    /// Label in the report (defaults to the endpoint's own label)
    #[serde(default)]
    pub label: Option<String>,

    /// Known collection endpoint
    #[serde(default)]
    pub endpoint: Option<Endpoint>,

    /// Raw URL, absolute or relative to `base_url`
    #[serde(default)]
    pub url: Option<String>,
}

impl TargetsFile {
    /// Load a targets file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a targets file
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: Self = serde_yaml::from_str(yaml)?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(Error::config("Targets file must list at least one target"));
        }

        if !(1..=MAX_PER_PAGE).contains(&self.per_page) {
            return Err(Error::invalid_value(
                "per_page",
                format!("{} is outside 1..={MAX_PER_PAGE}", self.per_page),
            ));
        }

        if self.max_concurrent == 0 {
            return Err(Error::invalid_value("max_concurrent", "must be at least 1"));
        }

        for (i, target) in self.targets.iter().enumerate() {
            match (&target.endpoint, &target.url) {
                (Some(_), None) => {}
                (None, Some(url)) if !url.trim().is_empty() => {
                    if target.label.is_none() {
                        return Err(Error::config(format!(
                            "Target {} uses a raw url and needs a label",
                            i + 1
                        )));
                    }
                }
                _ => {
                    return Err(Error::config(format!(
                        "Target {} must set exactly one of 'endpoint' or 'url'",
                        i + 1
                    )))
                }
            }
        }

        Ok(())
    }

    /// Build the batch's targets, in file order
    pub fn resolve(&self) -> Result<Vec<StatTarget>> {
        let targets = self
            .targets
            .iter()
            .map(|def| match (&def.endpoint, &def.url) {
                (Some(endpoint), _) => {
                    let mut target =
                        StatTarget::from_endpoint(endpoint, &self.base_url, self.per_page)?;
                    if let Some(label) = &def.label {
                        target.label.clone_from(label);
                    }
                    Ok(target)
                }
                (None, Some(url)) => Ok(StatTarget::new(
                    def.label.clone().unwrap_or_default(),
                    url.trim(),
                )),
                (None, None) => Err(Error::config("Target without endpoint or url")),
            })
            .collect::<Result<Vec<_>>>()?;

        let mut seen = HashSet::new();
        for target in &targets {
            if !seen.insert(target.label.as_str()) {
                return Err(Error::config(format!(
                    "Duplicate target label '{}'",
                    target.label
                )));
            }
        }

        Ok(targets)
    }

    /// Collector settings from this file
    pub fn collector_config(&self) -> CollectorConfig {
        CollectorConfig {
            pacing: self.pacing.clone(),
            max_concurrent: self.max_concurrent,
        }
    }
}
