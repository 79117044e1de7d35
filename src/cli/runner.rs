//! CLI runner - executes commands

use crate::auth::{Credential, CredentialPolicy};
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::TargetsFile;
use crate::endpoints::RepoRef;
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig};
use crate::pagination::count_all;
use crate::stats::{BatchReport, CollectorConfig, StatTarget, StatsCollector};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Count { url } => self.count(url).await,
            Commands::Fetch { url } => self.fetch(url).await,
            Commands::Repo {
                repository,
                per_page,
                interval_ms,
            } => self.repo(repository, *per_page, *interval_ms).await,
            Commands::Batch {
                targets,
                max_concurrent,
            } => self.batch(targets, *max_concurrent).await,
        }
    }

    /// Resolve the credential from the flags and environment
    pub(crate) fn credential(&self) -> Result<Credential> {
        let policy = if self.cli.anonymous {
            CredentialPolicy::AllowAnonymous
        } else {
            CredentialPolicy::RequireToken
        };
        Credential::resolve(self.cli.token.clone(), &self.cli.token_env, policy)
    }

    /// Build HTTP client config for the given API root
    pub(crate) fn http_config(&self, base_url: &str) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder().base_url(base_url);
        if let Some(secs) = self.cli.timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build()
    }

    fn build_client(&self, base_url: &str) -> Result<HttpClient> {
        HttpClient::with_config(self.http_config(base_url), self.credential()?)
    }

    /// Count one endpoint
    async fn count(&self, url: &str) -> Result<()> {
        let client = self.build_client(&self.cli.base_url)?;
        let total = count_all(&client, url).await?;

        self.output_message(&json!({
            "type": "COUNT",
            "url": url,
            "count": total
        }));

        Ok(())
    }

    /// Fetch one page
    async fn fetch(&self, url: &str) -> Result<()> {
        let client = self.build_client(&self.cli.base_url)?;
        let result = client.fetch(url).await?;

        self.output_message(&json!({
            "type": "FETCH",
            "url": url,
            "headers": result.headers,
            "body": result.body
        }));

        Ok(())
    }

    /// Count the standard collections of a repository
    async fn repo(&self, repository: &str, per_page: u32, interval_ms: u64) -> Result<()> {
        let repo: RepoRef = repository.parse()?;
        let targets = repo
            .endpoints()
            .iter()
            .map(|endpoint| StatTarget::from_endpoint(endpoint, &self.cli.base_url, per_page))
            .collect::<Result<Vec<_>>>()?;

        let client = self.build_client(&self.cli.base_url)?;
        let config = CollectorConfig {
            pacing: Some(RateLimiterConfig::every(Duration::from_millis(interval_ms))),
            max_concurrent: 1,
        };

        let report = StatsCollector::new(Arc::new(client), config)
            .collect(&targets)
            .await;
        self.output_report(&report);

        Ok(())
    }

    /// Run a targets file
    async fn batch(&self, path: &Path, max_concurrent: Option<usize>) -> Result<()> {
        let file = TargetsFile::load(path)?;
        let targets = file.resolve()?;

        let mut config = file.collector_config();
        if let Some(n) = max_concurrent {
            config.max_concurrent = n.max(1);
        }

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!("Counting {} targets from {}", targets.len(), path.display())
            }
        }));

        let client = self.build_client(&file.base_url)?;
        let report = StatsCollector::new(Arc::new(client), config)
            .collect(&targets)
            .await;
        self.output_report(&report);

        Ok(())
    }

    /// Output every result of a batch, then a summary
    fn output_report(&self, report: &BatchReport) {
        for result in &report.results {
            let mut msg = json!({ "type": "STAT" });
            if let (Value::Object(msg), Ok(Value::Object(fields))) =
                (&mut msg, serde_json::to_value(result))
            {
                msg.extend(fields);
            }
            self.output_message(&msg);
        }

        self.output_message(&json!({
            "type": "SUMMARY",
            "succeeded": report.succeeded(),
            "failed": report.failed(),
            "started_at": report.started_at,
            "finished_at": report.finished_at,
            "totals": report.totals()
        }));
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
