//! CLI commands and argument parsing

use crate::auth::DEFAULT_TOKEN_VAR;
use crate::http::DEFAULT_API_URL;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Count items behind paginated GitHub API endpoints
#[derive(Parser, Debug)]
#[command(name = "gh-tally")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// API token (takes precedence over the token variable)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Environment variable holding the API token
    #[arg(long, global = true, default_value = DEFAULT_TOKEN_VAR)]
    pub token_env: String,

    /// Send requests without a token when none is configured
    #[arg(long, global = true)]
    pub anonymous: bool,

    /// API root for relative URLs
    #[arg(long, global = true, default_value = DEFAULT_API_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Count every item behind a paginated endpoint
    Count {
        /// Endpoint URL (absolute, or relative to --base-url)
        url: String,
    },

    /// Fetch one page and print its headers and body
    Fetch {
        /// Endpoint URL (absolute, or relative to --base-url)
        url: String,
    },

    /// Count commits, pull requests and issues of a repository
    Repo {
        /// Repository as owner/repo
        repository: String,

        /// Page size to request
        #[arg(long, default_value = "100")]
        per_page: u32,

        /// Milliseconds between requests
        #[arg(long, default_value = "1000")]
        interval_ms: u64,
    },

    /// Count every target listed in a YAML targets file
    Batch {
        /// Targets file
        targets: PathBuf,

        /// Override the file's max_concurrent
        #[arg(long)]
        max_concurrent: Option<usize>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
