//! CLI module
//!
//! Command-line interface for counting paginated collections.
//!
//! # Commands
//!
//! - `count` - Count the items behind one endpoint
//! - `fetch` - Fetch one page and show its headers and body
//! - `repo` - Count commits, pull requests and issues of a repository
//! - `batch` - Count every target listed in a YAML file

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
