//! GitHub collection endpoints
//!
//! Builders for the collections whose sizes the statistics runs gather:
//! commits, pull requests, issues, contributors and repositories.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Largest page size the GitHub REST API honours
pub const MAX_PER_PAGE: u32 = 100;

/// State filter for issues and pull requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    Open,
    Closed,
    #[default]
    All,
}

impl IssueState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

/// A paginated collection on the GitHub REST API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Endpoint {
    /// Commits on the default branch
    Commits { owner: String, repo: String },
    /// Pull requests
    PullRequests {
        owner: String,
        repo: String,
        #[serde(default)]
        state: IssueState,
    },
    /// Issues (GitHub lists pull requests here too)
    Issues {
        owner: String,
        repo: String,
        #[serde(default)]
        state: IssueState,
    },
    /// Contributors
    Contributors { owner: String, repo: String },
    /// Public repositories of a user
    UserRepos { user: String },
    /// Repositories of an organization
    OrgRepos { org: String },
}

impl Endpoint {
    /// Path segments below the API root
    fn segments(&self) -> Vec<&str> {
        match self {
            Self::Commits { owner, repo } => {
                vec!["repos", owner.as_str(), repo.as_str(), "commits"]
            }
            Self::PullRequests { owner, repo, .. } => {
                vec!["repos", owner.as_str(), repo.as_str(), "pulls"]
            }
            Self::Issues { owner, repo, .. } => {
                vec!["repos", owner.as_str(), repo.as_str(), "issues"]
            }
            Self::Contributors { owner, repo } => {
                vec!["repos", owner.as_str(), repo.as_str(), "contributors"]
            }
            Self::UserRepos { user } => vec!["users", user.as_str(), "repos"],
            Self::OrgRepos { org } => vec!["orgs", org.as_str(), "repos"],
        }
    }

    fn state(&self) -> Option<IssueState> {
        match self {
            Self::PullRequests { state, .. } | Self::Issues { state, .. } => Some(*state),
            _ => None,
        }
    }

    /// Absolute URL of the first page
    ///
    /// `per_page` must be within `1..=100`.
    pub fn url(&self, base: &str, per_page: u32) -> Result<String> {
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(Error::invalid_value(
                "per_page",
                format!("{per_page} is outside 1..={MAX_PER_PAGE}"),
            ));
        }

        let mut url = Url::parse(base)?;
        url.path_segments_mut()
            .map_err(|()| Error::invalid_value("base_url", format!("{base} cannot be a base")))?
            .pop_if_empty()
            .extend(self.segments());

        {
            let mut query = url.query_pairs_mut();
            if let Some(state) = self.state() {
                query.append_pair("state", state.as_str());
            }
            query.append_pair("per_page", &per_page.to_string());
        }

        Ok(url.into())
    }

    /// Short human-readable label, e.g. `rust-lang/rust commits`
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Commits { owner, repo } => write!(f, "{owner}/{repo} commits"),
            Self::PullRequests { owner, repo, state } => {
                write!(f, "{owner}/{repo} pulls ({})", state.as_str())
            }
            Self::Issues { owner, repo, state } => {
                write!(f, "{owner}/{repo} issues ({})", state.as_str())
            }
            Self::Contributors { owner, repo } => write!(f, "{owner}/{repo} contributors"),
            Self::UserRepos { user } => write!(f, "{user} repos"),
            Self::OrgRepos { org } => write!(f, "{org} repos"),
        }
    }
}

/// `owner/repo` reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Commits, all pull requests and all issues of the repository
    pub fn endpoints(&self) -> Vec<Endpoint> {
        vec![
            Endpoint::Commits {
                owner: self.owner.clone(),
                repo: self.repo.clone(),
            },
            Endpoint::PullRequests {
                owner: self.owner.clone(),
                repo: self.repo.clone(),
                state: IssueState::All,
            },
            Endpoint::Issues {
                owner: self.owner.clone(),
                repo: self.repo.clone(),
                state: IssueState::All,
            },
        ]
    }
}

impl FromStr for RepoRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(Self::new(owner, repo))
            }
            _ => Err(Error::invalid_value(
                "repository",
                format!("expected owner/repo, got '{s}'"),
            )),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
