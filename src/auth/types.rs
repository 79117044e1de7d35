//! Credential configuration types

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable the CLI reads a token from by default
pub const DEFAULT_TOKEN_VAR: &str = "GITHUB_API_TOKEN";

/// Credential attached to every request made by a client
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credential {
    /// No `Authorization` header; subject to the API's anonymous rate limit
    #[default]
    Anonymous,
    /// `Authorization: token <value>` (personal access token)
    Token(String),
    /// `Authorization: Bearer <value>` (app installation tokens, JWTs)
    Bearer(String),
}

/// What to do when no token can be found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialPolicy {
    /// Fail with `Error::MissingToken`
    #[default]
    RequireToken,
    /// Fall back to `Credential::Anonymous`
    AllowAnonymous,
}

impl Credential {
    /// Create a token credential
    pub fn token(value: impl Into<String>) -> Self {
        Self::Token(value.into())
    }

    /// Create a bearer credential
    pub fn bearer(value: impl Into<String>) -> Self {
        Self::Bearer(value.into())
    }

    /// Whether requests will carry an `Authorization` header
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::Anonymous)
    }

    /// Value for the `Authorization` header, if any
    pub fn header_value(&self) -> Option<String> {
        match self {
            Self::Anonymous => None,
            Self::Token(value) => Some(format!("token {value}")),
            Self::Bearer(value) => Some(format!("Bearer {value}")),
        }
    }

    /// Resolve a credential from an explicit value or the process environment
    pub fn resolve(explicit: Option<String>, var: &str, policy: CredentialPolicy) -> Result<Self> {
        Self::resolve_with(explicit, var, policy, |name| std::env::var(name).ok())
    }

    /// Resolve a credential using a custom variable lookup
    ///
    /// An explicit value wins over the variable. Blank values count as absent.
    pub fn resolve_with<F>(
        explicit: Option<String>,
        var: &str,
        policy: CredentialPolicy,
        lookup: F,
    ) -> Result<Self>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let token = explicit
            .filter(|t| !t.trim().is_empty())
            .or_else(|| lookup(var).filter(|t| !t.trim().is_empty()));

        match (token, policy) {
            (Some(token), _) => Ok(Self::Token(token.trim().to_string())),
            (None, CredentialPolicy::AllowAnonymous) => {
                warn!("No token in {var}, using anonymous access (lower rate limit)");
                Ok(Self::Anonymous)
            }
            (None, CredentialPolicy::RequireToken) => Err(Error::MissingToken {
                var: var.to_string(),
            }),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anonymous => f.write_str("Anonymous"),
            Self::Token(_) => f.write_str("Token(***)"),
            Self::Bearer(_) => f.write_str("Bearer(***)"),
        }
    }
}
