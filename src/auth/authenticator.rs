//! Authenticator implementation
//!
//! Applies a `Credential` to outgoing requests.

use super::types::Credential;
use reqwest::header::AUTHORIZATION;
use reqwest::RequestBuilder;

/// Authenticator handles applying authentication to HTTP requests
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    credential: Credential,
}

impl Authenticator {
    /// Create a new authenticator with the given credential
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }

    /// The credential this authenticator applies
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Apply authentication to a request builder
    ///
    /// Anonymous credentials leave the request untouched.
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match self.credential.header_value() {
            Some(value) => req.header(AUTHORIZATION, value),
            None => req,
        }
    }
}
