//! Authentication module
//!
//! Supports: anonymous access, GitHub-style `token` credentials and bearer
//! tokens.
//!
//! Credentials are explicit configuration values handed to the client at
//! construction; nothing here reads global state after startup.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{Credential, CredentialPolicy, DEFAULT_TOKEN_VAR};
