//! Error types for gh-tally
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for gh-tally
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("No API token configured (set {var} or opt into anonymous mode)")]
    MissingToken { var: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote error {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Pagination Errors
    // ============================================================================
    #[error("No items returned from {url}")]
    EmptyResult { url: String },

    #[error("No 'Link' header in the response from {url}")]
    MissingPagination { url: String },

    #[error("No 'last' relation in Link header: {header}")]
    NoLastLink { header: String },

    #[error("Could not determine the last page number from {url}")]
    UnparsablePage { url: String },

    #[error("Item count overflows for {last_page} pages of {per_page} items")]
    CountOverflow { per_page: u64, last_page: u64 },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a remote (non-2xx) error
    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        Self::Remote {
            status,
            body: body.into(),
        }
    }

    /// Create an empty result error
    pub fn empty_result(url: impl Into<String>) -> Self {
        Self::EmptyResult { url: url.into() }
    }

    /// Create a missing pagination error
    pub fn missing_pagination(url: impl Into<String>) -> Self {
        Self::MissingPagination { url: url.into() }
    }

    /// Create a missing `rel="last"` error
    pub fn no_last_link(header: impl Into<String>) -> Self {
        Self::NoLastLink {
            header: header.into(),
        }
    }

    /// Create an unparsable page error
    pub fn unparsable_page(url: impl Into<String>) -> Self {
        Self::UnparsablePage { url: url.into() }
    }

    /// Status code of a remote error, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Remote { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is retryable
    ///
    /// Nothing in this crate retries; the classification is for callers
    /// that wrap a count in their own retry loop.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            Error::Remote { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for gh-tally
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::remote(404, "Not Found");
        assert_eq!(err.to_string(), "Remote error 404: Not Found");

        let err = Error::no_last_link(r#"<https://x/?page=2>; rel="next""#);
        assert!(err.to_string().contains(r#"rel="next""#));

        let err = Error::MissingToken {
            var: "GITHUB_API_TOKEN".to_string(),
        };
        assert!(err.to_string().contains("GITHUB_API_TOKEN"));
    }

    #[test]
    fn test_status() {
        assert_eq!(Error::remote(403, "rate limited").status(), Some(403));
        assert_eq!(Error::empty_result("https://x").status(), None);
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::remote(429, "").is_retryable());
        assert!(Error::remote(500, "").is_retryable());
        assert!(Error::remote(503, "").is_retryable());

        assert!(!Error::remote(400, "").is_retryable());
        assert!(!Error::remote(401, "").is_retryable());
        assert!(!Error::remote(404, "").is_retryable());
        assert!(!Error::missing_pagination("https://x").is_retryable());
        assert!(!Error::config("test").is_retryable());
    }
}
