//! Authenticated single-shot HTTP fetcher
//!
//! Each fetch is one GET with no retry or backoff:
//! - the versioned JSON media type is requested
//! - the credential (if any) is attached
//! - non-2xx responses become `Error::Remote`
//! - the body is decoded to JSON and returned with the raw headers

use crate::auth::{Authenticator, Credential};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::debug;

/// Public GitHub REST API root
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Versioned JSON media type for the GitHub REST API
pub const DEFAULT_ACCEPT: &str = "application/vnd.github.v3+json";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL that relative paths are joined onto
    pub base_url: Option<String>,
    /// Media type sent in the `Accept` header
    pub accept: String,
    /// Per-request timeout; `None` waits as long as the server does
    pub timeout: Option<Duration>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string (GitHub rejects requests without one)
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_API_URL.to_string()),
            accept: DEFAULT_ACCEPT.to_string(),
            timeout: None,
            default_headers: HashMap::new(),
            user_agent: format!("gh-tally/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Only accept absolute URLs
    pub fn no_base_url(mut self) -> Self {
        self.config.base_url = None;
        self
    }

    /// Set the `Accept` media type
    pub fn accept(mut self, media_type: impl Into<String>) -> Self {
        self.config.accept = media_type.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Response header mapping
///
/// Names are kept as the HTTP stack delivered them. Lookups ignore case,
/// and repeated fields are joined with `", "`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponseHeaders(BTreeMap<String, String>);

impl ResponseHeaders {
    /// Create an empty header mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect headers from a reqwest header map
    pub fn from_header_map(map: &HeaderMap) -> Self {
        let mut headers = BTreeMap::new();
        for name in map.keys() {
            let joined = map
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(", ");
            headers.insert(name.as_str().to_string(), joined);
        }
        Self(headers)
    }

    /// Insert a header, replacing any previous value under the same key
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Look up a header value, ignoring case
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The `Link` header, if present
    pub fn link(&self) -> Option<&str> {
        self.get("link")
    }

    /// Check if a header is present
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate over `(name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of distinct header names
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no headers were received
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResponseHeaders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Headers and decoded body of one successful fetch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchResult {
    /// Response headers
    pub headers: ResponseHeaders,
    /// Decoded JSON body (`Null` for an empty body)
    pub body: Value,
}

impl FetchResult {
    /// Create a fetch result
    pub fn new(headers: ResponseHeaders, body: Value) -> Self {
        Self { headers, body }
    }

    /// Body items, if the body is an array
    pub fn items(&self) -> Option<&Vec<Value>> {
        self.body.as_array()
    }

    /// Number of items in an array body
    pub fn item_count(&self) -> Option<usize> {
        self.items().map(Vec::len)
    }
}

/// Anything that can fetch a URL into headers and a JSON body
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Issue one GET against `url`
    async fn fetch(&self, url: &str) -> Result<FetchResult>;
}

/// Authenticated HTTP client
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Authenticator,
}

impl HttpClient {
    /// Create a client with default configuration
    pub fn new(credential: Credential) -> Result<Self> {
        Self::with_config(HttpClientConfig::default(), credential)
    }

    /// Create a client with custom configuration
    pub fn with_config(config: HttpClientConfig, credential: Credential) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            config,
            authenticator: Authenticator::new(credential),
        })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// The credential attached to requests
    pub fn credential(&self) -> &Credential {
        self.authenticator.credential()
    }

    /// Fetch a URL, returning its headers and decoded JSON body
    pub async fn fetch(&self, url: &str) -> Result<FetchResult> {
        self.execute(url).await
    }

    async fn execute(&self, url: &str) -> Result<FetchResult> {
        let full_url = self.build_url(url);

        let mut req = self
            .client
            .get(&full_url)
            .header(ACCEPT, self.config.accept.as_str());

        for (key, value) in &self.config.default_headers {
            if key.eq_ignore_ascii_case(ACCEPT.as_str()) {
                continue;
            }
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(timeout) = self.config.timeout {
            req = req.timeout(timeout);
        }

        req = self.authenticator.apply(req);

        let response = req.send().await?;
        let status = response.status();
        let headers = ResponseHeaders::from_header_map(response.headers());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("GET {} failed with {}", full_url, status.as_u16());
            return Err(Error::remote(status.as_u16(), body));
        }

        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };

        debug!("GET {} -> {}", full_url, status.as_u16());
        Ok(FetchResult { headers, body })
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => path.to_string(),
        }
    }
}

#[async_trait]
impl Fetch for HttpClient {
    async fn fetch(&self, url: &str) -> Result<FetchResult> {
        self.execute(url).await
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("credential", self.authenticator.credential())
            .finish_non_exhaustive()
    }
}
