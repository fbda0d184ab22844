//! Client configuration: credentials, endpoint, timeouts, defaults and proxy.

use crate::{Error, Result};
use http::HeaderMap;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// The base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// The retry budget used when none is configured.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Query parameters: names mapped to scalar JSON values.
pub type Query = BTreeMap<String, Value>;

/// Supplies the API key before every request.
///
/// Any `Fn() -> String + Send + Sync` closure is a provider, so short-lived tokens can be
/// renewed transparently on each call.
///
/// # Examples
///
/// ```
/// use openai_core::Client;
///
/// let client = Client::builder()
///     .api_key_provider(|| std::env::var("ROTATING_TOKEN").unwrap_or_default())
///     .build();
/// assert!(client.is_ok());
/// ```
pub trait CredentialProvider: Send + Sync {
    /// Returns the API key to use for the next request.
    fn api_key(&self) -> String;
}

impl<F> CredentialProvider for F
where
    F: Fn() -> String + Send + Sync,
{
    fn api_key(&self) -> String {
        self()
    }
}

/// Timeouts applied to every request.
///
/// `total` bounds a whole attempt, from sending the request to reading the last byte of
/// the body. `connect` bounds connection establishment. `read` and `write` are kept for
/// callers that inspect the configuration; the transport enforces `total` and `connect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeout {
    /// Deadline for one complete attempt.
    pub total: Duration,
    /// Deadline for establishing a connection.
    pub connect: Duration,
    /// Deadline for a single read.
    pub read: Duration,
    /// Deadline for a single write.
    pub write: Duration,
}

impl Default for Timeout {
    fn default() -> Self {
        Self {
            total: Duration::from_secs(600),
            connect: Duration::from_secs(60),
            read: Duration::from_secs(60),
            write: Duration::from_secs(60),
        }
    }
}

impl Timeout {
    /// Creates a timeout with the given total deadline and default per-phase values.
    pub fn total(total: Duration) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }
}

impl From<Duration> for Timeout {
    fn from(total: Duration) -> Self {
        Timeout::total(total)
    }
}

/// An HTTP(S) proxy, optionally with basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Proxy URL, e.g. `http://127.0.0.1:8080`.
    pub url: String,
    /// Basic auth user name.
    pub username: Option<String>,
    /// Basic auth password.
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Creates a proxy without authentication.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
        }
    }

    /// Adds basic authentication credentials.
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub(crate) fn to_reqwest(&self) -> Result<reqwest::Proxy> {
        let proxy = reqwest::Proxy::all(&self.url)
            .map_err(|e| Error::ConfigurationError(format!("Invalid proxy URL {}: {}", self.url, e)))?;

        Ok(match &self.username {
            Some(username) => proxy.basic_auth(username, self.password.as_deref().unwrap_or_default()),
            None => proxy,
        })
    }
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Settings shared by every request a [`crate::Client`] issues.
///
/// Built once by [`crate::ClientBuilder`] and immutable afterwards; the credential
/// provider is the only part re-evaluated per call.
#[derive(Clone)]
pub struct Config {
    pub(crate) api_key: String,
    pub(crate) api_key_provider: Option<Arc<dyn CredentialProvider>>,
    /// Sent as `OpenAI-Organization` when set.
    pub organization: Option<String>,
    /// Sent as `OpenAI-Project` when set.
    pub project: Option<String>,
    /// Request paths are appended to this URL.
    pub base_url: Url,
    /// Default timeouts.
    pub timeout: Timeout,
    /// Default retry budget.
    pub max_retries: u32,
    /// Headers added to every request.
    pub default_headers: HeaderMap,
    /// Query parameters added to every request.
    pub default_query: Query,
    /// Proxy to route requests through.
    pub proxy: Option<ProxyConfig>,
    /// Whether `proxy` is applied.
    pub use_proxy: bool,
}

impl Config {
    /// Returns the API key for the next request, asking the provider if there is one.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the provider hands back an empty key.
    pub fn resolve_api_key(&self) -> Result<String> {
        let Some(provider) = &self.api_key_provider else {
            return Ok(self.api_key.clone());
        };

        let api_key = provider.api_key();
        if api_key.is_empty() {
            return Err(Error::ConfigurationError(
                "The api_key provider returned an empty key".to_string(),
            ));
        }
        Ok(api_key)
    }

    /// Returns `true` if the key is resolved per call by a provider.
    pub fn has_api_key_provider(&self) -> bool {
        self.api_key_provider.is_some()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_key_provider", &self.api_key_provider.is_some())
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("default_headers", &self.default_headers.keys().collect::<Vec<_>>())
            .field("default_query", &self.default_query)
            .field("proxy", &self.proxy)
            .field("use_proxy", &self.use_proxy)
            .finish()
    }
}

/// Renders a query value the way it appears in a URL.
pub(crate) fn query_value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
