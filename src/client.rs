//! The client: configuration, the retrying execution engine and resource accessors.
//!
//! The [`Client`] type is the main entry point. Use [`ClientBuilder`] to configure and
//! create clients.

use crate::classify::{classify_status, classify_transport};
use crate::config::{Config, CredentialProvider, ProxyConfig, Query, Timeout, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES};
use crate::rate_limit::RateLimitConfig;
use crate::request::OutboundRequest;
use crate::resources::{Chat, Completions, Embeddings, Files, Images, Models, Moderations};
use crate::response::decode;
use crate::retry::{RetryOnRetryable, RetryPolicy, RetryPredicate, RetryStrategy};
use crate::{Error, RequestOptions, Response, Result};
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// A client for an OpenAI-compatible HTTP API.
///
/// Cheap to clone: clones share the connection pool and the immutable configuration, so
/// one client can serve many concurrent calls.
///
/// # Examples
///
/// ```no_run
/// use openai_core::{Client, RequestOptions};
/// use openai_core::resources::chat::ChatMessage;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), openai_core::Error> {
/// let client = Client::builder()
///     .api_key("sk-...")
///     .organization("org-123")
///     .timeout(Duration::from_secs(30))
///     .max_retries(3)
///     .build()?;
///
/// let completion = client
///     .chat()
///     .completions()
///     .create_with_messages("gpt-4o-mini", vec![ChatMessage::user("Hello!")], RequestOptions::new())
///     .await?;
/// println!("{}", completion.content());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    config: Config,
    retry: RetryPolicy,
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client with the given API key and default settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `api_key` is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new().api_key(api_key).build()
    }

    /// Creates a client from the `OPENAI_*` environment variables.
    ///
    /// See [`ClientBuilder::from_env`].
    pub fn from_env() -> Result<Self> {
        ClientBuilder::from_env()?.build()
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn chat(&self) -> Chat<'_> {
        Chat::new(self)
    }

    pub fn completions(&self) -> Completions<'_> {
        Completions::new(self)
    }

    pub fn embeddings(&self) -> Embeddings<'_> {
        Embeddings::new(self)
    }

    pub fn models(&self) -> Models<'_> {
        Models::new(self)
    }

    pub fn files(&self) -> Files<'_> {
        Files::new(self)
    }

    pub fn images(&self) -> Images<'_> {
        Images::new(self)
    }

    pub fn moderations(&self) -> Moderations<'_> {
        Moderations::new(self)
    }

    /// Issues a GET request and decodes the body as `Res`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use openai_core::{Client, Query, RequestOptions};
    ///
    /// # async fn example() -> Result<(), openai_core::Error> {
    /// let client = Client::from_env()?;
    ///
    /// let mut query = Query::new();
    /// query.insert("limit".to_string(), 20.into());
    /// let jobs = client
    ///     .get::<serde_json::Value>("fine_tuning/jobs", &query, RequestOptions::new())
    ///     .await?;
    /// println!("{}", jobs.raw_body);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get<Res>(&self, path: &str, query: &Query, options: RequestOptions) -> Result<Response<Res>>
    where
        Res: DeserializeOwned + Default,
    {
        self.call(Method::GET, path, query, None, options).await
    }

    /// Issues a POST request with `body` encoded as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationFailed`] without sending anything if `body` cannot be
    /// encoded.
    pub async fn post<Req, Res>(&self, path: &str, body: &Req, options: RequestOptions) -> Result<Response<Res>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned + Default,
    {
        let body = serde_json::to_value(body).map_err(|e| Error::SerializationFailed(e.to_string()))?;
        self.call(Method::POST, path, &Query::new(), Some(body), options)
            .await
    }

    /// Issues a DELETE request.
    pub async fn delete<Res>(&self, path: &str, options: RequestOptions) -> Result<Response<Res>>
    where
        Res: DeserializeOwned + Default,
    {
        self.call(Method::DELETE, path, &Query::new(), None, options)
            .await
    }

    /// Executes a request with retries and decodes the successful body.
    ///
    /// The call makes at most `max_retries + 1` attempts, where `max_retries` comes from
    /// `options` or else the client configuration. Only errors accepted by the retry
    /// predicate are retried; the last error is returned unchanged once the budget is
    /// spent.
    pub async fn call<Res>(
        &self,
        method: Method,
        path: &str,
        query: &Query,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<Response<Res>>
    where
        Res: DeserializeOwned + Default,
    {
        let max_retries = options
            .max_retries
            .get()
            .copied()
            .unwrap_or(self.inner.config.max_retries);
        let start_time = Instant::now();
        let mut attempt = 0;
        let mut previous_delay = Duration::ZERO;

        loop {
            attempt += 1;

            let error = match self
                .execute_attempt(&method, path, query, body.clone(), &options, attempt)
                .await
            {
                Ok((status, headers, raw_body)) => {
                    let latency = start_time.elapsed();
                    let (raw, data) = decode::<Res>(&raw_body);
                    return Ok(Response::new(data, raw, raw_body, status, headers, latency, attempt));
                }
                Err(e) => e,
            };

            tracing::warn!(
                error = %error,
                attempt = attempt,
                method = %method,
                path = %path,
                "Request failed"
            );

            let Some(delay) = self
                .inner
                .retry
                .next_delay(&error, attempt, max_retries, previous_delay)
            else {
                return Err(error);
            };
            previous_delay = delay;

            let rate_limit = &self.inner.retry.rate_limit;
            if rate_limit.enabled && error.rate_limit_delay(rate_limit.max_wait).is_some() {
                tracing::info!(
                    rate_limit_delay_ms = delay.as_millis(),
                    attempt = attempt,
                    max_wait_secs = rate_limit.max_wait.as_secs(),
                    "Rate limited - waiting before retry"
                );
            } else {
                tracing::info!(
                    delay_ms = delay.as_millis(),
                    attempt = attempt,
                    max_retries = max_retries,
                    "Retrying request after delay"
                );
            }

            tokio::time::sleep(delay).await;
        }
    }

    /// Runs one attempt and returns the status, headers and body of a successful response.
    async fn execute_attempt(
        &self,
        method: &Method,
        path: &str,
        query: &Query,
        body: Option<Value>,
        options: &RequestOptions,
        attempt: usize,
    ) -> Result<(StatusCode, HeaderMap, String)> {
        let config = &self.inner.config;
        let api_key = config.resolve_api_key()?;
        let request = OutboundRequest::build(config, &api_key, method.clone(), path, query, body, options)?;

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            attempt = attempt,
            "Executing HTTP request"
        );

        let response = request
            .into_reqwest(&self.inner.http_client)
            .send()
            .await
            .map_err(|e| classify_transport(&e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await.map_err(|e| classify_transport(&e))?;

        tracing::info!(
            status = status.as_u16(),
            attempt = attempt,
            request_id = headers
                .get(crate::REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default(),
            "Received HTTP response"
        );

        if status.as_u16() >= 400 {
            let error = classify_status(status, headers, &bytes, &self.inner.retry.rate_limit);
            if status.is_server_error() {
                tracing::warn!(
                    status = status.as_u16(),
                    message = %error.message(),
                    "Server error (5xx)"
                );
            } else {
                tracing::error!(
                    status = status.as_u16(),
                    message = %error.message(),
                    "Client error (4xx)"
                );
            }
            return Err(error);
        }

        Ok((status, headers, String::from_utf8_lossy(&bytes).into_owned()))
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.inner.config)
            .field("retry_strategy", &self.inner.retry.strategy)
            .finish_non_exhaustive()
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use openai_core::{ClientBuilder, ProxyConfig, RetryStrategy, Timeout};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), openai_core::Error> {
/// let client = ClientBuilder::from_env()?
///     .base_url("https://my-gateway.example.com/v1")?
///     .timeout(Timeout {
///         total: Duration::from_secs(120),
///         ..Timeout::default()
///     })
///     .retry_strategy(RetryStrategy::ExponentialBackoff {
///         initial_delay: Duration::from_millis(250),
///         max_delay: Duration::from_secs(10),
///         jitter: true,
///     })
///     .default_header("User-Agent", "my-app/1.0")?
///     .proxy(ProxyConfig::new("http://127.0.0.1:3128"))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    api_key: String,
    api_key_provider: Option<Arc<dyn CredentialProvider>>,
    organization: Option<String>,
    project: Option<String>,
    base_url: Option<Url>,
    timeout: Timeout,
    max_retries: u32,
    default_headers: HeaderMap,
    default_query: Query,
    proxy: Option<ProxyConfig>,
    use_proxy: bool,
    retry_strategy: RetryStrategy,
    retry_predicate: Option<Box<dyn RetryPredicate>>,
    rate_limit_config: RateLimitConfig,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            api_key: String::new(),
            api_key_provider: None,
            organization: None,
            project: None,
            base_url: None,
            timeout: Timeout::default(),
            max_retries: DEFAULT_MAX_RETRIES,
            default_headers: HeaderMap::new(),
            default_query: Query::new(),
            proxy: None,
            use_proxy: false,
            retry_strategy: RetryStrategy::default(),
            retry_predicate: None,
            rate_limit_config: RateLimitConfig::default(),
        }
    }

    /// Creates a builder seeded from the environment.
    ///
    /// Reads `OPENAI_API_KEY`, `OPENAI_ORG_ID`, `OPENAI_PROJECT_ID` and
    /// `OPENAI_BASE_URL`. Unset or empty variables leave the defaults in place.
    ///
    /// # Errors
    ///
    /// Returns an error if `OPENAI_BASE_URL` is not a valid URL.
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::new();
        if let Some(api_key) = env_var("OPENAI_API_KEY") {
            builder = builder.api_key(api_key);
        }
        if let Some(organization) = env_var("OPENAI_ORG_ID") {
            builder = builder.organization(organization);
        }
        if let Some(project) = env_var("OPENAI_PROJECT_ID") {
            builder = builder.project(project);
        }
        if let Some(base_url) = env_var("OPENAI_BASE_URL") {
            builder = builder.base_url(base_url)?;
        }
        Ok(builder)
    }

    /// Sets a static API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Sets a provider consulted for the API key before every attempt.
    ///
    /// Takes precedence over [`api_key`](Self::api_key).
    pub fn api_key_provider(mut self, provider: impl CredentialProvider + 'static) -> Self {
        self.api_key_provider = Some(Arc::new(provider));
        self
    }

    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Sets the base URL request paths are appended to.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(url.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid base URL {}: {}", url.as_ref(), e)))?;
        self.base_url = Some(url);
        Ok(self)
    }

    /// Adds a default header that will be included in all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Adds a query parameter that will be included in all requests.
    pub fn default_query(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.default_query.insert(key.into(), value.into());
        self
    }

    /// Sets the request timeout. A bare `Duration` sets the total deadline.
    pub fn timeout(mut self, timeout: impl Into<Timeout>) -> Self {
        self.timeout = timeout.into();
        self
    }

    /// Sets how many times a failed call is retried. `0` disables retries.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the delay curve between retries.
    pub fn retry_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.retry_strategy = strategy;
        self
    }

    /// Sets a custom retry predicate.
    ///
    /// By default, requests are retried based on `Error::is_retryable()`.
    pub fn retry_predicate(mut self, predicate: Box<dyn RetryPredicate>) -> Self {
        self.retry_predicate = Some(predicate);
        self
    }

    /// Sets how rate-limit headers on 429 responses affect retry delays.
    ///
    /// # Examples
    ///
    /// ```
    /// use openai_core::{Client, rate_limit::RateLimitConfig};
    /// use std::time::Duration;
    ///
    /// let client = Client::builder()
    ///     .api_key("sk-test")
    ///     .rate_limit_config(RateLimitConfig::builder()
    ///         .max_wait(Duration::from_secs(20))
    ///         .build())
    ///     .build();
    /// assert!(client.is_ok());
    /// ```
    pub fn rate_limit_config(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit_config = config;
        self
    }

    /// Routes requests through `proxy`.
    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self.use_proxy = true;
        self
    }

    /// Turns the configured proxy on or off.
    pub fn use_proxy(mut self, use_proxy: bool) -> Self {
        self.use_proxy = use_proxy;
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if there is neither an API key nor a key provider,
    /// if the proxy is enabled but missing or invalid, or if the HTTP client cannot be
    /// created.
    pub fn build(self) -> Result<Client> {
        if self.api_key.is_empty() && self.api_key_provider.is_none() {
            return Err(Error::ConfigurationError(
                "The api_key must be set either on the builder or through the OPENAI_API_KEY environment variable"
                    .to_string(),
            ));
        }

        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)
                .map_err(|e| Error::ConfigurationError(format!("Invalid base URL: {}", e)))?,
        };

        let mut http_client = reqwest::Client::builder().connect_timeout(self.timeout.connect);
        if self.use_proxy {
            let proxy = self.proxy.as_ref().ok_or_else(|| {
                Error::ConfigurationError("use_proxy is set but no proxy is configured".to_string())
            })?;
            http_client = http_client.proxy(proxy.to_reqwest()?);
        }
        let http_client = http_client.build().map_err(|e| {
            Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
        })?;

        let predicate = self
            .retry_predicate
            .unwrap_or_else(|| Box::new(RetryOnRetryable));

        tracing::debug!(
            base_url = %base_url,
            max_retries = self.max_retries,
            use_proxy = self.use_proxy,
            "Client configured"
        );

        Ok(Client {
            inner: Arc::new(ClientInner {
                http_client,
                config: Config {
                    api_key: self.api_key,
                    api_key_provider: self.api_key_provider,
                    organization: self.organization,
                    project: self.project,
                    base_url,
                    timeout: self.timeout,
                    max_retries: self.max_retries,
                    default_headers: self.default_headers,
                    default_query: self.default_query,
                    proxy: self.proxy,
                    use_proxy: self.use_proxy,
                },
                retry: RetryPolicy {
                    strategy: self.retry_strategy,
                    predicate,
                    rate_limit: self.rate_limit_config,
                },
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
