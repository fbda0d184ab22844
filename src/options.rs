//! Per-call overrides of the client configuration.

use crate::config::{Query, Timeout};
use crate::{Error, Omit, Result};
use http::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};

/// Overrides applied to a single call.
///
/// Every field left [`Omit::NotGiven`] falls back to the client configuration.
///
/// # Examples
///
/// ```
/// use openai_core::RequestOptions;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), openai_core::Error> {
/// let options = RequestOptions::new()
///     .with_header("X-Trace", "abc")?
///     .with_query_param("api-version", "2024-06-01")
///     .with_timeout(Duration::from_secs(20))
///     .with_max_retries(0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Headers added after the configured defaults; they win on collision.
    pub extra_headers: Omit<HeaderMap>,

    /// Query parameters added after the configured defaults; they win on collision.
    pub extra_query: Omit<Query>,

    /// Fields merged into the top level of the JSON body of body-carrying calls.
    pub extra_body: Omit<Map<String, Value>>,

    /// Replaces the configured timeout.
    pub timeout: Omit<Timeout>,

    /// Replaces the configured retry budget.
    pub max_retries: Omit<u32>,
}

impl RequestOptions {
    /// Creates options that override nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header to the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.extra_headers = self.extra_headers.updated(|headers| {
            headers.insert(name, value);
        });
        Ok(self)
    }

    /// Adds a query parameter to the request.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let (key, value) = (key.into(), value.into());
        self.extra_query = self.extra_query.updated(|query| {
            query.insert(key, value);
        });
        self
    }

    /// Adds a top-level field to the JSON body.
    pub fn with_body_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let (key, value) = (key.into(), value.into());
        self.extra_body = self.extra_body.updated(|body| {
            body.insert(key, value);
        });
        self
    }

    /// Sets the timeout for this call. A bare `Duration` sets the total deadline.
    pub fn with_timeout(mut self, timeout: impl Into<Timeout>) -> Self {
        self.timeout = Omit::Given(timeout.into());
        self
    }

    /// Sets the retry budget for this call.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Omit::Given(max_retries);
        self
    }
}
