//! Composes outbound requests from the client configuration and per-call options.

use crate::config::{query_value_to_string, Config, Query};
use crate::{Error, RequestOptions, Result};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// A fully resolved request, ready to hand to the transport.
#[derive(Debug, Clone)]
pub(crate) struct OutboundRequest {
    pub(crate) method: Method,
    pub(crate) url: Url,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Option<Value>,
    pub(crate) timeout: Duration,
}

impl OutboundRequest {
    /// Builds the request for one attempt.
    ///
    /// Header precedence, later entries replacing earlier ones: `Content-Type`,
    /// `Authorization`, organization, project, configured defaults, per-call extras.
    /// Query precedence: configured defaults, `query`, per-call extras.
    pub(crate) fn build(
        config: &Config,
        api_key: &str,
        method: Method,
        path: &str,
        query: &Query,
        body: Option<Value>,
        options: &RequestOptions,
    ) -> Result<Self> {
        let mut url = resolve_url(&config.base_url, path)?;

        let mut params = config.default_query.clone();
        params.extend(query.iter().map(|(k, v)| (k.clone(), v.clone())));
        if let Some(extra) = options.extra_query.get() {
            params.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &params {
                pairs.append_pair(key, &query_value_to_string(value));
            }
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut authorization = HeaderValue::try_from(format!("Bearer {}", api_key))
            .map_err(|_| Error::ConfigurationError("API key is not a valid header value".to_string()))?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        if let Some(organization) = config.organization.as_deref().filter(|s| !s.is_empty()) {
            headers.insert("openai-organization", header_value(organization)?);
        }
        if let Some(project) = config.project.as_deref().filter(|s| !s.is_empty()) {
            headers.insert("openai-project", header_value(project)?);
        }

        for (name, value) in &config.default_headers {
            headers.insert(name.clone(), value.clone());
        }
        if let Some(extra) = options.extra_headers.get() {
            for (name, value) in extra {
                headers.insert(name.clone(), value.clone());
            }
        }

        let body = match (body, options.extra_body.get()) {
            (Some(Value::Object(mut fields)), Some(extra)) => {
                fields.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
                Some(Value::Object(fields))
            }
            (body, _) => body,
        };

        let timeout = options.timeout.get().copied().unwrap_or(config.timeout).total;

        Ok(Self {
            method,
            url,
            headers,
            body,
            timeout,
        })
    }

    /// Converts into a `reqwest` request on the shared connection pool.
    pub(crate) fn into_reqwest(self, http_client: &reqwest::Client) -> reqwest::RequestBuilder {
        let mut request = http_client
            .request(self.method, self.url)
            .headers(self.headers)
            .timeout(self.timeout);

        if let Some(body) = &self.body {
            request = request.json(body);
        }
        request
    }
}

/// Appends `path` to the base URL, keeping any path the base already has.
///
/// `https://api.openai.com/v1` + `chat/completions` gives
/// `https://api.openai.com/v1/chat/completions`.
pub(crate) fn resolve_url(base: &Url, path: &str) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| Error::ConfigurationError(format!("Base URL cannot have a path: {}", base)))?
        .pop_if_empty()
        .extend(path.split('/').filter(|segment| !segment.is_empty()));
    Ok(url)
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::try_from(value)
        .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))
}
