//! Rate limit header parsing for 429 responses.
//!
//! OpenAI-compatible servers describe when a throttled request may be retried through a
//! handful of headers. When rate limit handling is enabled the client waits the indicated
//! time instead of the regular backoff delay.

use http::HeaderMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Information extracted from rate limit headers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateLimitInfo {
    /// How long to wait before retrying (`retry-after-ms` or `Retry-After`).
    pub retry_after: Option<Duration>,

    /// When the limit resets (`x-ratelimit-reset`, Unix timestamp).
    pub reset_at: Option<SystemTime>,

    /// Time until the request window resets (`x-ratelimit-reset-requests`, e.g. `1s`).
    pub reset_requests: Option<Duration>,

    /// Time until the token window resets (`x-ratelimit-reset-tokens`, e.g. `6m0s`).
    pub reset_tokens: Option<Duration>,

    /// Requests remaining in the current window (`x-ratelimit-remaining-requests`).
    pub remaining_requests: Option<u64>,

    /// Tokens remaining in the current window (`x-ratelimit-remaining-tokens`).
    pub remaining_tokens: Option<u64>,
}

impl RateLimitInfo {
    /// Extracts rate limit information from response headers.
    ///
    /// # Examples
    ///
    /// ```
    /// use openai_core::rate_limit::RateLimitInfo;
    /// use http::HeaderMap;
    ///
    /// let mut headers = HeaderMap::new();
    /// headers.insert("retry-after", "20".parse().unwrap());
    ///
    /// let info = RateLimitInfo::from_headers(&headers);
    /// assert_eq!(info.retry_after, Some(std::time::Duration::from_secs(20)));
    /// ```
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            retry_after: parse_retry_after(headers),
            reset_at: parse_reset(headers),
            reset_requests: header_str(headers, "x-ratelimit-reset-requests")
                .and_then(parse_reset_duration),
            reset_tokens: header_str(headers, "x-ratelimit-reset-tokens")
                .and_then(parse_reset_duration),
            remaining_requests: parse_u64(headers, "x-ratelimit-remaining-requests"),
            remaining_tokens: parse_u64(headers, "x-ratelimit-remaining-tokens"),
        }
    }

    /// Returns `true` if any header carried usable information.
    pub fn is_present(&self) -> bool {
        self.retry_after.is_some()
            || self.reset_at.is_some()
            || self.reset_requests.is_some()
            || self.reset_tokens.is_some()
            || self.remaining_requests.is_some()
            || self.remaining_tokens.is_some()
    }

    /// Returns the recommended delay before retrying, capped by `max_wait`.
    ///
    /// Prefers `retry_after`, then the reset of an exhausted window, then `reset_at`.
    /// A window counts as exhausted when its remaining count is zero or unknown.
    pub fn delay(&self, max_wait: Duration) -> Option<Duration> {
        if let Some(retry_after) = self.retry_after {
            return Some(retry_after.min(max_wait));
        }

        if let Some(window) = self.window_reset() {
            return Some(window.min(max_wait));
        }

        let until_reset = self.reset_at?.duration_since(SystemTime::now()).ok()?;
        Some(until_reset.min(max_wait))
    }

    fn window_reset(&self) -> Option<Duration> {
        [
            (self.reset_requests, self.remaining_requests),
            (self.reset_tokens, self.remaining_tokens),
        ]
        .into_iter()
        .filter(|(_, remaining)| remaining.map_or(true, |n| n == 0))
        .filter_map(|(reset, _)| reset)
        .max()
    }
}

/// Configuration for header-driven rate limit delays.
///
/// # Examples
///
/// ```
/// use openai_core::rate_limit::RateLimitConfig;
/// use std::time::Duration;
///
/// let config = RateLimitConfig::builder()
///     .max_wait(Duration::from_secs(30))
///     .build();
/// assert!(config.enabled);
/// ```
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Whether 429 responses wait for the server-indicated time.
    pub enabled: bool,

    /// Upper bound on a single header-driven wait. Defaults to 60 seconds.
    pub max_wait: Duration,

    /// Whether `Retry-After` / `retry-after-ms` are honored. Defaults to `true`.
    pub respect_retry_after: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_wait: Duration::from_secs(60),
            respect_retry_after: true,
        }
    }
}

impl RateLimitConfig {
    /// Creates a new builder.
    pub fn builder() -> RateLimitConfigBuilder {
        RateLimitConfigBuilder::default()
    }

    /// Creates a configuration that always uses the regular backoff.
    pub fn disabled() -> Self {
        Self::builder().enabled(false).build()
    }

    /// Parses the headers of a 429 response according to this configuration.
    pub(crate) fn inspect(&self, headers: &HeaderMap) -> Option<RateLimitInfo> {
        if !self.enabled {
            return None;
        }

        let mut info = RateLimitInfo::from_headers(headers);
        if !self.respect_retry_after {
            info.retry_after = None;
        }
        info.is_present().then_some(info)
    }
}

/// Builder for [`RateLimitConfig`], starting from the defaults.
#[derive(Debug, Clone, Default)]
pub struct RateLimitConfigBuilder {
    config: RateLimitConfig,
}

impl RateLimitConfigBuilder {
    /// Turns header-driven waits on or off.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// Caps any single header-driven wait.
    pub fn max_wait(mut self, max_wait: Duration) -> Self {
        self.config.max_wait = max_wait;
        self
    }

    /// Ignores `Retry-After` and `retry-after-ms` when `false`; the reset headers still apply.
    pub fn respect_retry_after(mut self, respect: bool) -> Self {
        self.config.respect_retry_after = respect;
        self
    }

    pub fn build(self) -> RateLimitConfig {
        self.config
    }
}

/// Parses `retry-after-ms`, then `Retry-After` as seconds or an HTTP date.
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    if let Some(millis) = header_str(headers, "retry-after-ms").and_then(|v| v.parse::<f64>().ok()) {
        if millis.is_finite() && millis >= 0.0 {
            return Some(Duration::from_secs_f64(millis / 1000.0));
        }
    }

    let value = header_str(headers, "retry-after")?;
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    let date = httpdate::parse_http_date(value).ok()?;
    date.duration_since(SystemTime::now()).ok()
}

fn parse_reset(headers: &HeaderMap) -> Option<SystemTime> {
    let timestamp = parse_u64(headers, "x-ratelimit-reset")?;
    Some(UNIX_EPOCH + Duration::from_secs(timestamp))
}

/// Parses durations such as `1s`, `6m0s`, `20ms` or `1h2m3.5s`.
fn parse_reset_duration(value: &str) -> Option<Duration> {
    let mut rest = value.trim();
    if rest.is_empty() {
        return None;
    }

    let mut seconds = 0.0;
    while !rest.is_empty() {
        let unit_start = rest.find(|c: char| !(c.is_ascii_digit() || c == '.'))?;
        let (number, tail) = rest.split_at(unit_start);
        let number: f64 = number.parse().ok()?;

        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);
        let scale = match unit {
            "h" => 3600.0,
            "m" => 60.0,
            "s" => 1.0,
            "ms" => 1e-3,
            "us" | "µs" => 1e-6,
            "ns" => 1e-9,
            _ => return None,
        };

        seconds += number * scale;
        rest = tail;
    }
    Duration::try_from_secs_f64(seconds).ok()
}

fn parse_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    header_str(headers, name)?.parse().ok()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name)?.to_str().ok()
}
