//! Maps transport failures and HTTP error statuses onto [`Error`] variants.
//!
//! Both functions are total: a body that is empty or not JSON still yields a
//! classified error, just without a parsed payload.

use crate::error::StatusError;
use crate::rate_limit::RateLimitConfig;
use crate::Error;
use http::{HeaderMap, StatusCode};
use serde_json::Value;

/// Classifies a failure that prevented any HTTP response from being obtained.
pub fn classify_transport(error: &reqwest::Error) -> Error {
    let message = error.to_string();
    if error.is_timeout() {
        Error::Timeout { message }
    } else {
        Error::Connection { message }
    }
}

/// Classifies an HTTP response with a status of 400 or above.
///
/// The message is `error.message` from the JSON body when present, otherwise
/// `"HTTP <status> error."`.
///
/// # Examples
///
/// ```
/// use openai_core::{classify::classify_status, rate_limit::RateLimitConfig, ErrorKind};
/// use http::{HeaderMap, StatusCode};
///
/// let err = classify_status(
///     StatusCode::UNAUTHORIZED,
///     HeaderMap::new(),
///     br#"{"error":{"message":"Incorrect API key provided"}}"#,
///     &RateLimitConfig::default(),
/// );
/// assert_eq!(err.kind(), ErrorKind::Authentication);
/// assert_eq!(err.message(), "Incorrect API key provided");
/// ```
pub fn classify_status(
    status: StatusCode,
    headers: HeaderMap,
    body: &[u8],
    rate_limit: &RateLimitConfig,
) -> Error {
    let body: Option<Value> = serde_json::from_slice(body).ok();

    let message = body
        .as_ref()
        .and_then(|value| value.get("error"))
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {} error.", status.as_u16()));

    let rate_limit_info = if status == StatusCode::TOO_MANY_REQUESTS {
        rate_limit.inspect(&headers)
    } else {
        None
    };

    let details = Box::new(StatusError {
        status,
        message,
        body,
        headers,
        rate_limit_info,
    });

    match status.as_u16() {
        400 => Error::BadRequest(details),
        401 => Error::Authentication(details),
        403 => Error::PermissionDenied(details),
        404 => Error::NotFound(details),
        409 => Error::Conflict(details),
        422 => Error::UnprocessableEntity(details),
        429 => Error::RateLimit(details),
        code if code >= 500 => Error::InternalServer(details),
        _ => Error::Status(details),
    }
}
