//! Error types for API calls.
//!
//! Every failure a call can end in is one variant of [`Error`]. Transport failures and
//! HTTP error statuses are classified into the variants below by [`crate::classify`];
//! the remaining variants are raised locally before anything is sent.

use crate::rate_limit::RateLimitInfo;
use http::{HeaderMap, StatusCode};
use serde_json::Value;
use std::fmt;

/// The main error type for API calls.
///
/// Status-carrying variants box a [`StatusError`] with the HTTP status, the message taken
/// from the error payload, and the parsed payload itself.
///
/// # Examples
///
/// ```no_run
/// use openai_core::{Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder().api_key("sk-test").build()?;
///
/// match client.models().list(Default::default()).await {
///     Ok(models) => println!("{} models", models.data.data.len()),
///     Err(Error::Authentication(details)) => eprintln!("bad key: {}", details.message),
///     Err(Error::RateLimit(details)) => eprintln!("slow down: {}", details.message),
///     Err(e) if e.is_retryable() => eprintln!("gave up after retries: {}", e),
///     Err(e) => eprintln!("request failed: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No HTTP response was obtained (connection refused, DNS, TLS, reset).
    #[error("Connection error: {message}")]
    Connection {
        /// The transport's diagnostic message
        message: String,
    },

    /// The transfer exceeded its deadline.
    #[error("Request timed out: {message}")]
    Timeout {
        /// The transport's diagnostic message
        message: String,
    },

    /// HTTP 400.
    #[error("Bad request ({}): {}", .0.status, .0.message)]
    BadRequest(Box<StatusError>),

    /// HTTP 401.
    #[error("Authentication error ({}): {}", .0.status, .0.message)]
    Authentication(Box<StatusError>),

    /// HTTP 403.
    #[error("Permission denied ({}): {}", .0.status, .0.message)]
    PermissionDenied(Box<StatusError>),

    /// HTTP 404.
    #[error("Not found ({}): {}", .0.status, .0.message)]
    NotFound(Box<StatusError>),

    /// HTTP 409.
    #[error("Conflict ({}): {}", .0.status, .0.message)]
    Conflict(Box<StatusError>),

    /// HTTP 422.
    #[error("Unprocessable entity ({}): {}", .0.status, .0.message)]
    UnprocessableEntity(Box<StatusError>),

    /// HTTP 429. Retried while budget remains.
    #[error("Rate limited ({}): {}", .0.status, .0.message)]
    RateLimit(Box<StatusError>),

    /// Any HTTP 5xx. Retried while budget remains.
    #[error("Server error ({}): {}", .0.status, .0.message)]
    InternalServer(Box<StatusError>),

    /// Any other 4xx status.
    #[error("HTTP error ({}): {}", .0.status, .0.message)]
    Status(Box<StatusError>),

    /// Invalid configuration: missing credential, bad URL, header, or proxy.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The request body could not be encoded as JSON.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),
}

/// Details shared by every status-carrying [`Error`] variant.
#[derive(Debug, Clone)]
pub struct StatusError {
    /// The HTTP status code
    pub status: StatusCode,
    /// `error.message` from the payload, or `"HTTP <status> error."`
    pub message: String,
    /// The parsed error payload; `None` when the body was not JSON
    pub body: Option<Value>,
    /// The response headers
    pub headers: HeaderMap,
    /// Rate limit information parsed from headers
    pub rate_limit_info: Option<RateLimitInfo>,
}

impl StatusError {
    /// Returns the `x-request-id` the server attached to the failed response.
    pub fn request_id(&self) -> Option<&str> {
        self.headers.get(crate::REQUEST_ID_HEADER)?.to_str().ok()
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.status.as_u16())
    }
}

/// The discriminant of an [`Error`], for callers that only need to branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Connection,
    Timeout,
    BadRequest,
    Authentication,
    PermissionDenied,
    NotFound,
    Conflict,
    UnprocessableEntity,
    RateLimit,
    InternalServer,
    Status,
    Configuration,
    Serialization,
}

impl Error {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Connection { .. } => ErrorKind::Connection,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::BadRequest(_) => ErrorKind::BadRequest,
            Error::Authentication(_) => ErrorKind::Authentication,
            Error::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Conflict(_) => ErrorKind::Conflict,
            Error::UnprocessableEntity(_) => ErrorKind::UnprocessableEntity,
            Error::RateLimit(_) => ErrorKind::RateLimit,
            Error::InternalServer(_) => ErrorKind::InternalServer,
            Error::Status(_) => ErrorKind::Status,
            Error::ConfigurationError(_) => ErrorKind::Configuration,
            Error::SerializationFailed(_) => ErrorKind::Serialization,
        }
    }

    /// Returns `true` if this error is potentially retryable.
    ///
    /// Connection errors, timeouts, 429 and 5xx responses are retryable; every other
    /// status and local error is not.
    ///
    /// # Examples
    ///
    /// ```
    /// use openai_core::Error;
    ///
    /// let err = Error::Timeout { message: "deadline exceeded".to_string() };
    /// assert!(err.is_retryable());
    ///
    /// let err = Error::ConfigurationError("missing key".to_string());
    /// assert!(!err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Connection { .. } => true,
            Error::Timeout { .. } => true,
            Error::RateLimit(_) => true,
            Error::InternalServer(_) => true,
            Error::BadRequest(_)
            | Error::Authentication(_)
            | Error::PermissionDenied(_)
            | Error::NotFound(_)
            | Error::Conflict(_)
            | Error::UnprocessableEntity(_)
            | Error::Status(_) => false,
            Error::ConfigurationError(_) => false,
            Error::SerializationFailed(_) => false,
        }
    }

    /// Returns the human-readable message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Error::Connection { message } | Error::Timeout { message } => message,
            Error::ConfigurationError(message) | Error::SerializationFailed(message) => message,
            _ => self
                .status_error()
                .map(|details| details.message.as_str())
                .unwrap_or_default(),
        }
    }

    /// Returns the status details if this error came from an HTTP error response.
    pub fn status_error(&self) -> Option<&StatusError> {
        match self {
            Error::BadRequest(details)
            | Error::Authentication(details)
            | Error::PermissionDenied(details)
            | Error::NotFound(details)
            | Error::Conflict(details)
            | Error::UnprocessableEntity(details)
            | Error::RateLimit(details)
            | Error::InternalServer(details)
            | Error::Status(details) => Some(details),
            _ => None,
        }
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        self.status_error().map(|details| details.status)
    }

    /// Returns the parsed error payload if the server sent one.
    pub fn body(&self) -> Option<&Value> {
        self.status_error()?.body.as_ref()
    }

    /// Returns the `x-request-id` of the failed response, if any.
    pub fn request_id(&self) -> Option<&str> {
        self.status_error()?.request_id()
    }

    /// Returns rate limit information if available.
    pub fn rate_limit_info(&self) -> Option<&RateLimitInfo> {
        self.status_error()?.rate_limit_info.as_ref()
    }

    /// Returns the delay suggested by rate limit headers, capped by `max_wait`.
    pub fn rate_limit_delay(&self, max_wait: std::time::Duration) -> Option<std::time::Duration> {
        self.rate_limit_info()?.delay(max_wait)
    }
}

/// A specialized `Result` type for API calls.
pub type Result<T> = std::result::Result<T, Error>;
