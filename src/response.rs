//! Successful responses: the typed body plus everything known about the exchange.
//!
//! Decoding is best-effort and works field by field. A field the server left out, sent as
//! `null` or sent with an unexpected type takes its default value without disturbing its
//! siblings. Integer fields also accept floats and numeric strings. A body that is not an
//! object at all decodes to the type's default while [`Response::raw`] still holds the payload.

use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

/// A successful response.
///
/// Derefs to the decoded body, so typed accessors are reachable directly.
///
/// # Examples
///
/// ```no_run
/// use openai_core::{Client, RequestOptions};
/// use openai_core::resources::chat::{ChatCompletionCreateParams, ChatMessage};
///
/// # async fn example() -> Result<(), openai_core::Error> {
/// let client = Client::from_env()?;
/// let params = ChatCompletionCreateParams::new("gpt-4o-mini", vec![ChatMessage::user("hi")]);
///
/// let response = client.chat().completions().create(&params, RequestOptions::new()).await?;
/// println!("{}", response.content());
/// println!("{} tokens, request {}", response.usage.total_tokens, response.request_id);
/// println!("took {:?} over {} attempt(s)", response.latency, response.attempts);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The decoded response body.
    pub data: T,

    /// The parsed JSON payload the body was decoded from.
    pub raw: Value,

    /// The response body as text.
    pub raw_body: String,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// The `x-request-id` header, or an empty string if the server sent none.
    pub request_id: String,

    /// The total latency of the call, including all retry attempts.
    pub latency: Duration,

    /// The number of attempts made, `1` if the first one succeeded.
    pub attempts: usize,
}

impl<T> Response<T> {
    /// Creates a new `Response`, reading the correlation id from `headers`.
    pub fn new(
        data: T,
        raw: Value,
        raw_body: String,
        status: StatusCode,
        headers: HeaderMap,
        latency: Duration,
        attempts: usize,
    ) -> Self {
        let request_id = headers
            .get(crate::REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        Self {
            data,
            raw,
            raw_body,
            status,
            headers,
            request_id,
            latency,
            attempts,
        }
    }

    /// Maps the response data to a different type, keeping the metadata.
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: f(self.data),
            raw: self.raw,
            raw_body: self.raw_body,
            status: self.status,
            headers: self.headers,
            request_id: self.request_id,
            latency: self.latency,
            attempts: self.attempts,
        }
    }

    /// Returns `true` if the call needed retries.
    pub fn was_retried(&self) -> bool {
        self.attempts > 1
    }

    /// Returns a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Returns the decoded body.
    pub fn into_inner(self) -> T {
        self.data
    }
}

impl<T> AsRef<T> for Response<T> {
    fn as_ref(&self) -> &T {
        &self.data
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

/// Decodes a successful body without ever failing.
///
/// Returns the parsed payload (an empty object for empty or non-JSON bodies) and the
/// typed view over it.
pub(crate) fn decode<T>(raw_body: &str) -> (Value, T)
where
    T: DeserializeOwned + Default,
{
    let raw = match serde_json::from_str::<Value>(raw_body) {
        Ok(value) => value,
        Err(e) => {
            if !raw_body.trim().is_empty() {
                tracing::warn!(error = %e, "Response body is not JSON, decoding as empty object");
            }
            Value::Object(Map::new())
        }
    };

    let data = match T::deserialize(&raw) {
        Ok(data) => data,
        Err(e) => {
            tracing::error!(
                error = %e,
                raw_response = %raw_body,
                "Response does not match the expected shape, using defaults"
            );
            T::default()
        }
    };

    (raw, data)
}

/// Deserializes one response field, falling back to the default on any mismatch.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(from_value_or_default(value))
}

/// Like [`lenient`] for lists, applied element by element. A non-array reads as empty.
pub(crate) fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().map(from_value_or_default).collect(),
        _ => Vec::new(),
    })
}

fn from_value_or_default<T>(value: Value) -> T
where
    T: DeserializeOwned + Default,
{
    if let Ok(typed) = T::deserialize(&value) {
        return typed;
    }

    numeric_candidates(&value)
        .into_iter()
        .find_map(|candidate| T::deserialize(&candidate).ok())
        .unwrap_or_default()
}

/// Numeric readings of a float or numeric string, most precise first.
fn numeric_candidates(value: &Value) -> Vec<Value> {
    let mut candidates = Vec::new();
    let number = match value {
        Value::String(text) => {
            let text = text.trim();
            if let Ok(integer) = text.parse::<i64>() {
                candidates.push(Value::from(integer));
            }
            text.parse::<f64>().ok()
        }
        Value::Number(number) if number.is_f64() => number.as_f64(),
        _ => None,
    };

    if let Some(number) = number.filter(|n| n.is_finite()) {
        if value.is_string() {
            candidates.push(Value::from(number));
        }
        candidates.push(Value::from(number.trunc() as i64));
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Thing {
        id: String,
        #[serde(deserialize_with = "lenient")]
        name: String,
        count: u64,
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Item {
        #[serde(deserialize_with = "lenient")]
        id: String,
        #[serde(deserialize_with = "lenient")]
        created: i64,
        #[serde(deserialize_with = "lenient")]
        score: f64,
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Listing {
        #[serde(deserialize_with = "lenient")]
        total: u64,
        #[serde(deserialize_with = "lenient_list")]
        items: Vec<Item>,
    }

    #[test]
    fn test_decode_missing_and_null_fields() {
        let (raw, thing) = decode::<Thing>(r#"{"id":"t1","name":null}"#);
        assert_eq!(
            thing,
            Thing {
                id: "t1".to_string(),
                name: String::new(),
                count: 0
            }
        );
        assert_eq!(raw["id"], "t1");
    }

    #[test]
    fn test_decode_empty_and_invalid_bodies() {
        let (raw, thing) = decode::<Thing>("");
        assert_eq!(raw, Value::Object(Map::new()));
        assert_eq!(thing, Thing::default());

        let (_, thing) = decode::<Thing>("not json");
        assert_eq!(thing, Thing::default());
    }

    #[test]
    fn test_decode_non_object_keeps_raw() {
        let (raw, thing) = decode::<Thing>(r#"[{"id":"t1"}]"#);
        assert_eq!(thing, Thing::default());
        assert_eq!(raw[0]["id"], "t1");
    }

    #[test]
    fn test_mistyped_field_keeps_siblings() {
        let (_, item) = decode::<Item>(r#"{"id":7,"created":100,"score":0.5}"#);
        assert_eq!(item.id, "");
        assert_eq!(item.created, 100);
        assert_eq!(item.score, 0.5);

        let (_, item) = decode::<Item>(r#"{"id":"i1","created":{"at":1},"score":0.5}"#);
        assert_eq!(item.id, "i1");
        assert_eq!(item.created, 0);
    }

    #[test]
    fn test_integers_accept_floats_and_numeric_strings() {
        let (_, item) = decode::<Item>(r#"{"id":"i1","created":100.5,"score":"0.25"}"#);
        assert_eq!(item.created, 100);
        assert_eq!(item.score, 0.25);

        let (_, item) = decode::<Item>(r#"{"created":" 42 "}"#);
        assert_eq!(item.created, 42);

        let (_, listing) = decode::<Listing>(r#"{"total":"3.0"}"#);
        assert_eq!(listing.total, 3);
    }

    #[test]
    fn test_list_elements_fall_back_one_by_one() {
        let (_, listing) = decode::<Listing>(
            r#"{"total":2,"items":[{"id":"a","created":1},"junk",{"id":"c","created":false}]}"#,
        );
        assert_eq!(listing.total, 2);
        assert_eq!(listing.items.len(), 3);
        assert_eq!(listing.items[0].id, "a");
        assert_eq!(listing.items[1], Item::default());
        assert_eq!(listing.items[2].id, "c");
        assert_eq!(listing.items[2].created, 0);

        let (_, listing) = decode::<Listing>(r#"{"items":{"id":"a"}}"#);
        assert!(listing.items.is_empty());
    }

    #[test]
    fn test_request_id_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", HeaderValue::from_static("abc123"));
        let response = Response::new(
            (),
            Value::Null,
            String::new(),
            StatusCode::OK,
            headers,
            Duration::from_millis(5),
            1,
        );
        assert_eq!(response.request_id, "abc123");
        assert!(!response.was_retried());

        let response = Response::new(
            (),
            Value::Null,
            String::new(),
            StatusCode::OK,
            HeaderMap::new(),
            Duration::from_millis(5),
            3,
        );
        assert_eq!(response.request_id, "");
        assert!(response.was_retried());
    }

    #[test]
    fn test_map_keeps_metadata() {
        let response = Response::new(
            21,
            Value::Null,
            "21".to_string(),
            StatusCode::OK,
            HeaderMap::new(),
            Duration::from_millis(100),
            2,
        );

        let doubled = response.map(|n| n * 2);
        assert_eq!(doubled.data, 42);
        assert_eq!(doubled.attempts, 2);
        assert_eq!(doubled.raw_body, "21");
    }
}
