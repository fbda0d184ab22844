//! Wire types shared by several resources.

use serde::{Deserialize, Serialize};

/// Token accounting reported with generation and embedding responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Usage {
    #[serde(deserialize_with = "crate::response::lenient")]
    pub prompt_tokens: u64,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub completion_tokens: u64,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub total_tokens: u64,
}

/// Acknowledgement returned by delete endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteResponse {
    #[serde(deserialize_with = "crate::response::lenient")]
    pub id: String,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub object: String,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub deleted: bool,
}

/// Input accepted by the completion, embedding and moderation endpoints.
///
/// Serializes to whichever JSON shape the variant holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Input {
    Text(String),
    TextList(Vec<String>),
    Tokens(Vec<u32>),
    TokenLists(Vec<Vec<u32>>),
}

impl From<&str> for Input {
    fn from(text: &str) -> Self {
        Input::Text(text.to_string())
    }
}

impl From<String> for Input {
    fn from(text: String) -> Self {
        Input::Text(text)
    }
}

impl From<Vec<String>> for Input {
    fn from(texts: Vec<String>) -> Self {
        Input::TextList(texts)
    }
}

impl From<Vec<&str>> for Input {
    fn from(texts: Vec<&str>) -> Self {
        Input::TextList(texts.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<u32>> for Input {
    fn from(tokens: Vec<u32>) -> Self {
        Input::Tokens(tokens)
    }
}

/// One or more stop sequences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stop {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for Stop {
    fn from(stop: &str) -> Self {
        Stop::One(stop.to_string())
    }
}

impl From<Vec<&str>> for Stop {
    fn from(stops: Vec<&str>) -> Self {
        Stop::Many(stops.into_iter().map(str::to_string).collect())
    }
}
