//! `moderations`: policy classification of input text.

use crate::types::Input;
use crate::{Client, Omit, RequestOptions, Response, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameters of `POST moderations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModerationCreateParams {
    pub input: Input,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub model: Omit<String>,
}

impl ModerationCreateParams {
    pub fn new(input: impl Into<Input>) -> Self {
        Self {
            input: input.into(),
            model: Omit::NotGiven,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationResult {
    #[serde(deserialize_with = "crate::response::lenient")]
    pub flagged: bool,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub categories: BTreeMap<String, Option<bool>>,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub category_scores: BTreeMap<String, Option<f64>>,
}

/// Response of `POST moderations`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationResponse {
    #[serde(deserialize_with = "crate::response::lenient")]
    pub id: String,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub model: String,
    #[serde(deserialize_with = "crate::response::lenient_list")]
    pub results: Vec<ModerationResult>,
}

impl ModerationResponse {
    /// Returns `true` if any input was flagged.
    pub fn flagged(&self) -> bool {
        self.results.iter().any(|result| result.flagged)
    }
}

/// Handle for `moderations`.
#[derive(Debug, Clone, Copy)]
pub struct Moderations<'a> {
    client: &'a Client,
}

impl<'a> Moderations<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn create(
        &self,
        params: &ModerationCreateParams,
        options: RequestOptions,
    ) -> Result<Response<ModerationResponse>> {
        self.client.post("moderations", params, options).await
    }

    /// Classifies a single text with the default model.
    pub async fn create_for_text(
        &self,
        input: impl Into<String>,
        options: RequestOptions,
    ) -> Result<Response<ModerationResponse>> {
        let params = ModerationCreateParams::new(Input::Text(input.into()));
        self.create(&params, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flagged() {
        let response: ModerationResponse = serde_json::from_value(json!({
            "id": "modr-1",
            "results": [
                { "flagged": false, "categories": { "violence": false } },
                { "flagged": true, "categories": { "violence": true, "illicit": null },
                  "category_scores": { "violence": 0.97 } }
            ]
        }))
        .unwrap();

        assert!(response.flagged());
        assert_eq!(response.results[1].categories["illicit"], None);
        assert_eq!(response.results[1].category_scores["violence"], Some(0.97));
    }
}
