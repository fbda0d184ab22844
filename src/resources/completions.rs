//! `completions`: legacy prompt completion.

use crate::types::{Input, Stop, Usage};
use crate::{Client, Omit, RequestOptions, Response, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameters of `POST completions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionCreateParams {
    pub model: String,
    pub prompt: Input,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub best_of: Omit<u32>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub echo: Omit<bool>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub frequency_penalty: Omit<f32>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub logit_bias: Omit<Map<String, Value>>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub logprobs: Omit<u32>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub max_tokens: Omit<u32>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub n: Omit<u32>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub presence_penalty: Omit<f32>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub seed: Omit<i64>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub stop: Omit<Stop>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub suffix: Omit<String>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub temperature: Omit<f32>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub top_p: Omit<f32>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub user: Omit<String>,
}

impl CompletionCreateParams {
    pub fn new(model: impl Into<String>, prompt: impl Into<Input>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            best_of: Omit::NotGiven,
            echo: Omit::NotGiven,
            frequency_penalty: Omit::NotGiven,
            logit_bias: Omit::NotGiven,
            logprobs: Omit::NotGiven,
            max_tokens: Omit::NotGiven,
            n: Omit::NotGiven,
            presence_penalty: Omit::NotGiven,
            seed: Omit::NotGiven,
            stop: Omit::NotGiven,
            suffix: Omit::NotGiven,
            temperature: Omit::NotGiven,
            top_p: Omit::NotGiven,
            user: Omit::NotGiven,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionChoice {
    #[serde(deserialize_with = "crate::response::lenient")]
    pub text: String,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub index: u32,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub finish_reason: String,
    pub logprobs: Value,
}

/// Response of `POST completions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Completion {
    #[serde(deserialize_with = "crate::response::lenient")]
    pub id: String,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub object: String,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub created: i64,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub model: String,
    #[serde(deserialize_with = "crate::response::lenient_list")]
    pub choices: Vec<CompletionChoice>,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub usage: Usage,
}

impl Completion {
    /// The text of the first choice, or `""`.
    pub fn text(&self) -> &str {
        self.choices.first().map(|c| c.text.as_str()).unwrap_or_default()
    }
}

/// Handle for `completions`.
#[derive(Debug, Clone, Copy)]
pub struct Completions<'a> {
    client: &'a Client,
}

impl<'a> Completions<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn create(
        &self,
        params: &CompletionCreateParams,
        options: RequestOptions,
    ) -> Result<Response<Completion>> {
        self.client.post("completions", params, options).await
    }
}
