//! `embeddings`: vector representations of input text.

use crate::types::{Input, Usage};
use crate::{Client, Omit, RequestOptions, Response, Result};
use serde::{Deserialize, Serialize};

/// Parameters of `POST embeddings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbeddingCreateParams {
    pub model: String,
    pub input: Input,
    /// `float` or `base64`. Base64 vectors do not decode into
    /// [`Embedding::embedding`]; read them from [`Response::raw`].
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub encoding_format: Omit<String>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub dimensions: Omit<u32>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub user: Omit<String>,
}

impl EmbeddingCreateParams {
    pub fn new(model: impl Into<String>, input: impl Into<Input>) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            encoding_format: Omit::NotGiven,
            dimensions: Omit::NotGiven,
            user: Omit::NotGiven,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Embedding {
    #[serde(deserialize_with = "crate::response::lenient")]
    pub index: u32,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub object: String,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub embedding: Vec<f32>,
}

/// Response of `POST embeddings`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingResponse {
    #[serde(deserialize_with = "crate::response::lenient")]
    pub object: String,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub model: String,
    #[serde(deserialize_with = "crate::response::lenient_list")]
    pub data: Vec<Embedding>,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub usage: Usage,
}

impl EmbeddingResponse {
    /// The vectors in input order.
    pub fn embeddings(&self) -> Vec<&[f32]> {
        self.data.iter().map(|e| e.embedding.as_slice()).collect()
    }
}

/// Handle for `embeddings`.
#[derive(Debug, Clone, Copy)]
pub struct Embeddings<'a> {
    client: &'a Client,
}

impl<'a> Embeddings<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn create(
        &self,
        params: &EmbeddingCreateParams,
        options: RequestOptions,
    ) -> Result<Response<EmbeddingResponse>> {
        self.client.post("embeddings", params, options).await
    }

    /// Embeds a single text.
    pub async fn create_for_text(
        &self,
        model: impl Into<String>,
        input: impl Into<String>,
        options: RequestOptions,
    ) -> Result<Response<EmbeddingResponse>> {
        let params = EmbeddingCreateParams::new(model, Input::Text(input.into()));
        self.create(&params, options).await
    }
}
