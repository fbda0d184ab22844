//! `models`: listing, inspecting and deleting models.

use super::item_path;
use crate::config::Query;
use crate::types::DeleteResponse;
use crate::{Client, RequestOptions, Response, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Model {
    #[serde(deserialize_with = "crate::response::lenient")]
    pub id: String,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub object: String,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub created: i64,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub owned_by: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelList {
    #[serde(deserialize_with = "crate::response::lenient")]
    pub object: String,
    #[serde(deserialize_with = "crate::response::lenient_list")]
    pub data: Vec<Model>,
}

/// Handle for `models`.
#[derive(Debug, Clone, Copy)]
pub struct Models<'a> {
    client: &'a Client,
}

impl<'a> Models<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self, options: RequestOptions) -> Result<Response<ModelList>> {
        self.client.get("models", &Query::new(), options).await
    }

    pub async fn retrieve(&self, model: &str, options: RequestOptions) -> Result<Response<Model>> {
        let path = item_path("models", model)?;
        self.client.get(&path, &Query::new(), options).await
    }

    /// Deletes a fine-tuned model owned by the caller's organization.
    pub async fn delete(&self, model: &str, options: RequestOptions) -> Result<Response<DeleteResponse>> {
        let path = item_path("models", model)?;
        self.client.delete(&path, options).await
    }
}
