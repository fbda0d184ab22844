//! `files`: metadata of uploaded files.
//!
//! Uploading and downloading content need multipart and binary transfer, which this
//! crate does not do.

use super::item_path;
use crate::config::Query;
use crate::types::DeleteResponse;
use crate::{Client, RequestOptions, Response, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileObject {
    #[serde(deserialize_with = "crate::response::lenient")]
    pub id: String,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub object: String,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub bytes: u64,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub created_at: i64,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub filename: String,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub purpose: String,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileList {
    #[serde(deserialize_with = "crate::response::lenient")]
    pub object: String,
    #[serde(deserialize_with = "crate::response::lenient_list")]
    pub data: Vec<FileObject>,
}

/// Handle for `files`.
#[derive(Debug, Clone, Copy)]
pub struct Files<'a> {
    client: &'a Client,
}

impl<'a> Files<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Lists files, optionally only those uploaded for `purpose`.
    pub async fn list(&self, purpose: Option<&str>, options: RequestOptions) -> Result<Response<FileList>> {
        let mut query = Query::new();
        if let Some(purpose) = purpose.filter(|p| !p.is_empty()) {
            query.insert("purpose".to_string(), Value::from(purpose));
        }
        self.client.get("files", &query, options).await
    }

    pub async fn retrieve(&self, file_id: &str, options: RequestOptions) -> Result<Response<FileObject>> {
        let path = item_path("files", file_id)?;
        self.client.get(&path, &Query::new(), options).await
    }

    pub async fn delete(&self, file_id: &str, options: RequestOptions) -> Result<Response<DeleteResponse>> {
        let path = item_path("files", file_id)?;
        self.client.delete(&path, options).await
    }
}
