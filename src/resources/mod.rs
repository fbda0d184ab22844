//! Typed endpoints built on the client's generic `get`/`post`/`delete` calls.
//!
//! Each handle borrows the [`Client`](crate::Client) it was obtained from, composes a
//! path and a parameter struct, and names the response type. Optional parameters are
//! [`Omit`](crate::Omit) fields that are left out of the JSON body until set.
//!
//! ```no_run
//! use openai_core::{Client, RequestOptions};
//! use openai_core::resources::embeddings::EmbeddingCreateParams;
//!
//! # async fn example() -> Result<(), openai_core::Error> {
//! let client = Client::from_env()?;
//!
//! let params = EmbeddingCreateParams::new("text-embedding-3-small", vec!["first", "second"]);
//! let response = client.embeddings().create(&params, RequestOptions::new()).await?;
//! for vector in response.embeddings() {
//!     println!("{} dimensions", vector.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod chat;
pub mod completions;
pub mod embeddings;
pub mod files;
pub mod images;
pub mod models;
pub mod moderations;

pub use chat::{Chat, ChatCompletions};
pub use completions::Completions;
pub use embeddings::Embeddings;
pub use files::Files;
pub use images::Images;
pub use models::Models;
pub use moderations::Moderations;

use crate::{Error, Result};

/// Joins a collection path and a resource id, rejecting an empty id.
///
/// An empty id would otherwise address the collection itself.
pub(crate) fn item_path(collection: &str, id: &str) -> Result<String> {
    if id.trim().is_empty() {
        return Err(Error::ConfigurationError(format!(
            "Expected a non-empty id for {}",
            collection
        )));
    }
    Ok(format!("{}/{}", collection, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_path() {
        assert_eq!(item_path("models", "gpt-4o").unwrap(), "models/gpt-4o");
        assert!(matches!(
            item_path("files", " "),
            Err(Error::ConfigurationError(_))
        ));
    }
}
