//! `images/generations`: image generation from a prompt.

use crate::{Client, Omit, RequestOptions, Response, Result};
use serde::{Deserialize, Serialize};

/// Parameters of `POST images/generations`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageGenerateParams {
    pub prompt: String,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub model: Omit<String>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub n: Omit<u32>,
    /// `standard` or `hd`.
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub quality: Omit<String>,
    /// `url` or `b64_json`.
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub response_format: Omit<String>,
    /// e.g. `1024x1024`.
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub size: Omit<String>,
    /// `vivid` or `natural`.
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub style: Omit<String>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub user: Omit<String>,
}

impl ImageGenerateParams {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    #[serde(deserialize_with = "crate::response::lenient")]
    pub url: String,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub b64_json: String,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub revised_prompt: String,
}

/// Response of `POST images/generations`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageResponse {
    #[serde(deserialize_with = "crate::response::lenient")]
    pub created: i64,
    #[serde(deserialize_with = "crate::response::lenient_list")]
    pub data: Vec<Image>,
}

impl ImageResponse {
    /// URLs of the generated images, when requested as `url`.
    pub fn urls(&self) -> Vec<&str> {
        self.data
            .iter()
            .map(|image| image.url.as_str())
            .filter(|url| !url.is_empty())
            .collect()
    }

    /// Base64 payloads of the generated images, when requested as `b64_json`.
    pub fn b64_images(&self) -> Vec<&str> {
        self.data
            .iter()
            .map(|image| image.b64_json.as_str())
            .filter(|b64| !b64.is_empty())
            .collect()
    }
}

/// Handle for `images`.
#[derive(Debug, Clone, Copy)]
pub struct Images<'a> {
    client: &'a Client,
}

impl<'a> Images<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn generate(
        &self,
        params: &ImageGenerateParams,
        options: RequestOptions,
    ) -> Result<Response<ImageResponse>> {
        self.client.post("images/generations", params, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_urls_and_b64() {
        let response: ImageResponse = serde_json::from_value(json!({
            "created": 1,
            "data": [
                { "url": "https://img/1.png" },
                { "b64_json": "aGVsbG8=", "url": null }
            ]
        }))
        .unwrap();

        assert_eq!(response.urls(), vec!["https://img/1.png"]);
        assert_eq!(response.b64_images(), vec!["aGVsbG8="]);
    }

    #[test]
    fn test_params() {
        let params = ImageGenerateParams {
            size: Omit::Given("1024x1024".to_string()),
            ..ImageGenerateParams::new("a lighthouse at dusk")
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({ "prompt": "a lighthouse at dusk", "size": "1024x1024" })
        );
    }
}
