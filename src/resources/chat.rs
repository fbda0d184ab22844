//! `chat/completions`: conversational generation.

use crate::types::{Stop, Usage};
use crate::{Client, Omit, RequestOptions, Response, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The author of a chat message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    #[default]
    User,
    Assistant,
    Tool,
    Function,
    Developer,
}

impl<'de> Deserialize<'de> for Role {
    /// Unknown, missing or non-string roles read as [`Role::User`].
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let role = Value::deserialize(deserializer)?;
        Ok(match role.as_str().unwrap_or_default() {
            "system" => Role::System,
            "assistant" => Role::Assistant,
            "tool" => Role::Tool,
            "function" => Role::Function,
            "developer" => Role::Developer,
            _ => Role::User,
        })
    }
}

/// Image reference inside a multi-part message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageUrl {
    pub url: String,
    /// `auto`, `low` or `high`.
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub detail: Omit<String>,
}

/// One part of a multi-part message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: url.into(),
                detail: Omit::NotGiven,
            },
        }
    }
}

/// Message content: plain text, a list of parts, or anything else the server sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
    Other(Value),
}

/// A single message of a conversation.
///
/// # Examples
///
/// ```
/// use openai_core::resources::chat::{ChatMessage, Role};
///
/// let message = ChatMessage::system("You are terse.");
/// assert_eq!(message.role, Role::System);
/// assert_eq!(message.text(), Some("You are terse."));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub content: Omit<MessageContent>,
    #[serde(
        skip_serializing_if = "Omit::is_not_given",
        deserialize_with = "crate::response::lenient"
    )]
    pub name: Omit<String>,
    #[serde(
        skip_serializing_if = "Omit::is_not_given",
        deserialize_with = "crate::response::lenient"
    )]
    pub tool_call_id: Omit<String>,
    #[serde(
        skip_serializing_if = "Omit::is_not_given",
        deserialize_with = "crate::response::lenient"
    )]
    pub tool_calls: Omit<Vec<Value>>,
}

impl ChatMessage {
    /// Creates a text message with the given role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Omit::Given(MessageContent::Text(content.into())),
            ..Default::default()
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn developer(content: impl Into<String>) -> Self {
        Self::new(Role::Developer, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Creates a tool result answering the call with `tool_call_id`.
    pub fn tool(content: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        Self {
            tool_call_id: Omit::Given(tool_call_id.into()),
            ..Self::new(Role::Tool, content)
        }
    }

    /// Creates a user message made of several parts, e.g. text and images.
    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: Role::User,
            content: Omit::Given(MessageContent::Parts(parts)),
            ..Default::default()
        }
    }

    /// Returns the content if it is plain text.
    pub fn text(&self) -> Option<&str> {
        match self.content.get()? {
            MessageContent::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Output format constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    Text,
    JsonObject,
    JsonSchema { json_schema: Value },
}

/// Parameters of `POST chat/completions`.
///
/// Streaming is not supported, so there is no `stream` field.
///
/// # Examples
///
/// ```
/// use openai_core::resources::chat::{ChatCompletionCreateParams, ChatMessage};
/// use openai_core::Omit;
///
/// let params = ChatCompletionCreateParams {
///     temperature: Omit::Given(0.2),
///     max_completion_tokens: Omit::Given(64),
///     ..ChatCompletionCreateParams::new("gpt-4o-mini", vec![ChatMessage::user("Hello")])
/// };
/// let body = serde_json::to_value(&params).unwrap();
/// assert_eq!(body["temperature"], 0.2f32);
/// assert!(body.get("top_p").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChatCompletionCreateParams {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub frequency_penalty: Omit<f32>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub logit_bias: Omit<Map<String, Value>>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub logprobs: Omit<bool>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub top_logprobs: Omit<u32>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub max_tokens: Omit<u32>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub max_completion_tokens: Omit<u32>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub n: Omit<u32>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub modalities: Omit<Vec<String>>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub prediction: Omit<Value>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub audio: Omit<Value>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub presence_penalty: Omit<f32>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub response_format: Omit<ResponseFormat>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub seed: Omit<i64>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub service_tier: Omit<String>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub stop: Omit<Stop>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub temperature: Omit<f32>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub top_p: Omit<f32>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub tools: Omit<Vec<Value>>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub tool_choice: Omit<Value>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub parallel_tool_calls: Omit<bool>,
    #[serde(skip_serializing_if = "Omit::is_not_given")]
    pub user: Omit<String>,
}

impl ChatCompletionCreateParams {
    /// Creates parameters with only the required fields set.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            ..Default::default()
        }
    }
}

/// One generated alternative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Choice {
    #[serde(deserialize_with = "crate::response::lenient")]
    pub index: u32,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub message: ChatMessage,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub finish_reason: String,
    pub logprobs: Value,
}

/// Response of `POST chat/completions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatCompletion {
    #[serde(deserialize_with = "crate::response::lenient")]
    pub id: String,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub object: String,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub created: i64,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub model: String,
    #[serde(deserialize_with = "crate::response::lenient_list")]
    pub choices: Vec<Choice>,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub usage: Usage,
    #[serde(deserialize_with = "crate::response::lenient")]
    pub system_fingerprint: String,
}

impl ChatCompletion {
    /// The text of the first choice, or `""`.
    pub fn content(&self) -> &str {
        self.message().and_then(ChatMessage::text).unwrap_or_default()
    }

    /// The message of the first choice.
    pub fn message(&self) -> Option<&ChatMessage> {
        self.choices.first().map(|choice| &choice.message)
    }
}

/// The `chat` resource group.
#[derive(Debug, Clone, Copy)]
pub struct Chat<'a> {
    client: &'a Client,
}

impl<'a> Chat<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn completions(&self) -> ChatCompletions<'a> {
        ChatCompletions {
            client: self.client,
        }
    }
}

/// Handle for `chat/completions`.
#[derive(Debug, Clone, Copy)]
pub struct ChatCompletions<'a> {
    client: &'a Client,
}

impl ChatCompletions<'_> {
    /// Creates a chat completion.
    pub async fn create(
        &self,
        params: &ChatCompletionCreateParams,
        options: RequestOptions,
    ) -> Result<Response<ChatCompletion>> {
        self.client.post("chat/completions", params, options).await
    }

    /// Creates a chat completion from a model and messages only.
    pub async fn create_with_messages(
        &self,
        model: impl Into<String>,
        messages: Vec<ChatMessage>,
        options: RequestOptions,
    ) -> Result<Response<ChatCompletion>> {
        let params = ChatCompletionCreateParams::new(model, messages);
        self.create(&params, options).await
    }
}
