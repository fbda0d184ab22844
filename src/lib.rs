//! # openai-core - request/response core of an OpenAI-compatible client
//!
//! A retry-aware, strongly typed client for OpenAI-style HTTP APIs, built on top of
//! `reqwest`. It composes authenticated JSON requests, retries transient failures within
//! a budget, classifies errors by HTTP status and decodes responses leniently while
//! keeping the raw payload and the request id.
//!
//! ## Quick Start
//!
//! ```no_run
//! use openai_core::{Client, RequestOptions};
//! use openai_core::resources::chat::{ChatCompletionCreateParams, ChatMessage};
//! use openai_core::Omit;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), openai_core::Error> {
//!     // Reads OPENAI_API_KEY, OPENAI_ORG_ID, OPENAI_PROJECT_ID and OPENAI_BASE_URL
//!     let client = Client::from_env()?;
//!
//!     let params = ChatCompletionCreateParams {
//!         temperature: Omit::Given(0.0),
//!         ..ChatCompletionCreateParams::new(
//!             "gpt-4o-mini",
//!             vec![
//!                 ChatMessage::system("Answer in one word."),
//!                 ChatMessage::user("Capital of France?"),
//!             ],
//!         )
//!     };
//!
//!     let completion = client.chat().completions().create(&params, RequestOptions::new()).await?;
//!     println!("{}", completion.content());
//!     println!("request {} took {:?}", completion.request_id, completion.latency);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Typed resources** - chat, completions, embeddings, models, files, images, moderations
//! - **Generic calls** - `get`/`post`/`delete` for any endpoint with any `Deserialize` type
//! - **Omittable parameters** - [`Omit`] keeps unset fields out of the request body
//! - **Retry budget** - `max_retries` per client or per call, exponential backoff with jitter
//! - **Rate-limit aware** - 429 responses honor `retry-after` headers
//! - **Classified errors** - one [`Error`] variant per status class, with message and payload
//! - **Lenient decoding** - missing or `null` fields take defaults; the raw JSON is kept
//! - **Structured logging** - every attempt, response and retry goes through `tracing`
//!
//! ## Error Handling
//!
//! ```no_run
//! use openai_core::{Client, Error, ErrorKind};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::from_env()?;
//! match client.models().retrieve("gpt-4o", Default::default()).await {
//!     Ok(model) => println!("owned by {}", model.owned_by),
//!     Err(e) if e.kind() == ErrorKind::NotFound => eprintln!("no such model"),
//!     Err(e) => eprintln!("{} (request {:?})", e, e.request_id()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Retries
//!
//! ```no_run
//! use openai_core::{Client, RequestOptions, RetryStrategy};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), openai_core::Error> {
//! let client = Client::builder()
//!     .api_key("sk-...")
//!     .max_retries(4)
//!     .retry_strategy(RetryStrategy::ExponentialBackoff {
//!         initial_delay: Duration::from_millis(200),
//!         max_delay: Duration::from_secs(20),
//!         jitter: true,
//!     })
//!     .build()?;
//!
//! // No retries for this one call
//! let models = client.models().list(RequestOptions::new().with_max_retries(0)).await?;
//! # Ok(())
//! # }
//! ```

pub mod classify;
mod client;
pub mod config;
mod error;
mod omit;
mod options;
pub mod rate_limit;
mod request;
pub mod resources;
mod response;
pub mod retry;
pub mod types;

pub use client::{Client, ClientBuilder};
pub use config::{Config, CredentialProvider, ProxyConfig, Query, Timeout};
pub use error::{Error, ErrorKind, Result, StatusError};
pub use omit::Omit;
pub use options::RequestOptions;
pub use response::Response;
pub use retry::{RetryPredicate, RetryStrategy};

/// Response header carrying the server-assigned request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";
