//! Example of a chat completion with a few optional parameters.
//!
//! Requires `OPENAI_API_KEY`; `OPENAI_BASE_URL` may point at any compatible server.
//!
//! Run with: `cargo run --example chat_completion`

use openai_core::resources::chat::{ChatCompletionCreateParams, ChatMessage};
use openai_core::{Client, Omit, RequestOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("openai_core=debug")
        .init();

    let client = Client::from_env()?;

    let params = ChatCompletionCreateParams {
        temperature: Omit::Given(0.7),
        max_completion_tokens: Omit::Given(128),
        ..ChatCompletionCreateParams::new(
            "gpt-4o-mini",
            vec![
                ChatMessage::system("You are a helpful assistant."),
                ChatMessage::user("Write a haiku about the borrow checker."),
            ],
        )
    };

    let completion = client
        .chat()
        .completions()
        .create(&params, RequestOptions::new())
        .await?;

    println!("{}", completion.content());
    println!();
    println!("Model:       {}", completion.model);
    println!(
        "Tokens:      {} prompt + {} completion = {}",
        completion.usage.prompt_tokens,
        completion.usage.completion_tokens,
        completion.usage.total_tokens
    );
    println!("Request id:  {}", completion.request_id);
    println!("Latency:     {:?} ({} attempt(s))", completion.latency, completion.attempts);

    Ok(())
}
