//! Example demonstrating error classification.
//!
//! This example shows how to:
//! - Match on the error variants for specific statuses
//! - Read the server message, payload and request id of a failed call
//! - Branch on `ErrorKind` when the details don't matter
//!
//! Run with: `cargo run --example error_handling`

use openai_core::{Client, Error, ErrorKind, RequestOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("openai_core=info")
        .init();

    println!("=== Example 1: Bad credentials ===");
    let client = Client::builder().api_key("sk-definitely-not-valid").build()?;
    match client.models().list(RequestOptions::new()).await {
        Ok(models) => println!("Unexpectedly listed {} models", models.data.data.len()),
        Err(Error::Authentication(details)) => {
            println!("Authentication failed!");
            println!("  Status:     {}", details.status);
            println!("  Message:    {}", details.message);
            println!("  Request id: {:?}", details.request_id());
            println!("  Payload:    {:?}", details.body);
        }
        Err(e) => println!("Other error: {}", e),
    }
    println!();

    println!("=== Example 2: Unknown model ===");
    let client = Client::from_env()?;
    match client
        .models()
        .retrieve("no-such-model", RequestOptions::new())
        .await
    {
        Ok(model) => println!("Found {}", model.id),
        Err(e) => match e.kind() {
            ErrorKind::NotFound => println!("Not found: {}", e.message()),
            ErrorKind::Connection | ErrorKind::Timeout => println!("Network trouble: {}", e),
            _ => println!("Failed: {}", e),
        },
    }
    println!();

    println!("=== Example 3: Nothing listening ===");
    let client = Client::builder()
        .api_key("sk-test")
        .base_url("http://127.0.0.1:9")?
        .max_retries(0)
        .build()?;
    match client.models().list(RequestOptions::new()).await {
        Ok(_) => println!("Unexpected success"),
        Err(e) => {
            println!("Kind:      {:?}", e.kind());
            println!("Retryable: {}", e.is_retryable());
            println!("Message:   {}", e.message());
        }
    }

    Ok(())
}
