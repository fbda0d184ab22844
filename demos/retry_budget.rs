//! Example of retry budgets, backoff curves and rate-limit handling.
//!
//! Run with: `cargo run --example retry_budget`

use openai_core::rate_limit::RateLimitConfig;
use openai_core::{Client, Error, RequestOptions, RetryPredicate, RetryStrategy};
use std::time::Duration;

/// Retries rate limits only; server errors fail fast.
struct OnlyRateLimits;

impl RetryPredicate for OnlyRateLimits {
    fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
        matches!(error, Error::RateLimit(_))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("openai_core=info")
        .init();

    let strategy = RetryStrategy::ExponentialBackoff {
        initial_delay: Duration::from_millis(250),
        max_delay: Duration::from_secs(4),
        jitter: false,
    };
    println!("Backoff curve:");
    for retry in 1..=6 {
        println!("  retry {}: {:?}", retry, strategy.delay_for_attempt(retry));
    }
    println!();

    let client = Client::builder()
        .api_key(std::env::var("OPENAI_API_KEY").unwrap_or_default())
        .max_retries(4)
        .retry_strategy(strategy)
        .retry_predicate(Box::new(OnlyRateLimits))
        .rate_limit_config(RateLimitConfig::builder().max_wait(Duration::from_secs(10)).build())
        .build()?;

    // The client allows 4 retries; this call allows only 1
    let result = client
        .models()
        .list(RequestOptions::new().with_max_retries(1))
        .await;

    match result {
        Ok(models) => println!(
            "Listed {} models in {:?} after {} attempt(s)",
            models.data.data.len(),
            models.latency,
            models.attempts
        ),
        Err(e) => println!("Gave up: {}", e),
    }

    Ok(())
}
