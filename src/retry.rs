//! Retry policy: which failures are re-attempted and how long to wait in between.
//!
//! The number of retries is a budget set on the client (`max_retries`, default 2) and
//! optionally overridden per call. [`RetryStrategy`] only shapes the delay curve and
//! [`RetryPredicate`] only decides eligibility, so no strategy can retry past the budget.

use crate::rate_limit::RateLimitConfig;
use crate::Error;
use rand::Rng;
use std::time::Duration;

/// Defines how long to wait before each retry.
///
/// # Examples
///
/// ```
/// use openai_core::RetryStrategy;
/// use std::time::Duration;
///
/// // 100ms, 200ms, 400ms ... capped at 5s
/// let exponential = RetryStrategy::ExponentialBackoff {
///     initial_delay: Duration::from_millis(100),
///     max_delay: Duration::from_secs(5),
///     jitter: false,
/// };
/// assert_eq!(exponential.delay_for_attempt(3), Duration::from_millis(400));
///
/// let linear = RetryStrategy::Linear { delay: Duration::from_secs(1) };
/// assert_eq!(linear.delay_for_attempt(7), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone)]
pub enum RetryStrategy {
    /// Retry right away.
    Immediate,

    /// Retry with exponentially increasing delays.
    ///
    /// Retry `n` waits `initial_delay * 2^(n-1)`, capped at `max_delay`. Jitter scales the
    /// uncapped delay by a random factor in `[0.5, 1.0]` before the cap is applied, which
    /// keeps the sequence non-decreasing.
    ExponentialBackoff {
        /// The delay before the first retry.
        initial_delay: Duration,
        /// The maximum delay between retries.
        max_delay: Duration,
        /// Whether to add random jitter to delays.
        jitter: bool,
    },

    /// Retry with a fixed delay.
    Linear {
        /// The delay between attempts.
        delay: Duration,
    },

    /// Custom delay curve, given the retry number (1-indexed).
    Custom {
        /// Returns the delay before the given retry.
        delay_fn: fn(retry: usize) -> Duration,
    },
}

impl Default for RetryStrategy {
    fn default() -> Self {
        RetryStrategy::ExponentialBackoff {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            jitter: true,
        }
    }
}

impl RetryStrategy {
    /// Returns the delay before the given retry.
    ///
    /// # Arguments
    ///
    /// * `retry` - The retry number (1-indexed, so 1 = first retry)
    pub fn delay_for_attempt(&self, retry: usize) -> Duration {
        match self {
            RetryStrategy::Immediate => Duration::ZERO,
            RetryStrategy::ExponentialBackoff {
                initial_delay,
                max_delay,
                jitter,
            } => {
                let multiplier = 2u32.saturating_pow(retry.saturating_sub(1) as u32);
                let base_delay = initial_delay.saturating_mul(multiplier);

                let delay = if *jitter {
                    let jitter_factor = rand::thread_rng().gen_range(0.5..=1.0);
                    base_delay.mul_f64(jitter_factor)
                } else {
                    base_delay
                };
                delay.min(*max_delay)
            }
            RetryStrategy::Linear { delay } => *delay,
            RetryStrategy::Custom { delay_fn } => delay_fn(retry),
        }
    }
}

/// Decides whether a failed attempt is eligible for a retry.
///
/// # Examples
///
/// ```
/// use openai_core::{Error, RetryPredicate};
///
/// struct OnlyRateLimits;
///
/// impl RetryPredicate for OnlyRateLimits {
///     fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
///         matches!(error, Error::RateLimit(_))
///     }
/// }
/// ```
pub trait RetryPredicate: Send + Sync {
    /// Returns `true` if the attempt that failed with `error` should be retried.
    ///
    /// `attempt` is the 1-indexed number of the attempt that just failed.
    fn should_retry(&self, error: &Error, attempt: usize) -> bool;
}

/// Retries connection errors, timeouts, 429 and 5xx responses.
///
/// Delegates to [`Error::is_retryable`]. This is the default predicate.
#[derive(Debug, Clone, Copy)]
pub struct RetryOnRetryable;

impl RetryPredicate for RetryOnRetryable {
    fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
        error.is_retryable()
    }
}

/// The retry decision a client applies after every failed attempt.
pub(crate) struct RetryPolicy {
    pub(crate) strategy: RetryStrategy,
    pub(crate) predicate: Box<dyn RetryPredicate>,
    pub(crate) rate_limit: RateLimitConfig,
}

impl RetryPolicy {
    /// Returns the delay before the next attempt, or `None` if `error` is terminal.
    ///
    /// `attempt` is the 1-indexed attempt that failed; `max_retries` is the call's budget.
    /// The result is never shorter than `previous`, the delay slept before this attempt.
    pub(crate) fn next_delay(
        &self,
        error: &Error,
        attempt: usize,
        max_retries: u32,
        previous: Duration,
    ) -> Option<Duration> {
        if attempt > max_retries as usize {
            return None;
        }
        if !self.predicate.should_retry(error, attempt) {
            return None;
        }

        let delay = match error.rate_limit_delay(self.rate_limit.max_wait) {
            Some(delay) if self.rate_limit.enabled => delay,
            _ => self.strategy.delay_for_attempt(attempt),
        };
        Some(delay.max(previous))
    }
}
