//! Bounded retry with exponential backoff, on top of `tryhard`.

use std::future::{self, Future};
use std::time::Duration;

use tracing::{error, warn};

use super::FetchError;

/// Retry policy for remote requests.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub backoff_multiplier: f64,
    /// Upper bound on a single wait, including server-requested ones.
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 500,
            backoff_multiplier: 2.0,
            max_delay_ms: 10_000,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (zero-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.max(1.0).powi(attempt as i32);
        let millis = (self.initial_delay_ms as f64 * factor).min(self.max_delay_ms as f64);
        Duration::from_millis(millis as u64)
    }

    /// Wait before retry number `attempt` after `error`. A rate limit's
    /// `Retry-After` is honoured up to `max_delay_ms`.
    pub fn wait_after(&self, attempt: u32, error: &FetchError) -> Duration {
        let backoff = self.delay_for(attempt);
        match error {
            FetchError::RateLimited {
                retry_after_secs, ..
            } => backoff
                .max(Duration::from_secs(*retry_after_secs))
                .min(Duration::from_millis(self.max_delay_ms)),
            _ => backoff,
        }
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// the policy's retries are used up.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    what: &str,
    operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let max_delay = Duration::from_millis(policy.max_delay_ms);

    tryhard::retry_fn(operation)
        .retries(policy.max_retries)
        .custom_backoff(|attempt: u32, e: &FetchError| {
            if !e.is_retryable() {
                return tryhard::RetryPolicy::Break;
            }
            tryhard::RetryPolicy::Delay(policy.wait_after(attempt.saturating_sub(1), e))
        })
        .max_delay(max_delay)
        .on_retry(|attempt: u32, next_delay: Option<Duration>, e: &FetchError| {
            warn!(
                "{} failed (attempt {}/{}): {}, retrying in {}ms",
                what,
                attempt,
                policy.max_retries + 1,
                e,
                next_delay.unwrap_or_default().as_millis()
            );
            future::ready(())
        })
        .await
        .inspect_err(|e| error!("{} failed: {}", what, e))
}
