//! Bounded retry with exponential backoff and jitter.
//!
//! Network fetches against news sites fail transiently all the time, so every
//! HTTP call in this crate runs through a [`RetryPolicy`]. The policy is
//! generic over any async fallible operation; it knows nothing about HTTP.
//!
//! # Backoff strategy
//!
//! The delay before attempt `n + 1` (zero-indexed attempts) is:
//! ```text
//! delay = min(base_delay * 2^n + random_jitter(0..1s), max_delay)
//! ```
//! Defaults: 10 attempts, 330ms base delay, 15s cap. The final attempt's
//! failure is returned to the caller unchanged.

use rand::{Rng, rng};
use std::cmp;
use std::fmt;
use std::future::Future;
use std::time::Duration as StdDuration;
use tokio::time::sleep;
use tracing::warn;

/// Maximum fetch attempts before giving up.
pub const MAX_RETRIES: usize = 10;
/// Initial backoff delay.
pub const BASE_DELAY: StdDuration = StdDuration::from_millis(330);
/// Cap on any single backoff delay.
pub const MAX_DELAY: StdDuration = StdDuration::from_secs(15);

/// Retry policy applying exponential backoff with jitter to an async operation.
///
/// # Example
///
/// ```ignore
/// let retry = RetryPolicy::default();
/// let response = retry.run(|| client.get(url).send()).await?;
/// ```
#[derive(Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts before the last error is returned.
    max_attempts: usize,
    /// Initial delay between attempts (doubles with each failure).
    base_delay: StdDuration,
    /// Cap applied to the computed delay.
    max_delay: StdDuration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(MAX_RETRIES, BASE_DELAY, MAX_DELAY)
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl RetryPolicy {
    /// Create a policy with explicit attempt and delay settings.
    ///
    /// `max_attempts` is clamped to at least 1.
    pub fn new(max_attempts: usize, base_delay: StdDuration, max_delay: StdDuration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }

    /// Run `op` until it succeeds or the attempt budget is exhausted.
    ///
    /// On every failure with attempts remaining, sleeps for the backoff delay
    /// and tries again. The error from the final attempt is returned as-is.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let mut attempt = 0usize;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if attempt + 1 >= self.max_attempts {
                        warn!(
                            attempt = attempt + 1,
                            max = self.max_attempts,
                            error = %e,
                            "operation exhausted retries"
                        );
                        return Err(e);
                    }

                    let delay = self.backoff_delay(attempt);
                    warn!(
                        attempt = attempt + 1,
                        max = self.max_attempts,
                        ?delay,
                        error = %e,
                        "attempt failed; backing off"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Backoff delay for a zero-indexed failed attempt.
    fn backoff_delay(&self, attempt: usize) -> StdDuration {
        let shift = u32::try_from(attempt).unwrap_or(u32::MAX).min(30);
        let exp = self.base_delay.saturating_mul(1u32 << shift);
        let jitter = StdDuration::from_millis(rng().random_range(0..=1000));
        cmp::min(exp.saturating_add(jitter), self.max_delay)
    }
}
