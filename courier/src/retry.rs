//! Retry decisions and exponential backoff.

use std::time::Duration;

use rand::Rng;

use crate::error::RequestError;

/// Decides whether a failed attempt is retried and how long to back off.
///
/// The decision is driven by error class (see
/// [`RequestError::is_retryable`]) and by the retry budget. The backoff
/// delay for the n-th retry is
/// `base_delay × multiplier^(n−1) × (1 + jitter)` with jitter drawn
/// uniformly from `[0, 0.1)`, so callers sharing an outage do not all
/// come back at the same instant.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    base_delay: Duration,
    multiplier: f64,
}

impl RetryPolicy {
    /// Creates a policy with the given base delay and per-retry multiplier.
    pub fn new(base_delay: Duration, multiplier: f64) -> Self {
        Self {
            base_delay,
            multiplier,
        }
    }

    /// Whether the attempt that just failed should be retried.
    ///
    /// `attempt` is the 1-based number of the attempt that failed; the
    /// budget allows up to `max_retries` retries after the initial
    /// attempt, for `max_retries + 1` attempts in total.
    pub fn should_retry(&self, error: &RequestError, attempt: u32, max_retries: u32) -> bool {
        attempt <= max_retries && error.is_retryable()
    }

    /// Backoff delay before the n-th retry (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1);
        let scale = self.multiplier.powi(exponent as i32);
        let jitter = 1.0 + rand::thread_rng().gen_range(0.0..0.1);
        self.base_delay.mul_f64(scale * jitter)
    }
}
