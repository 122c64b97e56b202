//! Retry policies for HTTP requests.

use std::time::Duration;

/// Retry policy for a single HTTP request.
#[derive(Debug, Clone, Default)]
pub enum RetryPolicy {
    /// No retries — the default for non-idempotent POST endpoints.
    #[default]
    None,
    /// Reconnect-on-failure for idempotent requests: retry transport errors,
    /// timeouts and 502/503/504.
    Idempotent,
    /// Caller-provided retry behavior.
    Custom(RetryConfig),
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retry attempts beyond the initial request.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent attempt.
    pub initial_delay: Duration,
    /// Upper bound on the per-attempt delay.
    pub max_delay: Duration,
    /// HTTP status codes that trigger a retry.
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            retryable_statuses: vec![502, 503, 504],
        }
    }
}

impl RetryConfig {
    /// Delay for a 0-indexed attempt: doubling backoff, capped, with jitter
    /// drawn from the top quarter of the window.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self
            .initial_delay
            .saturating_mul(1u32 << attempt.min(16))
            .min(self.max_delay);
        let jitter_window = base.as_millis() as u64 / 4;
        let jitter = if jitter_window > 0 {
            rand::random::<u64>() % (jitter_window + 1)
        } else {
            0
        };
        base - Duration::from_millis(jitter)
    }

    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }
}
