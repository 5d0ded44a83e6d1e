use std::time::Duration;

use crate::config::RetryConfig;

/// Minimum wait after a 429/503 answer.
pub const THROTTLE_FLOOR: Duration = Duration::from_secs(2);

const MAX_DOUBLINGS: u32 = 8;

/// High-level classification of an error for retry purposes.
///
/// Callers map HTTP status codes and curl errors into these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect/read).
    Timeout,
    /// Server asked us to slow down (e.g. 429, 503).
    Throttled,
    /// Network-level failure (connection reset, DNS, etc.).
    Connection,
    /// HTTP status that is retryable but not strictly throttling (5xx).
    Http5xx(u16),
    /// Any other error (typically not retried).
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Simple exponential backoff policy with caps.
///
/// Built from the optional `[retry]` section of the config file; the
/// defaults suit a rate-sensitive API that occasionally answers 429.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Base delay for backoff.
    pub base_delay: Duration,
    /// Upper bound on backoff delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(cfg: &RetryConfig) -> Self {
        Self {
            max_attempts: cfg.max_attempts.max(1),
            base_delay: Duration::from_secs_f64(cfg.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(cfg.max_delay_secs),
        }
    }
}

impl RetryPolicy {
    /// Decide whether attempt number `attempt` (1-based) should be followed
    /// by another one, and after how long.
    ///
    /// Delays double per attempt from `base_delay`. Throttling answers wait
    /// at least [`THROTTLE_FLOOR`]. Every delay is capped at `max_delay`.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }
        let backoff = self.backoff(attempt);
        let delay = match kind {
            ErrorKind::Other => return RetryDecision::NoRetry,
            ErrorKind::Throttled => backoff.max(THROTTLE_FLOOR),
            ErrorKind::Timeout | ErrorKind::Connection | ErrorKind::Http5xx(_) => backoff,
        };
        RetryDecision::RetryAfter(delay.min(self.max_delay))
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let doublings = attempt.saturating_sub(1).min(MAX_DOUBLINGS);
        self.base_delay.saturating_mul(1u32 << doublings)
    }
}
