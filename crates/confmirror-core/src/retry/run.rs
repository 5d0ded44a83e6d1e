//! Retry loop: run a request until success or the policy says stop.

use super::classify;
use super::policy::{RetryDecision, RetryPolicy};
use crate::http::FetchError;

/// Runs `f` until it succeeds or the retry policy says to stop.
/// On a retryable failure, sleeps for the backoff duration then tries again.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, FetchError>
where
    F: FnMut() -> Result<T, FetchError>,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = classify::classify(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::RetryAfter(d) => {
                        tracing::debug!(
                            url = e.url(),
                            attempt,
                            delay_ms = d.as_millis() as u64,
                            "retrying request: {}",
                            e
                        );
                        std::thread::sleep(d);
                        attempt += 1;
                    }
                }
            }
        }
    }
}
