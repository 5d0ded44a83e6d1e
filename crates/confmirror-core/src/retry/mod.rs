//! Retry and backoff policy for API requests.
//!
//! Error classification (timeouts, throttling, connection failures) and the
//! exponential backoff decision are kept apart so the API client and asset
//! downloads share one policy.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
