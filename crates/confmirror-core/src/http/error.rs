//! Request-level failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// libcurl could not complete the exchange (DNS, connect, timeout, ...).
    #[error("GET {url} failed")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u32 },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Transport { url, .. } | FetchError::Status { url, .. } => url,
        }
    }
}
