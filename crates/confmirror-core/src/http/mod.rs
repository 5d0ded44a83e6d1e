//! HTTP transport used for every request the exporter makes.
//!
//! The [`Transport`] trait is the seam between the export pipeline and the
//! network. Production code uses [`CurlTransport`]; unit tests script
//! responses in memory.

mod curl_transport;
mod error;
#[cfg(test)]
pub(crate) mod testing;

use std::fmt;

pub use curl_transport::CurlTransport;
pub use error::FetchError;

/// Status and body of a completed GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u32,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP basic credentials (account e-mail + API token).
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Blocking GET. Implementations return every completed response, whatever
/// its status; only failures to complete the exchange are errors.
pub trait Transport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response, FetchError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response, FetchError> {
        (**self).get(url, headers)
    }
}
