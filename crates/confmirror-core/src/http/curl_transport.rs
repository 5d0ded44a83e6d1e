//! libcurl-backed transport: one easy handle per request, body buffered in memory.

use std::time::Duration;

use curl::easy::{Auth, Easy, List};

use super::{Credentials, FetchError, Response, Transport};

const MAX_REDIRECTIONS: u32 = 10;

#[derive(Debug, Clone)]
pub struct CurlTransport {
    credentials: Credentials,
    connect_timeout: Duration,
    timeout: Duration,
}

impl CurlTransport {
    /// Transport that authenticates every request with HTTP basic auth.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(300),
        }
    }

    pub fn with_timeouts(mut self, connect: Duration, total: Duration) -> Self {
        self.connect_timeout = connect;
        self.timeout = total;
        self
    }
}

impl Transport for CurlTransport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response, FetchError> {
        let wrap = |source: curl::Error| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let mut easy = Easy::new();
        easy.url(url).map_err(wrap)?;
        easy.follow_location(true).map_err(wrap)?;
        easy.max_redirections(MAX_REDIRECTIONS).map_err(wrap)?;
        easy.connect_timeout(self.connect_timeout).map_err(wrap)?;
        easy.timeout(self.timeout).map_err(wrap)?;

        let mut auth = Auth::new();
        auth.basic(true);
        easy.http_auth(&auth).map_err(wrap)?;
        easy.username(&self.credentials.username).map_err(wrap)?;
        easy.password(&self.credentials.secret).map_err(wrap)?;

        if !headers.is_empty() {
            let mut list = List::new();
            for (name, value) in headers {
                list.append(&format!("{}: {}", name.trim(), value.trim()))
                    .map_err(wrap)?;
            }
            easy.http_headers(list).map_err(wrap)?;
        }

        let mut body = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(wrap)?;
            transfer.perform().map_err(wrap)?;
        }

        let status = easy.response_code().map_err(wrap)?;
        tracing::debug!(url, status, bytes = body.len(), "GET completed");
        Ok(Response { status, body })
    }
}
