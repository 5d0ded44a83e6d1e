//! In-memory transport for unit tests: canned responses per URL, request log.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{FetchError, Response, Transport};

#[derive(Default)]
pub(crate) struct ScriptedTransport {
    routes: HashMap<String, Response>,
    requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn route(mut self, url: &str, status: u32, body: impl Into<Vec<u8>>) -> Self {
        self.routes.insert(
            url.to_string(),
            Response {
                status,
                body: body.into(),
            },
        );
        self
    }

    pub(crate) fn json(self, url: &str, value: serde_json::Value) -> Self {
        self.route(url, 200, value.to_string())
    }

    pub(crate) fn requested_urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(u, _)| u.clone())
            .collect()
    }

    pub(crate) fn headers_for(&self, url: &str) -> Option<Vec<(String, String)>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .find(|(u, _)| u == url)
            .map(|(_, h)| h.clone())
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response, FetchError> {
        self.requests.lock().unwrap().push((
            url.to_string(),
            headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ));
        Ok(self.routes.get(url).cloned().unwrap_or(Response {
            status: 404,
            body: b"not found".to_vec(),
        }))
    }
}

/// Lets a test keep a handle on the transport after handing it to a client.
impl Transport for std::sync::Arc<ScriptedTransport> {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response, FetchError> {
        (**self).get(url, headers)
    }
}
