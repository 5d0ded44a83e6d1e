//! Minimal HTTP/1.1 server answering GETs from a fixed route table.
//!
//! Routes are keyed by request target (path plus query string). Unknown
//! targets get 404. Every request is recorded with its headers so tests can
//! assert on authentication and anti-CSRF headers.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Canned {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub target: String,
    /// Header names lowercased.
    pub headers: HashMap<String, String>,
}

#[derive(Default)]
pub struct Routes {
    table: HashMap<String, Canned>,
}

impl Routes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(mut self, target: &str, value: serde_json::Value) -> Self {
        self.table.insert(
            target.to_string(),
            Canned {
                status: 200,
                content_type: "application/json",
                body: value.to_string().into_bytes(),
            },
        );
        self
    }

    pub fn bytes(mut self, target: &str, body: &[u8]) -> Self {
        self.table.insert(
            target.to_string(),
            Canned {
                status: 200,
                content_type: "application/octet-stream",
                body: body.to_vec(),
            },
        );
        self
    }

    pub fn status(mut self, target: &str, status: u16) -> Self {
        self.table.insert(
            target.to_string(),
            Canned {
                status,
                content_type: "text/plain",
                body: b"error".to_vec(),
            },
        );
        self
    }
}

pub struct ApiServer {
    /// e.g. `http://127.0.0.1:12345`
    pub origin: String,
    log: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl ApiServer {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn request_to(&self, target: &str) -> Option<RecordedRequest> {
        self.requests().into_iter().find(|r| r.target == target)
    }
}

/// Starts the server on an ephemeral port. It runs until the process exits.
pub fn start(routes: Routes) -> ApiServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let table = Arc::new(routes.table);
    let log = Arc::new(Mutex::new(Vec::new()));
    let server_log = Arc::clone(&log);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let table = Arc::clone(&table);
            let log = Arc::clone(&server_log);
            thread::spawn(move || handle(stream, &table, &log));
        }
    });
    ApiServer {
        origin: format!("http://127.0.0.1:{}", port),
        log,
    }
}

fn handle(
    mut stream: TcpStream,
    table: &HashMap<String, Canned>,
    log: &Mutex<Vec<RecordedRequest>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let Ok(request) = std::str::from_utf8(&buf) else {
        return;
    };
    let Some((method, recorded)) = parse_request(request) else {
        return;
    };
    log.lock().unwrap().push(recorded.clone());

    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    }
    let canned = table.get(&recorded.target).cloned().unwrap_or(Canned {
        status: 404,
        content_type: "text/plain",
        body: b"not found".to_vec(),
    });
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        canned.status,
        reason(canned.status),
        canned.content_type,
        canned.body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&canned.body);
}

fn parse_request(request: &str) -> Option<(String, RecordedRequest)> {
    let mut lines = request.split("\r\n");
    let mut first = lines.next()?.split_whitespace();
    let method = first.next()?.to_string();
    let target = first.next()?.to_string();
    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }
    Some((method, RecordedRequest { target, headers }))
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}
