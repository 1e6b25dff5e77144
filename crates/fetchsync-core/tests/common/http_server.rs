//! Minimal HTTP/1.1 server answering HEAD and GET for integration tests.
//!
//! Serves a single body whose bytes and headers can be changed while running,
//! and counts requests per method so tests can assert how many transfers ran.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Resource {
    pub body: Vec<u8>,
    /// Sent verbatim as `Last-Modified` when set.
    pub last_modified: Option<String>,
    /// If false, responses carry no `Content-Length` (body ends at close).
    pub content_length: bool,
    /// Status for both HEAD and GET; non-2xx responses carry no body.
    pub status: u16,
    /// Overrides `status` for GET only.
    pub get_status: Option<u16>,
}

impl Resource {
    pub fn new(body: Vec<u8>) -> Self {
        Self {
            body,
            last_modified: None,
            content_length: true,
            status: 200,
            get_status: None,
        }
    }

    pub fn last_modified(mut self, value: &str) -> Self {
        self.last_modified = Some(value.to_string());
        self
    }

    pub fn without_content_length(mut self) -> Self {
        self.content_length = false;
        self
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// HEAD keeps answering `status`; GET answers `status` given here.
    pub fn get_status(mut self, status: u16) -> Self {
        self.get_status = Some(status);
        self
    }
}

/// Handle to a running server. The server runs until the process exits.
pub struct HttpServer {
    base: String,
    resource: Arc<Mutex<Resource>>,
    heads: Arc<AtomicUsize>,
    gets: Arc<AtomicUsize>,
}

impl HttpServer {
    /// URL for `path` on this server (e.g. `file.bin`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn heads(&self) -> usize {
        self.heads.load(Ordering::SeqCst)
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// Replaces what the server serves from now on.
    pub fn set(&self, resource: Resource) {
        *self.resource.lock().unwrap() = resource;
    }
}

/// Starts a server in a background thread serving `resource`.
pub fn start(resource: Resource) -> HttpServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let server = HttpServer {
        base: format!("http://127.0.0.1:{}/", port),
        resource: Arc::new(Mutex::new(resource)),
        heads: Arc::new(AtomicUsize::new(0)),
        gets: Arc::new(AtomicUsize::new(0)),
    };
    let resource = Arc::clone(&server.resource);
    let heads = Arc::clone(&server.heads);
    let gets = Arc::clone(&server.gets);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let resource = resource.lock().unwrap().clone();
            let heads = Arc::clone(&heads);
            let gets = Arc::clone(&gets);
            thread::spawn(move || handle(stream, &resource, &heads, &gets));
        }
    });
    server
}

fn handle(mut stream: TcpStream, resource: &Resource, heads: &AtomicUsize, gets: &AtomicUsize) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let method = request.split_whitespace().next().unwrap_or("");
    let send_body = if method.eq_ignore_ascii_case("HEAD") {
        heads.fetch_add(1, Ordering::SeqCst);
        false
    } else if method.eq_ignore_ascii_case("GET") {
        gets.fetch_add(1, Ordering::SeqCst);
        true
    } else {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nConnection: close\r\n\r\n");
        return;
    };

    let status = match resource.get_status {
        Some(code) if send_body => code,
        _ => resource.status,
    };
    if !(200..300).contains(&status) {
        let response = format!(
            "HTTP/1.1 {} Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            status
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    let mut response = String::from("HTTP/1.1 200 OK\r\nConnection: close\r\n");
    if resource.content_length {
        response.push_str(&format!("Content-Length: {}\r\n", resource.body.len()));
    }
    if let Some(lm) = &resource.last_modified {
        response.push_str(&format!("Last-Modified: {}\r\n", lm));
    }
    response.push_str("\r\n");
    let _ = stream.write_all(response.as_bytes());
    if send_body {
        let _ = stream.write_all(&resource.body);
    }
}
