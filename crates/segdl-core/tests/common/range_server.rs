//! Minimal HTTP/1.1 server that supports HEAD and Range GET for integration tests.
//!
//! Serves a single static body. HEAD answers with Content-Length and
//! Accept-Ranges: bytes; GET with Range answers 206 Partial Content. Every
//! request is recorded so tests can assert which ranges were asked for.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RangeServerOptions {
    /// If false, HEAD returns 405 (servers that block HEAD).
    pub head_allowed: bool,
    /// If false, GET ignores Range and always returns 200 with the full body.
    pub support_ranges: bool,
    /// If false, omit `Accept-Ranges: bytes`. Independent of `support_ranges`,
    /// so a server can advertise ranges and then ignore them.
    pub advertise_ranges: bool,
    /// Serve at most this many bytes of each ranged GET, with a matching
    /// Content-Length and Content-Range (a server that clamps ranges).
    pub max_range_bytes: Option<usize>,
    /// Extend each 206 body this many bytes past the requested end.
    pub range_overshoot: usize,
    /// Replaces the HEAD Content-Length value (e.g. a non-numeric one).
    pub head_content_length: Option<String>,
    /// Leave Content-Length out of the HEAD response entirely.
    pub omit_head_length: bool,
    /// Pause between body chunks of `chunk_size` bytes (slow server).
    pub chunk_delay: Option<Duration>,
    pub chunk_size: usize,
}

impl Default for RangeServerOptions {
    fn default() -> Self {
        Self {
            head_allowed: true,
            support_ranges: true,
            advertise_ranges: true,
            max_range_bytes: None,
            range_overshoot: 0,
            head_content_length: None,
            omit_head_length: false,
            chunk_delay: None,
            chunk_size: 64,
        }
    }
}

/// One request as seen by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    /// Parsed `Range: bytes=start-end` (end inclusive; u64::MAX when open).
    pub range: Option<(u64, u64)>,
}

pub struct RangeServer {
    /// Base URL of the served file, e.g. "http://127.0.0.1:12345/file.bin".
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl RangeServer {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn gets(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "GET")
            .collect()
    }

    pub fn clear(&self) {
        self.requests.lock().unwrap().clear();
    }
}

/// Starts a server in a background thread serving `body` with default options.
/// The server runs until the process exits.
pub fn start(body: Vec<u8>) -> RangeServer {
    start_with_options(body, RangeServerOptions::default())
}

/// Like `start` but allows customizing server behavior.
pub fn start_with_options(body: Vec<u8>, opts: RangeServerOptions) -> RangeServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let opts = opts.clone();
            let log = Arc::clone(&log);
            thread::spawn(move || handle(stream, &body, &opts, &log));
        }
    });
    RangeServer {
        url: format!("http://127.0.0.1:{}/file.bin", port),
        requests,
    }
}

fn handle(
    mut stream: TcpStream,
    body: &[u8],
    opts: &RangeServerOptions,
    log: &Mutex<Vec<RecordedRequest>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (method, range) = parse_request(request);
    log.lock().unwrap().push(RecordedRequest {
        method: method.to_ascii_uppercase(),
        range,
    });

    let total = body.len() as u64;
    let accept_ranges = if opts.advertise_ranges {
        "Accept-Ranges: bytes\r\n"
    } else {
        ""
    };

    if method.eq_ignore_ascii_case("HEAD") {
        if !opts.head_allowed {
            let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
            return;
        }
        let length = if opts.omit_head_length {
            String::new()
        } else {
            let value = opts
                .head_content_length
                .clone()
                .unwrap_or_else(|| total.to_string());
            format!("Content-Length: {}\r\n", value)
        };
        let response = format!(
            "HTTP/1.1 200 OK\r\n{}{}Connection: close\r\n\r\n",
            length, accept_ranges
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }

    let (status, slice) = match range.filter(|_| opts.support_ranges) {
        Some((start, end_incl)) => {
            let last = total.saturating_sub(1);
            let end_incl = end_incl.min(last);
            if start >= total || start > end_incl {
                let response = format!(
                    "HTTP/1.1 416 Range Not Satisfiable\r\nContent-Range: bytes */{}\r\nContent-Length: 0\r\n\r\n",
                    total
                );
                let _ = stream.write_all(response.as_bytes());
                return;
            }
            let mut end_incl = end_incl.saturating_add(opts.range_overshoot as u64).min(last);
            if let Some(max) = opts.max_range_bytes {
                end_incl = end_incl.min(start + max.max(1) as u64 - 1);
            }
            let slice = &body[start as usize..=end_incl as usize];
            (
                format!(
                    "206 Partial Content\r\nContent-Range: bytes {}-{}/{}",
                    start, end_incl, total
                ),
                slice,
            )
        }
        None => ("200 OK".to_string(), body),
    };

    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        status,
        slice.len(),
        accept_ranges
    );
    if stream.write_all(head.as_bytes()).is_err() {
        return;
    }
    match opts.chunk_delay {
        None => {
            let _ = stream.write_all(slice);
        }
        Some(delay) => {
            for chunk in slice.chunks(opts.chunk_size.max(1)) {
                if stream.write_all(chunk).is_err() || stream.flush().is_err() {
                    return;
                }
                thread::sleep(delay);
            }
        }
    }
}

/// Returns (method, optional (start, end_inclusive) for Range: bytes=X-Y).
fn parse_request(request: &str) -> (&str, Option<(u64, u64)>) {
    let mut lines = request.lines();
    let method = lines
        .next()
        .and_then(|l| l.split_whitespace().next())
        .unwrap_or("");
    let mut range = None;
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if !name.trim().eq_ignore_ascii_case("range") {
            continue;
        }
        let Some(bytes) = value.trim().strip_prefix("bytes=") else {
            continue;
        };
        if let Some((a, b)) = bytes.split_once('-') {
            let start = a.trim().parse::<u64>().unwrap_or(0);
            let end = b.trim();
            let end_incl = if end.is_empty() {
                u64::MAX
            } else {
                end.parse::<u64>().unwrap_or(0)
            };
            range = Some((start, end_incl));
        }
    }
    (method, range)
}
