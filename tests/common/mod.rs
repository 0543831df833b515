//! Scripted raw-HTTP responder used by the transport tests.
//!
//! The transports only need one request/response exchange (or one long-lived
//! stream) per connection, so a hand-rolled reader over `TcpStream` is
//! enough; no server framework involved.

use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

/// A parsed inbound HTTP request: request line plus body.
pub struct Request {
    pub method: String,
    pub path: String,
    pub body: String,
}

/// Read one HTTP request (head and, if Content-Length says so, body).
pub async fn read_request(socket: &mut TcpStream) -> Request {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let head_end = loop {
        let n = socket.read(&mut chunk).await.expect("read request head");
        assert!(n > 0, "connection closed mid-request");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_subsequence(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut parts = head.lines().next().unwrap_or_default().split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);

    let mut body = buf[head_end..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut chunk).await.expect("read request body");
        assert!(n > 0, "connection closed mid-body");
        body.extend_from_slice(&chunk[..n]);
    }

    Request {
        method,
        path,
        body: String::from_utf8_lossy(&body).to_string(),
    }
}

/// A complete one-shot HTTP response with a Content-Length body.
pub fn http_response(status: &str, content_type: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

/// Response head for a long-lived event stream (body runs until close).
pub fn sse_headers() -> &'static str {
    "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nCache-Control: no-cache\r\n\r\n"
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
