//! Event-stream frame reassembly and payload scanning.

use serde_json::Value;

/// Incremental reassembly of SSE frames from raw byte chunks.
///
/// Frames are separated by a blank line; a frame's payload is its `data:`
/// lines joined with newlines. Chunk boundaries may fall anywhere, including
/// inside a line.
pub(crate) struct FrameBuffer {
    buf: String,
}

impl FrameBuffer {
    pub(crate) fn new() -> Self {
        Self { buf: String::new() }
    }

    /// Append a chunk and drain the payloads of any completed frames.
    ///
    /// Frames without `data:` lines (comments, bare `event:` lines) produce
    /// no payload and are skipped.
    pub(crate) fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        // CR is stripped up front so CRLF and LF framing look the same,
        // even when a chunk boundary splits a CRLF pair.
        self.buf
            .extend(String::from_utf8_lossy(chunk).chars().filter(|c| *c != '\r'));

        let mut payloads = Vec::new();
        while let Some(pos) = self.buf.find("\n\n") {
            let frame: String = self.buf.drain(..pos + 2).collect();
            if let Some(data) = data_payload(&frame) {
                payloads.push(data);
            }
        }
        payloads
    }
}

/// Join the `data:` lines of one frame, or `None` if it has none.
pub(crate) fn data_payload(frame: &str) -> Option<String> {
    let mut lines = Vec::new();
    for line in frame.lines() {
        if let Some(rest) = line.strip_prefix("data:") {
            lines.push(rest.strip_prefix(' ').unwrap_or(rest));
        }
    }
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Find a session identifier in a frame payload.
///
/// JSON payloads are searched structurally for a `sessionId` string field at
/// any depth; non-JSON bootstrap frames fall back to a textual scan.
pub(crate) fn extract_session_id(payload: &str) -> Option<String> {
    match serde_json::from_str::<Value>(payload) {
        Ok(value) => find_session_field(&value),
        Err(_) => textual_session_id(payload),
    }
}

fn find_session_field(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(id)) = map.get("sessionId") {
                return Some(id.clone());
            }
            map.values().find_map(find_session_field)
        }
        Value::Array(items) => items.iter().find_map(find_session_field),
        _ => None,
    }
}

fn textual_session_id(payload: &str) -> Option<String> {
    let start = payload.find("\"sessionId\"")? + "\"sessionId\"".len();
    let rest = payload[start..].trim_start().strip_prefix(':')?.trim_start();
    let rest = rest.strip_prefix('"')?;
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}
