//! Session-oriented streaming transport.
//!
//! Each call opens a fresh event stream, waits for the server to reveal a
//! session identifier, posts the request to the session's side channel, and
//! then watches the stream for the frame whose id matches the request.
//! Stream-level failures retry once over the plain HTTP transport; timeouts
//! and side-channel failures do not.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;
use tokio::time::timeout;

use super::frames::{extract_session_id, FrameBuffer};
use super::{DirectTransport, McpTransport};
use crate::error::TendrilError;
use crate::protocol::{McpRequest, McpResponse};

/// Upper bound on one streaming attempt, session discovery included.
pub const STREAM_TIMEOUT: Duration = Duration::from_secs(45);

/// Association between a discovered stream session and the single request
/// currently in flight over it. Dropped when the attempt settles.
#[derive(Debug, Clone)]
struct SessionBinding {
    session_id: String,
    request_id: u64,
}

/// Progress of one streaming attempt. One request per attempt, one attempt
/// per stream; completion is the attempt returning the matched response.
#[derive(Debug)]
enum AttemptState {
    /// Stream open (or opening); no session discovered yet.
    Connecting,
    /// Session discovered and bound; request not yet on the wire.
    AwaitingSession(SessionBinding),
    /// Request posted to the side channel; watching for the matching frame.
    RequestSent(SessionBinding),
}

/// How an attempt failed, which decides whether the fallback runs.
enum AttemptError {
    /// The stream itself broke (connect failure, bad status, read error,
    /// or EOF before a matching response). Eligible for HTTP fallback.
    Stream(String),
    /// The side-channel dispatch failed. Terminal for this call.
    Dispatch(TendrilError),
}

/// Streaming transport with one-shot fallback to [`DirectTransport`].
pub struct StreamingTransport {
    client: reqwest::Client,
    sse_url: String,
    message_url: String,
    fallback: DirectTransport,
    attempt_timeout: Duration,
}

impl StreamingTransport {
    pub fn new(client: reqwest::Client, sse_url: impl Into<String>, fallback: DirectTransport) -> Self {
        let sse_url = sse_url.into();
        let message_url = message_endpoint(&sse_url);
        Self {
            client,
            sse_url,
            message_url,
            fallback,
            attempt_timeout: STREAM_TIMEOUT,
        }
    }

    /// Override the attempt timeout. Mainly useful in tests.
    pub fn with_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }

    async fn run_attempt(&self, request: &McpRequest) -> Result<McpResponse, AttemptError> {
        let response = self
            .client
            .get(&self.sse_url)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(|e| AttemptError::Stream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Stream(format!(
                "stream endpoint returned status {status}"
            )));
        }

        let mut state = AttemptState::Connecting;
        let mut frames = FrameBuffer::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| AttemptError::Stream(e.to_string()))?;
            for payload in frames.push(&chunk) {
                if let Some(response) = self.handle_frame(&mut state, &payload, request).await? {
                    return Ok(response);
                }
            }
        }

        Err(AttemptError::Stream(
            "stream closed before a matching response arrived".to_string(),
        ))
    }

    /// Advance the attempt state machine by one inbound frame.
    async fn handle_frame(
        &self,
        state: &mut AttemptState,
        payload: &str,
        request: &McpRequest,
    ) -> Result<Option<McpResponse>, AttemptError> {
        match state {
            AttemptState::Connecting => {
                if let Some(session_id) = extract_session_id(payload) {
                    let binding = SessionBinding {
                        session_id,
                        request_id: request.id,
                    };
                    tracing::debug!(session_id = %binding.session_id, id = binding.request_id, "session discovered");
                    *state = AttemptState::AwaitingSession(binding.clone());
                    self.dispatch(&binding, request)
                        .await
                        .map_err(AttemptError::Dispatch)?;
                    *state = AttemptState::RequestSent(binding);
                }
                // Frames without a session id are bootstrap noise.
                Ok(None)
            }
            // Dispatch happens inline above; a failed dispatch ends the
            // attempt, so no frame is ever observed in this state.
            AttemptState::AwaitingSession(_) => Ok(None),
            AttemptState::RequestSent(binding) => {
                match serde_json::from_str::<McpResponse>(payload) {
                    Ok(response) if response.id == binding.request_id => Ok(Some(response)),
                    // Not JSON, or someone else's reply: keep watching.
                    _ => Ok(None),
                }
            }
        }
    }

    /// Post the request to the side channel bound to the session.
    async fn dispatch(
        &self,
        binding: &SessionBinding,
        request: &McpRequest,
    ) -> Result<(), TendrilError> {
        let url = format!("{}?sessionId={}", self.message_url, binding.session_id);
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TendrilError::Transport(format!(
                "message endpoint returned status {status}"
            )));
        }
        tracing::debug!(id = request.id, "request dispatched to side channel");
        Ok(())
    }
}

#[async_trait]
impl McpTransport for StreamingTransport {
    async fn send(&self, request: &McpRequest) -> Result<McpResponse, TendrilError> {
        match timeout(self.attempt_timeout, self.run_attempt(request)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(AttemptError::Dispatch(err))) => Err(err),
            Ok(Err(AttemptError::Stream(reason))) => {
                tracing::warn!(id = request.id, %reason, "stream failed, retrying over plain HTTP");
                self.fallback.send(request).await
            }
            Err(_) => Err(TendrilError::Timeout(self.attempt_timeout)),
        }
    }
}

/// Side-channel endpoint: the stream URL with its trailing `/sse` path
/// segment replaced by `/messages`.
fn message_endpoint(sse_url: &str) -> String {
    match sse_url.strip_suffix("/sse") {
        Some(base) => format!("{base}/messages"),
        None => format!("{}/messages", sse_url.trim_end_matches('/')),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_endpoint_derivation() {
        assert_eq!(
            message_endpoint("http://localhost:3000/sse"),
            "http://localhost:3000/messages"
        );
        assert_eq!(
            message_endpoint("http://example.com/stream/"),
            "http://example.com/stream/messages"
        );
    }

    #[test]
    fn test_default_timeout_is_45s() {
        assert_eq!(STREAM_TIMEOUT, Duration::from_secs(45));
    }
}
