//! Plain HTTP request/response transport.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use super::frames;
use super::McpTransport;
use crate::error::TendrilError;
use crate::protocol::{McpRequest, McpResponse};

/// Stateless POST transport: one request, one reply per call.
///
/// The server may answer with a bare JSON envelope or with a single
/// event-stream frame wrapping one; both are accepted.
#[derive(Debug, Clone)]
pub struct DirectTransport {
    client: reqwest::Client,
    server_url: String,
}

impl DirectTransport {
    pub fn new(client: reqwest::Client, server_url: impl Into<String>) -> Self {
        Self {
            client,
            server_url: server_url.into(),
        }
    }

    /// Decode a reply body in either of its two physical encodings.
    pub(crate) fn decode_reply(body: &str) -> Result<McpResponse, TendrilError> {
        if let Ok(response) = serde_json::from_str::<McpResponse>(body) {
            return Ok(response);
        }
        if let Some(data) = frames::data_payload(body) {
            return serde_json::from_str(&data).map_err(|e| {
                TendrilError::Transport(format!("undecodable event-stream reply: {e}"))
            });
        }
        Err(TendrilError::Transport(
            "reply body is neither a JSON envelope nor an event-stream frame".to_string(),
        ))
    }
}

#[async_trait]
impl McpTransport for DirectTransport {
    async fn send(&self, request: &McpRequest) -> Result<McpResponse, TendrilError> {
        let response = self
            .client
            .post(&self.server_url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json, text/event-stream")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TendrilError::Transport(format!(
                "server returned status {status}"
            )));
        }

        let body = response.text().await?;
        Self::decode_reply(&body)
    }
}
