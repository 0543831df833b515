//! JSON-RPC 2.0 envelopes for the MCP wire protocol.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

/// Protocol tag carried by every envelope.
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol revision announced during the handshake.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// A request envelope. Built fresh per call; ids are never reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl McpRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params: Some(params),
        }
    }

    /// The `initialize` handshake request used to validate connectivity.
    pub fn initialize(id: u64) -> Self {
        Self::new(
            id,
            "initialize",
            json!({
                "protocolVersion": MCP_PROTOCOL_VERSION,
                "capabilities": {},
                "clientInfo": {
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION"),
                },
            }),
        )
    }
}

/// Error object carried by a failed response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A response envelope correlated to a request by id.
///
/// Exactly one of `result` / `error` is present in a well-formed reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl McpResponse {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Monotonic request id source.
///
/// Ids are strictly increasing for the lifetime of the owning caller and
/// shared across both transports, so one id never serves two in-flight
/// correlations.
#[derive(Debug)]
pub struct RequestIdSource(AtomicU64);

impl RequestIdSource {
    pub fn new() -> Self {
        Self(AtomicU64::new(1))
    }

    pub fn next_id(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for RequestIdSource {
    fn default() -> Self {
        Self::new()
    }
}
