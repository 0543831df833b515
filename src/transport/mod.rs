//! Wire transports for completing one logical MCP call.

mod frames;

pub mod direct;
pub mod streaming;

pub use direct::DirectTransport;
pub use streaming::{StreamingTransport, STREAM_TIMEOUT};

use async_trait::async_trait;

use crate::error::TendrilError;
use crate::protocol::{McpRequest, McpResponse};

/// A transport able to complete one request/response exchange.
///
/// An `Ok` response may still carry a JSON-RPC error object; interpreting
/// that is the caller's business, not the transport's.
#[async_trait]
pub trait McpTransport: Send + Sync {
    async fn send(&self, request: &McpRequest) -> Result<McpResponse, TendrilError>;
}
