use std::time::Duration;
use thiserror::Error;

/// Custom error type for Tendril operations.
#[derive(Debug, Error)]
pub enum TendrilError {
    /// Initial handshake with the server failed. Fatal at startup.
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// Configuration value out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The wire transport failed: non-success status or undecodable body.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A streaming attempt exceeded its time bound.
    #[error("Timeout: no response within {0:?}")]
    Timeout(Duration),

    /// The server answered with a JSON-RPC error object.
    #[error("Protocol error {code}: {message}")]
    Protocol { code: i64, message: String },
}

impl From<reqwest::Error> for TendrilError {
    fn from(err: reqwest::Error) -> Self {
        TendrilError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for TendrilError {
    fn from(err: serde_json::Error) -> Self {
        TendrilError::Transport(format!("JSON decode error: {}", err))
    }
}
