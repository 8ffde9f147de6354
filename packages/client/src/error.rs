//! Error types for the CLI client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server URL cannot be used for a WebSocket connection
    #[error("Invalid server URL '{0}'")]
    InvalidUrl(String),

    /// Could not establish the connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An established connection dropped
    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    /// Gave up after repeated connection failures
    #[error("Failed to reconnect after {0} attempts")]
    ReconnectExhausted(u32),
}
