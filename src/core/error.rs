//! Error types and handling for the MCP server.
//!
//! Tool failures never leave a tool invocation (they are rendered as text),
//! so this type covers what can fail around the tools: startup,
//! configuration and the transports.

use thiserror::Error;

use super::transport::TransportError;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the tools domain.
    #[error("Tool error: {0}")]
    Tool(#[from] crate::domains::tools::ToolError),

    /// Error raised by a transport while serving.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors from network communication.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal server errors that should not occur under normal operation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::ToolError;

    #[test]
    fn test_tool_error_converts() {
        let err: Error = ToolError::unknown_tool("nope").into();
        assert_eq!(err.to_string(), "Tool error: Tool not found: nope");
    }

    #[test]
    fn test_transport_error_converts() {
        let err: Error = TransportError::init("stdin closed").into();
        assert!(err.to_string().starts_with("Transport error:"));
    }

    #[test]
    fn test_config_error() {
        assert_eq!(
            Error::config("bad port").to_string(),
            "Configuration error: bad port"
        );
    }
}
