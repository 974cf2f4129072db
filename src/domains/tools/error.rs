//! Tool-specific error types.

use thiserror::Error;

use super::pipeline::ParseError;

/// Errors that can occur while a tool builds, sends, decodes or reads an
/// upstream request.
///
/// Every variant is recovered at the containment boundary and rendered as
/// text; none of them reaches the MCP client as a protocol fault.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    UnknownTool(String),

    /// An argument was rejected before any request was made.
    #[error("{0}")]
    InvalidArguments(String),

    /// The upstream service answered with a 4xx or 5xx status.
    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    /// The connection could not be established or was dropped.
    #[error("Network error: {0}")]
    Network(String),

    /// The upstream service did not answer within the request timeout.
    #[error("Request timed out")]
    Timeout,

    /// The response body could not be decoded.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Anything not covered by the other categories.
    #[error("Unexpected error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "unknown tool" error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "network" error.
    pub fn network(cause: impl Into<String>) -> Self {
        Self::Network(cause.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Short category label used in logs.
    pub fn category(&self) -> &'static str {
        match self {
            Self::UnknownTool(_) => "unknown_tool",
            Self::InvalidArguments(_) => "validation",
            Self::Http { .. } => "http",
            Self::Network(_) => "network",
            Self::Timeout => "timeout",
            Self::Parse(_) => "parse",
            Self::Internal(_) => "internal",
        }
    }
}
