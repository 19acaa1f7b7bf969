//! Error types and handling for the MCP server.
//!
//! This module defines a unified error type that can represent errors from
//! all domains and external dependencies.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the tools domain.
    #[error("Tool error: {0}")]
    Tool(#[from] crate::domains::tools::ToolError),

    /// Error originating from the resources domain.
    #[error("Resource error: {0}")]
    Resource(#[from] crate::domains::resources::ResourceError),

    /// Error originating from the transport layer.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),

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
    fn test_tool_error_conversion() {
        let err: Error = ToolError::duplicate_tool("add").into();
        assert!(matches!(err, Error::Tool(ToolError::DuplicateTool(_))));
        assert_eq!(err.to_string(), "Tool error: tool already registered: add");
    }
}
