//! Transport error types.

use thiserror::Error;

use crate::domains::tools::ValidationError;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors that can occur in transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to bind to address.
    #[error("Failed to bind to {address}: {source}")]
    BindError {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error during transport.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Server initialization error.
    #[error("Server initialization error: {0}")]
    InitError(String),

    /// HTTP-specific error.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Service error from rmcp.
    #[error("Service error: {0}")]
    ServiceError(String),

    /// No open event stream for this session id.
    #[error("Unknown session: {0}")]
    SessionNotFound(String),

    /// The session's event stream went away before the response was pushed.
    #[error("Session closed: {0}")]
    SessionClosed(String),
}

impl TransportError {
    /// Create a bind error.
    pub fn bind(address: impl Into<String>, source: std::io::Error) -> Self {
        Self::BindError {
            address: address.into(),
            source,
        }
    }

    /// Create an initialization error.
    pub fn init(msg: impl Into<String>) -> Self {
        Self::InitError(msg.into())
    }

    /// Create an HTTP error.
    pub fn http(msg: impl Into<String>) -> Self {
        Self::HttpError(msg.into())
    }
}

/// Malformed `tools/call` params.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CallFrameError {
    #[error("Missing params")]
    MissingParams,

    #[error("Missing tool name")]
    MissingToolName,

    #[error(transparent)]
    Arguments(#[from] ValidationError),
}
