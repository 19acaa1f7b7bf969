//! Resource-specific error types.

use thiserror::Error;

/// Errors that can occur during resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The requested resource was not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Resources are not advertised by this server.
    #[error("Resources are disabled")]
    Disabled,

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResourceError {
    /// Create a new "not found" error.
    pub fn not_found(uri: impl Into<String>) -> Self {
        Self::NotFound(uri.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
