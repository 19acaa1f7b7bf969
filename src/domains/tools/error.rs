//! Tool-specific error types.

use thiserror::Error;

use super::descriptor::ParamKind;

/// Errors that can occur during tool registration and dispatch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToolError {
    /// The requested tool is not registered.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// A tool with the same name is already registered.
    #[error("tool already registered: {0}")]
    DuplicateTool(String),

    /// A descriptor declares the same parameter name twice.
    #[error("tool '{tool}' declares parameter '{param}' more than once")]
    DuplicateParameter { tool: String, param: String },

    /// The supplied arguments do not match the tool's parameters.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The handler rejected the operands.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ToolError {
    /// Create a new "unknown tool" error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    /// Create a new "duplicate tool" error.
    pub fn duplicate_tool(name: impl Into<String>) -> Self {
        Self::DuplicateTool(name.into())
    }

    /// Whether this error can only happen while building the registry.
    pub fn is_registration_error(&self) -> bool {
        matches!(self, Self::DuplicateTool(_) | Self::DuplicateParameter { .. })
    }
}

/// Argument validation failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required parameter was not supplied.
    #[error("missing required argument '{param}'")]
    MissingArgument { param: String },

    /// A parameter was supplied with the wrong type.
    #[error("argument '{param}' must be a {expected}")]
    TypeMismatch { param: String, expected: ParamKind },

    /// A string parameter is outside its allowed set.
    #[error(
        "argument '{param}' has invalid value '{value}' (allowed: {})",
        .allowed.join(", ")
    )]
    InvalidEnumValue {
        param: String,
        value: String,
        allowed: Vec<String>,
    },

    /// The `arguments` value of a call is not a JSON object.
    #[error("tool arguments must be an object, got {found}")]
    NotAnObject { found: &'static str },
}

impl ValidationError {
    /// The name of the offending parameter, if the failure is tied to one.
    pub fn param(&self) -> Option<&str> {
        match self {
            Self::MissingArgument { param }
            | Self::TypeMismatch { param, .. }
            | Self::InvalidEnumValue { param, .. } => Some(param),
            Self::NotAnObject { .. } => None,
        }
    }
}

/// Errors raised by the arithmetic handlers themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("cannot divide by zero")]
    DivisionByZero,
}
