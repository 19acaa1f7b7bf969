//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are named arithmetic operations that MCP clients can call.
//!
//! ## Architecture
//!
//! - `descriptor.rs` - Tool and parameter metadata, JSON Schema export
//! - `arguments.rs` - Argument bags and the declared-schema validator
//! - `handlers.rs` - The closed set of operation handlers
//! - `definitions/` - Built-in tool definitions
//! - `registry.rs` - Central tool registry (registration and lookup)
//! - `dispatcher.rs` - Lookup, validation and execution of a single call
//! - `error.rs` - Tool-specific error types

pub mod arguments;
pub mod definitions;
pub mod descriptor;
mod dispatcher;
mod error;
pub mod handlers;
mod registry;

pub use arguments::{ArgValue, ArgumentBag, ValidatedArgs, validate};
pub use descriptor::{ParamKind, ParameterSpec, ToolDescriptor};
pub use dispatcher::{DispatchState, Dispatcher, ResponseEnvelope};
pub use error::{DomainError, ToolError, ValidationError};
pub use handlers::{Handler, Operation};
pub use registry::{ToolEntry, ToolRegistry};
