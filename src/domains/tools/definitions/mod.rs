//! Tool definitions module.
//!
//! Each tool declares its name, description, parameters and the handler
//! that executes it.
//!
//! ## Adding a New Tool
//!
//! 1. Implement [`ToolDefinition`] for a unit struct
//! 2. Add a [`Handler`] variant if the tool needs new logic
//! 3. Register it in `ToolRegistry::with_builtin_tools()`

pub mod arithmetic;
pub mod calculate;

pub use arithmetic::{AddTool, DivideTool, MultiplyTool, PercentageTool, SubtractTool};
pub use calculate::CalculateTool;

use super::descriptor::{ParameterSpec, ToolDescriptor};
use super::handlers::Handler;

/// Trait for tool definitions.
pub trait ToolDefinition {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    /// The handler that executes this tool.
    const HANDLER: Handler;

    /// Declared parameters, in order.
    fn parameters() -> Vec<ParameterSpec>;

    /// Build the descriptor for registration.
    fn descriptor() -> ToolDescriptor {
        Self::parameters()
            .into_iter()
            .fold(ToolDescriptor::new(Self::NAME, Self::DESCRIPTION), |d, p| {
                d.with_parameter(p)
            })
    }
}
