//! Tool Registry - central registration and lookup for all tools.
//!
//! This module provides:
//! - Registration of (descriptor, handler) pairs, rejecting duplicates
//! - Lookup by tool name
//! - Tool metadata for listing
//!
//! The registry is filled once at startup and shared read-only afterwards.

use std::collections::HashMap;

use rmcp::model::Tool;
use tracing::{info, warn};

use super::definitions::{
    AddTool, CalculateTool, DivideTool, MultiplyTool, PercentageTool, SubtractTool,
    ToolDefinition,
};
use super::descriptor::ToolDescriptor;
use super::error::ToolError;
use super::handlers::Handler;

/// A registered tool.
#[derive(Debug, Clone)]
pub struct ToolEntry {
    pub descriptor: ToolDescriptor,
    pub handler: Handler,
}

/// Tool registry - manages all available tools.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    entries: Vec<ToolEntry>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in tool.
    pub fn with_builtin_tools() -> Result<Self, ToolError> {
        let mut registry = Self::new();
        registry.register_definition::<AddTool>()?;
        registry.register_definition::<SubtractTool>()?;
        registry.register_definition::<MultiplyTool>()?;
        registry.register_definition::<DivideTool>()?;
        registry.register_definition::<PercentageTool>()?;
        registry.register_definition::<CalculateTool>()?;
        info!("Registered {} tools", registry.len());
        Ok(registry)
    }

    /// Register a tool. The first registration of a name wins.
    pub fn register(
        &mut self,
        descriptor: ToolDescriptor,
        handler: Handler,
    ) -> Result<(), ToolError> {
        if self.index.contains_key(&descriptor.name) {
            warn!("Tool '{}' is already registered", descriptor.name);
            return Err(ToolError::duplicate_tool(descriptor.name));
        }

        if let Some(param) = descriptor.duplicate_parameter() {
            return Err(ToolError::DuplicateParameter {
                tool: descriptor.name.clone(),
                param: param.to_string(),
            });
        }

        info!("Registering tool: {}", descriptor.name);
        self.index.insert(descriptor.name.clone(), self.entries.len());
        self.entries.push(ToolEntry {
            descriptor,
            handler,
        });
        Ok(())
    }

    /// Register a tool from its static definition.
    pub fn register_definition<T: ToolDefinition>(&mut self) -> Result<(), ToolError> {
        self.register(T::descriptor(), T::HANDLER)
    }

    /// Look up a tool by name.
    pub fn lookup(&self, name: &str) -> Result<&ToolEntry, ToolError> {
        self.index
            .get(name)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| ToolError::unknown_tool(name))
    }

    /// All descriptors, in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.entries.iter().map(|e| &e.descriptor)
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&str> {
        self.descriptors().map(|d| d.name.as_str()).collect()
    }

    /// Get all tools as Tool models (metadata).
    pub fn tools(&self) -> Vec<Tool> {
        self.descriptors().map(ToolDescriptor::to_tool).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
