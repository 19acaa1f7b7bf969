//! Calculate tool definition.
//!
//! A single tool covering the four basic operations, selected by the
//! `operation` argument.

use super::ToolDefinition;
use crate::domains::tools::descriptor::ParameterSpec;
use crate::domains::tools::handlers::{Handler, Operation};

/// Calculate tool - basic arithmetic on `x` and `y`.
pub struct CalculateTool;

impl ToolDefinition for CalculateTool {
    const NAME: &'static str = "calculate";
    const DESCRIPTION: &'static str = "Perform basic arithmetic operations";
    const HANDLER: Handler = Handler::Calculate;

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::string("operation")
                .required()
                .describe("The operation to perform (add, subtract, multiply, divide)")
                .one_of(Operation::ALL.iter().map(Operation::as_str)),
            ParameterSpec::number("x").required().describe("First number"),
            ParameterSpec::number("y").required().describe("Second number"),
        ]
    }
}
