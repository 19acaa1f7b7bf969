//! Single-operation arithmetic tools.
//!
//! Each tool takes two required numbers, `a` and `b`.

use super::ToolDefinition;
use crate::domains::tools::descriptor::ParameterSpec;
use crate::domains::tools::handlers::Handler;

fn operands(a: &str, b: &str) -> Vec<ParameterSpec> {
    vec![
        ParameterSpec::number("a").required().describe(a),
        ParameterSpec::number("b").required().describe(b),
    ]
}

/// `a + b`
pub struct AddTool;

impl ToolDefinition for AddTool {
    const NAME: &'static str = "add";
    const DESCRIPTION: &'static str = "Add two numbers";
    const HANDLER: Handler = Handler::Add;

    fn parameters() -> Vec<ParameterSpec> {
        operands("First number", "Second number")
    }
}

/// `a - b`
pub struct SubtractTool;

impl ToolDefinition for SubtractTool {
    const NAME: &'static str = "subtract";
    const DESCRIPTION: &'static str = "Subtract the second number from the first";
    const HANDLER: Handler = Handler::Subtract;

    fn parameters() -> Vec<ParameterSpec> {
        operands("Number to subtract from", "Number to subtract")
    }
}

/// `a * b`
pub struct MultiplyTool;

impl ToolDefinition for MultiplyTool {
    const NAME: &'static str = "multiply";
    const DESCRIPTION: &'static str = "Multiply two numbers";
    const HANDLER: Handler = Handler::Multiply;

    fn parameters() -> Vec<ParameterSpec> {
        operands("First factor", "Second factor")
    }
}

/// `a / b`
pub struct DivideTool;

impl ToolDefinition for DivideTool {
    const NAME: &'static str = "divide";
    const DESCRIPTION: &'static str = "Divide the first number by the second";
    const HANDLER: Handler = Handler::Divide;

    fn parameters() -> Vec<ParameterSpec> {
        operands("Dividend", "Divisor (must not be zero)")
    }
}

/// `(a / b) * 100`
pub struct PercentageTool;

impl ToolDefinition for PercentageTool {
    const NAME: &'static str = "percentage";
    const DESCRIPTION: &'static str = "Calculate what percentage the first number is of the second";
    const HANDLER: Handler = Handler::Percentage;

    fn parameters() -> Vec<ParameterSpec> {
        operands("The part", "The total (must not be zero)")
    }
}
