//! Tool handlers.
//!
//! Every operation is one variant of the closed [`Handler`] enum. A handler
//! is a pure function of its validated arguments and returns the formatted
//! result text.

use std::str::FromStr;

use super::arguments::ValidatedArgs;
use super::error::{DomainError, ToolError, ValidationError};

/// The binary arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub const ALL: [Operation; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
        }
    }

    /// Apply the operation to two operands.
    pub fn apply(&self, a: f64, b: f64) -> Result<f64, DomainError> {
        match self {
            Self::Add => Ok(a + b),
            Self::Subtract => Ok(a - b),
            Self::Multiply => Ok(a * b),
            Self::Divide => divide(a, b),
        }
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Handler for a registered tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// `a + b`
    Add,
    /// `a - b`
    Subtract,
    /// `a * b`
    Multiply,
    /// `a / b`
    Divide,
    /// `(a / b) * 100`, rendered with a trailing `%`
    Percentage,
    /// One of the four operations selected by the `operation` argument on `x` and `y`
    Calculate,
}

impl Handler {
    /// Execute the handler with validated inputs.
    pub fn execute(&self, args: &ValidatedArgs) -> Result<String, ToolError> {
        match self {
            Self::Add => binary(args, Operation::Add),
            Self::Subtract => binary(args, Operation::Subtract),
            Self::Multiply => binary(args, Operation::Multiply),
            Self::Divide => binary(args, Operation::Divide),
            Self::Percentage => {
                let value = percentage(args.number("a")?, args.number("b")?)?;
                Ok(format!("{}%", format_number(value)))
            }
            Self::Calculate => {
                let raw = args.string("operation")?;
                let op: Operation = raw.parse().map_err(|value| {
                    ValidationError::InvalidEnumValue {
                        param: "operation".to_string(),
                        value,
                        allowed: Operation::ALL.iter().map(|op| op.as_str().to_string()).collect(),
                    }
                })?;
                let value = op.apply(args.number("x")?, args.number("y")?)?;
                Ok(format_number(value))
            }
        }
    }
}

fn binary(args: &ValidatedArgs, op: Operation) -> Result<String, ToolError> {
    let value = op.apply(args.number("a")?, args.number("b")?)?;
    Ok(format_number(value))
}

fn divide(a: f64, b: f64) -> Result<f64, DomainError> {
    if b == 0.0 {
        return Err(DomainError::DivisionByZero);
    }
    Ok(a / b)
}

/// `part` as a percentage of `total`.
pub fn percentage(part: f64, total: f64) -> Result<f64, DomainError> {
    Ok(divide(part, total)? * 100.0)
}

/// Render a result with exactly two decimal places.
pub fn format_number(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::arguments::{ArgumentBag, validate};
    use crate::domains::tools::definitions::{CalculateTool, PercentageTool, ToolDefinition};

    fn args(a: f64, b: f64) -> ValidatedArgs {
        let descriptor = crate::domains::tools::definitions::AddTool::descriptor();
        validate(&descriptor, &ArgumentBag::new().with("a", a).with("b", b)).unwrap()
    }

    #[test]
    fn test_basic_operations() {
        assert_eq!(Handler::Add.execute(&args(2.0, 3.0)).unwrap(), "5.00");
        assert_eq!(Handler::Subtract.execute(&args(2.0, 3.0)).unwrap(), "-1.00");
        assert_eq!(Handler::Multiply.execute(&args(2.5, 4.0)).unwrap(), "10.00");
        assert_eq!(Handler::Divide.execute(&args(1.0, 3.0)).unwrap(), "0.33");
    }

    #[test]
    fn test_divide_matches_float_division() {
        for (a, b) in [(10.0, 4.0), (-7.0, 2.0), (1e6, 3.0), (0.0, 5.0), (2.0, -0.5)] {
            assert_eq!(
                Handler::Divide.execute(&args(a, b)).unwrap(),
                format!("{:.2}", a / b)
            );
        }
    }

    #[test]
    fn test_divide_by_zero() {
        let err = Handler::Divide.execute(&args(10.0, 0.0)).unwrap_err();
        assert_eq!(err, ToolError::Domain(DomainError::DivisionByZero));
        assert_eq!(err.to_string(), "cannot divide by zero");
    }

    #[test]
    fn test_percentage() {
        let descriptor = PercentageTool::descriptor();
        let validated =
            validate(&descriptor, &ArgumentBag::new().with("a", 25.0).with("b", 200.0)).unwrap();
        assert_eq!(Handler::Percentage.execute(&validated).unwrap(), "12.50%");

        for (a, b) in [(1.0, 3.0), (50.0, 50.0), (-3.0, 8.0)] {
            assert_eq!(
                Handler::Percentage.execute(&args(a, b)).unwrap(),
                format!("{:.2}%", a / b * 100.0)
            );
        }
    }

    #[test]
    fn test_percentage_zero_total() {
        assert_eq!(
            Handler::Percentage.execute(&args(5.0, 0.0)),
            Err(ToolError::Domain(DomainError::DivisionByZero))
        );
    }

    #[test]
    fn test_calculate() {
        let descriptor = CalculateTool::descriptor();
        let bag = ArgumentBag::new()
            .with("operation", "multiply")
            .with("x", 6.0)
            .with("y", 7.0);
        let validated = validate(&descriptor, &bag).unwrap();
        assert_eq!(Handler::Calculate.execute(&validated).unwrap(), "42.00");

        let bag = ArgumentBag::new()
            .with("operation", "divide")
            .with("x", 1.0)
            .with("y", 0.0);
        let validated = validate(&descriptor, &bag).unwrap();
        assert_eq!(
            Handler::Calculate.execute(&validated),
            Err(ToolError::Domain(DomainError::DivisionByZero))
        );
    }

    #[test]
    fn test_operation_from_str() {
        assert_eq!("subtract".parse::<Operation>(), Ok(Operation::Subtract));
        assert!("modulo".parse::<Operation>().is_err());
        assert!("Add".parse::<Operation>().is_err());
        for op in Operation::ALL {
            assert_eq!(op.as_str().parse::<Operation>(), Ok(op));
        }
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5.0), "5.00");
        assert_eq!(format_number(0.006), "0.01");
        assert_eq!(format_number(-1.234), "-1.23");
    }
}
