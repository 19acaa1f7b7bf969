//! Argument bags and the declared-schema validator.
//!
//! Callers hand over an untyped [`ArgumentBag`]. [`validate`] checks it
//! against a [`ToolDescriptor`] and produces [`ValidatedArgs`], the only
//! input a handler ever sees.
//!
//! Parameters are checked in declaration order and validation stops at the
//! first failure. Arguments the descriptor does not declare are ignored.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use super::descriptor::{ParamKind, ToolDescriptor};
use super::error::ValidationError;

/// An untyped argument value as supplied by a caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Number(f64),
    String(String),
    /// Any other JSON value (bool, array, object). Always a type mismatch.
    Unsupported(Value),
}

impl ArgValue {
    /// Short name of the value's type, for logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Unsupported(Value::Bool(_)) => "boolean",
            Self::Unsupported(Value::Array(_)) => "array",
            Self::Unsupported(Value::Object(_)) => "object",
            Self::Unsupported(_) => "unknown",
        }
    }

    /// Convert a JSON value. `null` maps to `None` (treated as absent).
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Number(n) => Some(match n.as_f64() {
                Some(f) => Self::Number(f),
                None => Self::Unsupported(Value::Number(n)),
            }),
            Value::String(s) => Some(Self::String(s)),
            other => Some(Self::Unsupported(other)),
        }
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// The untyped key-value input of a single call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentBag {
    values: HashMap<String, ArgValue>,
}

impl ArgumentBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace an argument.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ArgValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Get an argument by name.
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    /// Iterate over argument names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build a bag from a JSON-RPC `arguments` value.
    ///
    /// `null` yields an empty bag; anything other than an object is rejected.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(map) => Ok(Self::from(map)),
            other => Err(ValidationError::NotAnObject {
                found: ArgValue::from_json(other).map_or("unknown", |v| v.type_name()),
            }),
        }
    }
}

impl From<Map<String, Value>> for ArgumentBag {
    fn from(map: Map<String, Value>) -> Self {
        let values = map
            .into_iter()
            .filter_map(|(name, value)| ArgValue::from_json(value).map(|v| (name, v)))
            .collect();
        Self { values }
    }
}

/// A value that has passed validation.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Number(f64),
    String(String),
}

/// Arguments checked against a descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedArgs {
    values: HashMap<String, TypedValue>,
}

impl ValidatedArgs {
    /// Read a number argument.
    pub fn number(&self, name: &str) -> Result<f64, ValidationError> {
        match self.values.get(name) {
            Some(TypedValue::Number(n)) => Ok(*n),
            Some(TypedValue::String(_)) => Err(ValidationError::TypeMismatch {
                param: name.to_string(),
                expected: ParamKind::Number,
            }),
            None => Err(ValidationError::MissingArgument {
                param: name.to_string(),
            }),
        }
    }

    /// Read a string argument.
    pub fn string(&self, name: &str) -> Result<&str, ValidationError> {
        match self.values.get(name) {
            Some(TypedValue::String(s)) => Ok(s),
            Some(TypedValue::Number(_)) => Err(ValidationError::TypeMismatch {
                param: name.to_string(),
                expected: ParamKind::String,
            }),
            None => Err(ValidationError::MissingArgument {
                param: name.to_string(),
            }),
        }
    }

    /// Whether an (optional) argument was supplied.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Check `bag` against the parameters declared by `descriptor`.
pub fn validate(
    descriptor: &ToolDescriptor,
    bag: &ArgumentBag,
) -> Result<ValidatedArgs, ValidationError> {
    let mut values = HashMap::with_capacity(descriptor.parameters.len());

    for spec in &descriptor.parameters {
        let Some(value) = bag.get(&spec.name) else {
            if spec.required {
                return Err(ValidationError::MissingArgument {
                    param: spec.name.clone(),
                });
            }
            continue;
        };

        let typed = match (spec.kind, value) {
            (ParamKind::Number, ArgValue::Number(n)) => TypedValue::Number(*n),
            (ParamKind::String, ArgValue::String(s)) => {
                if !spec.allows(s) {
                    return Err(ValidationError::InvalidEnumValue {
                        param: spec.name.clone(),
                        value: s.clone(),
                        allowed: spec.allowed_values.clone().unwrap_or_default(),
                    });
                }
                TypedValue::String(s.clone())
            }
            (expected, other) => {
                debug!(
                    "Argument '{}' of tool '{}' is a {}, expected {}",
                    spec.name,
                    descriptor.name,
                    other.type_name(),
                    expected
                );
                return Err(ValidationError::TypeMismatch {
                    param: spec.name.clone(),
                    expected,
                });
            }
        };

        values.insert(spec.name.clone(), typed);
    }

    for name in bag.names().filter(|n| descriptor.parameter(n).is_none()) {
        debug!("Ignoring undeclared argument '{}' for tool '{}'", name, descriptor.name);
    }

    Ok(ValidatedArgs { values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::descriptor::ParameterSpec;
    use serde_json::json;

    fn binary() -> ToolDescriptor {
        ToolDescriptor::new("add", "Add two numbers")
            .with_parameter(ParameterSpec::number("a").required())
            .with_parameter(ParameterSpec::number("b").required())
    }

    fn with_enum() -> ToolDescriptor {
        ToolDescriptor::new("calculate", "Calculate")
            .with_parameter(
                ParameterSpec::string("operation")
                    .required()
                    .one_of(["add", "divide"]),
            )
            .with_parameter(ParameterSpec::number("scale"))
    }

    #[test]
    fn test_validate_ok() {
        let bag = ArgumentBag::new().with("a", 2.0).with("b", 3);
        let args = validate(&binary(), &bag).unwrap();
        assert_eq!(args.number("a").unwrap(), 2.0);
        assert_eq!(args.number("b").unwrap(), 3.0);
    }

    #[test]
    fn test_validate_missing() {
        let bag = ArgumentBag::new().with("b", 2.0);
        let err = validate(&binary(), &bag).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingArgument {
                param: "a".to_string()
            }
        );
    }

    #[test]
    fn test_validate_type_mismatch() {
        let bag = ArgumentBag::new().with("a", "x").with("b", 2.0);
        let err = validate(&binary(), &bag).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TypeMismatch {
                param: "a".to_string(),
                expected: ParamKind::Number
            }
        );
    }

    #[test]
    fn test_numeric_string_is_not_coerced() {
        let bag = ArgumentBag::new().with("a", "2").with("b", 2.0);
        assert!(matches!(
            validate(&binary(), &bag),
            Err(ValidationError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_fails_on_first_declared_parameter() {
        let bag = ArgumentBag::new().with("a", "x");
        let err = validate(&binary(), &bag).unwrap_err();
        assert_eq!(err.param(), Some("a"));
    }

    #[test]
    fn test_validate_enum() {
        let bag = ArgumentBag::new().with("operation", "modulo");
        let err = validate(&with_enum(), &bag).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidEnumValue {
                param: "operation".to_string(),
                value: "modulo".to_string(),
                allowed: vec!["add".to_string(), "divide".to_string()],
            }
        );

        let bag = ArgumentBag::new().with("operation", "divide");
        let args = validate(&with_enum(), &bag).unwrap();
        assert_eq!(args.string("operation").unwrap(), "divide");
        assert!(!args.contains("scale"));
    }

    #[test]
    fn test_from_json_object() {
        let bag = ArgumentBag::from_value(json!({
            "a": 1,
            "b": null,
            "flag": true,
            "name": "x"
        }))
        .unwrap();
        assert_eq!(bag.get("a"), Some(&ArgValue::Number(1.0)));
        assert_eq!(bag.get("b"), None);
        assert_eq!(bag.get("flag").map(ArgValue::type_name), Some("boolean"));
        assert_eq!(bag.get("name"), Some(&ArgValue::String("x".to_string())));
    }

    #[test]
    fn test_null_counts_as_missing() {
        let bag = ArgumentBag::from_value(json!({"a": null, "b": 1})).unwrap();
        assert!(matches!(
            validate(&binary(), &bag),
            Err(ValidationError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_boolean_is_type_mismatch() {
        let bag = ArgumentBag::from_value(json!({"a": true, "b": 1})).unwrap();
        assert!(matches!(
            validate(&binary(), &bag),
            Err(ValidationError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(ArgumentBag::from_value(Value::Null).unwrap().is_empty());
        assert_eq!(
            ArgumentBag::from_value(json!([1, 2])),
            Err(ValidationError::NotAnObject { found: "array" })
        );
        assert_eq!(
            ArgumentBag::from_value(json!(4)),
            Err(ValidationError::NotAnObject { found: "number" })
        );
    }

    #[test]
    fn test_undeclared_arguments_ignored() {
        let bag = ArgumentBag::new().with("a", 1.0).with("b", 2.0).with("c", 3.0);
        let args = validate(&binary(), &bag).unwrap();
        assert_eq!(args.len(), 2);
        assert!(!args.contains("c"));
    }
}
