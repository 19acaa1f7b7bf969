//! Tool descriptors - the static metadata advertised to clients.
//!
//! A [`ToolDescriptor`] names a tool and declares its parameters. The
//! validator checks incoming arguments against it, and discovery exports it
//! as a JSON Schema.

use std::fmt;

use rmcp::model::Tool;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// The declared type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Number,
    String,
}

impl ParamKind {
    /// JSON Schema type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String => "string",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single named parameter of a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSpec {
    /// Parameter name, unique within its descriptor.
    pub name: String,

    /// Declared kind.
    pub kind: ParamKind,

    /// Whether the caller must supply this parameter.
    pub required: bool,

    /// Allowed values for enum-constrained string parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,

    /// Human readable description (documentation only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParameterSpec {
    fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            allowed_values: None,
            description: None,
        }
    }

    /// An optional number parameter.
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Number)
    }

    /// An optional string parameter.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::String)
    }

    /// Mark the parameter as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Restrict a string parameter to a fixed set of values.
    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Check a string value against the enum constraint, if any.
    pub fn allows(&self, value: &str) -> bool {
        self.allowed_values
            .as_ref()
            .is_none_or(|allowed| allowed.iter().any(|v| v == value))
    }

    fn schema(&self) -> Value {
        let mut schema = Map::new();
        schema.insert("type".to_string(), json!(self.kind.as_str()));
        if let Some(description) = &self.description {
            schema.insert("description".to_string(), json!(description));
        }
        if let Some(allowed) = &self.allowed_values {
            schema.insert("enum".to_string(), json!(allowed));
        }
        Value::Object(schema)
    }
}

/// Static metadata for a registered tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique tool name.
    pub name: String,

    /// Description shown to clients.
    pub description: String,

    /// Parameters in declaration order.
    pub parameters: Vec<ParameterSpec>,
}

impl ToolDescriptor {
    /// Create a descriptor with no parameters.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    /// Append a parameter.
    pub fn with_parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Look up a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Returns the first parameter name that is declared more than once.
    pub fn duplicate_parameter(&self) -> Option<&str> {
        self.parameters.iter().enumerate().find_map(|(i, p)| {
            self.parameters[..i]
                .iter()
                .any(|earlier| earlier.name == p.name)
                .then_some(p.name.as_str())
        })
    }

    /// JSON Schema for the tool's input object.
    pub fn input_schema(&self) -> Map<String, Value> {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), p.schema()))
            .collect();

        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        schema.insert("required".to_string(), json!(required));
        schema
    }

    /// Create a Tool model for this descriptor (metadata).
    pub fn to_tool(&self) -> Tool {
        Tool::new(
            self.name.clone(),
            self.description.clone(),
            self.input_schema(),
        )
    }

    /// Discovery entry as sent over the JSON-RPC transports.
    pub fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema(),
        })
    }
}
