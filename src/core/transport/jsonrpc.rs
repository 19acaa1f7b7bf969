//! JSON-RPC 2.0 message types shared by the HTTP endpoints.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;
/// MCP extension code for an unknown resource URI.
pub const RESOURCE_NOT_FOUND: i32 = -32002;

/// JSON-RPC request structure.
///
/// `id` is `None` only when the member is absent; `"id": null` decodes to
/// `Some(Value::Null)` and still gets a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(
        default,
        deserialize_with = "present_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: Some(id.into()),
            method: method.into(),
            params,
        }
    }

    /// Decode a message body.
    ///
    /// Bodies that are not JSON fail with a parse error. JSON that is not a
    /// request object fails with an invalid request error carrying whatever
    /// id could be recovered.
    pub fn from_slice(body: &[u8]) -> Result<Self, JsonRpcResponse> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| JsonRpcResponse::parse_error(format!("Parse error: {}", e)))?;

        let id = value.get("id").cloned();
        serde_json::from_value(value).map_err(|_| JsonRpcResponse::invalid_request(id))
    }

    /// A message without an id member expects no response.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

fn present_id<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Body could not be parsed as a JSON-RPC message.
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::error(None, PARSE_ERROR, msg)
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<Value>) -> Self {
        Self::error(id, METHOD_NOT_FOUND, "Method not found")
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<Value>) -> Self {
        Self::error(id, INVALID_REQUEST, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, INVALID_PARAMS, msg)
    }

    /// Internal error.
    pub fn internal_error(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, INTERNAL_ERROR, msg)
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_defaults() {
        let request: JsonRpcRequest =
            serde_json::from_value(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
                .unwrap();
        assert!(request.is_notification());
        assert!(request.params.is_none());
    }

    #[test]
    fn test_null_id_is_a_request() {
        let request: JsonRpcRequest =
            serde_json::from_value(json!({"jsonrpc": "2.0", "id": null, "method": "ping"}))
                .unwrap();
        assert_eq!(request.id, Some(Value::Null));
        assert!(!request.is_notification());
    }

    #[test]
    fn test_from_slice_separates_parse_and_shape_errors() {
        let err = JsonRpcRequest::from_slice(b"{not json").unwrap_err();
        assert_eq!(err.error.unwrap().code, PARSE_ERROR);

        let err = JsonRpcRequest::from_slice(br#"{"jsonrpc": "2.0", "id": 1}"#).unwrap_err();
        assert_eq!(err.id, Some(json!(1)));
        assert_eq!(err.error.unwrap().code, INVALID_REQUEST);

        let request = JsonRpcRequest::from_slice(br#"{"jsonrpc": "2.0", "id": 3, "method": "ping"}"#);
        assert_eq!(request.unwrap().id, Some(json!(3)));
    }

    #[test]
    fn test_error_serialization() {
        let json = serde_json::to_value(JsonRpcResponse::parse_error("bad body")).unwrap();
        assert_eq!(
            json,
            json!({
                "jsonrpc": "2.0",
                "id": null,
                "error": {"code": -32700, "message": "bad body"}
            })
        );
    }
}
