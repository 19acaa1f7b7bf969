//! Protocol adapter between wire messages and the server.
//!
//! Every HTTP endpoint funnels through [`TransportAdapter`]: one inbound
//! JSON-RPC message produces at most one outbound response, and tool
//! failures come back as `CallToolResult`s with `isError` set rather than
//! JSON-RPC errors.

use rmcp::model::{CallToolResult, ListResourcesResult};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info, instrument, warn};

use super::CallFrameError;
use super::jsonrpc::{JsonRpcRequest, JsonRpcResponse, RESOURCE_NOT_FOUND};
use crate::core::McpServer;
use crate::domains::resources::ResourceError;
use crate::domains::tools::{ArgumentBag, ResponseEnvelope};

/// MCP protocol revision spoken over HTTP.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// A decoded tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallFrame {
    pub tool_name: String,
    pub arguments: ArgumentBag,
}

impl CallFrame {
    pub fn new(tool_name: impl Into<String>, arguments: ArgumentBag) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
        }
    }

    /// Decode `tools/call` params: `{ "name": ..., "arguments": {...} }`.
    pub fn from_params(params: Option<Value>) -> Result<Self, CallFrameError> {
        let Some(Value::Object(mut params)) = params else {
            return Err(CallFrameError::MissingParams);
        };

        let tool_name = match params.remove("name") {
            Some(Value::String(name)) => name,
            _ => return Err(CallFrameError::MissingToolName),
        };

        let arguments = ArgumentBag::from_value(params.remove("arguments").unwrap_or(Value::Null))?;
        Ok(Self::new(tool_name, arguments))
    }
}

/// Turns call frames and JSON-RPC messages into responses.
#[derive(Clone)]
pub struct TransportAdapter {
    server: McpServer,
}

impl TransportAdapter {
    pub fn new(server: McpServer) -> Self {
        Self { server }
    }

    pub fn server(&self) -> &McpServer {
        &self.server
    }

    /// Run one call frame to its envelope.
    pub fn handle_call(&self, frame: CallFrame) -> ResponseEnvelope {
        self.server.call_tool(&frame.tool_name, &frame.arguments)
    }

    /// Handle one JSON-RPC message. Notifications yield `None`.
    #[instrument(skip_all, fields(method = %request.method))]
    pub fn handle_message(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let notification =
            request.is_notification() || request.method.starts_with("notifications/");

        if request.jsonrpc != "2.0" {
            warn!("Rejecting message with jsonrpc version '{}'", request.jsonrpc);
            if notification {
                return None;
            }
            return Some(JsonRpcResponse::invalid_request(request.id));
        }

        if request.method.starts_with("notifications/") {
            self.handle_notification(&request);
            return None;
        }

        if self.server.config().adapter.log_requests {
            info!("Request {}: {:?}", request.method, request.params);
        }

        let response = self.dispatch(request);

        if notification {
            debug!("Dropping response to a message without id");
            return None;
        }
        Some(response)
    }

    fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let advertise_resources = self.server.advertises_resources();

        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => JsonRpcResponse::success(
                request.id,
                json!({ "tools": self.server.list_tools_json() }),
            ),
            "tools/call" => self.handle_tools_call(request),
            "resources/list" if advertise_resources => {
                let result = ListResourcesResult {
                    resources: self.server.list_resources(),
                    next_cursor: None,
                    meta: None,
                };
                to_response(request.id, &result)
            }
            "resources/read" if advertise_resources => self.handle_resources_read(request),
            _ => {
                warn!("Unknown method: {}", request.method);
                JsonRpcResponse::method_not_found(request.id)
            }
        }
    }

    fn handle_initialize(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let client = request
            .params
            .as_ref()
            .and_then(|p| p.pointer("/clientInfo/name"))
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        info!("Initializing session for client '{}'", client);

        let capabilities = match serde_json::to_value(self.server.capabilities()) {
            Ok(value) => value,
            Err(e) => return JsonRpcResponse::internal_error(request.id, e.to_string()),
        };

        JsonRpcResponse::success(
            request.id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": capabilities,
                "serverInfo": {
                    "name": self.server.name(),
                    "version": self.server.version()
                },
                "instructions": self.server.instructions()
            }),
        )
    }

    fn handle_tools_call(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let frame = match CallFrame::from_params(request.params) {
            Ok(frame) => frame,
            Err(e) => return JsonRpcResponse::invalid_params(request.id, e.to_string()),
        };

        let result: CallToolResult = self.handle_call(frame).into();
        to_response(request.id, &result)
    }

    fn handle_resources_read(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let uri = match request
            .params
            .as_ref()
            .and_then(|p| p.get("uri"))
            .and_then(Value::as_str)
        {
            Some(uri) => uri.to_string(),
            None => return JsonRpcResponse::invalid_params(request.id, "Missing resource URI"),
        };

        match self.server.read_resource(&uri) {
            Ok(result) => to_response(request.id, &result),
            Err(e @ ResourceError::NotFound(_)) => {
                JsonRpcResponse::error(request.id, RESOURCE_NOT_FOUND, e.to_string())
            }
            Err(ResourceError::Disabled) => JsonRpcResponse::method_not_found(request.id),
            Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
        }
    }

    fn handle_notification(&self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "notifications/initialized" => info!("Client sent initialized notification"),
            method => debug!("Received notification: {}", method),
        }
    }
}

fn to_response<T: Serialize>(id: Option<Value>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::internal_error(id, e.to_string()),
    }
}
