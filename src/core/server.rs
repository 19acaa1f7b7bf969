//! MCP Server implementation and lifecycle management.
//!
//! [`McpServer`] ties the tool dispatcher and the resource service to the
//! server configuration. It implements rmcp's `ServerHandler` for the STDIO
//! transport and exposes plain helpers the HTTP adapter builds JSON-RPC
//! results from.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::config::Config;
use super::error::Result;
use crate::domains::{
    resources::{ResourceError, ResourceService},
    tools::{ArgumentBag, Dispatcher, ResponseEnvelope, ToolRegistry},
};

const INSTRUCTIONS: &str = "Calculator server. Call add, subtract, multiply, divide or \
percentage with numbers a and b, or calculate with operation, x and y. Results have two \
decimal places.";

/// The main MCP server handler.
///
/// Cheap to clone: all state sits behind `Arc`s and nothing in it is mutable.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Dispatcher over the shared tool registry.
    dispatcher: Dispatcher,

    /// Service for handling resource-related requests.
    resource_service: Arc<ResourceService>,
}

impl McpServer {
    /// Create a server over an already-built registry.
    pub fn new(config: Config, registry: Arc<ToolRegistry>) -> Self {
        let resource_service = Arc::new(ResourceService::new(
            config.server.clone(),
            registry.clone(),
        ));

        Self {
            config: Arc::new(config),
            dispatcher: Dispatcher::new(registry),
            resource_service,
        }
    }

    /// Create a server holding every built-in tool.
    ///
    /// Fails if the built-in tool set does not register cleanly.
    pub fn with_builtin_tools(config: Config) -> Result<Self> {
        let registry = ToolRegistry::with_builtin_tools()?;
        Ok(Self::new(config, Arc::new(registry)))
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn instructions(&self) -> &'static str {
        INSTRUCTIONS
    }

    /// Whether resources are advertised and served.
    pub fn advertises_resources(&self) -> bool {
        self.config.adapter.advertise_resources
    }

    fn log_requests(&self) -> bool {
        self.config.adapter.log_requests
    }

    /// Capabilities announced during initialization.
    pub fn capabilities(&self) -> ServerCapabilities {
        if self.advertises_resources() {
            ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build()
        } else {
            ServerCapabilities::builder().enable_tools().build()
        }
    }

    /// Run one tool call through the dispatcher.
    pub fn call_tool(&self, name: &str, arguments: &ArgumentBag) -> ResponseEnvelope {
        if self.log_requests() {
            info!("Tool call: {} ({} arguments)", name, arguments.len());
        }

        let envelope = self.dispatcher.dispatch(name, arguments);

        if self.log_requests() {
            info!("Tool '{}' responded: {:?}", name, envelope);
        } else {
            debug!("Tool '{}' responded, error: {}", name, envelope.is_error());
        }
        envelope
    }

    /// Run an rmcp tool call request to its result.
    pub fn call_tool_request(&self, request: CallToolRequestParam) -> CallToolResult {
        let arguments = request.arguments.map(ArgumentBag::from).unwrap_or_default();
        self.call_tool(&request.name, &arguments).into()
    }

    /// Every registered tool as `{ name, description, inputSchema }`.
    pub fn list_tools_json(&self) -> Vec<Value> {
        self.dispatcher
            .registry()
            .descriptors()
            .map(|d| d.to_json())
            .collect()
    }

    /// Resources offered to clients; empty when advertisement is off.
    pub fn list_resources(&self) -> Vec<Resource> {
        if !self.advertises_resources() {
            return Vec::new();
        }
        self.resource_service.list_resources()
    }

    /// Read a resource by URI.
    pub fn read_resource(&self, uri: &str) -> std::result::Result<ReadResourceResult, ResourceError> {
        if !self.advertises_resources() {
            return Err(ResourceError::Disabled);
        }
        if self.log_requests() {
            info!("Reading resource: {}", uri);
        }
        self.resource_service.read_resource(uri)
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: self.capabilities(),
            ..Default::default()
        };
        info.server_info.name = self.name().to_string();
        info.server_info.version = self.version().to_string();
        info
    }

    #[instrument(skip_all)]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        debug!("Listing tools");
        Ok(ListToolsResult {
            tools: self.dispatcher.registry().tools(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip_all, fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        Ok(self.call_tool_request(request))
    }

    #[instrument(skip_all)]
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListResourcesResult, McpError> {
        debug!("Listing resources");
        Ok(ListResourcesResult {
            resources: McpServer::list_resources(self),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip_all, fields(uri = %request.uri))]
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ReadResourceResult, McpError> {
        McpServer::read_resource(self, &request.uri)
            .map_err(|e| McpError::resource_not_found(e.to_string(), None))
    }
}
