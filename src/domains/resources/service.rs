//! Resource service implementation.
//!
//! The ResourceService manages resource discovery and access.
//! Resources are defined in `definitions/` and registered via `registry.rs`.

use std::collections::BTreeMap;
use std::sync::Arc;

use rmcp::model::{ReadResourceResult, Resource, ResourceContents};
use tracing::info;

use super::definitions::{ServerInfoResource, ToolCatalogResource};
use super::error::ResourceError;
use super::registry::get_all_resources;
use crate::core::config::ServerConfig;
use crate::domains::tools::ToolRegistry;

/// Service for listing and reading resources.
pub struct ResourceService {
    /// Server identity reported by the info resource.
    server: ServerConfig,

    /// Tool registry backing the catalog resource.
    registry: Arc<ToolRegistry>,

    /// Key: resource URI, Value: resource metadata
    resources: BTreeMap<String, ResourceEntry>,
}

/// An entry in the resource registry.
#[derive(Debug, Clone)]
pub struct ResourceEntry {
    /// The resource metadata.
    pub resource: Resource,

    /// The content provider for this resource.
    pub content: ResourceContent,
}

/// Different types of resource content.
#[derive(Debug, Clone)]
pub enum ResourceContent {
    /// Static text content.
    Text(String),

    /// Dynamic content that requires computation.
    Dynamic(DynamicResourceType),
}

/// Types of dynamic resources.
#[derive(Debug, Clone, Copy)]
pub enum DynamicResourceType {
    ServerInfo,
    ToolCatalog,
}

impl ResourceService {
    /// Create a new ResourceService.
    pub fn new(server: ServerConfig, registry: Arc<ToolRegistry>) -> Self {
        info!("Initializing ResourceService");

        let mut service = Self {
            server,
            registry,
            resources: BTreeMap::new(),
        };

        for entry in get_all_resources() {
            service.register_resource(entry);
        }

        service
    }

    /// Register a resource.
    pub fn register_resource(&mut self, entry: ResourceEntry) {
        info!("Registering resource: {}", entry.resource.raw.uri);
        self.resources
            .insert(entry.resource.raw.uri.to_string(), entry);
    }

    /// List all available resources.
    pub fn list_resources(&self) -> Vec<Resource> {
        self.resources
            .values()
            .map(|entry| entry.resource.clone())
            .collect()
    }

    /// Read a resource by URI.
    pub fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let entry = self
            .resources
            .get(uri)
            .ok_or_else(|| ResourceError::not_found(uri))?;

        let content = match &entry.content {
            ResourceContent::Text(text) => ResourceContents::text(text, uri),
            ResourceContent::Dynamic(dynamic_type) => {
                self.resolve_dynamic_content(uri, *dynamic_type)?
            }
        };

        Ok(ReadResourceResult {
            contents: vec![content],
        })
    }

    fn resolve_dynamic_content(
        &self,
        uri: &str,
        dynamic_type: DynamicResourceType,
    ) -> Result<ResourceContents, ResourceError> {
        let value = match dynamic_type {
            DynamicResourceType::ServerInfo => {
                ServerInfoResource::resolve(&self.server, &self.registry)
            }
            DynamicResourceType::ToolCatalog => ToolCatalogResource::resolve(&self.registry)
                .map_err(|e| ResourceError::internal(e.to_string()))?,
        };

        let text = serde_json::to_string_pretty(&value)
            .map_err(|e| ResourceError::internal(e.to_string()))?;
        Ok(ResourceContents::text(text, uri))
    }
}
