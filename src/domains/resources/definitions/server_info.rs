//! Server info resource definition.

use serde_json::{Value, json};

use super::ResourceDefinition;
use crate::core::config::ServerConfig;
use crate::domains::resources::service::{DynamicResourceType, ResourceContent};
use crate::domains::tools::ToolRegistry;

/// Server information resource (dynamic).
pub struct ServerInfoResource;

impl ServerInfoResource {
    /// Build the JSON document.
    pub fn resolve(server: &ServerConfig, registry: &ToolRegistry) -> Value {
        json!({
            "server": server.name,
            "version": server.version,
            "tools": registry.len(),
        })
    }
}

impl ResourceDefinition for ServerInfoResource {
    const URI: &'static str = "calc://server/info";
    const NAME: &'static str = "Server Information";
    const DESCRIPTION: &'static str = "Name, version and tool count of this calculator server";
    const MIME_TYPE: &'static str = "application/json";

    fn content() -> ResourceContent {
        ResourceContent::Dynamic(DynamicResourceType::ServerInfo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;

    #[test]
    fn test_server_info_metadata() {
        assert_eq!(ServerInfoResource::URI, "calc://server/info");
        assert_eq!(ServerInfoResource::MIME_TYPE, "application/json");
    }

    #[test]
    fn test_server_info_resolve() {
        let config = Config::default();
        let registry = ToolRegistry::with_builtin_tools().unwrap();
        let info = ServerInfoResource::resolve(&config.server, &registry);
        assert_eq!(info["server"], config.server.name.as_str());
        assert_eq!(info["tools"], 6);
    }
}
