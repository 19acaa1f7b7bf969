//! Tool catalog resource definition.
//!
//! Exposes every registered tool descriptor, including required flags and
//! enum constraints.

use serde_json::Value;

use super::ResourceDefinition;
use crate::domains::resources::service::{DynamicResourceType, ResourceContent};
use crate::domains::tools::ToolRegistry;

/// Tool catalog resource (dynamic).
pub struct ToolCatalogResource;

impl ToolCatalogResource {
    /// Serialize all descriptors in registration order.
    pub fn resolve(registry: &ToolRegistry) -> Result<Value, serde_json::Error> {
        serde_json::to_value(registry.descriptors().collect::<Vec<_>>())
    }
}

impl ResourceDefinition for ToolCatalogResource {
    const URI: &'static str = "calc://tools/catalog";
    const NAME: &'static str = "Tool Catalog";
    const DESCRIPTION: &'static str = "Descriptors of all calculator tools";
    const MIME_TYPE: &'static str = "application/json";

    fn content() -> ResourceContent {
        ResourceContent::Dynamic(DynamicResourceType::ToolCatalog)
    }
}
