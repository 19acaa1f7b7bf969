//! Calculator MCP Server Library
//!
//! A Model Context Protocol (MCP) server exposing basic arithmetic as tools,
//! organized by domains.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the server handler and the
//!   transports (HTTP/SSE and STDIO)
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: tool descriptors, argument validation, handlers, the
//!     registry and the dispatcher
//!   - **resources**: read-only documents describing the server
//!
//! # Example
//!
//! ```rust,no_run
//! use calculator_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::with_builtin_tools(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
