//! Transport layer for the MCP server.
//!
//! - **HTTP** (feature `http`): SSE session streams with a companion message
//!   endpoint, plus direct JSON-RPC over POST
//! - **STDIO** (feature `stdio`): rmcp over stdin/stdout
//!
//! Both features are on by default. HTTP messages are decoded into
//! JSON-RPC requests and handed to the [`TransportAdapter`]; STDIO goes
//! through rmcp's `ServerHandler` implementation on `McpServer`.

mod adapter;
mod config;
mod error;
pub mod jsonrpc;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub mod sse;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use adapter::{CallFrame, PROTOCOL_VERSION, TransportAdapter};
pub use config::{AdapterConfig, TransportConfig};
pub use error::{CallFrameError, TransportError, TransportResult};
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use service::TransportService;

#[cfg(feature = "http")]
pub use config::HttpConfig;
