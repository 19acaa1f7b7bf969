//! Transport configuration types.

use serde::{Deserialize, Serialize};

use crate::core::config::env_flag;

/// Transport configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Standard input/output transport.
    #[cfg(feature = "stdio")]
    Stdio,

    /// HTTP transport: SSE session streams plus direct JSON-RPC over POST.
    #[cfg(feature = "http")]
    Http(HttpConfig),
}

/// HTTP transport configuration.
#[cfg(feature = "http")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Path for the direct JSON-RPC endpoint.
    #[serde(default = "default_rpc_path")]
    pub rpc_path: String,

    /// Path that opens an SSE session stream.
    #[serde(default = "default_sse_path")]
    pub sse_path: String,

    /// Path clients POST session messages to.
    #[serde(default = "default_message_path")]
    pub message_path: String,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,

    /// Interval between SSE keep-alive comments, in seconds.
    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,

    /// Number of responses buffered per session before senders wait.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

/// Protocol adapter flags, shared by every transport.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Advertise the resource capability and serve `resources/*`.
    #[serde(default)]
    pub advertise_resources: bool,

    /// Log every request and response at info level.
    #[serde(default)]
    pub log_requests: bool,
}

impl AdapterConfig {
    /// Load adapter flags from `MCP_ADVERTISE_RESOURCES` and `MCP_LOG_REQUESTS`.
    pub fn from_env() -> Self {
        Self {
            advertise_resources: env_flag("MCP_ADVERTISE_RESOURCES").unwrap_or(false),
            log_requests: env_flag("MCP_LOG_REQUESTS").unwrap_or(false),
        }
    }
}

#[cfg(feature = "http")]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[cfg(feature = "http")]
fn default_rpc_path() -> String {
    "/mcp".to_string()
}

#[cfg(feature = "http")]
fn default_sse_path() -> String {
    "/mcp/sse".to_string()
}

#[cfg(feature = "http")]
fn default_message_path() -> String {
    "/mcp/message".to_string()
}

#[cfg(feature = "http")]
fn default_cors() -> bool {
    true
}

#[cfg(feature = "http")]
fn default_keep_alive_secs() -> u64 {
    15
}

#[cfg(feature = "http")]
fn default_channel_capacity() -> usize {
    32
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "http")]
        {
            return Self::Http(HttpConfig::default());
        }

        #[cfg(all(not(feature = "http"), feature = "stdio"))]
        {
            return Self::Stdio;
        }

        #[cfg(not(any(feature = "stdio", feature = "http")))]
        {
            compile_error!("At least one transport feature must be enabled: stdio or http");
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: default_host(),
            rpc_path: default_rpc_path(),
            sse_path: default_sse_path(),
            message_path: default_message_path(),
            enable_cors: default_cors(),
            keep_alive_secs: default_keep_alive_secs(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

#[cfg(feature = "http")]
impl HttpConfig {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: std::env::var("MCP_HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            host: std::env::var("MCP_HTTP_HOST").unwrap_or(defaults.host),
            rpc_path: std::env::var("MCP_HTTP_PATH").unwrap_or(defaults.rpc_path),
            sse_path: std::env::var("MCP_SSE_PATH").unwrap_or(defaults.sse_path),
            message_path: std::env::var("MCP_MESSAGE_PATH").unwrap_or(defaults.message_path),
            enable_cors: env_flag("MCP_HTTP_CORS").unwrap_or(defaults.enable_cors),
            keep_alive_secs: std::env::var("MCP_SSE_KEEP_ALIVE_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&s| s > 0)
                .unwrap_or(defaults.keep_alive_secs),
            channel_capacity: defaults.channel_capacity,
        }
    }
}

impl TransportConfig {
    /// Create a STDIO transport config.
    #[cfg(feature = "stdio")]
    pub fn stdio() -> Self {
        Self::Stdio
    }

    /// Create an HTTP transport config.
    #[cfg(feature = "http")]
    pub fn http(port: u16, host: impl Into<String>) -> Self {
        Self::Http(HttpConfig {
            port,
            host: host.into(),
            ..Default::default()
        })
    }

    /// Load transport config from environment variables.
    pub fn from_env() -> Self {
        let transport = std::env::var("MCP_TRANSPORT")
            .unwrap_or_default()
            .to_lowercase();

        match transport.as_str() {
            #[cfg(feature = "stdio")]
            "stdio" => Self::Stdio,
            #[cfg(feature = "http")]
            _ => Self::Http(HttpConfig::from_env()),
            #[cfg(not(feature = "http"))]
            _ => Self::default(),
        }
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (standard MCP mode)".to_string(),
            #[cfg(feature = "http")]
            Self::Http(cfg) => format!(
                "HTTP on {}:{} (SSE {}, messages {}, RPC {})",
                cfg.host, cfg.port, cfg.sse_path, cfg.message_path, cfg.rpc_path
            ),
        }
    }

    /// Check if this transport is the standard STDIO mode.
    pub fn is_stdio(&self) -> bool {
        #[cfg(feature = "stdio")]
        {
            matches!(self, Self::Stdio)
        }
        #[cfg(not(feature = "stdio"))]
        {
            false
        }
    }
}
