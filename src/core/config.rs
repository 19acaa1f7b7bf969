//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables, a `.env` file, or defaults.

use super::transport::{AdapterConfig, TransportConfig};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Protocol adapter flags shared by every transport.
    pub adapter: AdapterConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "Calculator Demo".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            adapter: AdapterConfig::default(),
        }
    }
}

/// Parse a boolean environment value ("1"/"true"/"yes"/"on").
pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub(crate) fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().as_deref().and_then(parse_flag)
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(with_timestamps) = env_flag("MCP_LOG_TIMESTAMPS") {
            config.logging.with_timestamps = with_timestamps;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();
        config.adapter = AdapterConfig::from_env();

        if config.adapter.advertise_resources {
            info!("Resource capabilities enabled");
        }

        config
    }
}

// Mutex to ensure env var tests run serially, across modules
#[cfg(test)]
pub(crate) static ENV_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_name_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_SERVER_NAME", "calc-test");
        }
        let config = Config::from_env();
        assert_eq!(config.server.name, "calc-test");
        unsafe {
            std::env::remove_var("MCP_SERVER_NAME");
        }
    }

    #[test]
    fn test_adapter_flags_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_ADVERTISE_RESOURCES", "true");
            std::env::set_var("MCP_LOG_REQUESTS", "1");
        }
        let config = Config::from_env();
        assert!(config.adapter.advertise_resources);
        assert!(config.adapter.log_requests);
        unsafe {
            std::env::remove_var("MCP_ADVERTISE_RESOURCES");
            std::env::remove_var("MCP_LOG_REQUESTS");
        }
    }

    #[test]
    fn test_adapter_flags_default_off() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::remove_var("MCP_ADVERTISE_RESOURCES");
            std::env::remove_var("MCP_LOG_REQUESTS");
        }
        let config = Config::from_env();
        assert!(!config.adapter.advertise_resources);
        assert!(!config.adapter.log_requests);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server.name, "Calculator Demo");
        assert_eq!(config.logging.level, "info");
    }
}
