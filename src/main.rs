//! Calculator MCP Server entry point.
//!
//! Loads configuration, initializes logging, builds the tool registry and
//! starts the configured transport.

use anyhow::{Context, Result};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use calculator_mcp_server::core::{Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    init_logging(&config.logging.level, config.logging.with_timestamps);

    info!("Starting {} v{}", config.server.name, config.server.version);

    // A registration fault is a startup error
    let server = McpServer::with_builtin_tools(config.clone())
        .context("failed to register built-in tools")?;

    info!("Server initialized");

    let transport = TransportService::new(config.transport);
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr so stdout stays free for the STDIO transport.
fn init_logging(level: &str, with_timestamps: bool) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
