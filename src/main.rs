//! MCP Server Entry Point
//!
//! Loads configuration, initializes logging, builds the backend client and
//! the catalog for the selected services, then serves on the configured
//! transport.

use std::sync::Arc;

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use digitalocean_mcp_server::backend::{Backend, DigitalOceanClient};
use digitalocean_mcp_server::core::{Config, McpServer, TransportService};
use digitalocean_mcp_server::domains::Catalog;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);

    config.validate()?;

    let client = Arc::new(DigitalOceanClient::new(config.client_config()?)?);
    let backend = Backend::from_shared(client);

    let services = config.selected_services()?;
    let catalog = Catalog::build(&backend, &services)?;

    let transport = TransportService::new(config.transport.clone());
    let server = McpServer::new(config, catalog);

    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs always go to stderr; stdout belongs to the STDIO transport.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
