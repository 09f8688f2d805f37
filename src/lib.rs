//! DigitalOcean MCP Server Library
//!
//! Exposes DigitalOcean account operations to MCP clients as tools (named
//! actions with typed parameters) and resources (read-only lookups by URI).
//!
//! # Architecture
//!
//! - **backend**: the DigitalOcean API client, one capability trait per
//!   service area
//! - **domains**: the dispatch frameworks and what they expose
//!   - **tools**: parameter declarations, argument extraction, result
//!     envelopes and the tool registry
//!   - **resources**: URI templates and the resource router
//!   - **catalog**: service selection
//! - **core**: configuration, the MCP server handler and transports
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use digitalocean_mcp_server::backend::{Backend, DigitalOceanClient};
//! use digitalocean_mcp_server::core::{Config, McpServer};
//! use digitalocean_mcp_server::domains::Catalog;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     config.validate()?;
//!     let client = Arc::new(DigitalOceanClient::new(config.client_config()?)?);
//!     let backend = Backend::from_shared(client);
//!     let catalog = Catalog::build(&backend, &config.selected_services()?)?;
//!     let server = McpServer::new(config, catalog);
//!     // Hand `server` to a transport...
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod core;
pub mod domains;

pub use core::{Config, Error, McpServer, Result};
