//! Error types and handling for the MCP server.
//!
//! [`Error`] is what startup can fail with. Once the server is running,
//! invocation failures travel inside result envelopes or as MCP protocol
//! errors and never reach this type.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Tool error: {0}")]
    Tool(#[from] crate::domains::tools::ToolError),

    #[error("Resource error: {0}")]
    Resource(#[from] crate::domains::resources::ResourceError),

    /// Error raised while assembling the exposed catalog.
    #[error("Catalog error: {0}")]
    Catalog(#[from] crate::domains::CatalogError),

    /// The backend client could not be constructed.
    #[error("Backend error: {0}")]
    Backend(#[from] crate::backend::BackendError),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
