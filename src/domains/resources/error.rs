//! Resource-specific error types.
//!
//! As with tools, caller and backend failures travel as
//! [`ResultEnvelope`](crate::domains::tools::ResultEnvelope) values; this
//! enum is routing plus the internal channel.

use thiserror::Error;

use crate::domains::tools::ToolError;

/// Errors that can occur during resource registration or reads.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// No registered template matches the URI.
    #[error("Resource not found: {0}")]
    NoRoute(String),

    /// The template string is already registered.
    #[error("Duplicate resource template: {0}")]
    DuplicateName(String),

    #[error("Invalid URI template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    /// The template matches exactly the URIs of one already registered.
    #[error("URI template '{template}' overlaps '{existing}'")]
    AmbiguousTemplate { template: String, existing: String },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ResourceError {
    pub fn no_route(uri: impl Into<String>) -> Self {
        Self::NoRoute(uri.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<ToolError> for ResourceError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::Serialization(e) => Self::Serialization(e),
            other => Self::Internal(other.to_string()),
        }
    }
}
