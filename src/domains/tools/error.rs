//! Tool-specific error types.
//!
//! These are the framework's internal channel. Caller mistakes and backend
//! failures are returned as [`ResultEnvelope`](super::ResultEnvelope) values,
//! never as a `ToolError`.

use thiserror::Error;

use super::envelope::FailureKind;

/// Errors raised while registering or dispatching tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// A tool with this name is already registered.
    #[error("Duplicate tool name: {0}")]
    DuplicateName(String),

    /// Two parameters of one tool share a name.
    #[error("Duplicate parameter '{parameter}' in tool '{tool}'")]
    DuplicateParameter { tool: String, parameter: String },

    /// A parameter declaration is unusable.
    #[error("Invalid definition for tool '{tool}': {reason}")]
    InvalidDefinition { tool: String, reason: String },

    /// A handler broke one of its own invariants.
    #[error("Internal error: {0}")]
    Internal(String),

    /// A validated payload failed to serialize.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid definition" error.
    pub fn invalid_definition(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Telemetry classification. An unknown tool name is the caller's
    /// mistake; everything else is internal.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::NotFound(_) => FailureKind::CallerInput,
            _ => FailureKind::Internal,
        }
    }
}
