//! Tools domain module.
//!
//! Tools are the named actions an MCP client can call. Every tool is a
//! [`ToolDefinition`]: a list of [`ParameterSpec`]s plus a handler. The
//! framework extracts typed [`Arguments`] from the untyped argument bag,
//! runs the handler (which makes at most one backend call), and wraps the
//! outcome in a [`ResultEnvelope`].
//!
//! ## Architecture
//!
//! - `schema.rs` - Parameter declarations and the advertised input schema
//! - `extract.rs` - Argument coercion and validation
//! - `envelope.rs` - Uniform success/failure envelope
//! - `registry.rs` - Central tool registry and dispatch
//! - `router.rs` - rmcp ToolRouter builder for STDIO/TCP transport
//! - `definitions/` - Tool definitions, one file per service area
//!
//! ## Adding a New Tool
//!
//! 1. Add a `ToolDefinition` to the matching file in `definitions/`
//! 2. Return it from that area's `definitions()`
//!
//! **No need to modify `server.rs` or `router.rs`!** Both are built from the
//! registry.

pub mod definitions;
mod envelope;
mod error;
mod extract;
mod registry;
pub mod router;
mod schema;

pub use envelope::{
    BACKEND_ERROR_TAG, FailureKind, JSON_MIME_TYPE, Outcome, ResultEnvelope, TEXT_MIME_TYPE,
};
pub use error::ToolError;
pub use extract::{Arguments, ExtractError, extract, split_delimited};
pub use registry::{ToolDefinition, ToolDefinitionBuilder, ToolFuture, ToolHandler, ToolRegistry};
pub use router::{build_tool_router, to_mcp_error};
pub use schema::{ItemKind, ParamKind, ParameterSpec, TextForm, input_schema};
