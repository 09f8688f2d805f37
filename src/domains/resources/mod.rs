//! Resources domain module.
//!
//! Resources are read-only lookups addressed by URI. Each one is registered
//! under a URI template (`droplets://{id}`); a read is routed to the most
//! specific matching template and answered with the same
//! [`ResultEnvelope`](crate::domains::tools::ResultEnvelope) tools use.
//!
//! ## Architecture
//!
//! - `template.rs` - URI template parsing and matching
//! - `router.rs` - resource definitions and the router
//! - `service.rs` - listing, reads, and the MCP mapping
//! - `definitions/` - one file per service area

pub mod definitions;
mod error;
mod router;
mod service;
mod template;

pub use error::ResourceError;
pub use router::{
    ResourceDefinition, ResourceDefinitionBuilder, ResourceFuture, ResourceHandler, ResourceRouter,
};
pub use service::{ResourceService, into_read_result, to_mcp_error};
pub use template::{PathVars, UriTemplate};
