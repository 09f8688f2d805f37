//! Resource service implementation.
//!
//! Lists the registered resources and serves reads through the
//! [`ResourceRouter`].

use rmcp::ErrorData as McpError;
use rmcp::model::{ReadResourceResult, Resource, ResourceContents, ResourceTemplate};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use super::error::ResourceError;
use super::router::{ResourceDefinition, ResourceRouter};
use crate::domains::tools::{FailureKind, Outcome, ResultEnvelope};

/// Service for listing and reading resources.
pub struct ResourceService {
    router: ResourceRouter,
}

impl ResourceService {
    pub fn new(router: ResourceRouter) -> Self {
        info!("Initializing ResourceService with {} resources", router.len());
        Self { router }
    }

    /// Build a service from definitions, in registration order.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = ResourceDefinition>,
    ) -> Result<Self, ResourceError> {
        let mut router = ResourceRouter::new();
        router.register_all(definitions)?;
        Ok(Self::new(router))
    }

    pub fn len(&self) -> usize {
        self.router.len()
    }

    pub fn is_empty(&self) -> bool {
        self.router.is_empty()
    }

    pub fn list_resources(&self) -> Vec<Resource> {
        self.router.resources()
    }

    pub fn list_resource_templates(&self) -> Vec<ResourceTemplate> {
        self.router.resource_templates()
    }

    /// Route and run one read.
    ///
    /// Caller-input and backend failures come back as `Ok` envelopes; `Err`
    /// is an unknown URI or an internal failure.
    #[instrument(skip(self, ct), fields(uri = %uri))]
    pub async fn read(
        &self,
        uri: &str,
        ct: CancellationToken,
    ) -> Result<ResultEnvelope, ResourceError> {
        debug!("Received");
        let (definition, vars) = self.router.route(uri)?;

        debug!(template = definition.template(), "Dispatching");
        match definition.invoke(vars, ct).await {
            Ok(envelope) => {
                match &envelope {
                    ResultEnvelope::Success { .. } => info!(outcome = %envelope.outcome()),
                    ResultEnvelope::Failure { message, .. } => {
                        info!(outcome = %envelope.outcome(), "{}", message)
                    }
                }
                Ok(envelope)
            }
            Err(e) => {
                error!(outcome = %Outcome::InternalError, "{}", e);
                Err(e)
            }
        }
    }

    /// [`read`](Self::read), shaped as an MCP `resources/read` result.
    pub async fn read_resource(
        &self,
        uri: &str,
        ct: CancellationToken,
    ) -> Result<ReadResourceResult, McpError> {
        let envelope = self.read(uri, ct).await.map_err(to_mcp_error)?;
        into_read_result(uri, envelope)
    }
}

/// Map the resource error channel onto MCP protocol errors.
pub fn to_mcp_error(err: ResourceError) -> McpError {
    match err {
        ResourceError::NoRoute(_) => McpError::resource_not_found(err.to_string(), None),
        other => McpError::internal_error(other.to_string(), None),
    }
}

/// A read has no `isError` flag, so failure envelopes become protocol
/// errors carrying the envelope message.
pub fn into_read_result(uri: &str, envelope: ResultEnvelope) -> Result<ReadResourceResult, McpError> {
    match envelope {
        ResultEnvelope::Success { payload, mime_type } => Ok(ReadResourceResult {
            contents: vec![ResourceContents::TextResourceContents {
                uri: uri.to_string(),
                mime_type: Some(mime_type.to_string()),
                text: payload,
                meta: None,
            }],
        }),
        ResultEnvelope::Failure {
            kind: FailureKind::CallerInput,
            message,
        } => Err(McpError::invalid_params(message, None)),
        ResultEnvelope::Failure { message, .. } => Err(McpError::internal_error(message, None)),
    }
}
