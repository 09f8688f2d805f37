//! MCP Server implementation and lifecycle management.
//!
//! [`McpServer`] owns the [`Catalog`] built at startup and answers MCP
//! requests from it. Tool calls go through the rmcp `ToolRouter` built from
//! the tool registry; resource reads go through the resource service. Both
//! are read-only after construction, so the server is cheap to clone per
//! connection.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, handler::server::tool::ToolRouter, model::*,
    service::RequestContext, tool_handler,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use crate::domains::Catalog;
use crate::domains::resources::ResourceService;
use crate::domains::tools::{ToolRegistry, build_tool_router};

const INSTRUCTIONS: &str = "Manage DigitalOcean infrastructure. Tools create, inspect and \
change droplets, firewalls, domains and managed databases; resources expose read-only views \
such as regions://all, droplets://{id} and account://current.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    config: Arc<Config>,

    /// Registered tools, shared with the tool router.
    tools: Arc<ToolRegistry>,

    resources: Arc<ResourceService>,

    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a server exposing everything in `catalog`.
    pub fn new(config: Config, catalog: Catalog) -> Self {
        let Catalog { tools, resources } = catalog;
        info!(
            tools = tools.len(),
            resources = resources.len(),
            "Server initialized"
        );

        Self {
            config: Arc::new(config),
            tool_router: build_tool_router::<Self>(tools.clone()),
            tools,
            resources,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    pub fn instructions(&self) -> &'static str {
        INSTRUCTIONS
    }
}

// ============================================================================
// HTTP Transport Support Methods
// ============================================================================

#[cfg(any(feature = "http", test))]
impl McpServer {
    /// All registered tools, in registration order.
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tools
            .list_tools()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name.
    ///
    /// HTTP requests carry no cancellation signal of their own, so each call
    /// gets a fresh token.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, McpError> {
        let arguments = match arguments {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => JsonObject::new(),
            _ => {
                return Err(McpError::invalid_params(
                    "tool arguments must be a JSON object",
                    None,
                ));
            }
        };

        let envelope = self
            .tools
            .call(name, &arguments, tokio_util::sync::CancellationToken::new())
            .await
            .map_err(crate::domains::tools::to_mcp_error)?;

        serde_json::to_value(envelope.into_call_tool_result())
            .map_err(|e| McpError::internal_error(e.to_string(), None))
    }

    pub fn list_resources(&self) -> Vec<serde_json::Value> {
        self.resources
            .list_resources()
            .into_iter()
            .map(|r| {
                serde_json::json!({
                    "uri": r.raw.uri,
                    "name": r.raw.name,
                    "description": r.raw.description,
                    "mimeType": r.raw.mime_type
                })
            })
            .collect()
    }

    pub fn list_resource_templates(&self) -> Vec<serde_json::Value> {
        self.resources
            .list_resource_templates()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "uriTemplate": t.raw.uri_template,
                    "name": t.raw.name,
                    "description": t.raw.description,
                    "mimeType": t.raw.mime_type
                })
            })
            .collect()
    }

    /// Read a resource by URI.
    pub async fn read_resource(&self, uri: &str) -> Result<serde_json::Value, McpError> {
        let result = self
            .resources
            .read_resource(uri, tokio_util::sync::CancellationToken::new())
            .await?;

        Ok(serde_json::json!({
            "contents": result.contents
        }))
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        Ok(ListResourcesResult {
            resources: self.resources.list_resources(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        info!("Listing resource templates");
        Ok(ListResourceTemplatesResult {
            resource_templates: self.resources.list_resource_templates(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, request, context), fields(uri = %request.uri))]
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.resources
            .read_resource(&request.uri, context.ct.clone())
            .await
    }
}
