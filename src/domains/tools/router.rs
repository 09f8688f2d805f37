//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! Every registered tool becomes one dynamic route. The route only forwards
//! the argument bag and the request's cancellation token to
//! [`ToolRegistry::call`]; extraction and dispatch stay in the registry so
//! the STDIO/TCP and HTTP transports behave identically.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
};

use super::error::ToolError;
use super::registry::ToolRegistry;

/// Map the framework's error channel onto MCP protocol errors.
pub fn to_mcp_error(err: ToolError) -> McpError {
    match err {
        ToolError::NotFound(_) => McpError::invalid_params(err.to_string(), None),
        other => McpError::internal_error(other.to_string(), None),
    }
}

/// Build the tool router with every tool in `registry`.
pub fn build_tool_router<S>(registry: Arc<ToolRegistry>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    let mut router = ToolRouter::new();
    for definition in registry.definitions() {
        let name = definition.name().to_string();
        let registry = registry.clone();

        let route = ToolRoute::new_dyn(definition.to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let ct = ctx.request_context.ct.clone();
            let registry = registry.clone();
            let name = name.clone();
            async move {
                registry
                    .call(&name, &args, ct)
                    .await
                    .map(|envelope| envelope.into_call_tool_result())
                    .map_err(to_mcp_error)
            }
            .boxed()
        });
        router = router.with_route(route);
    }
    router
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::{ParameterSpec, ResultEnvelope, ToolDefinition};

    struct TestServer {}

    fn registry() -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        registry
            .register(
                ToolDefinition::builder("first-tool")
                    .description("First")
                    .param(ParameterSpec::string("ID").required())
                    .handle((), |_, _, _| async { Ok(ResultEnvelope::text("one")) }),
            )
            .unwrap();
        registry
            .register(
                ToolDefinition::builder("second-tool")
                    .description("Second")
                    .handle((), |_, _, _| async { Ok(ResultEnvelope::text("two")) }),
            )
            .unwrap();
        Arc::new(registry)
    }

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(registry());
        let tools = router.list_all();
        assert_eq!(tools.len(), 2);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"first-tool"));
        assert!(names.contains(&"second-tool"));
    }

    #[test]
    fn test_registry_matches_router() {
        let registry = registry();
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(registry.clone());
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }

    #[test]
    fn test_error_mapping() {
        let err = to_mcp_error(ToolError::not_found("nope"));
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);

        let err = to_mcp_error(ToolError::internal("broken"));
        assert_eq!(err.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
    }
}
