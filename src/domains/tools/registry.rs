//! Tool Registry - central registration and dispatch for all tools.
//!
//! The registry is built once at startup and only read afterwards, so
//! lookups need no locking. Dispatch runs one linear pass per invocation:
//! extract arguments, call the handler (at most one backend call), wrap the
//! result.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use rmcp::model::{JsonObject, Tool};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use super::envelope::{Outcome, ResultEnvelope};
use super::error::ToolError;
use super::extract::{Arguments, coerce, extract};
use super::schema::{ParameterSpec, input_schema};

/// Boxed future returned by a tool handler.
pub type ToolFuture = BoxFuture<'static, Result<ResultEnvelope, ToolError>>;

/// Type-erased tool handler.
pub type ToolHandler = Arc<dyn Fn(Arguments, CancellationToken) -> ToolFuture + Send + Sync>;

// ============================================================================
// Tool Definition
// ============================================================================

/// A named tool: its declared parameters and the handler that runs it.
#[derive(Clone)]
pub struct ToolDefinition {
    name: String,
    description: String,
    params: Vec<ParameterSpec>,
    handler: ToolHandler,
}

impl std::fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl ToolDefinition {
    pub fn builder(name: impl Into<String>) -> ToolDefinitionBuilder {
        ToolDefinitionBuilder {
            name: name.into(),
            description: String::new(),
            params: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn params(&self) -> &[ParameterSpec] {
        &self.params
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.name.clone().into(),
            description: Some(self.description.clone().into()),
            input_schema: Arc::new(input_schema(&self.params)),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Check the declaration and normalize defaults to their canonical form.
    fn validate(&mut self) -> Result<(), ToolError> {
        let mut seen = HashSet::new();
        for spec in &mut self.params {
            if !seen.insert(spec.name().to_string()) {
                return Err(ToolError::DuplicateParameter {
                    tool: self.name.clone(),
                    parameter: spec.name().to_string(),
                });
            }

            if let Some(message) = spec.custom_message() {
                if !message
                    .to_ascii_lowercase()
                    .contains(&spec.name().to_ascii_lowercase())
                {
                    return Err(ToolError::invalid_definition(
                        &self.name,
                        format!(
                            "missing-field message for '{}' does not mention the field",
                            spec.name()
                        ),
                    ));
                }
            }

            if let Some(form) = spec.text_form() {
                if !form.fits(spec.kind()) {
                    return Err(ToolError::invalid_definition(
                        &self.name,
                        format!(
                            "'{}' is {} and cannot accept {:?} text",
                            spec.name(),
                            spec.kind().expectation(false),
                            form
                        ),
                    ));
                }
            }

            if let Some(default) = spec.default_value().cloned() {
                match coerce(spec, &default) {
                    Ok(Some(value)) => spec.set_default(value),
                    Ok(None) | Err(_) => {
                        return Err(ToolError::invalid_definition(
                            &self.name,
                            format!("default for '{}' does not match its kind", spec.name()),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Builder for [`ToolDefinition`].
pub struct ToolDefinitionBuilder {
    name: String,
    description: String,
    params: Vec<ParameterSpec>,
}

impl ToolDefinitionBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn param(mut self, spec: ParameterSpec) -> Self {
        self.params.push(spec);
        self
    }

    pub fn params(mut self, specs: impl IntoIterator<Item = ParameterSpec>) -> Self {
        self.params.extend(specs);
        self
    }

    /// Attach the handler. `state` is cloned into every invocation; it is
    /// how backend capabilities reach the handler.
    pub fn handle<St, F, Fut>(self, state: St, handler: F) -> ToolDefinition
    where
        St: Clone + Send + Sync + 'static,
        F: Fn(St, Arguments, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResultEnvelope, ToolError>> + Send + 'static,
    {
        let handler: ToolHandler =
            Arc::new(move |args, ct| handler(state.clone(), args, ct).boxed());
        ToolDefinition {
            name: self.name,
            description: self.description,
            params: self.params,
            handler,
        }
    }
}

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - every tool the server exposes, in registration order.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool.
    ///
    /// Fails with `DuplicateName` when the name is taken, `DuplicateParameter`
    /// when two fields share a name, and `InvalidDefinition` for unusable
    /// declarations.
    pub fn register(&mut self, mut definition: ToolDefinition) -> Result<(), ToolError> {
        if self.index.contains_key(definition.name()) {
            return Err(ToolError::DuplicateName(definition.name.clone()));
        }
        definition.validate()?;

        self.index
            .insert(definition.name.clone(), self.tools.len());
        self.tools.push(definition);
        Ok(())
    }

    /// Register several tools, stopping at the first failure.
    pub fn register_all(
        &mut self,
        definitions: impl IntoIterator<Item = ToolDefinition>,
    ) -> Result<(), ToolError> {
        for definition in definitions {
            self.register(definition)?;
        }
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&ToolDefinition, ToolError> {
        self.index
            .get(name)
            .map(|&i| &self.tools[i])
            .ok_or_else(|| ToolError::not_found(name))
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn definitions(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter()
    }

    /// Get all tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(ToolDefinition::name).collect()
    }

    /// Get all tools as Tool models (metadata).
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(ToolDefinition::to_tool).collect()
    }

    /// Dispatch one invocation.
    ///
    /// Caller-input and backend failures come back as `Ok` envelopes. `Err`
    /// is reserved for unknown tools and internal failures.
    #[instrument(skip(self, arguments, ct), fields(tool = %name))]
    pub async fn call(
        &self,
        name: &str,
        arguments: &JsonObject,
        ct: CancellationToken,
    ) -> Result<ResultEnvelope, ToolError> {
        debug!("Received");
        let definition = self.lookup(name)?;

        debug!("Extracting");
        let args = match extract(definition.params(), arguments) {
            Ok(args) => args,
            Err(e) => {
                info!(outcome = %Outcome::RejectedInput, "{}", e);
                return Ok(ResultEnvelope::caller_error(e.to_string()));
            }
        };

        debug!("Dispatching");
        match (definition.handler)(args, ct).await {
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
}
