//! Resource Router - maps a URI onto the registered resource that serves it.
//!
//! Built once at startup, read-only afterwards. When several templates
//! match a URI the most specific wins (more segments, then more literal
//! segments); among equally specific matches the first registered wins.
//! Templates that would match exactly the same URIs are rejected at
//! registration.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use rmcp::model::{AnnotateAble, RawResource, RawResourceTemplate, Resource, ResourceTemplate};
use tokio_util::sync::CancellationToken;

use super::error::ResourceError;
use super::template::{PathVars, UriTemplate};
use crate::domains::tools::{JSON_MIME_TYPE, ResultEnvelope};

/// Boxed future returned by a resource handler.
pub type ResourceFuture = BoxFuture<'static, Result<ResultEnvelope, ResourceError>>;

/// Type-erased resource handler.
pub type ResourceHandler =
    Arc<dyn Fn(PathVars, CancellationToken) -> ResourceFuture + Send + Sync>;

/// A read-only resource addressed by a URI template.
#[derive(Clone)]
pub struct ResourceDefinition {
    template: String,
    name: String,
    description: String,
    mime_type: &'static str,
    handler: ResourceHandler,
}

impl std::fmt::Debug for ResourceDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceDefinition")
            .field("template", &self.template)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ResourceDefinition {
    pub fn builder(template: impl Into<String>) -> ResourceDefinitionBuilder {
        ResourceDefinitionBuilder {
            template: template.into(),
            name: String::new(),
            description: String::new(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub(crate) fn invoke(&self, vars: PathVars, ct: CancellationToken) -> ResourceFuture {
        (self.handler)(vars, ct)
    }

    fn to_resource(&self) -> Resource {
        let mut raw = RawResource::new(self.template.clone(), self.name.clone());
        raw.description = Some(self.description.clone());
        raw.mime_type = Some(self.mime_type.to_string());
        raw.no_annotation()
    }

    fn to_resource_template(&self) -> ResourceTemplate {
        RawResourceTemplate {
            uri_template: self.template.clone(),
            name: self.name.clone(),
            title: None,
            description: Some(self.description.clone()),
            mime_type: Some(self.mime_type.to_string()),
        }
        .no_annotation()
    }
}

/// Builder for [`ResourceDefinition`].
pub struct ResourceDefinitionBuilder {
    template: String,
    name: String,
    description: String,
}

impl ResourceDefinitionBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach the handler; `state` is cloned into every read.
    pub fn handle<St, F, Fut>(self, state: St, handler: F) -> ResourceDefinition
    where
        St: Clone + Send + Sync + 'static,
        F: Fn(St, PathVars, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResultEnvelope, ResourceError>> + Send + 'static,
    {
        let handler: ResourceHandler =
            Arc::new(move |vars, ct| handler(state.clone(), vars, ct).boxed());
        ResourceDefinition {
            template: self.template,
            name: self.name,
            description: self.description,
            mime_type: JSON_MIME_TYPE,
            handler,
        }
    }
}

struct Route {
    template: UriTemplate,
    definition: ResourceDefinition,
}

#[derive(Default)]
pub struct ResourceRouter {
    routes: Vec<Route>,
}

impl ResourceRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource.
    ///
    /// Fails with `InvalidTemplate` for unparsable templates, `DuplicateName`
    /// when the template string is taken, and `AmbiguousTemplate` when an
    /// existing template has the same shape.
    pub fn register(&mut self, definition: ResourceDefinition) -> Result<(), ResourceError> {
        let template = UriTemplate::parse(definition.template())?;

        for route in &self.routes {
            if route.template.as_str() == template.as_str() {
                return Err(ResourceError::DuplicateName(template.to_string()));
            }
            if route.template.same_shape(&template) {
                return Err(ResourceError::AmbiguousTemplate {
                    template: template.to_string(),
                    existing: route.template.to_string(),
                });
            }
        }

        self.routes.push(Route {
            template,
            definition,
        });
        Ok(())
    }

    pub fn register_all(
        &mut self,
        definitions: impl IntoIterator<Item = ResourceDefinition>,
    ) -> Result<(), ResourceError> {
        for definition in definitions {
            self.register(definition)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Find the resource serving `uri` and the variables it captured.
    pub fn route(&self, uri: &str) -> Result<(&ResourceDefinition, PathVars), ResourceError> {
        let mut best: Option<(&Route, PathVars)> = None;
        for route in &self.routes {
            let Some(vars) = route.template.matches(uri) else {
                continue;
            };
            let better = match &best {
                None => true,
                Some((current, _)) => {
                    route.template.specificity() > current.template.specificity()
                }
            };
            if better {
                best = Some((route, vars));
            }
        }

        best.map(|(route, vars)| (&route.definition, vars))
            .ok_or_else(|| ResourceError::no_route(uri))
    }

    /// Templates without variables, listed as plain resources.
    pub fn resources(&self) -> Vec<Resource> {
        self.routes
            .iter()
            .filter(|r| r.template.is_static())
            .map(|r| r.definition.to_resource())
            .collect()
    }

    /// Templates with variables.
    pub fn resource_templates(&self) -> Vec<ResourceTemplate> {
        self.routes
            .iter()
            .filter(|r| !r.template.is_static())
            .map(|r| r.definition.to_resource_template())
            .collect()
    }
}
