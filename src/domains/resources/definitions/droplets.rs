//! Droplet and image resources.

use std::sync::Arc;

use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use super::fetched;
use crate::backend::{DropletsApi, ImagesApi, ListOptions};
use crate::domains::resources::{PathVars, ResourceDefinition, ResourceError};
use crate::domains::tools::ResultEnvelope;

/// Fields kept per image in the distribution listing.
const IMAGE_FIELDS: [&str; 4] = ["id", "name", "distribution", "type"];

pub struct DropletResources {
    api: Arc<dyn DropletsApi>,
}

impl DropletResources {
    pub fn new(api: Arc<dyn DropletsApi>) -> Self {
        Self { api }
    }

    pub fn definitions(&self) -> Vec<ResourceDefinition> {
        vec![
            ResourceDefinition::builder("droplets://{id}")
                .name("Droplet")
                .description("Returns droplet information")
                .handle(self.api.clone(), droplet),
            ResourceDefinition::builder("droplets://{id}/actions/{action_id}")
                .name("Droplet Action")
                .description("Returns information about a droplet action")
                .handle(self.api.clone(), droplet_action),
        ]
    }
}

async fn droplet(
    api: Arc<dyn DropletsApi>,
    vars: PathVars,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ResourceError> {
    let Some(id) = vars.integer("id")? else {
        return Ok(ResultEnvelope::caller_error("invalid droplet ID"));
    };
    fetched("error fetching droplet", api.get(&ct, id).await)
}

async fn droplet_action(
    api: Arc<dyn DropletsApi>,
    vars: PathVars,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ResourceError> {
    let Some(id) = vars.integer("id")? else {
        return Ok(ResultEnvelope::caller_error("invalid droplet ID"));
    };
    let Some(action_id) = vars.integer("action_id")? else {
        return Ok(ResultEnvelope::caller_error("invalid action ID"));
    };
    fetched("error fetching action", api.get_action(&ct, id, action_id).await)
}

pub struct ImageResources {
    api: Arc<dyn ImagesApi>,
}

impl ImageResources {
    pub fn new(api: Arc<dyn ImagesApi>) -> Self {
        Self { api }
    }

    /// The static listing comes first so `images://distribution` never
    /// reaches the `{id}` template.
    pub fn definitions(&self) -> Vec<ResourceDefinition> {
        vec![
            ResourceDefinition::builder("images://distribution")
                .name("Distribution Images")
                .description("Returns all available distribution images")
                .handle(self.api.clone(), distribution_images),
            ResourceDefinition::builder("images://{id}")
                .name("Image")
                .description("Returns image information")
                .handle(self.api.clone(), image),
        ]
    }
}

async fn distribution_images(
    api: Arc<dyn ImagesApi>,
    _vars: PathVars,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ResourceError> {
    let images = match api.list_distribution(&ct, Some(ListOptions::page(1, 200))).await {
        Ok(images) => images,
        Err(e) => return Ok(ResultEnvelope::backend_error_with("error fetching images", &e)),
    };

    let images = images
        .as_array()
        .ok_or_else(|| ResourceError::internal("image listing is not an array"))?;
    let projected: Vec<Value> = images
        .iter()
        .map(|image| {
            let fields: Map<String, Value> = IMAGE_FIELDS
                .iter()
                .map(|&key| (key.to_string(), image.get(key).cloned().unwrap_or(Value::Null)))
                .collect();
            Value::Object(fields)
        })
        .collect();

    Ok(ResultEnvelope::success(&projected)?)
}

async fn image(
    api: Arc<dyn ImagesApi>,
    vars: PathVars,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ResourceError> {
    let Some(id) = vars.integer("id")? else {
        return Ok(ResultEnvelope::caller_error("invalid image ID"));
    };
    fetched("error fetching image", api.get(&ct, id).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::stub::StubBackend;
    use crate::domains::resources::definitions::testing::{payload, read, service};
    use crate::domains::resources::ResourceService;
    use crate::domains::tools::FailureKind;
    use serde_json::json;

    fn setup() -> (Arc<StubBackend>, ResourceService) {
        let stub = StubBackend::new();
        let mut definitions = DropletResources::new(stub.clone()).definitions();
        definitions.extend(ImageResources::new(stub.clone()).definitions());
        (stub.clone(), service(definitions))
    }

    #[tokio::test]
    async fn test_droplet_by_id() {
        let (stub, service) = setup();
        stub.respond("droplets.get", json!({"id": 42, "name": "web-1"}));

        let envelope = read(&service, "droplets://42").await;
        assert_eq!(payload(&envelope)["name"], "web-1");
        assert_eq!(stub.last_call().unwrap().args, json!({"id": 42}));
    }

    #[tokio::test]
    async fn test_droplet_action_routes_to_nested_template() {
        let (stub, service) = setup();
        let envelope = read(&service, "droplets://42/actions/7").await;

        assert!(envelope.is_success());
        let recorded = stub.last_call().unwrap();
        assert_eq!(recorded.op, "droplets.get_action");
        assert_eq!(recorded.args, json!({"droplet_id": 42, "action_id": 7}));
    }

    #[tokio::test]
    async fn test_non_numeric_ids_are_caller_errors() {
        let (stub, service) = setup();

        let envelope = read(&service, "droplets://web-1").await;
        assert_eq!(envelope.failure_kind(), Some(FailureKind::CallerInput));
        assert_eq!(envelope.text_content(), "invalid droplet ID");

        let envelope = read(&service, "droplets://42/actions/latest").await;
        assert_eq!(envelope.text_content(), "invalid action ID");

        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_distribution_listing_is_projected() {
        let (stub, service) = setup();
        stub.respond(
            "images.list_distribution",
            json!([{
                "id": 7555620,
                "name": "24.04 (LTS) x64",
                "distribution": "Ubuntu",
                "type": "base",
                "regions": ["nyc1"],
                "size_gigabytes": 2.36
            }]),
        );

        let envelope = read(&service, "images://distribution").await;
        assert_eq!(
            payload(&envelope),
            json!([{
                "id": 7555620,
                "name": "24.04 (LTS) x64",
                "distribution": "Ubuntu",
                "type": "base"
            }])
        );
        assert_eq!(
            stub.last_call().unwrap().args,
            json!({"opts": {"page": "1", "per_page": "200"}})
        );
    }

    #[tokio::test]
    async fn test_image_by_id() {
        let (stub, service) = setup();
        read(&service, "images://7555620").await;
        assert_eq!(stub.last_call().unwrap().op, "images.get");
    }

    #[tokio::test]
    async fn test_droplet_fetch_failure() {
        let (stub, service) = setup();
        stub.fail("droplets.get", 404, "droplet not found");

        let envelope = read(&service, "droplets://1").await;
        assert_eq!(envelope.failure_kind(), Some(FailureKind::Backend));
        assert!(envelope
            .text_content()
            .starts_with("error fetching droplet: api error: "));
        assert!(envelope.text_content().contains("droplet not found"));
    }

    #[tokio::test]
    async fn test_read_waits_on_backend_until_cancelled() {
        let (stub, service) = setup();
        stub.hang("droplets.get");
        let ct = CancellationToken::new();

        let mut pending = tokio_test::task::spawn(service.read("droplets://7", ct.clone()));
        tokio_test::assert_pending!(pending.poll());

        ct.cancel();
        let envelope = tokio_test::assert_ready_ok!(pending.poll());
        assert_eq!(envelope.failure_kind(), Some(FailureKind::Backend));
        assert!(envelope.text_content().contains("request canceled"));
    }
}
