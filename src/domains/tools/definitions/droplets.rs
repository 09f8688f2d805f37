//! Droplet tools.
//!
//! Lifecycle (create, delete), lookups, and the listing tool, which trims
//! each droplet down to the fields an agent usually needs.

use std::sync::Arc;

use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use super::{confirm, paged, respond};
use crate::backend::{DropletAction, DropletCreateRequest, DropletsApi, ListOptions, Payload};
use crate::domains::tools::{Arguments, ParameterSpec, ResultEnvelope, ToolDefinition, ToolError};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PER_PAGE: i64 = 50;

/// Kernels are listed in one fixed page.
const KERNELS_PER_PAGE: i64 = 100;

/// Fields kept per droplet by `digitalocean-get-droplets`, in output order.
const LISTED_FIELDS: &[&str] = &[
    "id",
    "name",
    "memory",
    "vcpus",
    "disk",
    "region",
    "image",
    "size",
    "size_slug",
    "backup_ids",
    "next_backup_window",
    "snapshot_ids",
    "features",
    "locked",
    "status",
    "networks",
    "created_at",
    "kernel",
    "tags",
    "volume_ids",
    "vpc_uuid",
];

pub struct DropletTools {
    api: Arc<dyn DropletsApi>,
}

impl DropletTools {
    pub fn new(api: Arc<dyn DropletsApi>) -> Self {
        Self { api }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::builder("digitalocean-create-droplet")
                .description("Create a new droplet")
                .param(ParameterSpec::string("Name").required().describe("Name of the droplet"))
                .param(
                    ParameterSpec::string("Size")
                        .required()
                        .describe("Slug of the droplet size (e.g., s-1vcpu-1gb)"),
                )
                .param(
                    ParameterSpec::number("ImageID")
                        .required()
                        .describe("ID of the image to use"),
                )
                .param(
                    ParameterSpec::string("Region")
                        .required()
                        .describe("Slug of the region (e.g., nyc3)"),
                )
                .param(
                    ParameterSpec::boolean("Backup")
                        .default(false)
                        .describe("Whether to enable backups"),
                )
                .param(
                    ParameterSpec::boolean("Monitoring")
                        .default(false)
                        .describe("Whether to enable monitoring"),
                )
                .handle(self.api.clone(), create_droplet),
            ToolDefinition::builder("digitalocean-delete-droplet")
                .description("Delete a droplet")
                .param(
                    ParameterSpec::number("ID")
                        .required()
                        .describe("ID of the droplet to delete"),
                )
                .handle(self.api.clone(), delete_droplet),
            ToolDefinition::builder("digitalocean-enable-private-net-droplet")
                .description("Enable private networking on a droplet")
                .param(ParameterSpec::number("ID").required().describe("ID of the droplet"))
                .handle(self.api.clone(), enable_private_networking),
            ToolDefinition::builder("digitalocean-get-droplet-kernels")
                .description("Get available kernels for a droplet")
                .param(ParameterSpec::number("ID").required().describe("ID of the droplet"))
                .handle(self.api.clone(), get_kernels),
            ToolDefinition::builder("digitalocean-get-droplet-neighbors")
                .description("Get neighbors of a droplet")
                .param(ParameterSpec::number("ID").required().describe("ID of the droplet"))
                .handle(self.api.clone(), get_neighbors),
            ToolDefinition::builder("digitalocean-get-droplet")
                .description("Get a droplet by its ID")
                .param(
                    ParameterSpec::number("ID")
                        .required_with("Droplet ID is required")
                        .describe("Droplet ID"),
                )
                .handle(self.api.clone(), get_droplet),
            ToolDefinition::builder("digitalocean-get-droplet-action")
                .description("Get a droplet action by droplet ID and action ID")
                .param(ParameterSpec::number("DropletID").required().describe("Droplet ID"))
                .param(ParameterSpec::number("ActionID").required().describe("Action ID"))
                .handle(self.api.clone(), get_droplet_action),
            ToolDefinition::builder("digitalocean-get-droplets")
                .description("List all droplets for the user. Supports pagination.")
                .param(
                    ParameterSpec::number("Page")
                        .default(DEFAULT_PAGE)
                        .describe("Page number"),
                )
                .param(
                    ParameterSpec::number("PerPage")
                        .default(DEFAULT_PER_PAGE)
                        .describe("Items per page"),
                )
                .handle(self.api.clone(), list_droplets),
        ]
    }
}

async fn create_droplet(
    api: Arc<dyn DropletsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let request = DropletCreateRequest {
        name: args.str("Name")?.to_string(),
        region: args.str("Region")?.to_string(),
        size: args.str("Size")?.to_string(),
        image: args.integer("ImageID")?,
        backups: args.bool("Backup")?,
        monitoring: args.bool("Monitoring")?,
    };

    match api.create(&ct, &request).await {
        Ok(droplet) => ResultEnvelope::success(&droplet),
        Err(e) => Ok(ResultEnvelope::backend_error_with("droplet create", &e)),
    }
}

async fn delete_droplet(
    api: Arc<dyn DropletsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let id = args.integer("ID")?;
    confirm(api.delete(&ct, id).await, "Droplet deleted successfully")
}

async fn enable_private_networking(
    api: Arc<dyn DropletsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let id = args.integer("ID")?;
    respond(
        api.perform_action(&ct, id, &DropletAction::EnablePrivateNetworking)
            .await,
    )
}

async fn get_kernels(
    api: Arc<dyn DropletsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let id = args.integer("ID")?;
    let opts = ListOptions::page(1, KERNELS_PER_PAGE);
    respond(api.kernels(&ct, id, Some(opts)).await)
}

async fn get_neighbors(
    api: Arc<dyn DropletsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let id = args.integer("ID")?;
    respond(api.neighbors(&ct, id).await)
}

async fn get_droplet(
    api: Arc<dyn DropletsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let id = args.integer("ID")?;
    respond(api.get(&ct, id).await)
}

async fn get_droplet_action(
    api: Arc<dyn DropletsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let droplet_id = args.integer("DropletID")?;
    let action_id = args.integer("ActionID")?;
    respond(api.get_action(&ct, droplet_id, action_id).await)
}

async fn list_droplets(
    api: Arc<dyn DropletsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let opts = paged(&args, ("Page", DEFAULT_PAGE), ("PerPage", DEFAULT_PER_PAGE))?;
    match api.list(&ct, Some(opts)).await {
        Ok(droplets) => ResultEnvelope::success(&summarize(&droplets)?),
        Err(e) => Ok(ResultEnvelope::backend_error(&e)),
    }
}

/// Keep [`LISTED_FIELDS`] of every droplet; absent fields render as null.
fn summarize(droplets: &Payload) -> Result<Value, ToolError> {
    let droplets = droplets
        .as_array()
        .ok_or_else(|| ToolError::internal("droplet listing is not an array"))?;

    let summaries = droplets
        .iter()
        .map(|droplet| {
            let fields: Map<String, Value> = LISTED_FIELDS
                .iter()
                .map(|&key| {
                    let value = droplet.get(key).cloned().unwrap_or(Value::Null);
                    (key.to_string(), value)
                })
                .collect();
            Value::Object(fields)
        })
        .collect();
    Ok(Value::Array(summaries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::stub::StubBackend;
    use crate::domains::tools::FailureKind;
    use crate::domains::tools::definitions::testing::{call, payload, registry};
    use serde_json::json;

    fn setup() -> (Arc<StubBackend>, crate::domains::tools::ToolRegistry) {
        let stub = StubBackend::new();
        let registry = registry(DropletTools::new(stub.clone()).definitions());
        (stub, registry)
    }

    #[tokio::test]
    async fn test_create_droplet_builds_request() {
        let (stub, registry) = setup();
        let envelope = call(
            &registry,
            "digitalocean-create-droplet",
            json!({"Name": "web-1", "Size": "s-1vcpu-1gb", "ImageID": 12345, "Region": "nyc3"}),
        )
        .await;

        assert!(envelope.is_success());
        let recorded = stub.last_call().unwrap();
        assert_eq!(recorded.op, "droplets.create");
        assert_eq!(
            recorded.args,
            json!({
                "name": "web-1",
                "region": "nyc3",
                "size": "s-1vcpu-1gb",
                "image": 12345,
                "backups": false,
                "monitoring": false
            })
        );
    }

    #[tokio::test]
    async fn test_create_droplet_missing_field_never_reaches_backend() {
        let (stub, registry) = setup();
        let envelope = call(
            &registry,
            "digitalocean-create-droplet",
            json!({"Name": "web-1", "Size": "s-1vcpu-1gb", "Region": "nyc3"}),
        )
        .await;

        assert_eq!(envelope.failure_kind(), Some(FailureKind::CallerInput));
        assert!(envelope.text_content().contains("ImageID"));
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_create_droplet_backend_failure_has_context() {
        let (stub, registry) = setup();
        stub.fail("droplets.create", 422, "Region is not available");
        let envelope = call(
            &registry,
            "digitalocean-create-droplet",
            json!({"Name": "a", "Size": "b", "ImageID": 1, "Region": "c"}),
        )
        .await;

        assert!(envelope.text_content().starts_with("droplet create: api error: "));
        assert!(envelope.text_content().contains("Region is not available"));
    }

    #[tokio::test]
    async fn test_get_droplet_custom_message() {
        let (stub, registry) = setup();
        let envelope = call(&registry, "digitalocean-get-droplet", json!({})).await;
        assert_eq!(envelope.text_content(), "Droplet ID is required");
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_get_droplet_rejects_string_id() {
        let (stub, registry) = setup();
        let envelope = call(&registry, "digitalocean-get-droplet", json!({"ID": "42"})).await;
        assert_eq!(envelope.failure_kind(), Some(FailureKind::CallerInput));
        assert!(envelope.text_content().contains("'ID'"));
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_droplet_confirms() {
        let (stub, registry) = setup();
        let envelope = call(&registry, "digitalocean-delete-droplet", json!({"ID": 7})).await;
        assert_eq!(envelope.text_content(), "Droplet deleted successfully");
        assert_eq!(stub.last_call().unwrap().args, json!({"id": 7}));
    }

    #[tokio::test]
    async fn test_kernels_use_fixed_page() {
        let (stub, registry) = setup();
        call(&registry, "digitalocean-get-droplet-kernels", json!({"ID": 7})).await;
        assert_eq!(
            stub.last_call().unwrap().args,
            json!({"id": 7, "opts": {"page": "1", "per_page": "100"}})
        );
    }

    #[tokio::test]
    async fn test_private_networking_is_an_action() {
        let (stub, registry) = setup();
        call(&registry, "digitalocean-enable-private-net-droplet", json!({"ID": 3})).await;
        assert_eq!(
            stub.last_call().unwrap().args,
            json!({"droplet_id": 3, "action": {"type": "enable_private_networking"}})
        );
    }

    #[tokio::test]
    async fn test_get_droplet_action() {
        let (stub, registry) = setup();
        let envelope = call(&registry, "digitalocean-get-droplet-action", json!({"DropletID": 1})).await;
        assert_eq!(envelope.text_content(), "ActionID is required");
        assert_eq!(stub.call_count(), 0);

        call(
            &registry,
            "digitalocean-get-droplet-action",
            json!({"DropletID": 1, "ActionID": 99}),
        )
        .await;
        assert_eq!(
            stub.last_call().unwrap().args,
            json!({"droplet_id": 1, "action_id": 99})
        );
    }

    #[tokio::test]
    async fn test_list_droplets_projects_fields() {
        let (stub, registry) = setup();
        stub.respond(
            "droplets.list",
            json!([{"id": 1, "name": "web", "status": "active", "secret_internal": "x"}]),
        );

        let envelope = call(&registry, "digitalocean-get-droplets", json!({"PerPage": 0})).await;
        let listed = payload(&envelope);
        let droplet = listed[0].as_object().unwrap();

        assert_eq!(droplet.len(), LISTED_FIELDS.len());
        assert_eq!(droplet["name"], "web");
        assert_eq!(droplet["memory"], Value::Null);
        assert!(!droplet.contains_key("secret_internal"));
        assert_eq!(droplet.keys().next().map(String::as_str), Some("id"));

        assert_eq!(
            stub.last_call().unwrap().args,
            json!({"opts": {"page": "1", "per_page": "50"}})
        );
    }

    #[tokio::test]
    async fn test_cancellation_surfaces_as_backend_failure() {
        let (stub, registry) = setup();
        stub.hang("droplets.get");
        let ct = CancellationToken::new();

        let args = crate::domains::tools::definitions::testing::bag(json!({"ID": 5}));

        let pending = registry.call("digitalocean-get-droplet", &args, ct.clone());
        ct.cancel();
        let envelope = pending.await.unwrap();

        assert_eq!(envelope.failure_kind(), Some(FailureKind::Backend));
        assert!(envelope.text_content().contains("request canceled"));
    }
}
