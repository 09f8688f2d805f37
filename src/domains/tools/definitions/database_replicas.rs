//! Read replica tools for managed database clusters.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::database_pools::{cluster, text_pagination};
use super::{confirm, respond};
use crate::backend::{DatabaseReplicaCreateRequest, DatabasesApi};
use crate::domains::tools::{
    Arguments, ItemKind, ParameterSpec, ResultEnvelope, ToolDefinition, ToolError,
};

fn replica_name(description: &str) -> ParameterSpec {
    ParameterSpec::string("name")
        .required_with("Replica name is required")
        .path_segment()
        .describe(description)
}

pub struct DatabaseReplicaTools {
    api: Arc<dyn DatabasesApi>,
}

impl DatabaseReplicaTools {
    pub fn new(api: Arc<dyn DatabasesApi>) -> Self {
        Self { api }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let [page, per_page] = text_pagination();

        vec![
            ToolDefinition::builder("digitalocean-dbaas-cluster-get-replica")
                .description("Get a replica for a cluster by its ID and replica name")
                .param(cluster("The cluster UUID"))
                .param(replica_name("The replica name to get"))
                .handle(self.api.clone(), get_replica),
            ToolDefinition::builder("digitalocean-dbaas-cluster-list-replicas")
                .description("List replicas for a cluster by its ID")
                .param(cluster("The cluster UUID"))
                .param(page)
                .param(per_page)
                .handle(self.api.clone(), list_replicas),
            ToolDefinition::builder("digitalocean-dbaas-cluster-create-replica")
                .description("Create a replica for a cluster by its ID")
                .param(cluster("The cluster UUID"))
                .param(replica_name("The replica name to create"))
                .param(
                    ParameterSpec::string("region")
                        .required_with("Replica region is required")
                        .describe("The region for the replica"),
                )
                .param(
                    ParameterSpec::string("size")
                        .required_with("Replica size is required")
                        .describe("The size slug for the replica"),
                )
                .param(
                    ParameterSpec::string("private_network_uuid")
                        .describe("The private network UUID (optional)"),
                )
                .param(
                    ParameterSpec::array("tags", ItemKind::String)
                        .delimited()
                        .describe("Comma-separated tags to apply to the replica (optional)"),
                )
                .param(
                    ParameterSpec::number("storage_size_mib")
                        .describe("The storage size in MiB (optional)"),
                )
                .handle(self.api.clone(), create_replica),
            ToolDefinition::builder("digitalocean-dbaas-cluster-delete-replica")
                .description("Delete a replica for a cluster by its ID and replica name")
                .param(cluster("The cluster UUID"))
                .param(replica_name("The replica name to delete"))
                .handle(self.api.clone(), delete_replica),
            ToolDefinition::builder("digitalocean-dbaas-cluster-promote-replica")
                .description("Promote a replica to primary for a cluster by its ID and replica name")
                .param(cluster("The cluster UUID"))
                .param(replica_name("The replica name to promote"))
                .handle(self.api.clone(), promote_replica),
        ]
    }
}

async fn get_replica(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    respond(api.get_replica(&ct, args.str("ID")?, args.str("name")?).await)
}

async fn list_replicas(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let opts = args.list_options("page", "per_page")?;
    respond(api.list_replicas(&ct, args.str("ID")?, opts).await)
}

async fn create_replica(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let request = DatabaseReplicaCreateRequest {
        name: args.str("name")?.to_string(),
        region: args.str("region")?.to_string(),
        size: args.str("size")?.to_string(),
        private_network_uuid: args.opt_str("private_network_uuid")?.map(str::to_string),
        tags: args.strings("tags")?,
        // Zero and negative sizes fall back to the plan default.
        storage_size_mib: args
            .opt_integer("storage_size_mib")?
            .filter(|n| *n > 0)
            .map(|n| n as u64),
    };
    respond(api.create_replica(&ct, args.str("ID")?, &request).await)
}

async fn delete_replica(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    confirm(
        api.delete_replica(&ct, args.str("ID")?, args.str("name")?).await,
        "Replica deleted successfully",
    )
}

async fn promote_replica(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    confirm(
        api.promote_replica(&ct, args.str("ID")?, args.str("name")?).await,
        "Replica promoted to primary successfully",
    )
}
