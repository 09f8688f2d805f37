//! Kafka topic and configuration tools for managed database clusters.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::databases::{cluster_id, pagination};
use super::{confirm, respond};
use crate::backend::{
    DatabasesApi, KafkaConfig, TopicConfig, TopicCreateRequest, TopicUpdateRequest,
};
use crate::domains::tools::{
    Arguments, ItemKind, ParameterSpec, ResultEnvelope, ToolDefinition, ToolError,
};

const CLUSTER_UUID: &str = "The cluster UUID";

fn topic_name(description: &str) -> ParameterSpec {
    ParameterSpec::string("name")
        .required_with("Topic name is required")
        .path_segment()
        .describe(description)
}

fn flag(name: &str, description: &str) -> ParameterSpec {
    ParameterSpec::boolean(name).boolean_text().describe(description)
}

/// `partition_count`, `replication_factor` and `config_json`, shared by
/// create and update.
fn topic_settings() -> [ParameterSpec; 3] {
    [
        ParameterSpec::number("partition_count")
            .numeric_text()
            .describe("Number of partitions (optional, integer as string)"),
        ParameterSpec::number("replication_factor")
            .numeric_text()
            .describe("Replication factor (optional, integer as string)"),
        ParameterSpec::object("config_json")
            .json_text()
            .shape::<TopicConfig>()
            .describe("TopicConfig as JSON (optional)"),
    ]
}

pub struct KafkaTools {
    api: Arc<dyn DatabasesApi>,
}

impl KafkaTools {
    pub fn new(api: Arc<dyn DatabasesApi>) -> Self {
        Self { api }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let [page, per_page] = pagination();
        let [create_partitions, create_replication, create_config] = topic_settings();
        let [update_partitions, update_replication, update_topic_config] = topic_settings();

        vec![
            ToolDefinition::builder("digitalocean-databases-cluster-list-topics")
                .description(
                    "List topics for a database cluster by its id (Kafka clusters). Supports all \
                     ListOptions: page, per_page, with_projects, only_deployed, public_only, \
                     usecases (comma-separated).",
                )
                .param(cluster_id(CLUSTER_UUID))
                .param(page)
                .param(per_page)
                .param(flag(
                    "with_projects",
                    "Whether to include project_id fields (optional, bool as string)",
                ))
                .param(flag(
                    "only_deployed",
                    "Only list deployed agents (optional, bool as string)",
                ))
                .param(flag(
                    "public_only",
                    "Include only public models (optional, bool as string)",
                ))
                .param(
                    ParameterSpec::array("usecases", ItemKind::String)
                        .delimited()
                        .describe("Comma-separated usecases to filter (optional)"),
                )
                .handle(self.api.clone(), list_topics),
            ToolDefinition::builder("digitalocean-databases-cluster-create-topic")
                .description(
                    "Create a topic for a Kafka database cluster by its id. Accepts name \
                     (required), partition_count, replication_factor, and config_json \
                     (TopicConfig as JSON, all optional).",
                )
                .param(cluster_id(CLUSTER_UUID))
                .param(topic_name("The topic name to create"))
                .param(create_partitions)
                .param(create_replication)
                .param(create_config)
                .handle(self.api.clone(), create_topic),
            ToolDefinition::builder("digitalocean-databases-cluster-get-topic")
                .description("Get a topic for a Kafka database cluster by its id and topic name.")
                .param(cluster_id(CLUSTER_UUID))
                .param(topic_name("The topic name to get"))
                .handle(self.api.clone(), get_topic),
            ToolDefinition::builder("digitalocean-databases-cluster-delete-topic")
                .description(
                    "Delete a topic for a Kafka database cluster by its id and topic name.",
                )
                .param(cluster_id(CLUSTER_UUID))
                .param(topic_name("The topic name to delete"))
                .handle(self.api.clone(), delete_topic),
            ToolDefinition::builder("digitalocean-databases-cluster-update-topic")
                .description(
                    "Update a topic for a Kafka database cluster by its id and topic name. \
                     Accepts partition_count, replication_factor, and config_json (TopicConfig \
                     as JSON, all optional).",
                )
                .param(cluster_id(CLUSTER_UUID))
                .param(topic_name("The topic name to update"))
                .param(update_partitions)
                .param(update_replication)
                .param(update_topic_config)
                .handle(self.api.clone(), update_topic),
            ToolDefinition::builder("digitalocean-databases-cluster-get-kafka-config")
                .description("Get the Kafka config for a cluster by its id")
                .param(cluster_id(CLUSTER_UUID))
                .handle(self.api.clone(), get_config),
            ToolDefinition::builder("digitalocean-databases-cluster-update-kafka-config")
                .description(
                    "Update the Kafka config for a cluster by its id. Accepts a JSON string for \
                     the config.",
                )
                .param(cluster_id(CLUSTER_UUID))
                .param(
                    ParameterSpec::object("config_json")
                        .json_text()
                        .shape::<KafkaConfig>()
                        .required_with("config_json is required (JSON for KafkaConfig)")
                        .describe("JSON for the KafkaConfig to set"),
                )
                .handle(self.api.clone(), update_config),
        ]
    }
}

/// Counts that do not fit a `u32` are dropped, like unset ones.
fn count(args: &Arguments, name: &str) -> Result<Option<u32>, ToolError> {
    Ok(args.opt_integer(name)?.and_then(|n| u32::try_from(n).ok()))
}

async fn list_topics(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let mut opts = args.list_options("page", "per_page")?.unwrap_or_default();
    opts.with_projects = args.opt_bool("with_projects")?;
    opts.deployed = args.opt_bool("only_deployed")?;
    opts.public_only = args.opt_bool("public_only")?;
    opts.usecases = args.strings("usecases")?;

    respond(api.list_topics(&ct, args.str("id")?, Some(opts)).await)
}

async fn create_topic(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let request = TopicCreateRequest {
        name: args.str("name")?.to_string(),
        partition_count: count(&args, "partition_count")?,
        replication_factor: count(&args, "replication_factor")?,
        config: args.decode("config_json")?,
    };
    respond(api.create_topic(&ct, args.str("id")?, &request).await)
}

async fn get_topic(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    respond(api.get_topic(&ct, args.str("id")?, args.str("name")?).await)
}

async fn delete_topic(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    confirm(
        api.delete_topic(&ct, args.str("id")?, args.str("name")?).await,
        "Topic deleted successfully",
    )
}

async fn update_topic(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let request = TopicUpdateRequest {
        partition_count: count(&args, "partition_count")?,
        replication_factor: count(&args, "replication_factor")?,
        config: args.decode("config_json")?,
    };
    confirm(
        api.update_topic(&ct, args.str("id")?, args.str("name")?, &request)
            .await,
        "Topic updated successfully",
    )
}

async fn get_config(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    respond(api.get_kafka_config(&ct, args.str("id")?).await)
}

async fn update_config(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let config: KafkaConfig = args
        .decode("config_json")?
        .ok_or_else(|| ToolError::internal("argument 'config_json' is absent"))?;
    confirm(
        api.update_kafka_config(&ct, args.str("id")?, &config).await,
        "Kafka config updated successfully",
    )
}
