//! Managed database cluster tools.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{confirm, respond};
use crate::backend::{
    DatabaseCreateRequest, DatabaseResizeRequest, DatabasesApi, OnlineMigrationRequest,
    OnlineMigrationSource,
};
use crate::domains::tools::{
    Arguments, ItemKind, ParameterSpec, ResultEnvelope, ToolDefinition, ToolError,
};

pub(super) const CLUSTER_ID_REQUIRED: &str = "Cluster id is required";

/// The cluster `id` field shared by every cluster-scoped tool.
pub(super) fn cluster_id(description: &str) -> ParameterSpec {
    ParameterSpec::string("id")
        .required_with(CLUSTER_ID_REQUIRED)
        .path_segment()
        .describe(description)
}

/// `page` arrives as text from most callers; `per_page` is a plain number.
pub(super) fn pagination() -> [ParameterSpec; 2] {
    [
        ParameterSpec::number("page")
            .numeric_text()
            .describe("Page number for pagination (optional, integer as string)"),
        ParameterSpec::number("per_page")
            .describe("Number of results per page (optional, integer)"),
    ]
}

pub struct DatabaseClusterTools {
    api: Arc<dyn DatabasesApi>,
}

impl DatabaseClusterTools {
    pub fn new(api: Arc<dyn DatabasesApi>) -> Self {
        Self { api }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let [page, per_page] = pagination();
        let [backups_page, backups_per_page] = pagination();

        vec![
            ToolDefinition::builder("db-cluster-list")
                .description("Get list of  Cluster")
                .param(page)
                .param(per_page)
                .handle(self.api.clone(), list_clusters),
            ToolDefinition::builder("db-cluster-get")
                .description("Get a cluster by its id")
                .param(cluster_id("The id of the cluster to retrieve"))
                .handle(self.api.clone(), get_cluster),
            ToolDefinition::builder("db-cluster-create")
                .description("Create a new database cluster")
                .param(ParameterSpec::string("name").required().describe("The name of the cluster"))
                .param(
                    ParameterSpec::string("engine")
                        .required()
                        .describe("The engine slug (e.g., valkey, pg, mysql, etc.)"),
                )
                .param(
                    ParameterSpec::string("version")
                        .required()
                        .describe("The version of the engine"),
                )
                .param(
                    ParameterSpec::string("region")
                        .required()
                        .describe("The region slug (e.g., nyc1)"),
                )
                .param(
                    ParameterSpec::string("size")
                        .required()
                        .describe("The size slug (e.g., db-s-2vcpu-4gb)"),
                )
                .param(
                    ParameterSpec::number("num_nodes")
                        .required()
                        .describe("The number of nodes"),
                )
                .param(
                    ParameterSpec::array("tags", ItemKind::String)
                        .delimited()
                        .describe("Comma-separated tags to apply to the cluster"),
                )
                .handle(self.api.clone(), create_cluster),
            ToolDefinition::builder("db-cluster-delete")
                .description("Delete a database cluster by its id")
                .param(cluster_id("The id of the cluster to delete"))
                .handle(self.api.clone(), delete_cluster),
            ToolDefinition::builder("db-cluster-resize")
                .description(
                    "Resize a database cluster by its id. At least one of size, num_nodes, \
                     or storage_size_mib must be provided.",
                )
                .param(cluster_id("The id of the cluster to resize"))
                .param(
                    ParameterSpec::string("size")
                        .describe("The new size slug (e.g., db-s-2vcpu-4gb)"),
                )
                .param(ParameterSpec::number("num_nodes").describe("The new number of nodes"))
                .param(
                    ParameterSpec::number("storage_size_mib")
                        .describe("The new storage size in MiB"),
                )
                .handle(self.api.clone(), resize_cluster),
            ToolDefinition::builder("db-cluster-list-backups")
                .description("List backups for a database cluster by its id")
                .param(cluster_id("The id of the cluster to list backups for"))
                .param(backups_page)
                .param(backups_per_page)
                .handle(self.api.clone(), list_backups),
            ToolDefinition::builder("db-cluster-get-ca")
                .description("Get the CA certificate for a cluster by its id")
                .param(cluster_id("The id of the cluster to retrieve the CA for"))
                .handle(self.api.clone(), get_ca),
            ToolDefinition::builder("db-cluster-list-options")
                .description(
                    "List available database options (engines, versions, sizes, regions, etc) \
                     for DigitalOcean managed databases.",
                )
                .handle(self.api.clone(), list_options),
            ToolDefinition::builder("db-cluster-upgrade-major-version")
                .description(
                    "Upgrade the major version of a database cluster by its id. Requires the \
                     target version.",
                )
                .param(cluster_id("The cluster UUID"))
                .param(
                    ParameterSpec::string("version")
                        .required_with("Target version is required")
                        .describe("The target major version to upgrade to (e.g., 15 for PostgreSQL)"),
                )
                .handle(self.api.clone(), upgrade_major_version),
            ToolDefinition::builder("db-cluster-start-online-migration")
                .description("Start an online migration for a database cluster by its id.")
                .param(cluster_id("The cluster UUID"))
                .param(
                    ParameterSpec::object("source")
                        .required_with(
                            "Missing or invalid 'source' object (expected structured object)",
                        )
                        .shape::<OnlineMigrationSource>()
                        .describe(
                            "The source database configuration: host, port, dbname, username, \
                             password",
                        ),
                )
                .param(
                    ParameterSpec::boolean("disable_ssl")
                        .describe("Disable SSL on source connection (optional)"),
                )
                .param(
                    ParameterSpec::array("ignore_dbs", ItemKind::String)
                        .delimited()
                        .describe("Comma-separated list of databases to ignore"),
                )
                .handle(self.api.clone(), start_online_migration),
            ToolDefinition::builder("db-cluster-stop-online-migration")
                .description(
                    "Stop an online migration for a database cluster by its id and migration_id.",
                )
                .param(cluster_id("The cluster UUID"))
                .param(
                    ParameterSpec::string("migration_id")
                        .required()
                        .path_segment()
                        .describe("The migration id to stop"),
                )
                .handle(self.api.clone(), stop_online_migration),
            ToolDefinition::builder("db-cluster-get-migration")
                .description("Get the online migration status for a database cluster by its id.")
                .param(cluster_id("The cluster UUID"))
                .handle(self.api.clone(), get_online_migration),
        ]
    }
}

async fn list_clusters(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let opts = args.list_options("page", "per_page")?;
    respond(api.list(&ct, opts).await)
}

async fn get_cluster(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    respond(api.get(&ct, args.str("id")?).await)
}

async fn create_cluster(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let request = DatabaseCreateRequest {
        name: args.str("name")?.to_string(),
        engine: args.str("engine")?.to_string(),
        version: args.str("version")?.to_string(),
        region: args.str("region")?.to_string(),
        size: args.str("size")?.to_string(),
        num_nodes: args.integer("num_nodes")?,
        tags: args.strings("tags")?,
    };
    respond(api.create(&ct, &request).await)
}

async fn delete_cluster(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    confirm(
        api.delete(&ct, args.str("id")?).await,
        "Cluster deleted successfully",
    )
}

async fn resize_cluster(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    // Zero and negative values leave the field untouched.
    let request = DatabaseResizeRequest {
        size: args.opt_str("size")?.map(str::to_string),
        num_nodes: args.opt_integer("num_nodes")?.filter(|n| *n > 0),
        storage_size_mib: args
            .opt_integer("storage_size_mib")?
            .filter(|n| *n > 0)
            .map(|n| n as u64),
    };
    confirm(
        api.resize(&ct, args.str("id")?, &request).await,
        "Cluster resize initiated successfully",
    )
}

async fn list_backups(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let opts = args.list_options("page", "per_page")?;
    respond(api.list_backups(&ct, args.str("id")?, opts).await)
}

async fn get_ca(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    respond(api.get_ca(&ct, args.str("id")?).await)
}

async fn list_options(
    api: Arc<dyn DatabasesApi>,
    _args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    respond(api.list_options(&ct).await)
}

async fn upgrade_major_version(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    confirm(
        api.upgrade_major_version(&ct, args.str("id")?, args.str("version")?)
            .await,
        "Major version upgrade initiated successfully",
    )
}

async fn start_online_migration(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let source = args
        .decode("source")?
        .ok_or_else(|| ToolError::internal("argument 'source' is absent"))?;
    let request = OnlineMigrationRequest {
        source,
        disable_ssl: args.opt_bool("disable_ssl")?.unwrap_or(false),
        ignore_dbs: args.strings("ignore_dbs")?,
    };
    respond(api.start_online_migration(&ct, args.str("id")?, &request).await)
}

async fn stop_online_migration(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    confirm(
        api.stop_online_migration(&ct, args.str("id")?, args.str("migration_id")?)
            .await,
        "Online migration stopped successfully",
    )
}

async fn get_online_migration(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    respond(api.get_online_migration(&ct, args.str("id")?).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::stub::StubBackend;
    use crate::domains::tools::{FailureKind, ToolRegistry};
    use crate::domains::tools::definitions::testing::{call, registry};
    use serde_json::{Value, json};

    fn setup() -> (Arc<StubBackend>, ToolRegistry) {
        let stub = StubBackend::new();
        let registry = registry(DatabaseClusterTools::new(stub.clone()).definitions());
        (stub, registry)
    }

    #[tokio::test]
    async fn test_list_without_pagination_passes_unset() {
        let (stub, registry) = setup();
        call(&registry, "db-cluster-list", json!({})).await;
        assert_eq!(stub.last_call().unwrap().args, json!({"opts": Value::Null}));
    }

    #[tokio::test]
    async fn test_list_accepts_page_as_text() {
        let (stub, registry) = setup();
        call(&registry, "db-cluster-list", json!({"page": "2", "per_page": 10})).await;
        assert_eq!(
            stub.last_call().unwrap().args,
            json!({"opts": {"page": "2", "per_page": "10"}})
        );
    }

    #[tokio::test]
    async fn test_cluster_id_required_everywhere() {
        let (stub, registry) = setup();
        for tool in [
            "db-cluster-get",
            "db-cluster-delete",
            "db-cluster-resize",
            "db-cluster-list-backups",
            "db-cluster-get-ca",
            "db-cluster-upgrade-major-version",
            "db-cluster-start-online-migration",
            "db-cluster-stop-online-migration",
            "db-cluster-get-migration",
        ] {
            let envelope = call(&registry, tool, json!({})).await;
            assert_eq!(envelope.text_content(), "Cluster id is required", "{}", tool);
        }
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_dot_segment_ids_are_caller_errors() {
        let (stub, registry) = setup();
        for id in ["..", "."] {
            let envelope = call(&registry, "db-cluster-delete", json!({ "id": id })).await;
            assert_eq!(envelope.failure_kind(), Some(FailureKind::CallerInput));
            assert_eq!(
                envelope.text_content(),
                "Invalid id: '.' and '..' are not valid IDs"
            );
        }
        assert_eq!(stub.call_count(), 0);

        // Slashes are left for the client to encode into the one segment.
        call(&registry, "db-cluster-delete", json!({"id": "../droplets/123"})).await;
        assert_eq!(stub.last_call().unwrap().args, json!({"id": "../droplets/123"}));
    }

    #[tokio::test]
    async fn test_create_splits_tags() {
        let (stub, registry) = setup();
        let envelope = call(
            &registry,
            "db-cluster-create",
            json!({
                "name": "db1",
                "engine": "pg",
                "version": "16",
                "region": "nyc1",
                "size": "db-s-1vcpu-1gb",
                "num_nodes": 1,
                "tags": "prod, web ,,"
            }),
        )
        .await;

        assert!(envelope.is_success());
        assert_eq!(stub.last_call().unwrap().args["tags"], json!(["prod", "web"]));
    }

    #[tokio::test]
    async fn test_create_requires_num_nodes() {
        let (stub, registry) = setup();
        let envelope = call(
            &registry,
            "db-cluster-create",
            json!({"name": "db1", "engine": "pg", "version": "16", "region": "nyc1", "size": "s"}),
        )
        .await;
        assert_eq!(envelope.failure_kind(), Some(FailureKind::CallerInput));
        assert!(envelope.text_content().contains("num_nodes"));
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_resize_only_sends_given_fields() {
        let (stub, registry) = setup();
        let envelope = call(
            &registry,
            "db-cluster-resize",
            json!({"id": "abc", "num_nodes": 3, "storage_size_mib": 0}),
        )
        .await;

        assert_eq!(envelope.text_content(), "Cluster resize initiated successfully");
        assert_eq!(
            stub.last_call().unwrap().args,
            json!({"id": "abc", "request": {"num_nodes": 3}})
        );
    }

    #[tokio::test]
    async fn test_backend_failure_is_tagged() {
        let (stub, registry) = setup();
        stub.fail("databases.get", 404, "cluster not found");
        let envelope = call(&registry, "db-cluster-get", json!({"id": "abc"})).await;
        assert_eq!(envelope.failure_kind(), Some(FailureKind::Backend));
        assert!(envelope.text_content().contains("api error"));
        assert!(envelope.text_content().contains("cluster not found"));
    }

    #[tokio::test]
    async fn test_upgrade_requires_target_version() {
        let (stub, registry) = setup();
        let envelope = call(
            &registry,
            "db-cluster-upgrade-major-version",
            json!({"id": "abc"}),
        )
        .await;
        assert_eq!(envelope.text_content(), "Target version is required");
        assert_eq!(stub.call_count(), 0);

        let envelope = call(
            &registry,
            "db-cluster-upgrade-major-version",
            json!({"id": "abc", "version": "16"}),
        )
        .await;
        assert_eq!(envelope.text_content(), "Major version upgrade initiated successfully");
        assert_eq!(
            stub.last_call().unwrap().args,
            json!({"id": "abc", "version": "16"})
        );
    }

    #[tokio::test]
    async fn test_start_online_migration_builds_request() {
        let (stub, registry) = setup();
        stub.respond(
            "databases.start_online_migration",
            json!({"id": "m1", "status": "running"}),
        );
        let envelope = call(
            &registry,
            "db-cluster-start-online-migration",
            json!({
                "id": "abc",
                "source": {"host": "10.0.0.5", "port": 5432, "dbname": "app"},
                "ignore_dbs": "tmp, scratch"
            }),
        )
        .await;

        assert!(envelope.is_success());
        assert_eq!(
            stub.last_call().unwrap().args,
            json!({
                "id": "abc",
                "request": {
                    "source": {"host": "10.0.0.5", "port": 5432, "dbname": "app"},
                    "disable_ssl": false,
                    "ignore_dbs": ["tmp", "scratch"]
                }
            })
        );
    }

    #[tokio::test]
    async fn test_migration_source_must_be_structured() {
        let (stub, registry) = setup();

        let envelope = call(
            &registry,
            "db-cluster-start-online-migration",
            json!({"id": "abc"}),
        )
        .await;
        assert_eq!(
            envelope.text_content(),
            "Missing or invalid 'source' object (expected structured object)"
        );

        let envelope = call(
            &registry,
            "db-cluster-start-online-migration",
            json!({"id": "abc", "source": {"hostname": "db"}}),
        )
        .await;
        assert_eq!(envelope.failure_kind(), Some(FailureKind::CallerInput));
        assert!(envelope.text_content().contains("hostname"));
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_stop_online_migration() {
        let (stub, registry) = setup();
        let envelope = call(
            &registry,
            "db-cluster-stop-online-migration",
            json!({"id": "abc", "migration_id": "m1"}),
        )
        .await;
        assert_eq!(envelope.text_content(), "Online migration stopped successfully");
        assert_eq!(
            stub.last_call().unwrap().args,
            json!({"id": "abc", "migration_id": "m1"})
        );
    }

    #[tokio::test]
    async fn test_list_options_takes_no_arguments() {
        let (stub, registry) = setup();
        stub.respond("databases.list_options", json!({"pg": {"versions": ["15", "16"]}}));
        let envelope = call(&registry, "db-cluster-list-options", json!({})).await;
        assert!(envelope.text_content().contains("versions"));
        assert_eq!(stub.last_call().unwrap().op, "databases.list_options");
    }
}
