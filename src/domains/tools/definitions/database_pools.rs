//! Connection pool tools for managed database clusters.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{confirm, respond};
use crate::backend::{DatabasePoolRequest, DatabasesApi};
use crate::domains::tools::{Arguments, ParameterSpec, ResultEnvelope, ToolDefinition, ToolError};

/// The `ID` cluster field used by pool and replica tools.
pub(super) fn cluster(description: &str) -> ParameterSpec {
    ParameterSpec::string("ID")
        .required_with("Cluster ID is required")
        .path_segment()
        .describe(description)
}

/// Both fields arrive as text.
pub(super) fn text_pagination() -> [ParameterSpec; 2] {
    [
        ParameterSpec::number("page")
            .numeric_text()
            .describe("Page number for pagination"),
        ParameterSpec::number("per_page")
            .numeric_text()
            .describe("Number of results per page"),
    ]
}

fn pool_name(description: &str) -> ParameterSpec {
    ParameterSpec::string("name")
        .required_with("Pool name is required")
        .path_segment()
        .describe(description)
}

/// `database`, `mode` and `size`, shared by create and update.
fn pool_settings() -> [ParameterSpec; 3] {
    [
        ParameterSpec::string("database")
            .required_with("Database is required")
            .describe("The database for the pool"),
        ParameterSpec::string("mode")
            .required_with("Mode is required")
            .describe("The pool mode"),
        ParameterSpec::number("size")
            .required_with("Size is required and must be a number")
            .describe("The pool size (number of connections)"),
    ]
}

pub struct DatabasePoolTools {
    api: Arc<dyn DatabasesApi>,
}

impl DatabasePoolTools {
    pub fn new(api: Arc<dyn DatabasesApi>) -> Self {
        Self { api }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let [page, per_page] = text_pagination();
        let [create_database, create_mode, create_size] = pool_settings();
        let [update_database, update_mode, update_size] = pool_settings();

        vec![
            ToolDefinition::builder("digitalocean-dbaas-cluster-list-pools")
                .description("List connection pools for a cluster by its ID")
                .param(cluster("The cluster UUID"))
                .param(page)
                .param(per_page)
                .handle(self.api.clone(), list_pools),
            ToolDefinition::builder("digitalocean-dbaas-cluster-create-pool")
                .description("Create a connection pool for a cluster by its ID")
                .param(cluster("The cluster UUID"))
                .param(
                    ParameterSpec::string("user")
                        .required_with("User is required")
                        .describe("The user for the pool"),
                )
                .param(pool_name("The pool name"))
                .param(create_database)
                .param(create_mode)
                .param(create_size)
                .handle(self.api.clone(), create_pool),
            ToolDefinition::builder("digitalocean-dbaas-cluster-get-pool")
                .description("Get a connection pool for a cluster by its ID and pool name")
                .param(cluster("The cluster UUID"))
                .param(pool_name("The pool name to get"))
                .handle(self.api.clone(), get_pool),
            ToolDefinition::builder("digitalocean-dbaas-cluster-delete-pool")
                .description("Delete a connection pool for a cluster by its ID and pool name")
                .param(cluster("The cluster UUID"))
                .param(pool_name("The pool name to delete"))
                .handle(self.api.clone(), delete_pool),
            ToolDefinition::builder("digitalocean-dbaas-cluster-update-pool")
                .description("Update a connection pool for a cluster by its ID and pool name")
                .param(cluster("The cluster UUID"))
                .param(pool_name("The pool name to update"))
                .param(
                    ParameterSpec::string("user")
                        .describe("The user for the pool (optional)"),
                )
                .param(update_database)
                .param(update_mode)
                .param(update_size)
                .handle(self.api.clone(), update_pool),
        ]
    }
}

fn pool_request(args: &Arguments, name: Option<&str>) -> Result<DatabasePoolRequest, ToolError> {
    Ok(DatabasePoolRequest {
        name: name.map(str::to_string),
        user: args.opt_str("user")?.map(str::to_string),
        database: args.str("database")?.to_string(),
        mode: args.str("mode")?.to_string(),
        size: args.integer("size")?,
    })
}

async fn list_pools(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let opts = args.list_options("page", "per_page")?;
    respond(api.list_pools(&ct, args.str("ID")?, opts).await)
}

async fn create_pool(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let request = pool_request(&args, Some(args.str("name")?))?;
    respond(api.create_pool(&ct, args.str("ID")?, &request).await)
}

async fn get_pool(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    respond(api.get_pool(&ct, args.str("ID")?, args.str("name")?).await)
}

async fn delete_pool(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    confirm(
        api.delete_pool(&ct, args.str("ID")?, args.str("name")?).await,
        "Pool deleted successfully",
    )
}

async fn update_pool(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    // The pool is addressed by the path; its name is not resent.
    let request = pool_request(&args, None)?;
    confirm(
        api.update_pool(&ct, args.str("ID")?, args.str("name")?, &request)
            .await,
        "Pool updated successfully",
    )
}
