//! Database users and trusted-source rules.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::databases::{cluster_id, pagination};
use super::{confirm, respond};
use crate::backend::{
    DatabaseFirewallRule, DatabaseUserCreateRequest, DatabaseUserSettings,
    DatabaseUserUpdateRequest, DatabasesApi, MySqlUserSettings,
};
use crate::domains::tools::{
    Arguments, ItemKind, ParameterSpec, ResultEnvelope, ToolDefinition, ToolError,
};

const USER_REQUIRED: &str = "User name is required";

fn user(description: &str) -> ParameterSpec {
    ParameterSpec::string("user")
        .required_with(USER_REQUIRED)
        .path_segment()
        .describe(description)
}

fn settings() -> ParameterSpec {
    ParameterSpec::object("settings_json")
        .json_text()
        .shape::<DatabaseUserSettings>()
        .describe("Raw JSON for DatabaseUserSettings (optional)")
}

/// Firewall tools address the cluster as `ID`.
fn firewall_cluster() -> ParameterSpec {
    ParameterSpec::string("ID")
        .required_with("Cluster ID is required")
        .path_segment()
        .describe("The cluster UUID")
}

pub struct DatabaseAccessTools {
    api: Arc<dyn DatabasesApi>,
}

impl DatabaseAccessTools {
    pub fn new(api: Arc<dyn DatabasesApi>) -> Self {
        Self { api }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let [page, per_page] = pagination();

        vec![
            ToolDefinition::builder("digitalocean-dbaascluster-get-user")
                .description("Get a database user by cluster id and user name")
                .param(cluster_id("The cluster id (UUID)"))
                .param(user("The user name"))
                .handle(self.api.clone(), get_user),
            ToolDefinition::builder("digitalocean-dbaascluster-list-users")
                .description("List database users for a cluster by its id")
                .param(cluster_id("The cluster id (UUID)"))
                .param(page)
                .param(per_page)
                .handle(self.api.clone(), list_users),
            ToolDefinition::builder("digitalocean-dbaascluster-create-user")
                .description("Create a database user for a cluster by its id")
                .param(cluster_id("The cluster id (UUID)"))
                .param(
                    ParameterSpec::string("name")
                        .required_with(USER_REQUIRED)
                        .describe("The user name"),
                )
                .param(
                    ParameterSpec::string("mysql_auth_plugin")
                        .describe("MySQL auth plugin (optional, e.g., mysql_native_password)"),
                )
                .param(settings())
                .handle(self.api.clone(), create_user),
            ToolDefinition::builder("digitalocean-dbaascluster-update-user")
                .description("Update a database user for a cluster by its id and user name")
                .param(cluster_id("The cluster id (UUID)"))
                .param(user("The user name"))
                .param(settings())
                .handle(self.api.clone(), update_user),
            ToolDefinition::builder("digitalocean-dbaascluster-delete-user")
                .description("Delete a database user by cluster id and user name")
                .param(cluster_id("The cluster UUID"))
                .param(user("The user name to delete"))
                .handle(self.api.clone(), delete_user),
            ToolDefinition::builder("digitalocean-dbaascluster-get-firewall-rules")
                .description("Get the firewall rules for a cluster by its ID")
                .param(firewall_cluster())
                .handle(self.api.clone(), get_firewall_rules),
            ToolDefinition::builder("digitalocean-dbaascluster-update-firewall-rules")
                .description("Update the firewall rules for a cluster by its ID")
                .param(firewall_cluster())
                .param(
                    ParameterSpec::array("rules_json", ItemKind::Object)
                        .json_text()
                        .shape::<DatabaseFirewallRule>()
                        .required_with("rules_json is required (JSON array of firewall rules)")
                        .describe("JSON array of firewall rules to set"),
                )
                .handle(self.api.clone(), update_firewall_rules),
        ]
    }
}

async fn get_user(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    respond(api.get_user(&ct, args.str("id")?, args.str("user")?).await)
}

async fn list_users(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let opts = args.list_options("page", "per_page")?;
    respond(api.list_users(&ct, args.str("id")?, opts).await)
}

async fn create_user(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let request = DatabaseUserCreateRequest {
        name: args.str("name")?.to_string(),
        mysql_settings: args.opt_str("mysql_auth_plugin")?.map(|plugin| MySqlUserSettings {
            auth_plugin: plugin.to_string(),
        }),
        settings: args.decode("settings_json")?,
    };
    respond(api.create_user(&ct, args.str("id")?, &request).await)
}

async fn update_user(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let request = DatabaseUserUpdateRequest {
        settings: args.decode("settings_json")?,
    };
    respond(
        api.update_user(&ct, args.str("id")?, args.str("user")?, &request)
            .await,
    )
}

async fn delete_user(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    confirm(
        api.delete_user(&ct, args.str("id")?, args.str("user")?).await,
        "User deleted successfully",
    )
}

async fn get_firewall_rules(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    respond(api.get_firewall_rules(&ct, args.str("ID")?).await)
}

async fn update_firewall_rules(
    api: Arc<dyn DatabasesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let rules: Vec<DatabaseFirewallRule> = args.decode_each("rules_json")?;
    confirm(
        api.update_firewall_rules(&ct, args.str("ID")?, &rules).await,
        "Firewall rules updated successfully",
    )
}
