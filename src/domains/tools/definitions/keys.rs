//! SSH key tools.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{confirm, page_params, paged, respond};
use crate::backend::{AccountApi, KeyCreateRequest};
use crate::domains::tools::{Arguments, ParameterSpec, ResultEnvelope, ToolDefinition, ToolError};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PER_PAGE: i64 = 30;

pub struct KeyTools {
    api: Arc<dyn AccountApi>,
}

impl KeyTools {
    pub fn new(api: Arc<dyn AccountApi>) -> Self {
        Self { api }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::builder("key-create")
                .description("Create a new SSH key")
                .param(
                    ParameterSpec::string("Name")
                        .required()
                        .describe("Name of the SSH key"),
                )
                .param(
                    ParameterSpec::string("PublicKey")
                        .required()
                        .describe("Public key content"),
                )
                .handle(self.api.clone(), create_key),
            ToolDefinition::builder("key-delete")
                .description("Delete an SSH key")
                .param(
                    ParameterSpec::number("ID")
                        .required()
                        .describe("ID of the SSH key to delete"),
                )
                .handle(self.api.clone(), delete_key),
            ToolDefinition::builder("key-get")
                .description("Get a specific SSH key by ID")
                .param(
                    ParameterSpec::number("ID")
                        .required_with("Key ID is required")
                        .describe("ID of the SSH key"),
                )
                .handle(self.api.clone(), get_key),
            ToolDefinition::builder("key-list")
                .description("List SSH keys with pagination")
                .params(page_params(DEFAULT_PAGE, DEFAULT_PER_PAGE))
                .handle(self.api.clone(), list_keys),
        ]
    }
}

async fn create_key(
    api: Arc<dyn AccountApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let request = KeyCreateRequest {
        name: args.str("Name")?.to_string(),
        public_key: args.str("PublicKey")?.to_string(),
    };
    respond(api.create_key(&ct, &request).await)
}

async fn delete_key(
    api: Arc<dyn AccountApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    confirm(
        api.delete_key(&ct, args.integer("ID")?).await,
        "SSH key deleted successfully",
    )
}

async fn get_key(
    api: Arc<dyn AccountApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    respond(api.get_key(&ct, args.integer("ID")?).await)
}

async fn list_keys(
    api: Arc<dyn AccountApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let opts = paged(&args, ("Page", DEFAULT_PAGE), ("PerPage", DEFAULT_PER_PAGE))?;
    respond(api.list_keys(&ct, Some(opts)).await)
}
