//! Partner attachment tools.

use std::sync::Arc;

use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::{confirm, page_params, paged, respond};
use crate::backend::{
    PartnerAttachmentCreateRequest, PartnerAttachmentUpdateRequest, PartnerAttachmentsApi,
};
use crate::domains::tools::{
    Arguments, ItemKind, ParameterSpec, ResultEnvelope, ToolDefinition, ToolError,
};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PER_PAGE: i64 = 20;

fn attachment(description: &str) -> ParameterSpec {
    ParameterSpec::string("ID")
        .required()
        .path_segment()
        .describe(description)
}

pub struct PartnerAttachmentTools {
    api: Arc<dyn PartnerAttachmentsApi>,
}

impl PartnerAttachmentTools {
    pub fn new(api: Arc<dyn PartnerAttachmentsApi>) -> Self {
        Self { api }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::builder("digitalocean-partner-attachment-get")
                .description("Get partner attachment information by ID")
                .param(
                    ParameterSpec::string("ID")
                        .required_with("Partner attachment ID is required")
                        .path_segment()
                        .describe("ID of the partner attachment"),
                )
                .handle(self.api.clone(), get_attachment),
            ToolDefinition::builder("digitalocean-partner-attachment-list")
                .description("List partner attachments with pagination")
                .params(page_params(DEFAULT_PAGE, DEFAULT_PER_PAGE))
                .handle(self.api.clone(), list_attachments),
            ToolDefinition::builder("digitalocean-partner-attachment-create")
                .description("Create a new partner attachment")
                .param(
                    ParameterSpec::string("Name")
                        .required()
                        .describe("Name of the partner attachment"),
                )
                .param(
                    ParameterSpec::string("Region")
                        .required()
                        .describe("Region for the partner attachment"),
                )
                .param(
                    ParameterSpec::number("Bandwidth")
                        .required()
                        .describe("Bandwidth in Mbps"),
                )
                .handle(self.api.clone(), create_attachment),
            ToolDefinition::builder("digitalocean-partner-attachment-delete")
                .description("Delete a partner attachment")
                .param(attachment("ID of the partner attachment to delete"))
                .handle(self.api.clone(), delete_attachment),
            ToolDefinition::builder("digitalocean-partner-attachment-get-service-key")
                .description("Get the service key of a partner attachment")
                .param(attachment("ID of the partner attachment"))
                .handle(self.api.clone(), get_service_key),
            ToolDefinition::builder("digitalocean-partner-attachment-get-bgp-config")
                .description("Get the BGP configuration of a partner attachment")
                .param(attachment("ID of the partner attachment"))
                .handle(self.api.clone(), get_bgp_config),
            ToolDefinition::builder("digitalocean-partner-attachment-update")
                .description("Update a partner attachment")
                .param(attachment("ID of the partner attachment to update"))
                .param(
                    ParameterSpec::string("Name")
                        .required()
                        .describe("New name for the partner attachment"),
                )
                .param(
                    ParameterSpec::array("VPCIDs", ItemKind::String)
                        .required()
                        .items(json!({
                            "type": "string",
                            "description": "VPC ID to associate with Partner attachment"
                        }))
                        .describe("VPC ID to associate with the partner attachment"),
                )
                .handle(self.api.clone(), update_attachment),
        ]
    }
}

async fn get_attachment(
    api: Arc<dyn PartnerAttachmentsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    respond(api.get(&ct, args.str("ID")?).await)
}

async fn list_attachments(
    api: Arc<dyn PartnerAttachmentsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let opts = paged(&args, ("Page", DEFAULT_PAGE), ("PerPage", DEFAULT_PER_PAGE))?;
    respond(api.list(&ct, Some(opts)).await)
}

async fn create_attachment(
    api: Arc<dyn PartnerAttachmentsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let request = PartnerAttachmentCreateRequest {
        name: args.str("Name")?.to_string(),
        region: args.str("Region")?.to_string(),
        bandwidth_mbps: args.integer("Bandwidth")?,
    };
    respond(api.create(&ct, &request).await)
}

async fn delete_attachment(
    api: Arc<dyn PartnerAttachmentsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    confirm(
        api.delete(&ct, args.str("ID")?).await,
        "Partner attachment deleted successfully",
    )
}

async fn get_service_key(
    api: Arc<dyn PartnerAttachmentsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    respond(api.get_service_key(&ct, args.str("ID")?).await)
}

async fn get_bgp_config(
    api: Arc<dyn PartnerAttachmentsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    respond(api.get_bgp_auth_key(&ct, args.str("ID")?).await)
}

async fn update_attachment(
    api: Arc<dyn PartnerAttachmentsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let request = PartnerAttachmentUpdateRequest {
        name: args.str("Name")?.to_string(),
        vpc_ids: args.strings("VPCIDs")?,
    };
    respond(api.update(&ct, args.str("ID")?, &request).await)
}
