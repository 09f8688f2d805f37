//! VPC and VPC peering tools.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{confirm, respond};
use crate::backend::{VpcCreateRequest, VpcPeeringCreateRequest, VpcsApi};
use crate::domains::tools::{Arguments, ParameterSpec, ResultEnvelope, ToolDefinition, ToolError};

fn id(description: &str) -> ParameterSpec {
    ParameterSpec::string("ID")
        .required()
        .path_segment()
        .describe(description)
}

pub struct VpcTools {
    api: Arc<dyn VpcsApi>,
}

impl VpcTools {
    pub fn new(api: Arc<dyn VpcsApi>) -> Self {
        Self { api }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::builder("digitalocean-vpc-create")
                .description("Create a new VPC")
                .param(ParameterSpec::string("Name").required().describe("Name of the VPC"))
                .param(
                    ParameterSpec::string("Region")
                        .required()
                        .describe("Region slug (e.g., nyc3)"),
                )
                .handle(self.api.clone(), create_vpc),
            ToolDefinition::builder("digitalocean-vpc-list-members")
                .description("List members of a VPC")
                .param(id("ID of the VPC"))
                .handle(self.api.clone(), list_members),
            ToolDefinition::builder("digitalocean-vpc-delete")
                .description("Delete a VPC")
                .param(id("ID of the VPC to delete"))
                .handle(self.api.clone(), delete_vpc),
            ToolDefinition::builder("digitalocean-vpc-peering-create")
                .description("Create a new VPC Peering connection between two VPCs")
                .param(
                    ParameterSpec::string("Name")
                        .required()
                        .describe("Name for the Peering connection"),
                )
                .param(ParameterSpec::string("Vpc1").required().describe("ID of the first VPC"))
                .param(ParameterSpec::string("Vpc2").required().describe("ID of the second VPC"))
                .handle(self.api.clone(), create_peering),
            ToolDefinition::builder("digitalocean-vpc-peering-delete")
                .description("Delete a VPC Peering connection")
                .param(id("ID of the VPC Peering connection to delete"))
                .handle(self.api.clone(), delete_peering),
        ]
    }
}

async fn create_vpc(
    api: Arc<dyn VpcsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let request = VpcCreateRequest {
        name: args.str("Name")?.to_string(),
        region_slug: args.str("Region")?.to_string(),
    };
    respond(api.create(&ct, &request).await)
}

async fn list_members(
    api: Arc<dyn VpcsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    respond(api.list_members(&ct, args.str("ID")?, None).await)
}

async fn delete_vpc(
    api: Arc<dyn VpcsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    confirm(api.delete(&ct, args.str("ID")?).await, "VPC deleted successfully")
}

async fn create_peering(
    api: Arc<dyn VpcsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let request = VpcPeeringCreateRequest {
        name: args.str("Name")?.to_string(),
        vpc_ids: vec![args.str("Vpc1")?.to_string(), args.str("Vpc2")?.to_string()],
    };
    respond(api.create_peering(&ct, &request).await)
}

async fn delete_peering(
    api: Arc<dyn VpcsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    confirm(
        api.delete_peering(&ct, args.str("ID")?).await,
        "VPC peering connection deleted",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::stub::StubBackend;
    use crate::domains::tools::ToolRegistry;
    use crate::domains::tools::definitions::testing::{call, registry};
    use serde_json::{Value, json};

    fn setup() -> (Arc<StubBackend>, ToolRegistry) {
        let stub = StubBackend::new();
        let registry = registry(VpcTools::new(stub.clone()).definitions());
        (stub, registry)
    }

    #[tokio::test]
    async fn test_create_vpc_sends_region_slug() {
        let (stub, registry) = setup();
        call(
            &registry,
            "digitalocean-vpc-create",
            json!({"Name": "env-prod", "Region": "nyc3"}),
        )
        .await;
        assert_eq!(
            stub.last_call().unwrap().args,
            json!({"name": "env-prod", "region": "nyc3"})
        );
    }

    #[tokio::test]
    async fn test_peering_joins_both_vpcs() {
        let (stub, registry) = setup();
        let envelope = call(
            &registry,
            "digitalocean-vpc-peering-create",
            json!({"Name": "prod-to-staging", "Vpc1": "vpc-a", "Vpc2": "vpc-b"}),
        )
        .await;
        assert!(envelope.is_success());
        assert_eq!(
            stub.last_call().unwrap().args,
            json!({"name": "prod-to-staging", "vpc_ids": ["vpc-a", "vpc-b"]})
        );

        let envelope = call(
            &registry,
            "digitalocean-vpc-peering-create",
            json!({"Name": "half", "Vpc1": "vpc-a"}),
        )
        .await;
        assert_eq!(envelope.text_content(), "Vpc2 is required");
    }

    #[tokio::test]
    async fn test_list_members_is_unpaged() {
        let (stub, registry) = setup();
        call(&registry, "digitalocean-vpc-list-members", json!({"ID": "vpc-a"})).await;
        assert_eq!(
            stub.last_call().unwrap().args,
            json!({"id": "vpc-a", "opts": Value::Null})
        );
    }

    #[tokio::test]
    async fn test_delete_confirmations() {
        let (stub, registry) = setup();
        let envelope = call(&registry, "digitalocean-vpc-delete", json!({"ID": "vpc-a"})).await;
        assert_eq!(envelope.text_content(), "VPC deleted successfully");

        let envelope =
            call(&registry, "digitalocean-vpc-peering-delete", json!({"ID": "p-1"})).await;
        assert_eq!(envelope.text_content(), "VPC peering connection deleted");
        assert_eq!(stub.call_count(), 2);
    }
}
