//! Domain and DNS record tools.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{confirm, paged, respond};
use crate::backend::{DomainCreateRequest, DomainRecordRequest, DomainsApi};
use crate::domains::tools::{Arguments, ParameterSpec, ResultEnvelope, ToolDefinition, ToolError};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PER_PAGE: i64 = 20;

const DOMAIN_NAME_REQUIRED: &str = "Domain name is required";

fn page() -> ParameterSpec {
    ParameterSpec::number("Page")
        .default(DEFAULT_PAGE)
        .describe("Page number")
}

fn per_page() -> ParameterSpec {
    ParameterSpec::number("PerPage")
        .default(DEFAULT_PER_PAGE)
        .describe("Items per page")
}

fn domain() -> ParameterSpec {
    ParameterSpec::string("Domain")
        .required_with(DOMAIN_NAME_REQUIRED)
        .path_segment()
        .describe("Domain name")
}

fn record_fields() -> [ParameterSpec; 3] {
    [
        ParameterSpec::string("Type")
            .required()
            .describe("Record type (e.g., A, CNAME, TXT)"),
        ParameterSpec::string("Name").required().describe("Record name"),
        ParameterSpec::string("Data").required().describe("Record data"),
    ]
}

pub struct DomainTools {
    api: Arc<dyn DomainsApi>,
}

impl DomainTools {
    pub fn new(api: Arc<dyn DomainsApi>) -> Self {
        Self { api }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let [record_type, record_name, record_data] = record_fields();
        let [edit_type, edit_name, edit_data] = record_fields();

        vec![
            ToolDefinition::builder("domain-get")
                .description("Get domain information by name")
                .param(
                    ParameterSpec::string("Name")
                        .required_with(DOMAIN_NAME_REQUIRED)
                        .path_segment()
                        .describe("Name of the domain"),
                )
                .handle(self.api.clone(), get_domain),
            ToolDefinition::builder("domain-list")
                .description("List domains with pagination")
                .param(page())
                .param(per_page())
                .handle(self.api.clone(), list_domains),
            ToolDefinition::builder("domain-record-get")
                .description("Get a domain record by domain name and record ID")
                .param(domain())
                .param(
                    ParameterSpec::number("RecordID")
                        .required()
                        .describe("ID of the domain record"),
                )
                .handle(self.api.clone(), get_record),
            ToolDefinition::builder("domain-record-list")
                .description("List domain records for a domain with pagination")
                .param(domain())
                .param(page())
                .param(per_page())
                .handle(self.api.clone(), list_records),
            ToolDefinition::builder("domain-create")
                .description("Create a new domain")
                .param(ParameterSpec::string("Name").required().describe("Name of the domain"))
                .param(
                    ParameterSpec::string("IPAddress")
                        .required()
                        .describe("IP address for the domain"),
                )
                .handle(self.api.clone(), create_domain),
            ToolDefinition::builder("domain-delete")
                .description("Delete a domain")
                .param(
                    ParameterSpec::string("Name")
                        .required()
                        .path_segment()
                        .describe("Name of the domain to delete"),
                )
                .handle(self.api.clone(), delete_domain),
            ToolDefinition::builder("domain-record-create")
                .description("Create a new domain record")
                .param(domain())
                .param(record_type)
                .param(record_name)
                .param(record_data)
                .handle(self.api.clone(), create_record),
            ToolDefinition::builder("domain-record-delete")
                .description("Delete a domain record")
                .param(domain())
                .param(
                    ParameterSpec::number("RecordID")
                        .required()
                        .describe("ID of the record to delete"),
                )
                .handle(self.api.clone(), delete_record),
            ToolDefinition::builder("domain-record-edit")
                .description("Edit a domain record")
                .param(domain())
                .param(
                    ParameterSpec::number("RecordID")
                        .required()
                        .describe("ID of the record to edit"),
                )
                .param(edit_type)
                .param(edit_name)
                .param(edit_data)
                .handle(self.api.clone(), edit_record),
        ]
    }
}

fn record_request(args: &Arguments) -> Result<DomainRecordRequest, ToolError> {
    Ok(DomainRecordRequest {
        record_type: args.str("Type")?.to_string(),
        name: args.str("Name")?.to_string(),
        data: args.str("Data")?.to_string(),
    })
}

async fn get_domain(
    api: Arc<dyn DomainsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    respond(api.get(&ct, args.str("Name")?).await)
}

async fn list_domains(
    api: Arc<dyn DomainsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let opts = paged(&args, ("Page", DEFAULT_PAGE), ("PerPage", DEFAULT_PER_PAGE))?;
    respond(api.list(&ct, Some(opts)).await)
}

async fn get_record(
    api: Arc<dyn DomainsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let record_id = args.integer("RecordID")?;
    respond(api.get_record(&ct, args.str("Domain")?, record_id).await)
}

async fn list_records(
    api: Arc<dyn DomainsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let opts = paged(&args, ("Page", DEFAULT_PAGE), ("PerPage", DEFAULT_PER_PAGE))?;
    respond(api.list_records(&ct, args.str("Domain")?, Some(opts)).await)
}

async fn create_domain(
    api: Arc<dyn DomainsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let request = DomainCreateRequest {
        name: args.str("Name")?.to_string(),
        ip_address: args.str("IPAddress")?.to_string(),
    };
    respond(api.create(&ct, &request).await)
}

async fn delete_domain(
    api: Arc<dyn DomainsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    confirm(
        api.delete(&ct, args.str("Name")?).await,
        "Domain deleted successfully",
    )
}

async fn create_record(
    api: Arc<dyn DomainsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let request = record_request(&args)?;
    respond(api.create_record(&ct, args.str("Domain")?, &request).await)
}

async fn delete_record(
    api: Arc<dyn DomainsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let record_id = args.integer("RecordID")?;
    confirm(
        api.delete_record(&ct, args.str("Domain")?, record_id).await,
        "Record deleted successfully",
    )
}

async fn edit_record(
    api: Arc<dyn DomainsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let record_id = args.integer("RecordID")?;
    let request = record_request(&args)?;
    respond(
        api.edit_record(&ct, args.str("Domain")?, record_id, &request)
            .await,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::stub::StubBackend;
    use crate::domains::tools::ToolRegistry;
    use crate::domains::tools::definitions::testing::{call, payload, registry};
    use serde_json::json;

    fn setup() -> (Arc<StubBackend>, ToolRegistry) {
        let stub = StubBackend::new();
        let registry = registry(DomainTools::new(stub.clone()).definitions());
        (stub, registry)
    }

    #[tokio::test]
    async fn test_domain_get_missing_name() {
        let (stub, registry) = setup();
        let envelope = call(&registry, "domain-get", json!({})).await;
        assert_eq!(envelope.text_content(), "Domain name is required");
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_domain_get_returns_payload() {
        let (stub, registry) = setup();
        stub.respond("domains.get", json!({"name": "example.com", "ttl": 1800}));

        let envelope = call(&registry, "domain-get", json!({"Name": "example.com"})).await;
        assert_eq!(payload(&envelope), json!({"name": "example.com", "ttl": 1800}));
        assert_eq!(stub.last_call().unwrap().args, json!({"name": "example.com"}));
    }

    #[tokio::test]
    async fn test_record_list_defaults() {
        let (stub, registry) = setup();
        call(&registry, "domain-record-list", json!({"Domain": "example.com"})).await;
        assert_eq!(
            stub.last_call().unwrap().args,
            json!({"domain": "example.com", "opts": {"page": "1", "per_page": "20"}})
        );
    }

    #[tokio::test]
    async fn test_record_get_requires_record_id() {
        let (stub, registry) = setup();
        let envelope = call(&registry, "domain-record-get", json!({"Domain": "example.com"})).await;
        assert_eq!(envelope.text_content(), "RecordID is required");
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_record_edit_builds_request() {
        let (stub, registry) = setup();
        let envelope = call(
            &registry,
            "domain-record-edit",
            json!({"Domain": "example.com", "RecordID": 3352896, "Type": "A", "Name": "www", "Data": "1.2.3.4"}),
        )
        .await;

        assert!(envelope.is_success());
        let recorded = stub.last_call().unwrap();
        assert_eq!(recorded.op, "domains.edit_record");
        assert_eq!(
            recorded.args,
            json!({
                "domain": "example.com",
                "record_id": 3352896,
                "record": {"type": "A", "name": "www", "data": "1.2.3.4"}
            })
        );
    }

    #[tokio::test]
    async fn test_delete_confirmations() {
        let (_stub, registry) = setup();
        let envelope = call(&registry, "domain-delete", json!({"Name": "example.com"})).await;
        assert_eq!(envelope.text_content(), "Domain deleted successfully");

        let envelope = call(
            &registry,
            "domain-record-delete",
            json!({"Domain": "example.com", "RecordID": 1}),
        )
        .await;
        assert_eq!(envelope.text_content(), "Record deleted successfully");
    }
}
