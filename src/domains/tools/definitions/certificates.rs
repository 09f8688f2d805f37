//! TLS certificate tools.

use std::sync::Arc;

use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::{confirm, page_params, paged, respond};
use crate::backend::{CertificateRequest, CertificatesApi};
use crate::domains::tools::{
    Arguments, ItemKind, ParameterSpec, ResultEnvelope, ToolDefinition, ToolError,
};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PER_PAGE: i64 = 20;

fn certificate_id(description: &str) -> ParameterSpec {
    ParameterSpec::string("ID")
        .required_with("Certificate ID is required")
        .path_segment()
        .describe(description)
}

fn name() -> ParameterSpec {
    ParameterSpec::string("Name")
        .required()
        .describe("Name of the certificate")
}

pub struct CertificateTools {
    api: Arc<dyn CertificatesApi>,
}

impl CertificateTools {
    pub fn new(api: Arc<dyn CertificatesApi>) -> Self {
        Self { api }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::builder("digitalocean-certificate-get")
                .description("Get certificate information by ID")
                .param(certificate_id("ID of the certificate"))
                .handle(self.api.clone(), get_certificate),
            ToolDefinition::builder("digitalocean-certificate-list")
                .description("List certificates with pagination")
                .params(page_params(DEFAULT_PAGE, DEFAULT_PER_PAGE))
                .handle(self.api.clone(), list_certificates),
            ToolDefinition::builder("digitalocean-custom-certificate-create")
                .description("Create a new custom certificate")
                .param(name())
                .param(
                    ParameterSpec::string("PrivateKey")
                        .required()
                        .describe("Private key for the certificate"),
                )
                .param(
                    ParameterSpec::string("LeafCertificate")
                        .required()
                        .describe("Leaf certificate"),
                )
                .param(
                    ParameterSpec::string("CertificateChain")
                        .required()
                        .describe("Certificate chain"),
                )
                .handle(self.api.clone(), create_custom),
            ToolDefinition::builder("digitalocean-lets-encrypt-certificate-create")
                .description("Create a new let's encrypt certificate")
                .param(name())
                .param(
                    ParameterSpec::array("DnsNames", ItemKind::String)
                        .required()
                        .items(json!({
                            "type": "string",
                            "description": "DNS name for the certificate, including wildcard domains"
                        }))
                        .describe("DNS names of the certificate"),
                )
                .handle(self.api.clone(), create_lets_encrypt),
            ToolDefinition::builder("digitalocean-certificate-delete")
                .description("Delete a certificate")
                .param(certificate_id("ID of the certificate to delete"))
                .handle(self.api.clone(), delete_certificate),
        ]
    }
}

async fn get_certificate(
    api: Arc<dyn CertificatesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    respond(api.get(&ct, args.str("ID")?).await)
}

async fn list_certificates(
    api: Arc<dyn CertificatesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let opts = paged(&args, ("Page", DEFAULT_PAGE), ("PerPage", DEFAULT_PER_PAGE))?;
    respond(api.list(&ct, Some(opts)).await)
}

async fn create_custom(
    api: Arc<dyn CertificatesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let request = CertificateRequest::Custom {
        name: args.str("Name")?.to_string(),
        private_key: args.str("PrivateKey")?.to_string(),
        leaf_certificate: args.str("LeafCertificate")?.to_string(),
        certificate_chain: args.str("CertificateChain")?.to_string(),
    };
    respond(api.create(&ct, &request).await)
}

async fn create_lets_encrypt(
    api: Arc<dyn CertificatesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let request = CertificateRequest::LetsEncrypt {
        name: args.str("Name")?.to_string(),
        dns_names: args.strings("DnsNames")?,
    };
    respond(api.create(&ct, &request).await)
}

async fn delete_certificate(
    api: Arc<dyn CertificatesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    confirm(
        api.delete(&ct, args.str("ID")?).await,
        "Certificate deleted successfully",
    )
}
