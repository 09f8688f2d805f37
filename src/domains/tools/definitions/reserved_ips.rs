//! Reserved IPv4 and IPv6 tools.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{confirm, page_params, paged, respond};
use crate::backend::{IpVersion, ReservedIpsApi};
use crate::domains::tools::{Arguments, ParameterSpec, ResultEnvelope, ToolDefinition, ToolError};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PER_PAGE: i64 = 20;

const INVALID_TYPE: &str = "invalid IP type. Use 'ipv4' or 'ipv6'";

fn ip(required: &str, description: &str) -> ParameterSpec {
    ParameterSpec::string("IP")
        .required_with(required)
        .path_segment()
        .describe(description)
}

fn ip_type(verb: &str) -> ParameterSpec {
    ParameterSpec::string("Type")
        .required()
        .describe(format!("Type of IP to {} ('ipv4' or 'ipv6')", verb))
}

pub struct ReservedIpTools {
    api: Arc<dyn ReservedIpsApi>,
}

impl ReservedIpTools {
    pub fn new(api: Arc<dyn ReservedIpsApi>) -> Self {
        Self { api }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::builder("digitalocean-reserved-ipv4-get")
                .description("Get reserved IPv4 information by IP")
                .param(ip("IPv4 address is required", "The reserved IPv4 address"))
                .handle(self.api.clone(), get_ipv4),
            ToolDefinition::builder("digitalocean-reserved-ipv4-list")
                .description("List reserved IPv4 addresses with pagination")
                .params(page_params(DEFAULT_PAGE, DEFAULT_PER_PAGE))
                .handle(self.api.clone(), list_ipv4),
            ToolDefinition::builder("digitalocean-reserved-ipv6-get")
                .description("Get reserved IPv6 information by IP")
                .param(ip("IPv6 address is required", "The reserved IPv6 address"))
                .handle(self.api.clone(), get_ipv6),
            ToolDefinition::builder("digitalocean-reserved-ipv6-list")
                .description("List reserved IPv6 addresses with pagination")
                .params(page_params(DEFAULT_PAGE, DEFAULT_PER_PAGE))
                .handle(self.api.clone(), list_ipv6),
            ToolDefinition::builder("digitalocean-reserved-ip-reserve")
                .description("Reserve a new IPv4 or IPv6")
                .param(
                    ParameterSpec::string("Region")
                        .required()
                        .describe("Region to reserve the IP in"),
                )
                .param(ip_type("reserve"))
                .handle(self.api.clone(), reserve),
            ToolDefinition::builder("digitalocean-reserved-ip-release")
                .description("Release a reserved IPv4 or IPv6")
                .param(ip("IP is required", "The reserved IP to release"))
                .param(ip_type("release"))
                .handle(self.api.clone(), release),
            ToolDefinition::builder("digitalocean-reserved-ip-assign")
                .description("Assign a reserved IP to a droplet")
                .param(ip("IP is required", "The reserved IP to assign"))
                .param(
                    ParameterSpec::number("DropletID")
                        .required()
                        .describe("The ID of the droplet to assign the IP to"),
                )
                .param(ip_type("assign"))
                .handle(self.api.clone(), assign),
            ToolDefinition::builder("digitalocean-reserved-ip-unassign")
                .description("Unassign a reserved IP from a droplet")
                .param(ip("IP is required", "The reserved IP to unassign"))
                .param(ip_type("unassign"))
                .handle(self.api.clone(), unassign),
        ]
    }
}

/// The `Type` selector, or the caller-facing failure for anything else.
fn version(args: &Arguments) -> Result<Result<IpVersion, ResultEnvelope>, ToolError> {
    Ok(IpVersion::from_selector(args.str("Type")?)
        .ok_or_else(|| ResultEnvelope::caller_error(INVALID_TYPE)))
}

async fn get_ipv4(
    api: Arc<dyn ReservedIpsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    respond(api.get(&ct, IpVersion::V4, args.str("IP")?).await)
}

async fn list_ipv4(
    api: Arc<dyn ReservedIpsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let opts = paged(&args, ("Page", DEFAULT_PAGE), ("PerPage", DEFAULT_PER_PAGE))?;
    respond(api.list(&ct, IpVersion::V4, Some(opts)).await)
}

async fn get_ipv6(
    api: Arc<dyn ReservedIpsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    respond(api.get(&ct, IpVersion::V6, args.str("IP")?).await)
}

async fn list_ipv6(
    api: Arc<dyn ReservedIpsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let opts = paged(&args, ("Page", DEFAULT_PAGE), ("PerPage", DEFAULT_PER_PAGE))?;
    respond(api.list(&ct, IpVersion::V6, Some(opts)).await)
}

async fn reserve(
    api: Arc<dyn ReservedIpsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let version = match version(&args)? {
        Ok(version) => version,
        Err(envelope) => return Ok(envelope),
    };
    respond(api.reserve(&ct, version, args.str("Region")?).await)
}

async fn release(
    api: Arc<dyn ReservedIpsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let version = match version(&args)? {
        Ok(version) => version,
        Err(envelope) => return Ok(envelope),
    };
    confirm(
        api.release(&ct, version, args.str("IP")?).await,
        "reserved IP released successfully",
    )
}

async fn assign(
    api: Arc<dyn ReservedIpsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let version = match version(&args)? {
        Ok(version) => version,
        Err(envelope) => return Ok(envelope),
    };
    respond(
        api.assign(&ct, version, args.str("IP")?, args.integer("DropletID")?)
            .await,
    )
}

async fn unassign(
    api: Arc<dyn ReservedIpsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let version = match version(&args)? {
        Ok(version) => version,
        Err(envelope) => return Ok(envelope),
    };
    respond(api.unassign(&ct, version, args.str("IP")?).await)
}
