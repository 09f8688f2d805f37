//! Firewall and domain resources.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::fetched;
use crate::backend::{DomainsApi, FirewallsApi};
use crate::domains::resources::{PathVars, ResourceDefinition, ResourceError};
use crate::domains::tools::ResultEnvelope;

pub struct FirewallResources {
    api: Arc<dyn FirewallsApi>,
}

impl FirewallResources {
    pub fn new(api: Arc<dyn FirewallsApi>) -> Self {
        Self { api }
    }

    pub fn definitions(&self) -> Vec<ResourceDefinition> {
        vec![
            ResourceDefinition::builder("firewalls://{id}")
                .name("Firewall")
                .description("Returns firewall information")
                .handle(self.api.clone(), firewall),
        ]
    }
}

async fn firewall(
    api: Arc<dyn FirewallsApi>,
    vars: PathVars,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ResourceError> {
    let Some(id) = vars.segment("id")? else {
        return Ok(ResultEnvelope::caller_error("invalid firewall ID"));
    };
    fetched("error fetching firewall", api.get(&ct, id).await)
}

pub struct DomainResources {
    api: Arc<dyn DomainsApi>,
}

impl DomainResources {
    pub fn new(api: Arc<dyn DomainsApi>) -> Self {
        Self { api }
    }

    pub fn definitions(&self) -> Vec<ResourceDefinition> {
        vec![
            ResourceDefinition::builder("domains://{name}")
                .name("Domain")
                .description("Returns domain information")
                .handle(self.api.clone(), domain),
            ResourceDefinition::builder("domains://{name}/records/{record_id}")
                .name("Domain Record")
                .description("Returns information about a domain record")
                .handle(self.api.clone(), domain_record),
        ]
    }
}

async fn domain(
    api: Arc<dyn DomainsApi>,
    vars: PathVars,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ResourceError> {
    let Some(name) = vars.segment("name")? else {
        return Ok(ResultEnvelope::caller_error("invalid domain name"));
    };
    fetched("error fetching domain", api.get(&ct, name).await)
}

async fn domain_record(
    api: Arc<dyn DomainsApi>,
    vars: PathVars,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ResourceError> {
    let Some(name) = vars.segment("name")? else {
        return Ok(ResultEnvelope::caller_error("invalid domain name"));
    };
    let Some(record_id) = vars.integer("record_id")? else {
        return Ok(ResultEnvelope::caller_error("invalid record ID"));
    };
    fetched(
        "error fetching domain record",
        api.get_record(&ct, name, record_id).await,
    )
}
