//! Service selection.
//!
//! Decides which service areas are exposed and builds the tool registry and
//! resource service for them. The `common` area (regions) is always on.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use super::resources::definitions::{
    AccountResources, DatabaseResources, DomainResources, DropletResources, FirewallResources,
    ImageResources, RegionResources,
};
use super::resources::{ResourceDefinition, ResourceError, ResourceService};
use super::tools::definitions::{
    AccountTools, CertificateTools, DatabaseAccessTools, DatabaseClusterTools, DatabasePoolTools,
    DatabaseReplicaTools, DomainTools, DropletActionTools, DropletTools, FirewallTools, ImageTools,
    KafkaTools, KeyTools, PartnerAttachmentTools, RegionTools, ReservedIpTools, SizeTools, VpcTools,
};
use super::tools::{ToolDefinition, ToolError, ToolRegistry};
use crate::backend::Backend;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unsupported service: {name}, supported services are: {supported}")]
    UnsupportedService { name: String, supported: String },

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// A selectable service area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Droplets,
    Networking,
    Databases,
    Accounts,
}

impl Service {
    pub const ALL: [Service; 4] = [
        Service::Droplets,
        Service::Networking,
        Service::Databases,
        Service::Accounts,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Service::Droplets => "droplets",
            Service::Networking => "networking",
            Service::Databases => "databases",
            Service::Accounts => "accounts",
        }
    }

    fn supported() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    fn tools(self, backend: &Backend) -> Vec<ToolDefinition> {
        match self {
            Service::Droplets => {
                let mut tools = DropletTools::new(backend.droplets.clone()).definitions();
                tools.extend(DropletActionTools::new(backend.droplets.clone()).definitions());
                tools.extend(ImageTools::new(backend.images.clone()).definitions());
                tools.extend(SizeTools::new(backend.droplets.clone()).definitions());
                tools
            }
            Service::Networking => {
                let mut tools = FirewallTools::new(backend.firewalls.clone()).definitions();
                tools.extend(DomainTools::new(backend.domains.clone()).definitions());
                tools.extend(ReservedIpTools::new(backend.reserved_ips.clone()).definitions());
                tools.extend(CertificateTools::new(backend.certificates.clone()).definitions());
                tools.extend(VpcTools::new(backend.vpcs.clone()).definitions());
                tools.extend(
                    PartnerAttachmentTools::new(backend.partner_attachments.clone()).definitions(),
                );
                tools
            }
            Service::Databases => {
                let databases = &backend.databases;
                let mut tools = DatabaseClusterTools::new(databases.clone()).definitions();
                tools.extend(KafkaTools::new(databases.clone()).definitions());
                tools.extend(DatabaseAccessTools::new(databases.clone()).definitions());
                tools.extend(DatabasePoolTools::new(databases.clone()).definitions());
                tools.extend(DatabaseReplicaTools::new(databases.clone()).definitions());
                tools
            }
            Service::Accounts => {
                let mut tools = AccountTools::new(backend.account.clone()).definitions();
                tools.extend(KeyTools::new(backend.account.clone()).definitions());
                tools
            }
        }
    }

    fn resources(self, backend: &Backend) -> Vec<ResourceDefinition> {
        match self {
            Service::Droplets => {
                let mut resources = DropletResources::new(backend.droplets.clone()).definitions();
                resources.extend(ImageResources::new(backend.images.clone()).definitions());
                resources
            }
            Service::Networking => {
                let mut resources = FirewallResources::new(backend.firewalls.clone()).definitions();
                resources.extend(DomainResources::new(backend.domains.clone()).definitions());
                resources
            }
            Service::Databases => DatabaseResources::new(backend.databases.clone()).definitions(),
            Service::Accounts => AccountResources::new(backend.account.clone()).definitions(),
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Service {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|service| service.as_str() == s)
            .ok_or_else(|| CatalogError::UnsupportedService {
                name: s.to_string(),
                supported: Self::supported(),
            })
    }
}

/// Resolve service names. Blank entries are skipped and repeats collapse;
/// an empty selection means every supported service.
pub fn select_services<S: AsRef<str>>(names: &[S]) -> Result<Vec<Service>, CatalogError> {
    let mut selected = Vec::new();
    for name in names {
        let name = name.as_ref().trim();
        if name.is_empty() {
            continue;
        }
        let service = name.parse::<Service>()?;
        if !selected.contains(&service) {
            selected.push(service);
        }
    }

    if selected.is_empty() {
        warn!("no services specified, loading all supported services");
        return Ok(Service::ALL.to_vec());
    }
    Ok(selected)
}

/// Everything the server exposes, built once at startup.
pub struct Catalog {
    pub tools: Arc<ToolRegistry>,
    pub resources: Arc<ResourceService>,
}

impl Catalog {
    pub fn build(backend: &Backend, services: &[Service]) -> Result<Self, CatalogError> {
        let mut tools = ToolRegistry::new();
        let mut resources = Vec::new();

        tools.register_all(RegionTools::new(backend.regions.clone()).definitions())?;
        resources.extend(RegionResources::new(backend.regions.clone()).definitions());

        for service in services {
            info!(service = %service, "Registering service");
            tools.register_all(service.tools(backend))?;
            resources.extend(service.resources(backend));
        }

        let resources = ResourceService::from_definitions(resources)?;
        info!(
            tools = tools.len(),
            resources = resources.len(),
            "Catalog built"
        );

        Ok(Self {
            tools: Arc::new(tools),
            resources: Arc::new(resources),
        })
    }
}
