//! Backend adapter boundary.
//!
//! Tool and resource handlers never talk to the cloud API directly. They
//! receive the capability they need (one of the `*Api` traits below) at
//! registration time and call it with typed request values built only from
//! extracted arguments.
//!
//! Every method takes the invocation's [`CancellationToken`]. The framework
//! imposes no timeout and never retries; a cancelled call surfaces as
//! [`BackendError::Canceled`].

mod client;
mod requests;
#[cfg(test)]
pub(crate) mod stub;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

pub use client::{ClientConfig, DigitalOceanClient};
pub use requests::*;

/// Opaque response payload returned by the backend.
///
/// Key order is preserved as received so the rendered JSON matches the
/// backend's declared field order.
pub type Payload = serde_json::Value;

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Failures of a remote operation.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The API answered with a non-success status.
    #[error("{method} {url}: {status} {message}")]
    Api {
        method: String,
        url: String,
        status: u16,
        message: String,
    },

    /// The request never produced a response.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The caller cancelled the invocation while the request was in flight.
    #[error("request canceled")]
    Canceled,

    /// A path segment that would escape its endpoint.
    #[error("invalid path segment '{0}'")]
    InvalidPath(String),

    /// The response body was not what the endpoint promises.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl BackendError {
    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}

// ============================================================================
// Capability traits
// ============================================================================

/// Region catalogue.
#[async_trait]
pub trait RegionsApi: Send + Sync {
    async fn list(&self, ct: &CancellationToken, opts: Option<ListOptions>)
    -> BackendResult<Payload>;
}

/// Account level information.
#[async_trait]
pub trait AccountApi: Send + Sync {
    async fn get_account(&self, ct: &CancellationToken) -> BackendResult<Payload>;

    async fn get_balance(&self, ct: &CancellationToken) -> BackendResult<Payload>;

    async fn get_action(&self, ct: &CancellationToken, id: i64) -> BackendResult<Payload>;

    async fn list_actions(
        &self,
        ct: &CancellationToken,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload>;

    async fn list_billing_history(
        &self,
        ct: &CancellationToken,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload>;

    async fn list_invoices(
        &self,
        ct: &CancellationToken,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload>;

    async fn get_key(&self, ct: &CancellationToken, id: i64) -> BackendResult<Payload>;

    async fn list_keys(
        &self,
        ct: &CancellationToken,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload>;

    async fn create_key(
        &self,
        ct: &CancellationToken,
        request: &KeyCreateRequest,
    ) -> BackendResult<Payload>;

    async fn delete_key(&self, ct: &CancellationToken, id: i64) -> BackendResult<()>;
}

/// Droplets and droplet actions.
#[async_trait]
pub trait DropletsApi: Send + Sync {
    async fn list(&self, ct: &CancellationToken, opts: Option<ListOptions>)
    -> BackendResult<Payload>;

    /// Droplet plans with their prices and regional availability.
    async fn list_sizes(
        &self,
        ct: &CancellationToken,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload>;

    async fn get(&self, ct: &CancellationToken, id: i64) -> BackendResult<Payload>;

    async fn create(
        &self,
        ct: &CancellationToken,
        request: &DropletCreateRequest,
    ) -> BackendResult<Payload>;

    async fn delete(&self, ct: &CancellationToken, id: i64) -> BackendResult<()>;

    async fn kernels(
        &self,
        ct: &CancellationToken,
        id: i64,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload>;

    async fn neighbors(&self, ct: &CancellationToken, id: i64) -> BackendResult<Payload>;

    async fn get_action(
        &self,
        ct: &CancellationToken,
        droplet_id: i64,
        action_id: i64,
    ) -> BackendResult<Payload>;

    async fn perform_action(
        &self,
        ct: &CancellationToken,
        droplet_id: i64,
        action: &DropletAction,
    ) -> BackendResult<Payload>;
}

/// Images.
#[async_trait]
pub trait ImagesApi: Send + Sync {
    async fn list_distribution(
        &self,
        ct: &CancellationToken,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload>;

    async fn get(&self, ct: &CancellationToken, id: i64) -> BackendResult<Payload>;
}

/// Cloud firewalls.
#[async_trait]
pub trait FirewallsApi: Send + Sync {
    async fn get(&self, ct: &CancellationToken, id: &str) -> BackendResult<Payload>;

    async fn list(&self, ct: &CancellationToken, opts: Option<ListOptions>)
    -> BackendResult<Payload>;

    async fn create(
        &self,
        ct: &CancellationToken,
        request: &FirewallRequest,
    ) -> BackendResult<Payload>;

    async fn delete(&self, ct: &CancellationToken, id: &str) -> BackendResult<()>;

    async fn add_droplets(
        &self,
        ct: &CancellationToken,
        id: &str,
        droplet_ids: &[i64],
    ) -> BackendResult<()>;

    async fn remove_droplets(
        &self,
        ct: &CancellationToken,
        id: &str,
        droplet_ids: &[i64],
    ) -> BackendResult<()>;

    async fn add_tags(&self, ct: &CancellationToken, id: &str, tags: &[String])
    -> BackendResult<()>;

    async fn remove_tags(
        &self,
        ct: &CancellationToken,
        id: &str,
        tags: &[String],
    ) -> BackendResult<()>;

    async fn add_rules(
        &self,
        ct: &CancellationToken,
        id: &str,
        rules: &FirewallRulesRequest,
    ) -> BackendResult<()>;

    async fn remove_rules(
        &self,
        ct: &CancellationToken,
        id: &str,
        rules: &FirewallRulesRequest,
    ) -> BackendResult<()>;
}

/// Reserved IPv4 and IPv6 addresses.
///
/// Both families share one surface; `version` selects the endpoints.
#[async_trait]
pub trait ReservedIpsApi: Send + Sync {
    async fn get(&self, ct: &CancellationToken, version: IpVersion, ip: &str)
    -> BackendResult<Payload>;

    async fn list(
        &self,
        ct: &CancellationToken,
        version: IpVersion,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload>;

    async fn reserve(
        &self,
        ct: &CancellationToken,
        version: IpVersion,
        region: &str,
    ) -> BackendResult<Payload>;

    async fn release(&self, ct: &CancellationToken, version: IpVersion, ip: &str)
    -> BackendResult<()>;

    async fn assign(
        &self,
        ct: &CancellationToken,
        version: IpVersion,
        ip: &str,
        droplet_id: i64,
    ) -> BackendResult<Payload>;

    async fn unassign(
        &self,
        ct: &CancellationToken,
        version: IpVersion,
        ip: &str,
    ) -> BackendResult<Payload>;
}

/// TLS certificates for load balancers and CDN endpoints.
#[async_trait]
pub trait CertificatesApi: Send + Sync {
    async fn get(&self, ct: &CancellationToken, id: &str) -> BackendResult<Payload>;

    async fn list(&self, ct: &CancellationToken, opts: Option<ListOptions>)
    -> BackendResult<Payload>;

    async fn create(
        &self,
        ct: &CancellationToken,
        request: &CertificateRequest,
    ) -> BackendResult<Payload>;

    async fn delete(&self, ct: &CancellationToken, id: &str) -> BackendResult<()>;
}

/// VPC networks and peerings.
#[async_trait]
pub trait VpcsApi: Send + Sync {
    async fn create(
        &self,
        ct: &CancellationToken,
        request: &VpcCreateRequest,
    ) -> BackendResult<Payload>;

    async fn list_members(
        &self,
        ct: &CancellationToken,
        id: &str,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload>;

    async fn delete(&self, ct: &CancellationToken, id: &str) -> BackendResult<()>;

    async fn create_peering(
        &self,
        ct: &CancellationToken,
        request: &VpcPeeringCreateRequest,
    ) -> BackendResult<Payload>;

    async fn delete_peering(&self, ct: &CancellationToken, id: &str) -> BackendResult<()>;
}

/// Partner network connect attachments.
#[async_trait]
pub trait PartnerAttachmentsApi: Send + Sync {
    async fn get(&self, ct: &CancellationToken, id: &str) -> BackendResult<Payload>;

    async fn list(&self, ct: &CancellationToken, opts: Option<ListOptions>)
    -> BackendResult<Payload>;

    async fn create(
        &self,
        ct: &CancellationToken,
        request: &PartnerAttachmentCreateRequest,
    ) -> BackendResult<Payload>;

    async fn update(
        &self,
        ct: &CancellationToken,
        id: &str,
        request: &PartnerAttachmentUpdateRequest,
    ) -> BackendResult<Payload>;

    async fn delete(&self, ct: &CancellationToken, id: &str) -> BackendResult<()>;

    async fn get_service_key(&self, ct: &CancellationToken, id: &str) -> BackendResult<Payload>;

    async fn get_bgp_auth_key(&self, ct: &CancellationToken, id: &str) -> BackendResult<Payload>;
}

/// Domains and DNS records.
#[async_trait]
pub trait DomainsApi: Send + Sync {
    async fn get(&self, ct: &CancellationToken, name: &str) -> BackendResult<Payload>;

    async fn list(&self, ct: &CancellationToken, opts: Option<ListOptions>)
    -> BackendResult<Payload>;

    async fn create(
        &self,
        ct: &CancellationToken,
        request: &DomainCreateRequest,
    ) -> BackendResult<Payload>;

    async fn delete(&self, ct: &CancellationToken, name: &str) -> BackendResult<()>;

    async fn get_record(
        &self,
        ct: &CancellationToken,
        domain: &str,
        record_id: i64,
    ) -> BackendResult<Payload>;

    async fn list_records(
        &self,
        ct: &CancellationToken,
        domain: &str,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload>;

    async fn create_record(
        &self,
        ct: &CancellationToken,
        domain: &str,
        request: &DomainRecordRequest,
    ) -> BackendResult<Payload>;

    async fn edit_record(
        &self,
        ct: &CancellationToken,
        domain: &str,
        record_id: i64,
        request: &DomainRecordRequest,
    ) -> BackendResult<Payload>;

    async fn delete_record(
        &self,
        ct: &CancellationToken,
        domain: &str,
        record_id: i64,
    ) -> BackendResult<()>;
}

/// Managed database clusters, including Kafka topics and configuration.
#[async_trait]
pub trait DatabasesApi: Send + Sync {
    async fn list(&self, ct: &CancellationToken, opts: Option<ListOptions>)
    -> BackendResult<Payload>;

    async fn get(&self, ct: &CancellationToken, id: &str) -> BackendResult<Payload>;

    async fn create(
        &self,
        ct: &CancellationToken,
        request: &DatabaseCreateRequest,
    ) -> BackendResult<Payload>;

    async fn delete(&self, ct: &CancellationToken, id: &str) -> BackendResult<()>;

    async fn resize(
        &self,
        ct: &CancellationToken,
        id: &str,
        request: &DatabaseResizeRequest,
    ) -> BackendResult<()>;

    async fn list_backups(
        &self,
        ct: &CancellationToken,
        id: &str,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload>;

    async fn list_topics(
        &self,
        ct: &CancellationToken,
        id: &str,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload>;

    async fn create_topic(
        &self,
        ct: &CancellationToken,
        id: &str,
        request: &TopicCreateRequest,
    ) -> BackendResult<Payload>;

    async fn get_topic(&self, ct: &CancellationToken, id: &str, name: &str)
    -> BackendResult<Payload>;

    async fn update_topic(
        &self,
        ct: &CancellationToken,
        id: &str,
        name: &str,
        request: &TopicUpdateRequest,
    ) -> BackendResult<()>;

    async fn delete_topic(&self, ct: &CancellationToken, id: &str, name: &str)
    -> BackendResult<()>;

    async fn get_kafka_config(&self, ct: &CancellationToken, id: &str)
    -> BackendResult<Payload>;

    async fn update_kafka_config(
        &self,
        ct: &CancellationToken,
        id: &str,
        config: &KafkaConfig,
    ) -> BackendResult<()>;

    async fn get_ca(&self, ct: &CancellationToken, id: &str) -> BackendResult<Payload>;

    /// Engines, versions, regions and sizes available for new clusters.
    async fn list_options(&self, ct: &CancellationToken) -> BackendResult<Payload>;

    async fn upgrade_major_version(
        &self,
        ct: &CancellationToken,
        id: &str,
        version: &str,
    ) -> BackendResult<()>;

    async fn start_online_migration(
        &self,
        ct: &CancellationToken,
        id: &str,
        request: &OnlineMigrationRequest,
    ) -> BackendResult<Payload>;

    async fn stop_online_migration(
        &self,
        ct: &CancellationToken,
        id: &str,
        migration_id: &str,
    ) -> BackendResult<()>;

    async fn get_online_migration(&self, ct: &CancellationToken, id: &str)
    -> BackendResult<Payload>;

    async fn get_user(&self, ct: &CancellationToken, id: &str, user: &str)
    -> BackendResult<Payload>;

    async fn list_users(
        &self,
        ct: &CancellationToken,
        id: &str,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload>;

    async fn create_user(
        &self,
        ct: &CancellationToken,
        id: &str,
        request: &DatabaseUserCreateRequest,
    ) -> BackendResult<Payload>;

    async fn update_user(
        &self,
        ct: &CancellationToken,
        id: &str,
        user: &str,
        request: &DatabaseUserUpdateRequest,
    ) -> BackendResult<Payload>;

    async fn delete_user(&self, ct: &CancellationToken, id: &str, user: &str)
    -> BackendResult<()>;

    async fn get_firewall_rules(&self, ct: &CancellationToken, id: &str)
    -> BackendResult<Payload>;

    /// Replace the cluster's trusted sources with `rules`.
    async fn update_firewall_rules(
        &self,
        ct: &CancellationToken,
        id: &str,
        rules: &[DatabaseFirewallRule],
    ) -> BackendResult<()>;

    async fn list_pools(
        &self,
        ct: &CancellationToken,
        id: &str,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload>;

    async fn create_pool(
        &self,
        ct: &CancellationToken,
        id: &str,
        request: &DatabasePoolRequest,
    ) -> BackendResult<Payload>;

    async fn get_pool(&self, ct: &CancellationToken, id: &str, name: &str)
    -> BackendResult<Payload>;

    async fn update_pool(
        &self,
        ct: &CancellationToken,
        id: &str,
        name: &str,
        request: &DatabasePoolRequest,
    ) -> BackendResult<()>;

    async fn delete_pool(&self, ct: &CancellationToken, id: &str, name: &str)
    -> BackendResult<()>;

    async fn get_replica(&self, ct: &CancellationToken, id: &str, name: &str)
    -> BackendResult<Payload>;

    async fn list_replicas(
        &self,
        ct: &CancellationToken,
        id: &str,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload>;

    async fn create_replica(
        &self,
        ct: &CancellationToken,
        id: &str,
        request: &DatabaseReplicaCreateRequest,
    ) -> BackendResult<Payload>;

    async fn delete_replica(&self, ct: &CancellationToken, id: &str, name: &str)
    -> BackendResult<()>;

    async fn promote_replica(&self, ct: &CancellationToken, id: &str, name: &str)
    -> BackendResult<()>;
}

// ============================================================================
// Injected handle set
// ============================================================================

/// The set of backend capabilities handed to tool and resource definitions.
///
/// Built once at startup and cloned into each definition; there is no
/// process-wide client.
#[derive(Clone)]
pub struct Backend {
    pub regions: Arc<dyn RegionsApi>,
    pub account: Arc<dyn AccountApi>,
    pub droplets: Arc<dyn DropletsApi>,
    pub images: Arc<dyn ImagesApi>,
    pub firewalls: Arc<dyn FirewallsApi>,
    pub reserved_ips: Arc<dyn ReservedIpsApi>,
    pub certificates: Arc<dyn CertificatesApi>,
    pub vpcs: Arc<dyn VpcsApi>,
    pub partner_attachments: Arc<dyn PartnerAttachmentsApi>,
    pub domains: Arc<dyn DomainsApi>,
    pub databases: Arc<dyn DatabasesApi>,
}

impl Backend {
    /// Use one implementation for every capability.
    pub fn from_shared<C>(client: Arc<C>) -> Self
    where
        C: RegionsApi
            + AccountApi
            + DropletsApi
            + ImagesApi
            + FirewallsApi
            + ReservedIpsApi
            + CertificatesApi
            + VpcsApi
            + PartnerAttachmentsApi
            + DomainsApi
            + DatabasesApi
            + 'static,
    {
        Self {
            regions: client.clone(),
            account: client.clone(),
            droplets: client.clone(),
            images: client.clone(),
            firewalls: client.clone(),
            reserved_ips: client.clone(),
            certificates: client.clone(),
            vpcs: client.clone(),
            partner_attachments: client.clone(),
            domains: client.clone(),
            databases: client,
        }
    }
}
