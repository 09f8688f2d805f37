//! Typed request values passed to the backend.
//!
//! These are built by handlers from extracted arguments only. Field names
//! follow the DigitalOcean v2 API wire format.

use serde::{Deserialize, Serialize};

// ============================================================================
// Pagination
// ============================================================================

/// Pagination and list filters.
///
/// Handlers pass `Option<ListOptions>`; `None` means "no pagination" and is
/// forwarded as-is so the backend applies its own behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub with_projects: Option<bool>,
    pub deployed: Option<bool>,
    pub public_only: Option<bool>,
    pub usecases: Vec<String>,
}

impl ListOptions {
    /// Options with only page and page size set.
    pub fn page(page: i64, per_page: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            ..Default::default()
        }
    }

    /// Render as query-string pairs. Unset fields are omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page", per_page.to_string()));
        }
        if let Some(v) = self.with_projects {
            pairs.push(("with_projects", v.to_string()));
        }
        if let Some(v) = self.deployed {
            pairs.push(("only_deployed", v.to_string()));
        }
        if let Some(v) = self.public_only {
            pairs.push(("public_only", v.to_string()));
        }
        if !self.usecases.is_empty() {
            pairs.push(("usecases", self.usecases.join(",")));
        }
        pairs
    }
}

// ============================================================================
// Droplets
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropletCreateRequest {
    pub name: String,
    pub region: String,
    pub size: String,
    pub image: i64,
    pub backups: bool,
    pub monitoring: bool,
}

/// A droplet action as posted to `/v2/droplets/{id}/actions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DropletAction {
    PowerCycle,
    PowerOn,
    PowerOff,
    Shutdown,
    Restore { image: i64 },
    Resize { size: String, disk: bool },
    Rebuild { image: i64 },
    Rename { name: String },
    ChangeKernel { kernel: i64 },
    EnableIpv6,
    EnableBackups,
    DisableBackups,
    Snapshot { name: String },
    EnablePrivateNetworking,
}

// ============================================================================
// Firewalls
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sources {
    pub addresses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Destinations {
    pub addresses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InboundRule {
    pub protocol: String,
    #[serde(rename = "ports")]
    pub port_range: String,
    pub sources: Sources,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundRule {
    pub protocol: String,
    #[serde(rename = "ports")]
    pub port_range: String,
    pub destinations: Destinations,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirewallRequest {
    pub name: String,
    pub inbound_rules: Vec<InboundRule>,
    pub outbound_rules: Vec<OutboundRule>,
    pub droplet_ids: Vec<i64>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FirewallRulesRequest {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inbound_rules: Vec<InboundRule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outbound_rules: Vec<OutboundRule>,
}

impl FirewallRulesRequest {
    pub fn is_empty(&self) -> bool {
        self.inbound_rules.is_empty() && self.outbound_rules.is_empty()
    }
}

// ============================================================================
// Domains
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainCreateRequest {
    pub name: String,
    pub ip_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainRecordRequest {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub data: String,
}

// ============================================================================
// Databases
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseCreateRequest {
    pub name: String,
    pub engine: String,
    pub version: String,
    pub region: String,
    pub size: String,
    pub num_nodes: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatabaseResizeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_nodes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_size_mib: Option<u64>,
}

/// Kafka topic configuration. Unset fields keep the server-side value;
/// unknown keys are rejected rather than dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TopicConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanup_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_retention_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_delete_delay_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flush_messages: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flush_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_interval_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_compaction_lag_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_message_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_down_conversion_enable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_format_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_timestamp_difference_max_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_timestamp_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_cleanable_dirty_ratio: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_compaction_lag_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_insync_replicas: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preallocate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_bytes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_index_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_jitter_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicCreateRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replication_factor: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<TopicConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopicUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replication_factor: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<TopicConfig>,
}

/// Cluster-wide Kafka configuration. Unset fields keep the server-side
/// value; unknown keys are rejected rather than dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KafkaConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_initial_rebalance_delay_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_min_session_timeout_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_max_session_timeout_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_max_bytes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_cleaner_delete_retention_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_cleaner_min_compaction_lag_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_flush_interval_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_index_interval_bytes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_message_downconversion_enable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_message_timestamp_difference_max_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_preallocate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_retention_bytes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_retention_hours: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_retention_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_roll_jitter_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_segment_delete_delay_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_create_topics_enable: Option<bool>,
}

/// Source connection for an online migration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OnlineMigrationSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dbname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnlineMigrationRequest {
    pub source: OnlineMigrationSource,
    pub disable_ssl: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignore_dbs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KafkaAcl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenSearchAcl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MongoUserSettings {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub databases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Engine-specific permissions of a database user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseUserSettings {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub acl: Vec<KafkaAcl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub opensearch_acl: Vec<OpenSearchAcl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mongo_user_settings: Option<MongoUserSettings>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MySqlUserSettings {
    pub auth_plugin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseUserCreateRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mysql_settings: Option<MySqlUserSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<DatabaseUserSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatabaseUserUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<DatabaseUserSettings>,
}

/// One trusted source of a database cluster firewall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseFirewallRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_uuid: Option<String>,
    #[serde(rename = "type")]
    pub rule_type: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Connection pool settings. `name` is only sent on create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabasePoolRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    pub database: String,
    pub mode: String,
    pub size: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseReplicaCreateRequest {
    pub name: String,
    pub region: String,
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_network_uuid: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_size_mib: Option<u64>,
}

// ============================================================================
// Reserved IPs, certificates and VPCs
// ============================================================================

/// Address family of a reserved IP. Each family has its own endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    /// Parse the `ipv4`/`ipv6` selector callers send.
    pub fn from_selector(selector: &str) -> Option<Self> {
        match selector {
            "ipv4" => Some(Self::V4),
            "ipv6" => Some(Self::V6),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::V4 => "ipv4",
            Self::V6 => "ipv6",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CertificateRequest {
    Custom {
        name: String,
        private_key: String,
        leaf_certificate: String,
        certificate_chain: String,
    },
    LetsEncrypt {
        name: String,
        dns_names: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VpcCreateRequest {
    pub name: String,
    #[serde(rename = "region")]
    pub region_slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VpcPeeringCreateRequest {
    pub name: String,
    pub vpc_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartnerAttachmentCreateRequest {
    pub name: String,
    pub region: String,
    #[serde(rename = "connection_bandwidth_in_mbps")]
    pub bandwidth_mbps: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartnerAttachmentUpdateRequest {
    pub name: String,
    pub vpc_ids: Vec<String>,
}

// ============================================================================
// Account
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyCreateRequest {
    pub name: String,
    pub public_key: String,
}
