//! Tool definitions module.
//!
//! One file per service area. Each area is a small struct holding the
//! backend capability it needs and returning its [`ToolDefinition`]s.

mod account;
mod certificates;
mod database_access;
mod database_pools;
mod database_replicas;
mod databases;
mod domains;
mod droplet_actions;
mod droplets;
mod firewall;
mod images;
mod kafka;
mod keys;
mod partner_attachments;
mod regions;
mod reserved_ips;
mod sizes;
mod vpcs;

pub use account::AccountTools;
pub use certificates::CertificateTools;
pub use database_access::DatabaseAccessTools;
pub use database_pools::DatabasePoolTools;
pub use database_replicas::DatabaseReplicaTools;
pub use databases::DatabaseClusterTools;
pub use domains::DomainTools;
pub use droplet_actions::DropletActionTools;
pub use droplets::DropletTools;
pub use firewall::FirewallTools;
pub use images::ImageTools;
pub use kafka::KafkaTools;
pub use keys::KeyTools;
pub use partner_attachments::PartnerAttachmentTools;
pub use regions::RegionTools;
pub use reserved_ips::ReservedIpTools;
pub use sizes::SizeTools;
pub use vpcs::VpcTools;

use serde::Serialize;
use serde_json::{Map, Value};

use super::{Arguments, ParameterSpec, ResultEnvelope, ToolError};
use crate::backend::{BackendResult, ListOptions};

/// Wrap a backend payload, or its failure, in an envelope.
pub(crate) fn respond<T: Serialize>(result: BackendResult<T>) -> Result<ResultEnvelope, ToolError> {
    match result {
        Ok(payload) => ResultEnvelope::success(&payload),
        Err(e) => Ok(ResultEnvelope::backend_error(&e)),
    }
}

/// Keep only `fields` of each listed item. Absent fields come back as null.
pub(crate) fn summarize(
    result: BackendResult<Value>,
    fields: &[&str],
) -> Result<ResultEnvelope, ToolError> {
    let pick = |item: &Value| -> Value {
        let picked: Map<String, Value> = fields
            .iter()
            .map(|&field| {
                let value = item.get(field).cloned().unwrap_or(Value::Null);
                (field.to_string(), value)
            })
            .collect();
        Value::Object(picked)
    };
    respond(result.map(|payload| match payload {
        Value::Array(items) => items.iter().map(pick).collect(),
        other => other,
    }))
}

/// Plain-text confirmation for mutations without a payload.
pub(crate) fn confirm(result: BackendResult<()>, message: &str) -> Result<ResultEnvelope, ToolError> {
    match result {
        Ok(()) => Ok(ResultEnvelope::text(message)),
        Err(e) => Ok(ResultEnvelope::backend_error(&e)),
    }
}

/// `Page`/`PerPage` fields with fixed defaults, read back with [`paged`].
pub(crate) fn page_params(page: i64, per_page: i64) -> [ParameterSpec; 2] {
    [
        ParameterSpec::number("Page").default(page).describe("Page number"),
        ParameterSpec::number("PerPage")
            .default(per_page)
            .describe("Items per page"),
    ]
}

/// Fixed-default pagination: both fields declare defaults, and a
/// non-positive value falls back to that default.
pub(crate) fn paged(
    args: &Arguments,
    page: (&str, i64),
    per_page: (&str, i64),
) -> Result<ListOptions, ToolError> {
    let pick = |(name, default): (&str, i64)| -> Result<i64, ToolError> {
        let value = args.integer(name)?;
        Ok(if value > 0 { value } else { default })
    };
    Ok(ListOptions::page(pick(page)?, pick(per_page)?))
}

#[cfg(test)]
pub(crate) mod testing {
    //! Helpers shared by the per-area tool tests.

    use rmcp::model::JsonObject;
    use serde_json::Value;
    use tokio_util::sync::CancellationToken;

    use crate::domains::tools::{ResultEnvelope, ToolDefinition, ToolRegistry};

    pub fn registry(definitions: Vec<ToolDefinition>) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register_all(definitions).unwrap();
        registry
    }

    pub fn bag(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    pub async fn call(registry: &ToolRegistry, name: &str, args: Value) -> ResultEnvelope {
        registry
            .call(name, &bag(args), CancellationToken::new())
            .await
            .unwrap()
    }

    /// Parse a JSON success payload.
    pub fn payload(envelope: &ResultEnvelope) -> Value {
        assert!(envelope.is_success(), "unexpected failure: {}", envelope.text_content());
        serde_json::from_str(envelope.text_content()).unwrap()
    }
}
