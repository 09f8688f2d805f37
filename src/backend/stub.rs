//! In-memory backend used by tests.
//!
//! Records every call with the typed arguments it received (rendered as
//! JSON) and answers with canned payloads.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct StubCall {
    pub op: String,
    pub args: Value,
}

#[derive(Default)]
pub struct StubBackend {
    calls: Mutex<Vec<StubCall>>,
    responses: Mutex<HashMap<String, Payload>>,
    failures: Mutex<HashMap<String, (u16, String)>>,
    hanging: Mutex<HashSet<String>>,
}

impl StubBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Handle set backed entirely by this stub.
    pub fn backend(self: &Arc<Self>) -> Backend {
        Backend::from_shared(self.clone())
    }

    pub fn respond(&self, op: &str, payload: Payload) {
        self.responses
            .lock()
            .unwrap()
            .insert(op.to_string(), payload);
    }

    pub fn fail(&self, op: &str, status: u16, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(op.to_string(), (status, message.to_string()));
    }

    /// Make `op` wait until the invocation is cancelled.
    pub fn hang(&self, op: &str) {
        self.hanging.lock().unwrap().insert(op.to_string());
    }

    pub fn calls(&self) -> Vec<StubCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Option<StubCall> {
        self.calls.lock().unwrap().last().cloned()
    }

    async fn record(&self, ct: &CancellationToken, op: &str, args: Value) -> BackendResult<Payload> {
        self.calls.lock().unwrap().push(StubCall {
            op: op.to_string(),
            args,
        });

        let hangs = self.hanging.lock().unwrap().contains(op);
        if hangs {
            ct.cancelled().await;
            return Err(BackendError::Canceled);
        }

        if let Some((status, message)) = self.failures.lock().unwrap().get(op).cloned() {
            return Err(BackendError::Api {
                method: "GET".to_string(),
                url: format!("https://stub/{}", op),
                status,
                message,
            });
        }

        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(op)
            .cloned()
            .unwrap_or_else(|| json!({ "op": op })))
    }

    async fn record_unit(&self, ct: &CancellationToken, op: &str, args: Value) -> BackendResult<()> {
        self.record(ct, op, args).await.map(|_| ())
    }
}

fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap()
}

fn opts_json(opts: &Option<ListOptions>) -> Value {
    match opts {
        None => Value::Null,
        Some(opts) => {
            let map: serde_json::Map<String, Value> = opts
                .query_pairs()
                .into_iter()
                .map(|(k, v)| (k.to_string(), Value::String(v)))
                .collect();
            Value::Object(map)
        }
    }
}

#[async_trait]
impl RegionsApi for StubBackend {
    async fn list(&self, ct: &CancellationToken, opts: Option<ListOptions>) -> BackendResult<Payload> {
        self.record(ct, "regions.list", json!({ "opts": opts_json(&opts) }))
            .await
    }
}

#[async_trait]
impl AccountApi for StubBackend {
    async fn get_account(&self, ct: &CancellationToken) -> BackendResult<Payload> {
        self.record(ct, "account.get", Value::Null).await
    }

    async fn get_balance(&self, ct: &CancellationToken) -> BackendResult<Payload> {
        self.record(ct, "balance.get", Value::Null).await
    }

    async fn get_action(&self, ct: &CancellationToken, id: i64) -> BackendResult<Payload> {
        self.record(ct, "actions.get", json!({ "id": id })).await
    }

    async fn list_actions(&self, ct: &CancellationToken, opts: Option<ListOptions>) -> BackendResult<Payload> {
        self.record(ct, "actions.list", json!({ "opts": opts_json(&opts) }))
            .await
    }

    async fn list_billing_history(
        &self,
        ct: &CancellationToken,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        self.record(ct, "billing_history.list", json!({ "opts": opts_json(&opts) }))
            .await
    }

    async fn list_invoices(&self, ct: &CancellationToken, opts: Option<ListOptions>) -> BackendResult<Payload> {
        self.record(ct, "invoices.list", json!({ "opts": opts_json(&opts) }))
            .await
    }

    async fn get_key(&self, ct: &CancellationToken, id: i64) -> BackendResult<Payload> {
        self.record(ct, "keys.get", json!({ "id": id })).await
    }

    async fn list_keys(&self, ct: &CancellationToken, opts: Option<ListOptions>) -> BackendResult<Payload> {
        self.record(ct, "keys.list", json!({ "opts": opts_json(&opts) }))
            .await
    }

    async fn create_key(&self, ct: &CancellationToken, request: &KeyCreateRequest) -> BackendResult<Payload> {
        self.record(ct, "keys.create", to_json(request)).await
    }

    async fn delete_key(&self, ct: &CancellationToken, id: i64) -> BackendResult<()> {
        self.record_unit(ct, "keys.delete", json!({ "id": id })).await
    }
}

#[async_trait]
impl DropletsApi for StubBackend {
    async fn list(&self, ct: &CancellationToken, opts: Option<ListOptions>) -> BackendResult<Payload> {
        self.record(ct, "droplets.list", json!({ "opts": opts_json(&opts) }))
            .await
    }

    async fn list_sizes(&self, ct: &CancellationToken, opts: Option<ListOptions>) -> BackendResult<Payload> {
        self.record(ct, "sizes.list", json!({ "opts": opts_json(&opts) }))
            .await
    }

    async fn get(&self, ct: &CancellationToken, id: i64) -> BackendResult<Payload> {
        self.record(ct, "droplets.get", json!({ "id": id })).await
    }

    async fn create(
        &self,
        ct: &CancellationToken,
        request: &DropletCreateRequest,
    ) -> BackendResult<Payload> {
        self.record(ct, "droplets.create", to_json(request)).await
    }

    async fn delete(&self, ct: &CancellationToken, id: i64) -> BackendResult<()> {
        self.record_unit(ct, "droplets.delete", json!({ "id": id }))
            .await
    }

    async fn kernels(
        &self,
        ct: &CancellationToken,
        id: i64,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        self.record(
            ct,
            "droplets.kernels",
            json!({ "id": id, "opts": opts_json(&opts) }),
        )
        .await
    }

    async fn neighbors(&self, ct: &CancellationToken, id: i64) -> BackendResult<Payload> {
        self.record(ct, "droplets.neighbors", json!({ "id": id }))
            .await
    }

    async fn get_action(
        &self,
        ct: &CancellationToken,
        droplet_id: i64,
        action_id: i64,
    ) -> BackendResult<Payload> {
        self.record(
            ct,
            "droplets.get_action",
            json!({ "droplet_id": droplet_id, "action_id": action_id }),
        )
        .await
    }

    async fn perform_action(
        &self,
        ct: &CancellationToken,
        droplet_id: i64,
        action: &DropletAction,
    ) -> BackendResult<Payload> {
        self.record(
            ct,
            "droplets.action",
            json!({ "droplet_id": droplet_id, "action": to_json(action) }),
        )
        .await
    }
}

#[async_trait]
impl ImagesApi for StubBackend {
    async fn list_distribution(
        &self,
        ct: &CancellationToken,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        self.record(ct, "images.list_distribution", json!({ "opts": opts_json(&opts) }))
            .await
    }

    async fn get(&self, ct: &CancellationToken, id: i64) -> BackendResult<Payload> {
        self.record(ct, "images.get", json!({ "id": id })).await
    }
}

#[async_trait]
impl FirewallsApi for StubBackend {
    async fn get(&self, ct: &CancellationToken, id: &str) -> BackendResult<Payload> {
        self.record(ct, "firewalls.get", json!({ "id": id })).await
    }

    async fn list(&self, ct: &CancellationToken, opts: Option<ListOptions>) -> BackendResult<Payload> {
        self.record(ct, "firewalls.list", json!({ "opts": opts_json(&opts) }))
            .await
    }

    async fn create(&self, ct: &CancellationToken, request: &FirewallRequest) -> BackendResult<Payload> {
        self.record(ct, "firewalls.create", to_json(request)).await
    }

    async fn delete(&self, ct: &CancellationToken, id: &str) -> BackendResult<()> {
        self.record_unit(ct, "firewalls.delete", json!({ "id": id }))
            .await
    }

    async fn add_droplets(
        &self,
        ct: &CancellationToken,
        id: &str,
        droplet_ids: &[i64],
    ) -> BackendResult<()> {
        self.record_unit(
            ct,
            "firewalls.add_droplets",
            json!({ "id": id, "droplet_ids": droplet_ids }),
        )
        .await
    }

    async fn remove_droplets(
        &self,
        ct: &CancellationToken,
        id: &str,
        droplet_ids: &[i64],
    ) -> BackendResult<()> {
        self.record_unit(
            ct,
            "firewalls.remove_droplets",
            json!({ "id": id, "droplet_ids": droplet_ids }),
        )
        .await
    }

    async fn add_tags(&self, ct: &CancellationToken, id: &str, tags: &[String]) -> BackendResult<()> {
        self.record_unit(ct, "firewalls.add_tags", json!({ "id": id, "tags": tags }))
            .await
    }

    async fn remove_tags(
        &self,
        ct: &CancellationToken,
        id: &str,
        tags: &[String],
    ) -> BackendResult<()> {
        self.record_unit(ct, "firewalls.remove_tags", json!({ "id": id, "tags": tags }))
            .await
    }

    async fn add_rules(
        &self,
        ct: &CancellationToken,
        id: &str,
        rules: &FirewallRulesRequest,
    ) -> BackendResult<()> {
        self.record_unit(
            ct,
            "firewalls.add_rules",
            json!({ "id": id, "rules": to_json(rules) }),
        )
        .await
    }

    async fn remove_rules(
        &self,
        ct: &CancellationToken,
        id: &str,
        rules: &FirewallRulesRequest,
    ) -> BackendResult<()> {
        self.record_unit(
            ct,
            "firewalls.remove_rules",
            json!({ "id": id, "rules": to_json(rules) }),
        )
        .await
    }
}

#[async_trait]
impl DomainsApi for StubBackend {
    async fn get(&self, ct: &CancellationToken, name: &str) -> BackendResult<Payload> {
        self.record(ct, "domains.get", json!({ "name": name })).await
    }

    async fn list(&self, ct: &CancellationToken, opts: Option<ListOptions>) -> BackendResult<Payload> {
        self.record(ct, "domains.list", json!({ "opts": opts_json(&opts) }))
            .await
    }

    async fn create(
        &self,
        ct: &CancellationToken,
        request: &DomainCreateRequest,
    ) -> BackendResult<Payload> {
        self.record(ct, "domains.create", to_json(request)).await
    }

    async fn delete(&self, ct: &CancellationToken, name: &str) -> BackendResult<()> {
        self.record_unit(ct, "domains.delete", json!({ "name": name }))
            .await
    }

    async fn get_record(
        &self,
        ct: &CancellationToken,
        domain: &str,
        record_id: i64,
    ) -> BackendResult<Payload> {
        self.record(
            ct,
            "domains.get_record",
            json!({ "domain": domain, "record_id": record_id }),
        )
        .await
    }

    async fn list_records(
        &self,
        ct: &CancellationToken,
        domain: &str,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        self.record(
            ct,
            "domains.list_records",
            json!({ "domain": domain, "opts": opts_json(&opts) }),
        )
        .await
    }

    async fn create_record(
        &self,
        ct: &CancellationToken,
        domain: &str,
        request: &DomainRecordRequest,
    ) -> BackendResult<Payload> {
        self.record(
            ct,
            "domains.create_record",
            json!({ "domain": domain, "record": to_json(request) }),
        )
        .await
    }

    async fn edit_record(
        &self,
        ct: &CancellationToken,
        domain: &str,
        record_id: i64,
        request: &DomainRecordRequest,
    ) -> BackendResult<Payload> {
        self.record(
            ct,
            "domains.edit_record",
            json!({ "domain": domain, "record_id": record_id, "record": to_json(request) }),
        )
        .await
    }

    async fn delete_record(
        &self,
        ct: &CancellationToken,
        domain: &str,
        record_id: i64,
    ) -> BackendResult<()> {
        self.record_unit(
            ct,
            "domains.delete_record",
            json!({ "domain": domain, "record_id": record_id }),
        )
        .await
    }
}

#[async_trait]
impl DatabasesApi for StubBackend {
    async fn list(&self, ct: &CancellationToken, opts: Option<ListOptions>) -> BackendResult<Payload> {
        self.record(ct, "databases.list", json!({ "opts": opts_json(&opts) }))
            .await
    }

    async fn get(&self, ct: &CancellationToken, id: &str) -> BackendResult<Payload> {
        self.record(ct, "databases.get", json!({ "id": id })).await
    }

    async fn create(
        &self,
        ct: &CancellationToken,
        request: &DatabaseCreateRequest,
    ) -> BackendResult<Payload> {
        self.record(ct, "databases.create", to_json(request)).await
    }

    async fn delete(&self, ct: &CancellationToken, id: &str) -> BackendResult<()> {
        self.record_unit(ct, "databases.delete", json!({ "id": id }))
            .await
    }

    async fn resize(
        &self,
        ct: &CancellationToken,
        id: &str,
        request: &DatabaseResizeRequest,
    ) -> BackendResult<()> {
        self.record_unit(
            ct,
            "databases.resize",
            json!({ "id": id, "request": to_json(request) }),
        )
        .await
    }

    async fn list_backups(
        &self,
        ct: &CancellationToken,
        id: &str,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        self.record(
            ct,
            "databases.list_backups",
            json!({ "id": id, "opts": opts_json(&opts) }),
        )
        .await
    }

    async fn list_topics(
        &self,
        ct: &CancellationToken,
        id: &str,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        self.record(
            ct,
            "kafka.list_topics",
            json!({ "id": id, "opts": opts_json(&opts) }),
        )
        .await
    }

    async fn create_topic(
        &self,
        ct: &CancellationToken,
        id: &str,
        request: &TopicCreateRequest,
    ) -> BackendResult<Payload> {
        self.record(
            ct,
            "kafka.create_topic",
            json!({ "id": id, "request": to_json(request) }),
        )
        .await
    }

    async fn get_topic(&self, ct: &CancellationToken, id: &str, name: &str) -> BackendResult<Payload> {
        self.record(ct, "kafka.get_topic", json!({ "id": id, "name": name }))
            .await
    }

    async fn update_topic(
        &self,
        ct: &CancellationToken,
        id: &str,
        name: &str,
        request: &TopicUpdateRequest,
    ) -> BackendResult<()> {
        self.record_unit(
            ct,
            "kafka.update_topic",
            json!({ "id": id, "name": name, "request": to_json(request) }),
        )
        .await
    }

    async fn delete_topic(&self, ct: &CancellationToken, id: &str, name: &str) -> BackendResult<()> {
        self.record_unit(ct, "kafka.delete_topic", json!({ "id": id, "name": name }))
            .await
    }

    async fn get_kafka_config(&self, ct: &CancellationToken, id: &str) -> BackendResult<Payload> {
        self.record(ct, "kafka.get_config", json!({ "id": id })).await
    }

    async fn update_kafka_config(
        &self,
        ct: &CancellationToken,
        id: &str,
        config: &KafkaConfig,
    ) -> BackendResult<()> {
        self.record_unit(
            ct,
            "kafka.update_config",
            json!({ "id": id, "config": to_json(config) }),
        )
        .await
    }

    async fn get_ca(&self, ct: &CancellationToken, id: &str) -> BackendResult<Payload> {
        self.record(ct, "databases.get_ca", json!({ "id": id })).await
    }

    async fn list_options(&self, ct: &CancellationToken) -> BackendResult<Payload> {
        self.record(ct, "databases.list_options", Value::Null).await
    }

    async fn upgrade_major_version(
        &self,
        ct: &CancellationToken,
        id: &str,
        version: &str,
    ) -> BackendResult<()> {
        self.record_unit(
            ct,
            "databases.upgrade_major_version",
            json!({ "id": id, "version": version }),
        )
        .await
    }

    async fn start_online_migration(
        &self,
        ct: &CancellationToken,
        id: &str,
        request: &OnlineMigrationRequest,
    ) -> BackendResult<Payload> {
        self.record(
            ct,
            "databases.start_online_migration",
            json!({ "id": id, "request": to_json(request) }),
        )
        .await
    }

    async fn stop_online_migration(
        &self,
        ct: &CancellationToken,
        id: &str,
        migration_id: &str,
    ) -> BackendResult<()> {
        self.record_unit(
            ct,
            "databases.stop_online_migration",
            json!({ "id": id, "migration_id": migration_id }),
        )
        .await
    }

    async fn get_online_migration(&self, ct: &CancellationToken, id: &str) -> BackendResult<Payload> {
        self.record(ct, "databases.get_online_migration", json!({ "id": id }))
            .await
    }

    async fn get_user(&self, ct: &CancellationToken, id: &str, user: &str) -> BackendResult<Payload> {
        self.record(ct, "users.get", json!({ "id": id, "user": user }))
            .await
    }

    async fn list_users(
        &self,
        ct: &CancellationToken,
        id: &str,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        self.record(ct, "users.list", json!({ "id": id, "opts": opts_json(&opts) }))
            .await
    }

    async fn create_user(
        &self,
        ct: &CancellationToken,
        id: &str,
        request: &DatabaseUserCreateRequest,
    ) -> BackendResult<Payload> {
        self.record(ct, "users.create", json!({ "id": id, "request": to_json(request) }))
            .await
    }

    async fn update_user(
        &self,
        ct: &CancellationToken,
        id: &str,
        user: &str,
        request: &DatabaseUserUpdateRequest,
    ) -> BackendResult<Payload> {
        self.record(
            ct,
            "users.update",
            json!({ "id": id, "user": user, "request": to_json(request) }),
        )
        .await
    }

    async fn delete_user(&self, ct: &CancellationToken, id: &str, user: &str) -> BackendResult<()> {
        self.record_unit(ct, "users.delete", json!({ "id": id, "user": user }))
            .await
    }

    async fn get_firewall_rules(&self, ct: &CancellationToken, id: &str) -> BackendResult<Payload> {
        self.record(ct, "databases.get_firewall_rules", json!({ "id": id }))
            .await
    }

    async fn update_firewall_rules(
        &self,
        ct: &CancellationToken,
        id: &str,
        rules: &[DatabaseFirewallRule],
    ) -> BackendResult<()> {
        self.record_unit(
            ct,
            "databases.update_firewall_rules",
            json!({ "id": id, "rules": to_json(&rules) }),
        )
        .await
    }

    async fn list_pools(
        &self,
        ct: &CancellationToken,
        id: &str,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        self.record(ct, "pools.list", json!({ "id": id, "opts": opts_json(&opts) }))
            .await
    }

    async fn create_pool(
        &self,
        ct: &CancellationToken,
        id: &str,
        request: &DatabasePoolRequest,
    ) -> BackendResult<Payload> {
        self.record(ct, "pools.create", json!({ "id": id, "request": to_json(request) }))
            .await
    }

    async fn get_pool(&self, ct: &CancellationToken, id: &str, name: &str) -> BackendResult<Payload> {
        self.record(ct, "pools.get", json!({ "id": id, "name": name }))
            .await
    }

    async fn update_pool(
        &self,
        ct: &CancellationToken,
        id: &str,
        name: &str,
        request: &DatabasePoolRequest,
    ) -> BackendResult<()> {
        self.record_unit(
            ct,
            "pools.update",
            json!({ "id": id, "name": name, "request": to_json(request) }),
        )
        .await
    }

    async fn delete_pool(&self, ct: &CancellationToken, id: &str, name: &str) -> BackendResult<()> {
        self.record_unit(ct, "pools.delete", json!({ "id": id, "name": name }))
            .await
    }

    async fn get_replica(&self, ct: &CancellationToken, id: &str, name: &str) -> BackendResult<Payload> {
        self.record(ct, "replicas.get", json!({ "id": id, "name": name }))
            .await
    }

    async fn list_replicas(
        &self,
        ct: &CancellationToken,
        id: &str,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        self.record(ct, "replicas.list", json!({ "id": id, "opts": opts_json(&opts) }))
            .await
    }

    async fn create_replica(
        &self,
        ct: &CancellationToken,
        id: &str,
        request: &DatabaseReplicaCreateRequest,
    ) -> BackendResult<Payload> {
        self.record(ct, "replicas.create", json!({ "id": id, "request": to_json(request) }))
            .await
    }

    async fn delete_replica(&self, ct: &CancellationToken, id: &str, name: &str) -> BackendResult<()> {
        self.record_unit(ct, "replicas.delete", json!({ "id": id, "name": name }))
            .await
    }

    async fn promote_replica(&self, ct: &CancellationToken, id: &str, name: &str) -> BackendResult<()> {
        self.record_unit(ct, "replicas.promote", json!({ "id": id, "name": name }))
            .await
    }
}

#[async_trait]
impl ReservedIpsApi for StubBackend {
    async fn get(&self, ct: &CancellationToken, version: IpVersion, ip: &str) -> BackendResult<Payload> {
        self.record(
            ct,
            "reserved_ips.get",
            json!({ "version": version.as_str(), "ip": ip }),
        )
        .await
    }

    async fn list(
        &self,
        ct: &CancellationToken,
        version: IpVersion,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        self.record(
            ct,
            "reserved_ips.list",
            json!({ "version": version.as_str(), "opts": opts_json(&opts) }),
        )
        .await
    }

    async fn reserve(
        &self,
        ct: &CancellationToken,
        version: IpVersion,
        region: &str,
    ) -> BackendResult<Payload> {
        self.record(
            ct,
            "reserved_ips.reserve",
            json!({ "version": version.as_str(), "region": region }),
        )
        .await
    }

    async fn release(&self, ct: &CancellationToken, version: IpVersion, ip: &str) -> BackendResult<()> {
        self.record_unit(
            ct,
            "reserved_ips.release",
            json!({ "version": version.as_str(), "ip": ip }),
        )
        .await
    }

    async fn assign(
        &self,
        ct: &CancellationToken,
        version: IpVersion,
        ip: &str,
        droplet_id: i64,
    ) -> BackendResult<Payload> {
        self.record(
            ct,
            "reserved_ips.assign",
            json!({ "version": version.as_str(), "ip": ip, "droplet_id": droplet_id }),
        )
        .await
    }

    async fn unassign(&self, ct: &CancellationToken, version: IpVersion, ip: &str) -> BackendResult<Payload> {
        self.record(
            ct,
            "reserved_ips.unassign",
            json!({ "version": version.as_str(), "ip": ip }),
        )
        .await
    }
}

#[async_trait]
impl CertificatesApi for StubBackend {
    async fn get(&self, ct: &CancellationToken, id: &str) -> BackendResult<Payload> {
        self.record(ct, "certificates.get", json!({ "id": id })).await
    }

    async fn list(&self, ct: &CancellationToken, opts: Option<ListOptions>) -> BackendResult<Payload> {
        self.record(ct, "certificates.list", json!({ "opts": opts_json(&opts) }))
            .await
    }

    async fn create(&self, ct: &CancellationToken, request: &CertificateRequest) -> BackendResult<Payload> {
        self.record(ct, "certificates.create", to_json(request)).await
    }

    async fn delete(&self, ct: &CancellationToken, id: &str) -> BackendResult<()> {
        self.record_unit(ct, "certificates.delete", json!({ "id": id }))
            .await
    }
}

#[async_trait]
impl VpcsApi for StubBackend {
    async fn create(&self, ct: &CancellationToken, request: &VpcCreateRequest) -> BackendResult<Payload> {
        self.record(ct, "vpcs.create", to_json(request)).await
    }

    async fn list_members(
        &self,
        ct: &CancellationToken,
        id: &str,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        self.record(ct, "vpcs.list_members", json!({ "id": id, "opts": opts_json(&opts) }))
            .await
    }

    async fn delete(&self, ct: &CancellationToken, id: &str) -> BackendResult<()> {
        self.record_unit(ct, "vpcs.delete", json!({ "id": id })).await
    }

    async fn create_peering(
        &self,
        ct: &CancellationToken,
        request: &VpcPeeringCreateRequest,
    ) -> BackendResult<Payload> {
        self.record(ct, "vpcs.create_peering", to_json(request)).await
    }

    async fn delete_peering(&self, ct: &CancellationToken, id: &str) -> BackendResult<()> {
        self.record_unit(ct, "vpcs.delete_peering", json!({ "id": id }))
            .await
    }
}

#[async_trait]
impl PartnerAttachmentsApi for StubBackend {
    async fn get(&self, ct: &CancellationToken, id: &str) -> BackendResult<Payload> {
        self.record(ct, "partner_attachments.get", json!({ "id": id }))
            .await
    }

    async fn list(&self, ct: &CancellationToken, opts: Option<ListOptions>) -> BackendResult<Payload> {
        self.record(ct, "partner_attachments.list", json!({ "opts": opts_json(&opts) }))
            .await
    }

    async fn create(
        &self,
        ct: &CancellationToken,
        request: &PartnerAttachmentCreateRequest,
    ) -> BackendResult<Payload> {
        self.record(ct, "partner_attachments.create", to_json(request))
            .await
    }

    async fn update(
        &self,
        ct: &CancellationToken,
        id: &str,
        request: &PartnerAttachmentUpdateRequest,
    ) -> BackendResult<Payload> {
        let args = json!({ "id": id, "request": to_json(request) });
        self.record(ct, "partner_attachments.update", args).await
    }

    async fn delete(&self, ct: &CancellationToken, id: &str) -> BackendResult<()> {
        self.record_unit(ct, "partner_attachments.delete", json!({ "id": id }))
            .await
    }

    async fn get_service_key(&self, ct: &CancellationToken, id: &str) -> BackendResult<Payload> {
        self.record(ct, "partner_attachments.get_service_key", json!({ "id": id }))
            .await
    }

    async fn get_bgp_auth_key(&self, ct: &CancellationToken, id: &str) -> BackendResult<Payload> {
        self.record(ct, "partner_attachments.get_bgp_auth_key", json!({ "id": id }))
            .await
    }
}
