//! DigitalOcean v2 API client.

use async_trait::async_trait;
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{
    AccountApi, BackendError, BackendResult, CertificateRequest, CertificatesApi,
    DatabaseCreateRequest, DatabaseFirewallRule, DatabasePoolRequest, DatabaseReplicaCreateRequest,
    DatabaseResizeRequest, DatabaseUserCreateRequest, DatabaseUserUpdateRequest, DatabasesApi,
    DomainCreateRequest, DomainRecordRequest, DomainsApi, DropletAction, DropletCreateRequest,
    DropletsApi, FirewallRequest, FirewallRulesRequest, FirewallsApi, ImagesApi, IpVersion,
    KafkaConfig, KeyCreateRequest, ListOptions, OnlineMigrationRequest,
    PartnerAttachmentCreateRequest, PartnerAttachmentUpdateRequest, PartnerAttachmentsApi, Payload,
    RegionsApi, ReservedIpsApi, TopicCreateRequest, TopicUpdateRequest, VpcCreateRequest,
    VpcPeeringCreateRequest, VpcsApi,
};

/// Connection settings for [`DigitalOceanClient`].
#[derive(Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub token: String,
    pub user_agent: String,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("token", &"[REDACTED]")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Async client for the DigitalOcean REST API.
///
/// Responses are unwrapped from their single top-level key (`{"droplet": {...}}`
/// becomes the droplet object) so payloads match what the typed SDK returns.
#[derive(Debug, Clone)]
pub struct DigitalOceanClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl DigitalOceanClient {
    /// Build a client. Fails when the base URL is not absolute.
    pub fn new(config: ClientConfig) -> BackendResult<Self> {
        let mut api_url = config.api_url;
        if !api_url.ends_with('/') {
            api_url.push('/');
        }
        let base_url = Url::parse(&api_url)
            .map_err(|e| BackendError::decode(format!("invalid API url '{}': {}", api_url, e)))?;

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .build()?;

        Ok(Self {
            http,
            base_url,
            token: config.token,
        })
    }

    /// Append `segments` to the base URL, percent-encoding each one.
    ///
    /// `/`, `?` and `#` inside a segment stay part of that segment.
    fn url(&self, segments: &[&str]) -> BackendResult<Url> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(BackendError::InvalidPath(bad.to_string()));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::decode(format!("API url '{}' has no path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send one request and return the decoded body, if any.
    async fn send<B: Serialize + ?Sized>(
        &self,
        ct: &CancellationToken,
        method: Method,
        path: &[&str],
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> BackendResult<Option<Value>> {
        if ct.is_cancelled() {
            return Err(BackendError::Canceled);
        }

        let url = self.url(path)?;
        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .bearer_auth(&self.token);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(method = %method, url = %url, "Sending API request");

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<_, BackendError>((status, text))
        };

        let (status, text) = tokio::select! {
            biased;
            _ = ct.cancelled() => return Err(BackendError::Canceled),
            result = exchange => result?,
        };

        if !status.is_success() {
            return Err(api_error(&method, &url, status, &text));
        }
        if text.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| BackendError::decode(e.to_string()))
    }

    /// GET a resource and unwrap it from `key`.
    async fn fetch(
        &self,
        ct: &CancellationToken,
        path: &[&str],
        opts: Option<&ListOptions>,
        key: &str,
    ) -> BackendResult<Payload> {
        let query = opts.map(ListOptions::query_pairs).unwrap_or_default();
        let body = self
            .send::<Value>(ct, Method::GET, path, &query, None)
            .await?;
        unwrap_key(body, key)
    }

    /// Send a body and unwrap the response from `key`.
    async fn submit<B: Serialize + ?Sized>(
        &self,
        ct: &CancellationToken,
        method: Method,
        path: &[&str],
        body: &B,
        key: &str,
    ) -> BackendResult<Payload> {
        let response = self.send(ct, method, path, &[], Some(body)).await?;
        unwrap_key(response, key)
    }

    /// Send a request whose response body is ignored.
    async fn execute<B: Serialize + ?Sized>(
        &self,
        ct: &CancellationToken,
        method: Method,
        path: &[&str],
        body: Option<&B>,
    ) -> BackendResult<()> {
        self.send(ct, method, path, &[], body).await.map(|_| ())
    }
}

fn unwrap_key(body: Option<Value>, key: &str) -> BackendResult<Payload> {
    match body {
        Some(Value::Object(mut map)) => map
            .remove(key)
            .ok_or_else(|| BackendError::decode(format!("missing '{}' in response", key))),
        Some(_) => Err(BackendError::decode("expected a JSON object")),
        None => Err(BackendError::decode("empty response")),
    }
}

fn api_error(method: &Method, url: &Url, status: StatusCode, body: &str) -> BackendError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    BackendError::Api {
        method: method.to_string(),
        url: url.to_string(),
        status: status.as_u16(),
        message,
    }
}

const NO_BODY: Option<&Value> = None;

// ============================================================================
// Capability implementations
// ============================================================================

#[async_trait]
impl RegionsApi for DigitalOceanClient {
    async fn list(
        &self,
        ct: &CancellationToken,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        self.fetch(ct, &["v2", "regions"], opts.as_ref(), "regions").await
    }
}

#[async_trait]
impl AccountApi for DigitalOceanClient {
    async fn get_account(&self, ct: &CancellationToken) -> BackendResult<Payload> {
        self.fetch(ct, &["v2", "account"], None, "account").await
    }

    async fn get_balance(&self, ct: &CancellationToken) -> BackendResult<Payload> {
        // The balance endpoint is not wrapped in a top-level key.
        let path = ["v2", "customers", "my", "balance"];
        self.send(ct, Method::GET, &path, &[], NO_BODY)
            .await?
            .ok_or_else(|| BackendError::decode("empty response"))
    }

    async fn get_action(&self, ct: &CancellationToken, id: i64) -> BackendResult<Payload> {
        let id = id.to_string();
        self.fetch(ct, &["v2", "actions", id.as_str()], None, "action")
            .await
    }

    async fn list_actions(
        &self,
        ct: &CancellationToken,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        self.fetch(ct, &["v2", "actions"], opts.as_ref(), "actions").await
    }

    async fn list_billing_history(
        &self,
        ct: &CancellationToken,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        let path = ["v2", "customers", "my", "billing_history"];
        self.fetch(ct, &path, opts.as_ref(), "billing_history").await
    }

    async fn list_invoices(
        &self,
        ct: &CancellationToken,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        let path = ["v2", "customers", "my", "invoices"];
        self.fetch(ct, &path, opts.as_ref(), "invoices").await
    }

    async fn get_key(&self, ct: &CancellationToken, id: i64) -> BackendResult<Payload> {
        let id = id.to_string();
        let path = ["v2", "account", "keys", id.as_str()];
        self.fetch(ct, &path, None, "ssh_key").await
    }

    async fn list_keys(
        &self,
        ct: &CancellationToken,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        let path = ["v2", "account", "keys"];
        self.fetch(ct, &path, opts.as_ref(), "ssh_keys").await
    }

    async fn create_key(
        &self,
        ct: &CancellationToken,
        request: &KeyCreateRequest,
    ) -> BackendResult<Payload> {
        let path = ["v2", "account", "keys"];
        self.submit(ct, Method::POST, &path, request, "ssh_key").await
    }

    async fn delete_key(&self, ct: &CancellationToken, id: i64) -> BackendResult<()> {
        let id = id.to_string();
        let path = ["v2", "account", "keys", id.as_str()];
        self.execute(ct, Method::DELETE, &path, NO_BODY).await
    }
}

#[async_trait]
impl DropletsApi for DigitalOceanClient {
    async fn list(
        &self,
        ct: &CancellationToken,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        self.fetch(ct, &["v2", "droplets"], opts.as_ref(), "droplets").await
    }

    async fn list_sizes(
        &self,
        ct: &CancellationToken,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        self.fetch(ct, &["v2", "sizes"], opts.as_ref(), "sizes").await
    }

    async fn get(&self, ct: &CancellationToken, id: i64) -> BackendResult<Payload> {
        let id = id.to_string();
        self.fetch(ct, &["v2", "droplets", id.as_str()], None, "droplet")
            .await
    }

    async fn create(
        &self,
        ct: &CancellationToken,
        request: &DropletCreateRequest,
    ) -> BackendResult<Payload> {
        self.submit(ct, Method::POST, &["v2", "droplets"], request, "droplet")
            .await
    }

    async fn delete(&self, ct: &CancellationToken, id: i64) -> BackendResult<()> {
        let id = id.to_string();
        self.execute(ct, Method::DELETE, &["v2", "droplets", id.as_str()], NO_BODY)
            .await
    }

    async fn kernels(
        &self,
        ct: &CancellationToken,
        id: i64,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        let id = id.to_string();
        let path = ["v2", "droplets", id.as_str(), "kernels"];
        self.fetch(ct, &path, opts.as_ref(), "kernels").await
    }

    async fn neighbors(&self, ct: &CancellationToken, id: i64) -> BackendResult<Payload> {
        let id = id.to_string();
        let path = ["v2", "droplets", id.as_str(), "neighbors"];
        self.fetch(ct, &path, None, "droplets").await
    }

    async fn get_action(
        &self,
        ct: &CancellationToken,
        droplet_id: i64,
        action_id: i64,
    ) -> BackendResult<Payload> {
        let droplet_id = droplet_id.to_string();
        let action_id = action_id.to_string();
        let path = ["v2", "droplets", droplet_id.as_str(), "actions", action_id.as_str()];
        self.fetch(ct, &path, None, "action").await
    }

    async fn perform_action(
        &self,
        ct: &CancellationToken,
        droplet_id: i64,
        action: &DropletAction,
    ) -> BackendResult<Payload> {
        let droplet_id = droplet_id.to_string();
        let path = ["v2", "droplets", droplet_id.as_str(), "actions"];
        self.submit(ct, Method::POST, &path, action, "action").await
    }
}

#[async_trait]
impl ImagesApi for DigitalOceanClient {
    async fn list_distribution(
        &self,
        ct: &CancellationToken,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        let mut query = vec![("type", "distribution".to_string())];
        query.extend(opts.as_ref().map(ListOptions::query_pairs).unwrap_or_default());
        let body = self
            .send::<Value>(ct, Method::GET, &["v2", "images"], &query, None)
            .await?;
        unwrap_key(body, "images")
    }

    async fn get(&self, ct: &CancellationToken, id: i64) -> BackendResult<Payload> {
        let id = id.to_string();
        self.fetch(ct, &["v2", "images", id.as_str()], None, "image")
            .await
    }
}

#[async_trait]
impl FirewallsApi for DigitalOceanClient {
    async fn get(&self, ct: &CancellationToken, id: &str) -> BackendResult<Payload> {
        self.fetch(ct, &["v2", "firewalls", id], None, "firewall")
            .await
    }

    async fn list(
        &self,
        ct: &CancellationToken,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        self.fetch(ct, &["v2", "firewalls"], opts.as_ref(), "firewalls").await
    }

    async fn create(
        &self,
        ct: &CancellationToken,
        request: &FirewallRequest,
    ) -> BackendResult<Payload> {
        self.submit(ct, Method::POST, &["v2", "firewalls"], request, "firewall")
            .await
    }

    async fn delete(&self, ct: &CancellationToken, id: &str) -> BackendResult<()> {
        self.execute(ct, Method::DELETE, &["v2", "firewalls", id], NO_BODY)
            .await
    }

    async fn add_droplets(
        &self,
        ct: &CancellationToken,
        id: &str,
        droplet_ids: &[i64],
    ) -> BackendResult<()> {
        let body = json!({ "droplet_ids": droplet_ids });
        let path = ["v2", "firewalls", id, "droplets"];
        self.execute(ct, Method::POST, &path, Some(&body)).await
    }

    async fn remove_droplets(
        &self,
        ct: &CancellationToken,
        id: &str,
        droplet_ids: &[i64],
    ) -> BackendResult<()> {
        let body = json!({ "droplet_ids": droplet_ids });
        let path = ["v2", "firewalls", id, "droplets"];
        self.execute(ct, Method::DELETE, &path, Some(&body)).await
    }

    async fn add_tags(
        &self,
        ct: &CancellationToken,
        id: &str,
        tags: &[String],
    ) -> BackendResult<()> {
        let body = json!({ "tags": tags });
        let path = ["v2", "firewalls", id, "tags"];
        self.execute(ct, Method::POST, &path, Some(&body)).await
    }

    async fn remove_tags(
        &self,
        ct: &CancellationToken,
        id: &str,
        tags: &[String],
    ) -> BackendResult<()> {
        let body = json!({ "tags": tags });
        let path = ["v2", "firewalls", id, "tags"];
        self.execute(ct, Method::DELETE, &path, Some(&body)).await
    }

    async fn add_rules(
        &self,
        ct: &CancellationToken,
        id: &str,
        rules: &FirewallRulesRequest,
    ) -> BackendResult<()> {
        let path = ["v2", "firewalls", id, "rules"];
        self.execute(ct, Method::POST, &path, Some(rules)).await
    }

    async fn remove_rules(
        &self,
        ct: &CancellationToken,
        id: &str,
        rules: &FirewallRulesRequest,
    ) -> BackendResult<()> {
        let path = ["v2", "firewalls", id, "rules"];
        self.execute(ct, Method::DELETE, &path, Some(rules)).await
    }
}

#[async_trait]
impl DomainsApi for DigitalOceanClient {
    async fn get(&self, ct: &CancellationToken, name: &str) -> BackendResult<Payload> {
        self.fetch(ct, &["v2", "domains", name], None, "domain")
            .await
    }

    async fn list(
        &self,
        ct: &CancellationToken,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        self.fetch(ct, &["v2", "domains"], opts.as_ref(), "domains").await
    }

    async fn create(
        &self,
        ct: &CancellationToken,
        request: &DomainCreateRequest,
    ) -> BackendResult<Payload> {
        self.submit(ct, Method::POST, &["v2", "domains"], request, "domain")
            .await
    }

    async fn delete(&self, ct: &CancellationToken, name: &str) -> BackendResult<()> {
        self.execute(ct, Method::DELETE, &["v2", "domains", name], NO_BODY)
            .await
    }

    async fn get_record(
        &self,
        ct: &CancellationToken,
        domain: &str,
        record_id: i64,
    ) -> BackendResult<Payload> {
        let record_id = record_id.to_string();
        let path = ["v2", "domains", domain, "records", record_id.as_str()];
        self.fetch(ct, &path, None, "domain_record").await
    }

    async fn list_records(
        &self,
        ct: &CancellationToken,
        domain: &str,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        let path = ["v2", "domains", domain, "records"];
        self.fetch(ct, &path, opts.as_ref(), "domain_records").await
    }

    async fn create_record(
        &self,
        ct: &CancellationToken,
        domain: &str,
        request: &DomainRecordRequest,
    ) -> BackendResult<Payload> {
        let path = ["v2", "domains", domain, "records"];
        self.submit(ct, Method::POST, &path, request, "domain_record")
            .await
    }

    async fn edit_record(
        &self,
        ct: &CancellationToken,
        domain: &str,
        record_id: i64,
        request: &DomainRecordRequest,
    ) -> BackendResult<Payload> {
        let record_id = record_id.to_string();
        let path = ["v2", "domains", domain, "records", record_id.as_str()];
        self.submit(ct, Method::PUT, &path, request, "domain_record")
            .await
    }

    async fn delete_record(
        &self,
        ct: &CancellationToken,
        domain: &str,
        record_id: i64,
    ) -> BackendResult<()> {
        let record_id = record_id.to_string();
        let path = ["v2", "domains", domain, "records", record_id.as_str()];
        self.execute(ct, Method::DELETE, &path, NO_BODY).await
    }
}

#[async_trait]
impl DatabasesApi for DigitalOceanClient {
    async fn list(
        &self,
        ct: &CancellationToken,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        self.fetch(ct, &["v2", "databases"], opts.as_ref(), "databases").await
    }

    async fn get(&self, ct: &CancellationToken, id: &str) -> BackendResult<Payload> {
        self.fetch(ct, &["v2", "databases", id], None, "database")
            .await
    }

    async fn create(
        &self,
        ct: &CancellationToken,
        request: &DatabaseCreateRequest,
    ) -> BackendResult<Payload> {
        self.submit(ct, Method::POST, &["v2", "databases"], request, "database")
            .await
    }

    async fn delete(&self, ct: &CancellationToken, id: &str) -> BackendResult<()> {
        self.execute(ct, Method::DELETE, &["v2", "databases", id], NO_BODY)
            .await
    }

    async fn resize(
        &self,
        ct: &CancellationToken,
        id: &str,
        request: &DatabaseResizeRequest,
    ) -> BackendResult<()> {
        let path = ["v2", "databases", id, "resize"];
        self.execute(ct, Method::PUT, &path, Some(request)).await
    }

    async fn list_backups(
        &self,
        ct: &CancellationToken,
        id: &str,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        let path = ["v2", "databases", id, "backups"];
        self.fetch(ct, &path, opts.as_ref(), "backups").await
    }

    async fn list_topics(
        &self,
        ct: &CancellationToken,
        id: &str,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        let path = ["v2", "databases", id, "topics"];
        self.fetch(ct, &path, opts.as_ref(), "topics").await
    }

    async fn create_topic(
        &self,
        ct: &CancellationToken,
        id: &str,
        request: &TopicCreateRequest,
    ) -> BackendResult<Payload> {
        let path = ["v2", "databases", id, "topics"];
        self.submit(ct, Method::POST, &path, request, "topic").await
    }

    async fn get_topic(
        &self,
        ct: &CancellationToken,
        id: &str,
        name: &str,
    ) -> BackendResult<Payload> {
        let path = ["v2", "databases", id, "topics", name];
        self.fetch(ct, &path, None, "topic").await
    }

    async fn update_topic(
        &self,
        ct: &CancellationToken,
        id: &str,
        name: &str,
        request: &TopicUpdateRequest,
    ) -> BackendResult<()> {
        let path = ["v2", "databases", id, "topics", name];
        self.execute(ct, Method::PUT, &path, Some(request)).await
    }

    async fn delete_topic(
        &self,
        ct: &CancellationToken,
        id: &str,
        name: &str,
    ) -> BackendResult<()> {
        let path = ["v2", "databases", id, "topics", name];
        self.execute(ct, Method::DELETE, &path, NO_BODY).await
    }

    async fn get_kafka_config(
        &self,
        ct: &CancellationToken,
        id: &str,
    ) -> BackendResult<Payload> {
        let path = ["v2", "databases", id, "config"];
        self.fetch(ct, &path, None, "config").await
    }

    async fn update_kafka_config(
        &self,
        ct: &CancellationToken,
        id: &str,
        config: &KafkaConfig,
    ) -> BackendResult<()> {
        let body = json!({ "config": config });
        let path = ["v2", "databases", id, "config"];
        self.execute(ct, Method::PATCH, &path, Some(&body)).await
    }

    async fn get_ca(&self, ct: &CancellationToken, id: &str) -> BackendResult<Payload> {
        self.fetch(ct, &["v2", "databases", id, "ca"], None, "ca").await
    }

    async fn list_options(&self, ct: &CancellationToken) -> BackendResult<Payload> {
        self.fetch(ct, &["v2", "databases", "options"], None, "options")
            .await
    }

    async fn upgrade_major_version(
        &self,
        ct: &CancellationToken,
        id: &str,
        version: &str,
    ) -> BackendResult<()> {
        let body = json!({ "version": version });
        let path = ["v2", "databases", id, "upgrade"];
        self.execute(ct, Method::PUT, &path, Some(&body)).await
    }

    async fn start_online_migration(
        &self,
        ct: &CancellationToken,
        id: &str,
        request: &OnlineMigrationRequest,
    ) -> BackendResult<Payload> {
        // Migration status is returned bare, not under a key.
        let path = ["v2", "databases", id, "online-migration"];
        self.send(ct, Method::PUT, &path, &[], Some(request))
            .await?
            .ok_or_else(|| BackendError::decode("empty response"))
    }

    async fn stop_online_migration(
        &self,
        ct: &CancellationToken,
        id: &str,
        migration_id: &str,
    ) -> BackendResult<()> {
        let path = ["v2", "databases", id, "online-migration", migration_id];
        self.execute(ct, Method::DELETE, &path, NO_BODY).await
    }

    async fn get_online_migration(
        &self,
        ct: &CancellationToken,
        id: &str,
    ) -> BackendResult<Payload> {
        let path = ["v2", "databases", id, "online-migration"];
        self.send(ct, Method::GET, &path, &[], NO_BODY)
            .await?
            .ok_or_else(|| BackendError::decode("empty response"))
    }

    async fn get_user(
        &self,
        ct: &CancellationToken,
        id: &str,
        user: &str,
    ) -> BackendResult<Payload> {
        let path = ["v2", "databases", id, "users", user];
        self.fetch(ct, &path, None, "user").await
    }

    async fn list_users(
        &self,
        ct: &CancellationToken,
        id: &str,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        let path = ["v2", "databases", id, "users"];
        self.fetch(ct, &path, opts.as_ref(), "users").await
    }

    async fn create_user(
        &self,
        ct: &CancellationToken,
        id: &str,
        request: &DatabaseUserCreateRequest,
    ) -> BackendResult<Payload> {
        let path = ["v2", "databases", id, "users"];
        self.submit(ct, Method::POST, &path, request, "user").await
    }

    async fn update_user(
        &self,
        ct: &CancellationToken,
        id: &str,
        user: &str,
        request: &DatabaseUserUpdateRequest,
    ) -> BackendResult<Payload> {
        let path = ["v2", "databases", id, "users", user];
        self.submit(ct, Method::PUT, &path, request, "user").await
    }

    async fn delete_user(
        &self,
        ct: &CancellationToken,
        id: &str,
        user: &str,
    ) -> BackendResult<()> {
        let path = ["v2", "databases", id, "users", user];
        self.execute(ct, Method::DELETE, &path, NO_BODY).await
    }

    async fn get_firewall_rules(
        &self,
        ct: &CancellationToken,
        id: &str,
    ) -> BackendResult<Payload> {
        let path = ["v2", "databases", id, "firewall"];
        self.fetch(ct, &path, None, "rules").await
    }

    async fn update_firewall_rules(
        &self,
        ct: &CancellationToken,
        id: &str,
        rules: &[DatabaseFirewallRule],
    ) -> BackendResult<()> {
        let body = json!({ "rules": rules });
        let path = ["v2", "databases", id, "firewall"];
        self.execute(ct, Method::PUT, &path, Some(&body)).await
    }

    async fn list_pools(
        &self,
        ct: &CancellationToken,
        id: &str,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        let path = ["v2", "databases", id, "pools"];
        self.fetch(ct, &path, opts.as_ref(), "pools").await
    }

    async fn create_pool(
        &self,
        ct: &CancellationToken,
        id: &str,
        request: &DatabasePoolRequest,
    ) -> BackendResult<Payload> {
        let path = ["v2", "databases", id, "pools"];
        self.submit(ct, Method::POST, &path, request, "pool").await
    }

    async fn get_pool(
        &self,
        ct: &CancellationToken,
        id: &str,
        name: &str,
    ) -> BackendResult<Payload> {
        let path = ["v2", "databases", id, "pools", name];
        self.fetch(ct, &path, None, "pool").await
    }

    async fn update_pool(
        &self,
        ct: &CancellationToken,
        id: &str,
        name: &str,
        request: &DatabasePoolRequest,
    ) -> BackendResult<()> {
        let path = ["v2", "databases", id, "pools", name];
        self.execute(ct, Method::PUT, &path, Some(request)).await
    }

    async fn delete_pool(
        &self,
        ct: &CancellationToken,
        id: &str,
        name: &str,
    ) -> BackendResult<()> {
        let path = ["v2", "databases", id, "pools", name];
        self.execute(ct, Method::DELETE, &path, NO_BODY).await
    }

    async fn get_replica(
        &self,
        ct: &CancellationToken,
        id: &str,
        name: &str,
    ) -> BackendResult<Payload> {
        let path = ["v2", "databases", id, "replicas", name];
        self.fetch(ct, &path, None, "replica").await
    }

    async fn list_replicas(
        &self,
        ct: &CancellationToken,
        id: &str,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        let path = ["v2", "databases", id, "replicas"];
        self.fetch(ct, &path, opts.as_ref(), "replicas").await
    }

    async fn create_replica(
        &self,
        ct: &CancellationToken,
        id: &str,
        request: &DatabaseReplicaCreateRequest,
    ) -> BackendResult<Payload> {
        let path = ["v2", "databases", id, "replicas"];
        self.submit(ct, Method::POST, &path, request, "replica").await
    }

    async fn delete_replica(
        &self,
        ct: &CancellationToken,
        id: &str,
        name: &str,
    ) -> BackendResult<()> {
        let path = ["v2", "databases", id, "replicas", name];
        self.execute(ct, Method::DELETE, &path, NO_BODY).await
    }

    async fn promote_replica(
        &self,
        ct: &CancellationToken,
        id: &str,
        name: &str,
    ) -> BackendResult<()> {
        let path = ["v2", "databases", id, "replicas", name, "promote"];
        self.execute(ct, Method::PUT, &path, NO_BODY).await
    }
}

/// Collection path and response keys of one reserved IP family.
struct IpEndpoints {
    collection: &'static str,
    item: &'static str,
    items: &'static str,
}

fn ip_endpoints(version: IpVersion) -> IpEndpoints {
    match version {
        IpVersion::V4 => IpEndpoints {
            collection: "reserved_ips",
            item: "reserved_ip",
            items: "reserved_ips",
        },
        IpVersion::V6 => IpEndpoints {
            collection: "reserved_ipv6",
            item: "reserved_ipv6",
            items: "reserved_ipv6s",
        },
    }
}

#[async_trait]
impl ReservedIpsApi for DigitalOceanClient {
    async fn get(
        &self,
        ct: &CancellationToken,
        version: IpVersion,
        ip: &str,
    ) -> BackendResult<Payload> {
        let ep = ip_endpoints(version);
        self.fetch(ct, &["v2", ep.collection, ip], None, ep.item).await
    }

    async fn list(
        &self,
        ct: &CancellationToken,
        version: IpVersion,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        let ep = ip_endpoints(version);
        self.fetch(ct, &["v2", ep.collection], opts.as_ref(), ep.items)
            .await
    }

    async fn reserve(
        &self,
        ct: &CancellationToken,
        version: IpVersion,
        region: &str,
    ) -> BackendResult<Payload> {
        let ep = ip_endpoints(version);
        // The v6 endpoint names the region field differently.
        let body = match version {
            IpVersion::V4 => json!({ "region": region }),
            IpVersion::V6 => json!({ "region_slug": region }),
        };
        self.submit(ct, Method::POST, &["v2", ep.collection], &body, ep.item)
            .await
    }

    async fn release(
        &self,
        ct: &CancellationToken,
        version: IpVersion,
        ip: &str,
    ) -> BackendResult<()> {
        let ep = ip_endpoints(version);
        self.execute(ct, Method::DELETE, &["v2", ep.collection, ip], NO_BODY)
            .await
    }

    async fn assign(
        &self,
        ct: &CancellationToken,
        version: IpVersion,
        ip: &str,
        droplet_id: i64,
    ) -> BackendResult<Payload> {
        let ep = ip_endpoints(version);
        let body = json!({ "type": "assign", "droplet_id": droplet_id });
        let path = ["v2", ep.collection, ip, "actions"];
        self.submit(ct, Method::POST, &path, &body, "action").await
    }

    async fn unassign(
        &self,
        ct: &CancellationToken,
        version: IpVersion,
        ip: &str,
    ) -> BackendResult<Payload> {
        let ep = ip_endpoints(version);
        let body = json!({ "type": "unassign" });
        let path = ["v2", ep.collection, ip, "actions"];
        self.submit(ct, Method::POST, &path, &body, "action").await
    }
}

#[async_trait]
impl CertificatesApi for DigitalOceanClient {
    async fn get(&self, ct: &CancellationToken, id: &str) -> BackendResult<Payload> {
        self.fetch(ct, &["v2", "certificates", id], None, "certificate")
            .await
    }

    async fn list(
        &self,
        ct: &CancellationToken,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        self.fetch(ct, &["v2", "certificates"], opts.as_ref(), "certificates")
            .await
    }

    async fn create(
        &self,
        ct: &CancellationToken,
        request: &CertificateRequest,
    ) -> BackendResult<Payload> {
        self.submit(ct, Method::POST, &["v2", "certificates"], request, "certificate")
            .await
    }

    async fn delete(&self, ct: &CancellationToken, id: &str) -> BackendResult<()> {
        self.execute(ct, Method::DELETE, &["v2", "certificates", id], NO_BODY)
            .await
    }
}

#[async_trait]
impl VpcsApi for DigitalOceanClient {
    async fn create(
        &self,
        ct: &CancellationToken,
        request: &VpcCreateRequest,
    ) -> BackendResult<Payload> {
        self.submit(ct, Method::POST, &["v2", "vpcs"], request, "vpc")
            .await
    }

    async fn list_members(
        &self,
        ct: &CancellationToken,
        id: &str,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        let path = ["v2", "vpcs", id, "members"];
        self.fetch(ct, &path, opts.as_ref(), "members").await
    }

    async fn delete(&self, ct: &CancellationToken, id: &str) -> BackendResult<()> {
        self.execute(ct, Method::DELETE, &["v2", "vpcs", id], NO_BODY)
            .await
    }

    async fn create_peering(
        &self,
        ct: &CancellationToken,
        request: &VpcPeeringCreateRequest,
    ) -> BackendResult<Payload> {
        self.submit(ct, Method::POST, &["v2", "vpc_peerings"], request, "vpc_peering")
            .await
    }

    async fn delete_peering(&self, ct: &CancellationToken, id: &str) -> BackendResult<()> {
        self.execute(ct, Method::DELETE, &["v2", "vpc_peerings", id], NO_BODY)
            .await
    }
}

const PARTNER_ATTACHMENTS: [&str; 3] = ["v2", "partner_network_connect", "attachments"];

/// `/v2/partner_network_connect/attachments` followed by `rest`.
fn attachment_path<'a>(rest: &[&'a str]) -> Vec<&'a str> {
    let mut path: Vec<&'a str> = PARTNER_ATTACHMENTS.to_vec();
    path.extend_from_slice(rest);
    path
}

#[async_trait]
impl PartnerAttachmentsApi for DigitalOceanClient {
    async fn get(&self, ct: &CancellationToken, id: &str) -> BackendResult<Payload> {
        self.fetch(ct, &attachment_path(&[id]), None, "partner_attachment")
            .await
    }

    async fn list(
        &self,
        ct: &CancellationToken,
        opts: Option<ListOptions>,
    ) -> BackendResult<Payload> {
        self.fetch(ct, &PARTNER_ATTACHMENTS, opts.as_ref(), "partner_attachments")
            .await
    }

    async fn create(
        &self,
        ct: &CancellationToken,
        request: &PartnerAttachmentCreateRequest,
    ) -> BackendResult<Payload> {
        self.submit(ct, Method::POST, &PARTNER_ATTACHMENTS, request, "partner_attachment")
            .await
    }

    async fn update(
        &self,
        ct: &CancellationToken,
        id: &str,
        request: &PartnerAttachmentUpdateRequest,
    ) -> BackendResult<Payload> {
        let path = attachment_path(&[id]);
        self.submit(ct, Method::PATCH, &path, request, "partner_attachment")
            .await
    }

    async fn delete(&self, ct: &CancellationToken, id: &str) -> BackendResult<()> {
        self.execute(ct, Method::DELETE, &attachment_path(&[id]), NO_BODY)
            .await
    }

    async fn get_service_key(&self, ct: &CancellationToken, id: &str) -> BackendResult<Payload> {
        let path = attachment_path(&[id, "service_key"]);
        self.fetch(ct, &path, None, "service_key").await
    }

    async fn get_bgp_auth_key(&self, ct: &CancellationToken, id: &str) -> BackendResult<Payload> {
        let path = attachment_path(&[id, "bgp_auth_key"]);
        self.fetch(ct, &path, None, "bgp_auth_key").await
    }
}
