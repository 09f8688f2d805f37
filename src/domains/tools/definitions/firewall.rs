//! Cloud firewall tools.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value, json};
use tokio_util::sync::CancellationToken;

use super::{confirm, paged, respond};
use crate::backend::{
    Destinations, FirewallRequest, FirewallRulesRequest, FirewallsApi, InboundRule, OutboundRule,
    Sources,
};
use crate::domains::tools::{
    Arguments, ItemKind, ParameterSpec, ResultEnvelope, ToolDefinition, ToolError,
};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PER_PAGE: i64 = 20;

const NO_RULES: &str = "At least one inbound or outbound rule must be provided";

/// Inbound rule as callers send it.
#[derive(Debug, Deserialize)]
struct InboundRuleInput {
    #[serde(rename = "Protocol")]
    protocol: String,
    #[serde(rename = "PortRange")]
    port_range: String,
    #[serde(rename = "Sources")]
    sources: Vec<String>,
}

/// Outbound rule as callers send it.
#[derive(Debug, Deserialize)]
struct OutboundRuleInput {
    #[serde(rename = "Protocol")]
    protocol: String,
    #[serde(rename = "PortRange")]
    port_range: String,
    #[serde(rename = "Destinations")]
    destinations: Vec<String>,
}

impl From<InboundRuleInput> for InboundRule {
    fn from(rule: InboundRuleInput) -> Self {
        InboundRule {
            protocol: rule.protocol,
            port_range: rule.port_range,
            sources: Sources {
                addresses: rule.sources,
            },
        }
    }
}

impl From<OutboundRuleInput> for OutboundRule {
    fn from(rule: OutboundRuleInput) -> Self {
        OutboundRule {
            protocol: rule.protocol,
            port_range: rule.port_range,
            destinations: Destinations {
                addresses: rule.destinations,
            },
        }
    }
}

fn rule_items(addresses: &str, address_doc: &str, list_doc: &str, description: &str) -> Value {
    let mut properties = Map::new();
    properties.insert(
        "Protocol".into(),
        json!({"type": "string", "description": "Protocol (tcp, udp, icmp)"}),
    );
    properties.insert(
        "PortRange".into(),
        json!({"type": "string", "description": "Port range (e.g., '80', '443', '8000-8080')"}),
    );
    properties.insert(
        addresses.into(),
        json!({
            "type": "array",
            "items": {"type": "string", "description": address_doc},
            "description": list_doc,
        }),
    );

    json!({
        "type": "object",
        "properties": properties,
        "required": ["Protocol", "PortRange", addresses],
        "description": description,
    })
}

fn inbound_rules(description: &str) -> ParameterSpec {
    ParameterSpec::array("InboundRules", ItemKind::Object)
        .shape::<InboundRuleInput>()
        .items(rule_items(
            "Sources",
            "Source IP address or CIDR block",
            "List of source addresses",
            "Inbound firewall rule",
        ))
        .describe(description)
}

fn outbound_rules(description: &str) -> ParameterSpec {
    ParameterSpec::array("OutboundRules", ItemKind::Object)
        .shape::<OutboundRuleInput>()
        .items(rule_items(
            "Destinations",
            "Destination IP address or CIDR block",
            "List of destination addresses",
            "Outbound firewall rule",
        ))
        .describe(description)
}

/// What a membership tool changes.
#[derive(Debug, Clone, Copy)]
enum Change {
    Add,
    Remove,
}

pub struct FirewallTools {
    api: Arc<dyn FirewallsApi>,
}

impl FirewallTools {
    pub fn new(api: Arc<dyn FirewallsApi>) -> Self {
        Self { api }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::builder("digitalocean-firewall-get")
                .description("Get firewall information by ID")
                .param(
                    ParameterSpec::string("ID")
                        .required_with("Firewall ID is required")
                        .path_segment()
                        .describe("ID of the firewall"),
                )
                .handle(self.api.clone(), get_firewall),
            ToolDefinition::builder("digitalocean-firewall-list")
                .description("List firewalls with pagination")
                .param(
                    ParameterSpec::number("Page")
                        .default(DEFAULT_PAGE)
                        .describe("Page number"),
                )
                .param(
                    ParameterSpec::number("PerPage")
                        .default(DEFAULT_PER_PAGE)
                        .describe("Items per page"),
                )
                .handle(self.api.clone(), list_firewalls),
            ToolDefinition::builder("digitalocean-firewall-create")
                .description("Create a new firewall")
                .param(ParameterSpec::string("Name").required().describe("Name of the firewall"))
                .param(
                    ParameterSpec::string("InboundProtocol")
                        .required()
                        .describe("Protocol for inbound rule"),
                )
                .param(
                    ParameterSpec::string("InboundPortRange")
                        .required()
                        .describe("Port range for inbound rule"),
                )
                .param(
                    ParameterSpec::string("InboundSource")
                        .required()
                        .describe("Source address for inbound rule"),
                )
                .param(
                    ParameterSpec::string("OutboundProtocol")
                        .required()
                        .describe("Protocol for outbound rule"),
                )
                .param(
                    ParameterSpec::string("OutboundPortRange")
                        .required()
                        .describe("Port range for outbound rule"),
                )
                .param(
                    ParameterSpec::string("OutboundDestination")
                        .required()
                        .describe("Destination address for outbound rule"),
                )
                .param(
                    ParameterSpec::array("DropletIDs", ItemKind::Number)
                        .describe("Droplet IDs to apply the firewall to"),
                )
                .param(
                    ParameterSpec::array("Tags", ItemKind::String)
                        .describe("Tags to apply the firewall to"),
                )
                .handle(self.api.clone(), create_firewall),
            ToolDefinition::builder("digitalocean-firewall-delete")
                .description("Delete a firewall")
                .param(
                    ParameterSpec::string("ID")
                        .required()
                        .path_segment()
                        .describe("ID of the firewall to delete"),
                )
                .handle(self.api.clone(), delete_firewall),
            ToolDefinition::builder("digitalocean-firewall-add-droplets")
                .description("Adds one or more droplets to a firewall")
                .param(
                    ParameterSpec::string("ID")
                        .required()
                        .path_segment()
                        .describe("ID of the firewall to apply to droplets"),
                )
                .param(
                    ParameterSpec::array("DropletIDs", ItemKind::Number)
                        .required()
                        .describe("Droplet IDs to apply the firewall to"),
                )
                .handle((self.api.clone(), Change::Add), change_droplets),
            ToolDefinition::builder("digitalocean-firewall-remove-droplets")
                .description("Removes one or more droplets from a firewall")
                .param(
                    ParameterSpec::string("ID")
                        .required()
                        .path_segment()
                        .describe("ID of the firewall to remove droplets from"),
                )
                .param(
                    ParameterSpec::array("DropletIDs", ItemKind::Number)
                        .required()
                        .describe("Droplet IDs to remove from the firewall"),
                )
                .handle((self.api.clone(), Change::Remove), change_droplets),
            ToolDefinition::builder("digitalocean-firewall-add-tags")
                .description("Adds one or more tags to a firewall")
                .param(
                    ParameterSpec::string("ID")
                        .required()
                        .path_segment()
                        .describe("ID of the firewall to update tags"),
                )
                .param(
                    ParameterSpec::array("Tags", ItemKind::String)
                        .required()
                        .describe("Tags to apply the firewall to"),
                )
                .handle((self.api.clone(), Change::Add), change_tags),
            ToolDefinition::builder("digitalocean-firewall-remove-tags")
                .description("Removes one or more tags from a firewall")
                .param(
                    ParameterSpec::string("ID")
                        .required()
                        .path_segment()
                        .describe("ID of the firewall to update tags"),
                )
                .param(
                    ParameterSpec::array("Tags", ItemKind::String)
                        .required()
                        .describe("Tags to remove from the firewall"),
                )
                .handle((self.api.clone(), Change::Remove), change_tags),
            ToolDefinition::builder("digitalocean-firewall-add-rules")
                .description("Add one or more rules to a firewall")
                .param(
                    ParameterSpec::string("ID")
                        .required()
                        .path_segment()
                        .describe("ID of the firewall to add rules to"),
                )
                .param(inbound_rules("Inbound rules to add"))
                .param(outbound_rules("Outbound rules to add"))
                .handle((self.api.clone(), Change::Add), change_rules),
            ToolDefinition::builder("digitalocean-firewall-remove-rules")
                .description("Remove one or more rules from a firewall")
                .param(
                    ParameterSpec::string("ID")
                        .required()
                        .path_segment()
                        .describe("ID of the firewall to remove rules from"),
                )
                .param(inbound_rules("Inbound rules to remove"))
                .param(outbound_rules("Outbound rules to remove"))
                .handle((self.api.clone(), Change::Remove), change_rules),
        ]
    }
}

async fn get_firewall(
    api: Arc<dyn FirewallsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    respond(api.get(&ct, args.str("ID")?).await)
}

async fn list_firewalls(
    api: Arc<dyn FirewallsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let opts = paged(&args, ("Page", DEFAULT_PAGE), ("PerPage", DEFAULT_PER_PAGE))?;
    respond(api.list(&ct, Some(opts)).await)
}

async fn create_firewall(
    api: Arc<dyn FirewallsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let request = FirewallRequest {
        name: args.str("Name")?.to_string(),
        inbound_rules: vec![InboundRule {
            protocol: args.str("InboundProtocol")?.to_string(),
            port_range: args.str("InboundPortRange")?.to_string(),
            sources: Sources {
                addresses: vec![args.str("InboundSource")?.to_string()],
            },
        }],
        outbound_rules: vec![OutboundRule {
            protocol: args.str("OutboundProtocol")?.to_string(),
            port_range: args.str("OutboundPortRange")?.to_string(),
            destinations: Destinations {
                addresses: vec![args.str("OutboundDestination")?.to_string()],
            },
        }],
        droplet_ids: args.integers("DropletIDs")?,
        tags: args.strings("Tags")?,
    };
    respond(api.create(&ct, &request).await)
}

async fn delete_firewall(
    api: Arc<dyn FirewallsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    confirm(
        api.delete(&ct, args.str("ID")?).await,
        "Firewall deleted successfully",
    )
}

async fn change_droplets(
    (api, change): (Arc<dyn FirewallsApi>, Change),
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let id = args.str("ID")?;
    let droplet_ids = args.integers("DropletIDs")?;
    match change {
        Change::Add => confirm(
            api.add_droplets(&ct, id, &droplet_ids).await,
            "Droplet(s) added to firewall successfully",
        ),
        Change::Remove => confirm(
            api.remove_droplets(&ct, id, &droplet_ids).await,
            "Droplet(s) removed from firewall successfully",
        ),
    }
}

async fn change_tags(
    (api, change): (Arc<dyn FirewallsApi>, Change),
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let id = args.str("ID")?;
    let tags = args.strings("Tags")?;
    match change {
        Change::Add => confirm(
            api.add_tags(&ct, id, &tags).await,
            "Tag(s) added to firewall successfully",
        ),
        Change::Remove => confirm(
            api.remove_tags(&ct, id, &tags).await,
            "Tag(s) removed from firewall successfully",
        ),
    }
}

async fn change_rules(
    (api, change): (Arc<dyn FirewallsApi>, Change),
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let id = args.str("ID")?;
    let rules = FirewallRulesRequest {
        inbound_rules: args
            .decode_each::<InboundRuleInput>("InboundRules")?
            .into_iter()
            .map(InboundRule::from)
            .collect(),
        outbound_rules: args
            .decode_each::<OutboundRuleInput>("OutboundRules")?
            .into_iter()
            .map(OutboundRule::from)
            .collect(),
    };
    if rules.is_empty() {
        return Ok(ResultEnvelope::caller_error(NO_RULES));
    }

    match change {
        Change::Add => confirm(
            api.add_rules(&ct, id, &rules).await,
            "Rule(s) added to firewall successfully",
        ),
        Change::Remove => confirm(
            api.remove_rules(&ct, id, &rules).await,
            "Rule(s) removed from firewall successfully",
        ),
    }
}
