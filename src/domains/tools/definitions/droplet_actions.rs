//! Droplet action tools.
//!
//! Every action tool takes the droplet `ID` plus a few action-specific
//! fields, posts one action, and returns the action record.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::respond;
use crate::backend::{DropletAction, DropletsApi};
use crate::domains::tools::{Arguments, ParameterSpec, ResultEnvelope, ToolDefinition, ToolError};

/// Builds the action from already extracted arguments.
type BuildAction = fn(&Arguments) -> Result<DropletAction, ToolError>;

pub struct DropletActionTools {
    api: Arc<dyn DropletsApi>,
}

impl DropletActionTools {
    pub fn new(api: Arc<dyn DropletsApi>) -> Self {
        Self { api }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        vec![
            self.action(
                "power-cycle",
                "Power cycle a droplet",
                "ID of the droplet to power cycle",
                vec![],
                |_| Ok(DropletAction::PowerCycle),
            ),
            self.action(
                "power-on",
                "Power on a droplet",
                "ID of the droplet to power on",
                vec![],
                |_| Ok(DropletAction::PowerOn),
            ),
            self.action(
                "power-off",
                "Power off a droplet",
                "ID of the droplet to power off",
                vec![],
                |_| Ok(DropletAction::PowerOff),
            ),
            self.action(
                "shutdown",
                "Shutdown a droplet",
                "ID of the droplet to shutdown",
                vec![],
                |_| Ok(DropletAction::Shutdown),
            ),
            self.action(
                "restore",
                "Restore a droplet from a backup/snapshot",
                "ID of the droplet to restore",
                vec![
                    ParameterSpec::number("ImageID")
                        .required()
                        .describe("ID of the backup/snapshot image"),
                ],
                |args| {
                    Ok(DropletAction::Restore {
                        image: args.integer("ImageID")?,
                    })
                },
            ),
            self.action(
                "resize",
                "Resize a droplet",
                "ID of the droplet to resize",
                vec![
                    ParameterSpec::string("Size")
                        .required()
                        .describe("Slug of the new size (e.g., s-1vcpu-1gb)"),
                    ParameterSpec::boolean("ResizeDisk")
                        .default(false)
                        .describe("Whether to resize the disk"),
                ],
                |args| {
                    Ok(DropletAction::Resize {
                        size: args.str("Size")?.to_string(),
                        disk: args.bool("ResizeDisk")?,
                    })
                },
            ),
            self.action(
                "rebuild",
                "Rebuild a droplet from an image",
                "ID of the droplet to rebuild",
                vec![
                    ParameterSpec::number("ImageID")
                        .required()
                        .describe("ID of the image to rebuild from"),
                ],
                |args| {
                    Ok(DropletAction::Rebuild {
                        image: args.integer("ImageID")?,
                    })
                },
            ),
            self.action(
                "rename",
                "Rename a droplet",
                "ID of the droplet to rename",
                vec![
                    ParameterSpec::string("Name")
                        .required()
                        .describe("New name for the droplet"),
                ],
                |args| {
                    Ok(DropletAction::Rename {
                        name: args.str("Name")?.to_string(),
                    })
                },
            ),
            self.action(
                "change-kernel",
                "Change a droplet's kernel",
                "ID of the droplet",
                vec![
                    ParameterSpec::number("KernelID")
                        .required()
                        .describe("ID of the kernel to switch to"),
                ],
                |args| {
                    Ok(DropletAction::ChangeKernel {
                        kernel: args.integer("KernelID")?,
                    })
                },
            ),
            self.action(
                "enable-ipv6",
                "Enable IPv6 on a droplet",
                "ID of the droplet",
                vec![],
                |_| Ok(DropletAction::EnableIpv6),
            ),
            self.action(
                "enable-backups",
                "Enable backups on a droplet",
                "ID of the droplet",
                vec![],
                |_| Ok(DropletAction::EnableBackups),
            ),
            self.action(
                "disable-backups",
                "Disable backups on a droplet",
                "ID of the droplet",
                vec![],
                |_| Ok(DropletAction::DisableBackups),
            ),
            self.action(
                "snapshot",
                "Take a snapshot of a droplet",
                "ID of the droplet",
                vec![
                    ParameterSpec::string("Name")
                        .required()
                        .describe("Name for the snapshot"),
                ],
                |args| {
                    Ok(DropletAction::Snapshot {
                        name: args.str("Name")?.to_string(),
                    })
                },
            ),
        ]
    }

    fn action(
        &self,
        suffix: &str,
        description: &str,
        id_description: &str,
        extra: Vec<ParameterSpec>,
        build: BuildAction,
    ) -> ToolDefinition {
        let mut builder = ToolDefinition::builder(format!("digitalocean-droplet-action-{}", suffix))
            .description(description)
            .param(ParameterSpec::number("ID").required().describe(id_description));
        for spec in extra {
            builder = builder.param(spec);
        }
        builder.handle((self.api.clone(), build), perform)
    }
}

async fn perform(
    (api, build): (Arc<dyn DropletsApi>, BuildAction),
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let id = args.integer("ID")?;
    let action = build(&args)?;
    respond(api.perform_action(&ct, id, &action).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::stub::StubBackend;
    use crate::domains::tools::definitions::testing::{call, payload, registry};
    use serde_json::json;

    #[test]
    fn test_all_actions_registered() {
        let stub = StubBackend::new();
        let registry = registry(DropletActionTools::new(stub).definitions());
        assert_eq!(registry.len(), 13);
        assert!(registry.lookup("digitalocean-droplet-action-power-cycle").is_ok());
        assert!(registry.lookup("digitalocean-droplet-action-snapshot").is_ok());
    }

    #[tokio::test]
    async fn test_resize_defaults_disk_to_false() {
        let stub = StubBackend::new();
        stub.respond("droplets.action", json!({"id": 501, "status": "in-progress"}));
        let registry = registry(DropletActionTools::new(stub.clone()).definitions());

        let envelope = call(
            &registry,
            "digitalocean-droplet-action-resize",
            json!({"ID": 10, "Size": "s-2vcpu-4gb"}),
        )
        .await;

        assert_eq!(payload(&envelope)["status"], "in-progress");
        assert_eq!(
            stub.last_call().unwrap().args,
            json!({
                "droplet_id": 10,
                "action": {"type": "resize", "size": "s-2vcpu-4gb", "disk": false}
            })
        );
    }

    #[tokio::test]
    async fn test_rename_requires_name() {
        let stub = StubBackend::new();
        let registry = registry(DropletActionTools::new(stub.clone()).definitions());

        let envelope = call(&registry, "digitalocean-droplet-action-rename", json!({"ID": 10})).await;
        assert_eq!(envelope.text_content(), "Name is required");
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_power_off_backend_failure() {
        let stub = StubBackend::new();
        stub.fail("droplets.action", 404, "droplet not found");
        let registry = registry(DropletActionTools::new(stub.clone()).definitions());

        let envelope = call(&registry, "digitalocean-droplet-action-power-off", json!({"ID": 1})).await;
        assert!(envelope.text_content().starts_with("api error: "));
        assert!(envelope.text_content().contains("droplet not found"));
    }
}
