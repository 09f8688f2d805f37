//! Region tools.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{paged, respond};
use crate::backend::RegionsApi;
use crate::domains::tools::{Arguments, ParameterSpec, ResultEnvelope, ToolDefinition, ToolError};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PER_PAGE: i64 = 50;

/// Tools over the region catalogue. Always registered.
pub struct RegionTools {
    api: Arc<dyn RegionsApi>,
}

impl RegionTools {
    pub fn new(api: Arc<dyn RegionsApi>) -> Self {
        Self { api }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::builder("digitalocean-region-list")
                .description(
                    "List all available regions with features and droplet size availability. \
                     Supports pagination.",
                )
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
                .handle(self.api.clone(), list_regions),
        ]
    }
}

async fn list_regions(
    api: Arc<dyn RegionsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let opts = paged(&args, ("Page", DEFAULT_PAGE), ("PerPage", DEFAULT_PER_PAGE))?;
    respond(api.list(&ct, Some(opts)).await)
}
