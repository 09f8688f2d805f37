//! Droplet size tools.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{page_params, paged, summarize};
use crate::backend::DropletsApi;
use crate::domains::tools::{Arguments, ResultEnvelope, ToolDefinition, ToolError};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PER_PAGE: i64 = 50;

const LISTED_FIELDS: [&str; 9] = [
    "slug",
    "available",
    "price_monthly",
    "price_hourly",
    "memory",
    "vcpus",
    "disk",
    "transfer",
    "regions",
];

pub struct SizeTools {
    api: Arc<dyn DropletsApi>,
}

impl SizeTools {
    pub fn new(api: Arc<dyn DropletsApi>) -> Self {
        Self { api }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::builder("size-list")
                .description("List all available droplet sizes. Supports pagination.")
                .params(page_params(DEFAULT_PAGE, DEFAULT_PER_PAGE))
                .handle(self.api.clone(), list_sizes),
        ]
    }
}

async fn list_sizes(
    api: Arc<dyn DropletsApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let opts = paged(&args, ("Page", DEFAULT_PAGE), ("PerPage", DEFAULT_PER_PAGE))?;
    summarize(api.list_sizes(&ct, Some(opts)).await, &LISTED_FIELDS)
}
