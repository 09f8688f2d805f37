//! Image tools.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{page_params, paged, respond, summarize};
use crate::backend::ImagesApi;
use crate::domains::tools::{Arguments, ParameterSpec, ResultEnvelope, ToolDefinition, ToolError};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PER_PAGE: i64 = 50;

const LISTED_FIELDS: [&str; 4] = ["id", "name", "distribution", "type"];

pub struct ImageTools {
    api: Arc<dyn ImagesApi>,
}

impl ImageTools {
    pub fn new(api: Arc<dyn ImagesApi>) -> Self {
        Self { api }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::builder("digitalocean-image-list")
                .description("List all available distribution images. Supports pagination.")
                .params(page_params(DEFAULT_PAGE, DEFAULT_PER_PAGE))
                .handle(self.api.clone(), list_images),
            ToolDefinition::builder("digitalocean-image-get")
                .description("Get a specific image by its numeric ID.")
                .param(
                    ParameterSpec::number("ID")
                        .required_with("Image ID is required")
                        .describe("Image ID"),
                )
                .handle(self.api.clone(), get_image),
        ]
    }
}

async fn list_images(
    api: Arc<dyn ImagesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let opts = paged(&args, ("Page", DEFAULT_PAGE), ("PerPage", DEFAULT_PER_PAGE))?;
    summarize(api.list_distribution(&ct, Some(opts)).await, &LISTED_FIELDS)
}

async fn get_image(
    api: Arc<dyn ImagesApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    respond(api.get(&ct, args.integer("ID")?).await)
}
