use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::fetched;
use crate::backend::{ListOptions, RegionsApi};
use crate::domains::resources::{PathVars, ResourceDefinition, ResourceError};
use crate::domains::tools::ResultEnvelope;

pub struct RegionResources {
    api: Arc<dyn RegionsApi>,
}

impl RegionResources {
    pub fn new(api: Arc<dyn RegionsApi>) -> Self {
        Self { api }
    }

    pub fn definitions(&self) -> Vec<ResourceDefinition> {
        vec![
            ResourceDefinition::builder("regions://all")
                .name("Regions")
                .description("Returns all available regions")
                .handle(self.api.clone(), all_regions),
        ]
    }
}

async fn all_regions(
    api: Arc<dyn RegionsApi>,
    _vars: PathVars,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ResourceError> {
    fetched(
        "error fetching regions",
        api.list(&ct, Some(ListOptions::page(1, 200))).await,
    )
}
