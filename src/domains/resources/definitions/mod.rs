//! Resource definitions module.
//!
//! One file per service area, mirroring the tool definitions. Each area
//! holds the backend capability it reads from and returns its
//! [`ResourceDefinition`](super::ResourceDefinition)s.

mod account;
mod databases;
mod droplets;
mod networking;
mod regions;

pub use account::AccountResources;
pub use databases::DatabaseResources;
pub use droplets::{DropletResources, ImageResources};
pub use networking::{DomainResources, FirewallResources};
pub use regions::RegionResources;

use serde::Serialize;

use super::ResourceError;
use crate::backend::BackendResult;
use crate::domains::tools::ResultEnvelope;

/// Wrap a fetched payload; failures read `"<context>: api error: <err>"`.
pub(crate) fn fetched<T: Serialize>(
    context: &str,
    result: BackendResult<T>,
) -> Result<ResultEnvelope, ResourceError> {
    match result {
        Ok(payload) => Ok(ResultEnvelope::success(&payload)?),
        Err(e) => Ok(ResultEnvelope::backend_error_with(context, &e)),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Helpers shared by the per-area resource tests.

    use serde_json::Value;
    use tokio_util::sync::CancellationToken;

    use crate::domains::resources::{ResourceDefinition, ResourceService};
    use crate::domains::tools::ResultEnvelope;

    pub fn service(definitions: Vec<ResourceDefinition>) -> ResourceService {
        ResourceService::from_definitions(definitions).unwrap()
    }

    pub async fn read(service: &ResourceService, uri: &str) -> ResultEnvelope {
        service.read(uri, CancellationToken::new()).await.unwrap()
    }

    pub fn payload(envelope: &ResultEnvelope) -> Value {
        assert!(envelope.is_success(), "unexpected failure: {}", envelope.text_content());
        serde_json::from_str(envelope.text_content()).unwrap()
    }
}
