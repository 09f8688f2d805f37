use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::fetched;
use crate::backend::DatabasesApi;
use crate::domains::resources::{PathVars, ResourceDefinition, ResourceError};
use crate::domains::tools::ResultEnvelope;

pub struct DatabaseResources {
    api: Arc<dyn DatabasesApi>,
}

impl DatabaseResources {
    pub fn new(api: Arc<dyn DatabasesApi>) -> Self {
        Self { api }
    }

    pub fn definitions(&self) -> Vec<ResourceDefinition> {
        vec![
            ResourceDefinition::builder("db-clusters://{id}")
                .name("Database Cluster")
                .description("Returns database cluster information")
                .handle(self.api.clone(), cluster),
        ]
    }
}

async fn cluster(
    api: Arc<dyn DatabasesApi>,
    vars: PathVars,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ResourceError> {
    let Some(id) = vars.segment("id")? else {
        return Ok(ResultEnvelope::caller_error("invalid database cluster ID"));
    };
    fetched("error fetching database cluster", api.get(&ct, id).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::stub::StubBackend;
    use crate::domains::resources::definitions::testing::{payload, read, service};
    use serde_json::json;

    #[tokio::test]
    async fn test_cluster_by_id() {
        let stub = StubBackend::new();
        stub.respond("databases.get", json!({"id": "9cc10173", "engine": "pg"}));
        let service = service(DatabaseResources::new(stub.clone()).definitions());

        assert_eq!(service.list_resource_templates().len(), 1);
        let envelope = read(&service, "db-clusters://9cc10173").await;
        assert_eq!(payload(&envelope)["engine"], "pg");
        assert_eq!(stub.last_call().unwrap().args, json!({"id": "9cc10173"}));
    }
}
