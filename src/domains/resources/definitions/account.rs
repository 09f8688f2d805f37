use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::fetched;
use crate::backend::AccountApi;
use crate::domains::resources::{PathVars, ResourceDefinition, ResourceError};
use crate::domains::tools::ResultEnvelope;

pub struct AccountResources {
    api: Arc<dyn AccountApi>,
}

impl AccountResources {
    pub fn new(api: Arc<dyn AccountApi>) -> Self {
        Self { api }
    }

    pub fn definitions(&self) -> Vec<ResourceDefinition> {
        vec![
            ResourceDefinition::builder("account://current")
                .name("Account Information")
                .description("Provides information about user account")
                .handle(self.api.clone(), current_account),
            ResourceDefinition::builder("balance://current")
                .name("Balance Information")
                .description("Returns balance information")
                .handle(self.api.clone(), current_balance),
        ]
    }
}

async fn current_account(
    api: Arc<dyn AccountApi>,
    _vars: PathVars,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ResourceError> {
    fetched("error fetching account", api.get_account(&ct).await)
}

async fn current_balance(
    api: Arc<dyn AccountApi>,
    _vars: PathVars,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ResourceError> {
    fetched("error fetching balance", api.get_balance(&ct).await)
}
