//! Account and billing tools.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{page_params, paged, respond};
use crate::backend::AccountApi;
use crate::domains::tools::{Arguments, ParameterSpec, ResultEnvelope, ToolDefinition, ToolError};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PER_PAGE: i64 = 30;

pub struct AccountTools {
    api: Arc<dyn AccountApi>,
}

impl AccountTools {
    pub fn new(api: Arc<dyn AccountApi>) -> Self {
        Self { api }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::builder("account-get-information")
                .description("Retrieves account information for the current user")
                .handle(self.api.clone(), get_account),
            ToolDefinition::builder("balance-get")
                .description("Get balance information for the user account")
                .handle(self.api.clone(), get_balance),
            ToolDefinition::builder("action-get")
                .description("Get a specific action by ID")
                .param(
                    ParameterSpec::number("ID")
                        .required_with("Action ID is required")
                        .describe("Action ID"),
                )
                .handle(self.api.clone(), get_action),
            ToolDefinition::builder("action-list")
                .description("List actions with pagination")
                .params(page_params(DEFAULT_PAGE, DEFAULT_PER_PAGE))
                .handle(self.api.clone(), list_actions),
            ToolDefinition::builder("billing-history-list")
                .description("List billing history with pagination")
                .params(page_params(DEFAULT_PAGE, DEFAULT_PER_PAGE))
                .handle(self.api.clone(), list_billing_history),
            ToolDefinition::builder("invoice-list")
                .description("List invoices with pagination")
                .params(page_params(DEFAULT_PAGE, DEFAULT_PER_PAGE))
                .handle(self.api.clone(), list_invoices),
        ]
    }
}

async fn get_account(
    api: Arc<dyn AccountApi>,
    _args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    respond(api.get_account(&ct).await)
}

async fn get_balance(
    api: Arc<dyn AccountApi>,
    _args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    respond(api.get_balance(&ct).await)
}

async fn get_action(
    api: Arc<dyn AccountApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    respond(api.get_action(&ct, args.integer("ID")?).await)
}

async fn list_actions(
    api: Arc<dyn AccountApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let opts = paged(&args, ("Page", DEFAULT_PAGE), ("PerPage", DEFAULT_PER_PAGE))?;
    respond(api.list_actions(&ct, Some(opts)).await)
}

async fn list_billing_history(
    api: Arc<dyn AccountApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let opts = paged(&args, ("Page", DEFAULT_PAGE), ("PerPage", DEFAULT_PER_PAGE))?;
    respond(api.list_billing_history(&ct, Some(opts)).await)
}

async fn list_invoices(
    api: Arc<dyn AccountApi>,
    args: Arguments,
    ct: CancellationToken,
) -> Result<ResultEnvelope, ToolError> {
    let opts = paged(&args, ("Page", DEFAULT_PAGE), ("PerPage", DEFAULT_PER_PAGE))?;
    respond(api.list_invoices(&ct, Some(opts)).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::stub::StubBackend;
    use crate::domains::tools::FailureKind;
    use crate::domains::tools::definitions::testing::{call, payload, registry};
    use serde_json::json;

    #[tokio::test]
    async fn test_account_information() {
        let stub = StubBackend::new();
        stub.respond("account.get", json!({"email": "dev@example.com", "status": "active"}));
        let registry = registry(AccountTools::new(stub.clone()).definitions());

        let envelope = call(&registry, "account-get-information", json!({})).await;
        assert_eq!(payload(&envelope)["email"], "dev@example.com");
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn test_balance_backend_failure() {
        let stub = StubBackend::new();
        stub.fail("balance.get", 401, "Unable to authenticate you");
        let registry = registry(AccountTools::new(stub.clone()).definitions());

        let envelope = call(&registry, "balance-get", json!({})).await;
        assert_eq!(envelope.failure_kind(), Some(FailureKind::Backend));
        assert!(envelope.text_content().contains("api error"));
        assert!(envelope.text_content().contains("Unable to authenticate you"));
    }

    #[tokio::test]
    async fn test_action_get_requires_id() {
        let stub = StubBackend::new();
        let registry = registry(AccountTools::new(stub.clone()).definitions());

        let envelope = call(&registry, "action-get", json!({})).await;
        assert_eq!(envelope.failure_kind(), Some(FailureKind::CallerInput));
        assert_eq!(envelope.text_content(), "Action ID is required");
        assert_eq!(stub.call_count(), 0);

        call(&registry, "action-get", json!({"ID": 36804636})).await;
        assert_eq!(stub.last_call().unwrap().args, json!({"id": 36804636}));
    }

    #[tokio::test]
    async fn test_history_lists_use_default_pages() {
        let stub = StubBackend::new();
        let registry = registry(AccountTools::new(stub.clone()).definitions());

        for (tool, op) in [
            ("action-list", "actions.list"),
            ("billing-history-list", "billing_history.list"),
            ("invoice-list", "invoices.list"),
        ] {
            call(&registry, tool, json!({})).await;
            let last = stub.last_call().unwrap();
            assert_eq!(last.op, op);
            assert_eq!(last.args, json!({"opts": {"page": "1", "per_page": "30"}}));
        }

        call(&registry, "invoice-list", json!({"Page": 2, "PerPage": 0})).await;
        assert_eq!(
            stub.last_call().unwrap().args,
            json!({"opts": {"page": "2", "per_page": "30"}})
        );
    }
}
