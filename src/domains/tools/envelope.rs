//! Uniform response envelope for tool calls and resource reads.

use std::fmt;

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;

use super::error::ToolError;
use crate::backend::BackendError;

/// Literal prefix carried by every backend failure message.
pub const BACKEND_ERROR_TAG: &str = "api error";

pub const JSON_MIME_TYPE: &str = "application/json";
pub const TEXT_MIME_TYPE: &str = "text/plain";

/// Which party a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Missing or malformed argument, bad URI, unparsable embedded JSON.
    CallerInput,
    /// The remote operation failed.
    Backend,
    /// Programming error inside the server.
    Internal,
}

/// Terminal state of one invocation, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    RejectedInput,
    BackendFailed,
    InternalError,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Succeeded => "succeeded",
            Outcome::RejectedInput => "rejected_input",
            Outcome::BackendFailed => "backend_failed",
            Outcome::InternalError => "internal_error",
        };
        f.write_str(label)
    }
}

impl From<FailureKind> for Outcome {
    fn from(kind: FailureKind) -> Self {
        match kind {
            FailureKind::CallerInput => Outcome::RejectedInput,
            FailureKind::Backend => Outcome::BackendFailed,
            FailureKind::Internal => Outcome::InternalError,
        }
    }
}

/// Result of one invocation. Exactly one variant is populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultEnvelope {
    Success {
        payload: String,
        mime_type: &'static str,
    },
    Failure {
        kind: FailureKind,
        message: String,
    },
}

impl ResultEnvelope {
    /// Serialize `payload` as pretty-printed JSON (two-space indent).
    ///
    /// Key order follows the payload. A serialization failure is internal
    /// and returned as an error, not as an envelope.
    pub fn success<T: Serialize + ?Sized>(payload: &T) -> Result<Self, ToolError> {
        let payload = serde_json::to_string_pretty(payload)?;
        Ok(Self::Success {
            payload,
            mime_type: JSON_MIME_TYPE,
        })
    }

    /// Plain-text confirmation for operations without a payload.
    pub fn text(message: impl Into<String>) -> Self {
        Self::Success {
            payload: message.into(),
            mime_type: TEXT_MIME_TYPE,
        }
    }

    pub fn caller_error(message: impl Into<String>) -> Self {
        Self::Failure {
            kind: FailureKind::CallerInput,
            message: message.into(),
        }
    }

    /// `"api error: <err>"`.
    pub fn backend_error(err: &BackendError) -> Self {
        Self::Failure {
            kind: FailureKind::Backend,
            message: format!("{}: {}", BACKEND_ERROR_TAG, err),
        }
    }

    /// `"<context>: api error: <err>"`.
    pub fn backend_error_with(context: &str, err: &BackendError) -> Self {
        Self::Failure {
            kind: FailureKind::Backend,
            message: format!("{}: {}: {}", context, BACKEND_ERROR_TAG, err),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }

    pub fn outcome(&self) -> Outcome {
        self.failure_kind()
            .map(Outcome::from)
            .unwrap_or(Outcome::Succeeded)
    }

    /// The payload on success, the message on failure.
    pub fn text_content(&self) -> &str {
        match self {
            Self::Success { payload, .. } => payload,
            Self::Failure { message, .. } => message,
        }
    }

    /// One text block; failures set the `isError` flag.
    pub fn into_call_tool_result(self) -> CallToolResult {
        match self {
            Self::Success { payload, .. } => CallToolResult::success(vec![Content::text(payload)]),
            Self::Failure { message, .. } => CallToolResult::error(vec![Content::text(message)]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_is_pretty_json_in_payload_order() {
        let payload = json!({"zeta": 1, "alpha": {"nested": true}});
        let envelope = ResultEnvelope::success(&payload).unwrap();

        let ResultEnvelope::Success { payload: text, mime_type } = &envelope else {
            panic!("expected success");
        };
        assert_eq!(*mime_type, JSON_MIME_TYPE);
        assert_eq!(
            text,
            "{\n  \"zeta\": 1,\n  \"alpha\": {\n    \"nested\": true\n  }\n}"
        );

        let parsed: serde_json::Value = serde_json::from_str(text).unwrap();
        assert_eq!(parsed, payload);
    }

    #[test]
    fn test_backend_error_carries_tag_and_original_text() {
        let err = BackendError::Api {
            method: "GET".to_string(),
            url: "https://api/v2/droplets/1".to_string(),
            status: 404,
            message: "not found".to_string(),
        };

        let envelope = ResultEnvelope::backend_error(&err);
        assert_eq!(envelope.failure_kind(), Some(FailureKind::Backend));
        assert_eq!(
            envelope.text_content(),
            "api error: GET https://api/v2/droplets/1: 404 not found"
        );

        let envelope = ResultEnvelope::backend_error_with("droplet create", &err);
        assert!(envelope.text_content().starts_with("droplet create: api error: "));
        assert!(envelope.text_content().contains("not found"));
    }

    #[test]
    fn test_outcomes() {
        assert_eq!(ResultEnvelope::text("ok").outcome(), Outcome::Succeeded);
        assert_eq!(
            ResultEnvelope::caller_error("bad").outcome(),
            Outcome::RejectedInput
        );
        assert_eq!(
            ResultEnvelope::backend_error(&BackendError::Canceled).outcome(),
            Outcome::BackendFailed
        );
    }

    #[test]
    fn test_into_call_tool_result_flags_failures() {
        let ok = ResultEnvelope::text("done").into_call_tool_result();
        assert_eq!(ok.is_error, Some(false));

        let failed = ResultEnvelope::caller_error("ID is required").into_call_tool_result();
        assert_eq!(failed.is_error, Some(true));
        let text = match &failed.content[0].raw {
            rmcp::model::RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        };
        assert_eq!(text, "ID is required");
    }
}
