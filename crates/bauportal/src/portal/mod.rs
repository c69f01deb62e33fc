//! Outbound gateway to the Bauantrag portal REST API.
//!
//! The trait keeps the workflows testable without a network; the `reqwest`
//! implementation lives in [`http`] behind a synchronous facade.

mod abort;
mod http;

pub use abort::{AbortHandle, AbortSignal};
pub use http::HttpPortalGateway;

use crate::session::CredentialError;
use serde_json::Value;
use std::fmt;

/// Remote operations the submission workflows depend on.
pub trait PortalGateway: fmt::Debug + Send + Sync {
    /// `POST /voucher/check?code=...`; succeeds iff the code is valid and unused.
    fn check_voucher(&self, code: &str) -> Result<(), PortalError>;

    /// `POST /voucher/mark-used?code=...`; consumes a previously checked code.
    fn mark_voucher_used(&self, code: &str) -> Result<(), PortalError>;

    /// Multipart document upload; the only cancellable call.
    fn upload_document(
        &self,
        target: &UploadTarget,
        file: &FilePayload,
        signal: AbortSignal,
    ) -> Result<Value, PortalError>;

    /// `POST /completeness-check/?doc_id=...&project_name=...`
    fn request_completeness_check(
        &self,
        doc_id: &str,
        project_name: &str,
    ) -> Result<Value, PortalError>;

    /// `GET /completeness-check/{project_id}` polls the current completeness state.
    fn completeness_status(&self, project_id: &str) -> Result<Value, PortalError>;
}

/// Endpoint path plus query parameters for an analysis upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub path: String,
    pub query: Vec<(String, String)>,
}

/// In-memory file attached as the `file` multipart field.
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("portal unreachable: {0}")]
    Transport(String),
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("request cancelled")]
    Cancelled,
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error("portal runtime unavailable: {0}")]
    Runtime(String),
}

/// Extract the user-facing message from a `{detail}` error body. The portal
/// returns either a plain string or a validation list of `{msg}` objects.
pub(crate) fn detail_message(body: &Value, fallback: &str) -> String {
    match body.get("detail") {
        Some(Value::String(detail)) if !detail.trim().is_empty() => detail.clone(),
        Some(Value::Array(items)) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string()),
        _ => fallback.to_string(),
    }
}
