use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{json, Value};

use crate::portal::{AbortSignal, FilePayload, PortalError, PortalGateway, UploadTarget};

/// Scripted gateway response, rebuilt into a fresh error per call.
#[derive(Debug, Clone)]
pub(super) enum Scripted {
    Ok(Value),
    Server(u16, String),
    Transport(String),
    Cancelled,
}

impl Scripted {
    pub(super) fn server(status: u16, message: &str) -> Self {
        Scripted::Server(status, message.to_string())
    }

    fn as_result(&self) -> Result<Value, PortalError> {
        match self {
            Scripted::Ok(value) => Ok(value.clone()),
            Scripted::Server(status, message) => Err(PortalError::Server {
                status: *status,
                message: message.clone(),
            }),
            Scripted::Transport(message) => Err(PortalError::Transport(message.clone())),
            Scripted::Cancelled => Err(PortalError::Cancelled),
        }
    }

    fn as_unit(&self) -> Result<(), PortalError> {
        self.as_result().map(|_| ())
    }
}

/// In-memory portal double with per-endpoint scripts and call counters, so
/// tests can assert sequencing (e.g. consume never follows a failed check).
#[derive(Debug)]
pub(super) struct ScriptedGateway {
    pub(super) check: Scripted,
    pub(super) consume: Scripted,
    pub(super) upload: Scripted,
    pub(super) completeness: Scripted,
    pub(super) check_calls: AtomicUsize,
    pub(super) consume_calls: AtomicUsize,
    pub(super) upload_calls: AtomicUsize,
}

impl Default for ScriptedGateway {
    fn default() -> Self {
        Self {
            check: Scripted::Ok(json!({ "message": "Voucher is valid" })),
            consume: Scripted::Ok(json!({ "message": "Voucher marked as used" })),
            upload: Scripted::Ok(flat_payload("genehmigt")),
            completeness: Scripted::Ok(json!({ "required_documents": {} })),
            check_calls: AtomicUsize::new(0),
            consume_calls: AtomicUsize::new(0),
            upload_calls: AtomicUsize::new(0),
        }
    }
}

impl ScriptedGateway {
    pub(super) fn check_count(&self) -> usize {
        self.check_calls.load(Ordering::SeqCst)
    }

    pub(super) fn consume_count(&self) -> usize {
        self.consume_calls.load(Ordering::SeqCst)
    }

    pub(super) fn upload_count(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }
}

impl PortalGateway for ScriptedGateway {
    fn check_voucher(&self, _code: &str) -> Result<(), PortalError> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        self.check.as_unit()
    }

    fn mark_voucher_used(&self, _code: &str) -> Result<(), PortalError> {
        self.consume_calls.fetch_add(1, Ordering::SeqCst);
        self.consume.as_unit()
    }

    fn upload_document(
        &self,
        _target: &UploadTarget,
        _file: &FilePayload,
        _signal: AbortSignal,
    ) -> Result<Value, PortalError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.upload.as_result()
    }

    fn request_completeness_check(
        &self,
        _doc_id: &str,
        _project_name: &str,
    ) -> Result<Value, PortalError> {
        self.completeness.as_result()
    }

    fn completeness_status(&self, _project_id: &str) -> Result<Value, PortalError> {
        self.completeness.as_result()
    }
}

/// Flat-shape payload with the full B-Plan field set.
pub(super) fn flat_payload(status: &str) -> Value {
    json!({
        "compliance_status": status,
        "non_compliant_details": "Abstandsflächen:, Grenzabstand unterschritten, Dachform abweichend.",
        "analysis_result": {
            "result_data": {
                "Project title": "Kindergarten Obersuhl",
                " Project type": "Neubau",
                " Building class": "GK 3",
                " Building usage": "Kindertagesstätte",
                " Number of floors": "2",
                " Project location": "Goethestraße 23, 36208 Wildeck"
            }
        }
    })
}

/// Per-check payload matching the upload endpoint's contract.
pub(super) fn per_check_payload(overall: &str) -> Value {
    json!({
        "result": {
            "setbacks": { "issues": "no any" },
            "roof_shape": { "issues": ["Dachform abweichend"] },
            "overall_status": overall
        },
        "analysis_result": {
            "result_data": {
                "Project title": "Kindergarten Obersuhl",
                " Project type": "Neubau"
            }
        }
    })
}

pub(super) fn pdf_candidate(name: &str) -> crate::workflows::document_check::FileCandidate {
    crate::workflows::document_check::FileCandidate {
        name: name.to_string(),
        mime_type: "application/pdf".to_string(),
        bytes: b"%PDF-1.7 test".to_vec(),
    }
}
