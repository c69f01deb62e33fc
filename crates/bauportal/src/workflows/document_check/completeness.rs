use std::sync::Arc;

use serde_json::Value;

use crate::portal::{PortalError, PortalGateway};

/// Overall completeness of the submitted application documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletenessState {
    Complete,
    Incomplete,
}

impl CompletenessState {
    pub const fn label(self) -> &'static str {
        match self {
            CompletenessState::Complete => "Vollständig",
            CompletenessState::Incomplete => "Unvollständig",
        }
    }
}

/// One required application document as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredDocument {
    pub name: String,
    pub status: String,
    pub action_needed: Option<String>,
}

impl RequiredDocument {
    /// A document counts as satisfied when its status says so and no action
    /// remains open.
    pub fn is_satisfied(&self) -> bool {
        let status = self.status.trim().to_ascii_lowercase();
        let status_ok = matches!(status.as_str(), "present" | "complete" | "ok" | "vollständig");
        let action_open = self
            .action_needed
            .as_deref()
            .map(|action| !action.trim().is_empty() && !action.trim().eq_ignore_ascii_case("none"))
            .unwrap_or(false);
        status_ok && !action_open
    }
}

/// Normalized completeness snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletenessReport {
    pub documents: Vec<RequiredDocument>,
    pub state: CompletenessState,
}

/// Map a raw completeness payload onto the display model. Incomplete only
/// when a listed document is unsatisfied; a missing or malformed
/// `required_documents` map renders as complete, matching the portal's
/// default-green treatment.
pub fn normalize_completeness(raw: &Value) -> CompletenessReport {
    let documents: Vec<RequiredDocument> = raw
        .get("required_documents")
        .and_then(Value::as_object)
        .map(|entries| {
            entries
                .iter()
                .map(|(name, value)| RequiredDocument {
                    name: name.clone(),
                    status: value
                        .get("status")
                        .and_then(Value::as_str)
                        .unwrap_or("missing")
                        .to_string(),
                    action_needed: value
                        .get("action_needed")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .filter(|action| !action.trim().is_empty()),
                })
                .collect()
        })
        .unwrap_or_default();

    let state = if documents.iter().all(RequiredDocument::is_satisfied) {
        CompletenessState::Complete
    } else {
        CompletenessState::Incomplete
    };

    CompletenessReport { documents, state }
}

/// Client-side state for the completeness view: request a fresh check for a
/// document, or poll the current project state.
#[derive(Debug)]
pub struct CompletenessCheck<G> {
    gateway: Arc<G>,
    report: Option<CompletenessReport>,
    error: Option<String>,
    in_flight: bool,
}

/// How a completeness call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletenessOutcome {
    Completed(CompletenessReport),
    Failed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CompletenessError {
    #[error("a completeness request is already in flight")]
    RequestInFlight,
}

impl<G> CompletenessCheck<G>
where
    G: PortalGateway + 'static,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            report: None,
            error: None,
            in_flight: false,
        }
    }

    pub fn report(&self) -> Option<&CompletenessReport> {
        self.report.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Ask the backend to (re)run the completeness check for one document.
    pub fn request(
        &mut self,
        doc_id: &str,
        project_name: &str,
    ) -> Result<CompletenessOutcome, CompletenessError> {
        self.call(|gateway| gateway.request_completeness_check(doc_id, project_name))
    }

    /// Poll the current completeness state of a project.
    pub fn refresh(&mut self, project_id: &str) -> Result<CompletenessOutcome, CompletenessError> {
        self.call(|gateway| gateway.completeness_status(project_id))
    }

    fn call<F>(&mut self, remote: F) -> Result<CompletenessOutcome, CompletenessError>
    where
        F: FnOnce(&G) -> Result<Value, PortalError>,
    {
        if self.in_flight {
            return Err(CompletenessError::RequestInFlight);
        }

        self.in_flight = true;
        self.error = None;
        let result = remote(self.gateway.as_ref());
        self.in_flight = false;

        match result {
            Ok(raw) => {
                let report = normalize_completeness(&raw);
                self.report = Some(report.clone());
                Ok(CompletenessOutcome::Completed(report))
            }
            Err(err) => {
                let message = err.to_string();
                self.error = Some(message.clone());
                Ok(CompletenessOutcome::Failed(message))
            }
        }
    }
}
