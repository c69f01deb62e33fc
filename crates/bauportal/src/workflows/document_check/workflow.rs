use std::sync::Arc;

use chrono::Local;
use tracing::debug;

use super::descriptor::{CheckDescriptor, DocumentCheckKind};
use super::progress::UploadProgress;
use super::report::{normalize, AnalysisReport};
use super::selection::{FileCandidate, FileSelectionError, FileSlot, SelectedFile};
use super::view::ViewState;
use super::voucher::{VoucherError, VoucherGate};
use crate::portal::{AbortSignal, FilePayload, PortalError, PortalGateway};

/// Misuse of the workflow surface. Remote failures never appear here; they
/// become the inline error state instead.
#[derive(Debug, thiserror::Error)]
pub enum CheckWorkflowError {
    #[error(transparent)]
    Selection(#[from] FileSelectionError),
    #[error("no file selected")]
    NoFileSelected,
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error(transparent)]
    Voucher(#[from] VoucherError),
}

/// How a submission attempt ended. `Cancelled` and `Failed` keep the view in
/// its initial state; only `Completed` can move it to the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Completed(AnalysisReport),
    Cancelled,
    Failed(String),
}

/// One parameterized check view: B-Plan, Brandschutz, and archive variants
/// differ only in their descriptor.
#[derive(Debug)]
pub struct DocumentCheckWorkflow<G> {
    descriptor: CheckDescriptor,
    gateway: Arc<G>,
    file: FileSlot,
    progress: UploadProgress,
    report: Option<AnalysisReport>,
    error: Option<String>,
    in_flight: bool,
}

impl<G> DocumentCheckWorkflow<G>
where
    G: PortalGateway + 'static,
{
    pub fn new(kind: DocumentCheckKind, gateway: Arc<G>) -> Self {
        Self {
            descriptor: CheckDescriptor::for_kind(kind),
            gateway,
            file: FileSlot::default(),
            progress: UploadProgress::default(),
            report: None,
            error: None,
            in_flight: false,
        }
    }

    pub fn descriptor(&self) -> &CheckDescriptor {
        &self.descriptor
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.current()
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        self.report.as_ref()
    }

    /// Inline error text, if the last action failed.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn progress(&self) -> &UploadProgress {
        &self.progress
    }

    pub fn view(&self) -> ViewState {
        ViewState::for_report(self.report.as_ref())
    }

    /// Offer a file to the selector. Rejection records the inline error and
    /// leaves any previously accepted file in place.
    pub fn select_file(&mut self, candidate: FileCandidate) -> Result<(), CheckWorkflowError> {
        match self.file.select(candidate, &self.descriptor.accepted) {
            Ok(_) => {
                self.error = None;
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Drop the held file and every derived indicator so nothing stale
    /// survives the removal.
    pub fn remove_file(&mut self) {
        self.file.clear();
        self.progress.reset();
        self.error = None;
    }

    /// Upload the held file and normalize the response. At most one
    /// submission runs at a time; the triggering control stays disabled
    /// while `in_flight` is set.
    pub fn submit(
        &mut self,
        project_id: &str,
        signal: AbortSignal,
    ) -> Result<SubmissionOutcome, CheckWorkflowError> {
        if self.in_flight {
            return Err(CheckWorkflowError::SubmissionInFlight);
        }
        let file = self.file.current().ok_or(CheckWorkflowError::NoFileSelected)?;

        let payload = FilePayload {
            file_name: file.name.clone(),
            mime_type: file.mime_type.clone(),
            bytes: file.bytes.clone(),
        };
        let target = self.descriptor.upload_target(project_id);

        self.in_flight = true;
        self.error = None;
        let result = self.gateway.upload_document(&target, &payload, signal);
        self.in_flight = false;

        match result {
            Ok(raw) => {
                let report = normalize(self.descriptor.kind, &raw, Local::now().date_naive());
                debug!(kind = ?self.descriptor.kind, verdict = report.verdict.label(), "analysis completed");
                self.file.clear();
                self.progress.reset();
                self.report = Some(report.clone());
                Ok(SubmissionOutcome::Completed(report))
            }
            Err(PortalError::Cancelled) => {
                // Closing the host view aborts the request; not an error.
                self.progress.reset();
                Ok(SubmissionOutcome::Cancelled)
            }
            Err(err) => {
                let message = err.to_string();
                self.error = Some(message.clone());
                Ok(SubmissionOutcome::Failed(message))
            }
        }
    }

    /// Voucher-gated submission: both voucher calls must succeed before the
    /// upload is attempted.
    pub fn submit_with_voucher(
        &mut self,
        code: &str,
        project_id: &str,
        signal: AbortSignal,
    ) -> Result<SubmissionOutcome, CheckWorkflowError> {
        if self.in_flight {
            return Err(CheckWorkflowError::SubmissionInFlight);
        }
        if self.file.is_empty() {
            return Err(CheckWorkflowError::NoFileSelected);
        }

        let mut gate = VoucherGate::new(code);
        let mut unlocked = false;
        let verification = gate.verify_and_consume(self.gateway.as_ref(), || unlocked = true);
        if let Err(err) = verification {
            self.error = Some(err.to_string());
            return Err(err.into());
        }
        debug_assert!(unlocked);

        self.submit(project_id, signal)
    }

    /// Model closing and reopening the host view: back to the upload form
    /// until a fresh analysis arrives.
    pub fn reset(&mut self) {
        self.file.clear();
        self.progress.reset();
        self.report = None;
        self.error = None;
        self.in_flight = false;
    }

    #[cfg(test)]
    pub(crate) fn set_in_flight_for_tests(&mut self, in_flight: bool) {
        self.in_flight = in_flight;
    }
}
