//! Document submission and analysis workflow.
//!
//! One parameterized pipeline serves every check the portal offers: a file
//! selector validates the candidate, an optional voucher gate guards paid
//! checks, the upload submitter ships the file with a cancellation handle,
//! and the normalizer flattens the backend's loosely shaped response into a
//! stable report that drives the derived view state.

pub mod completeness;
pub mod descriptor;
pub(crate) mod mapping;
pub mod progress;
pub mod report;
pub mod selection;
pub mod view;
pub mod voucher;
pub mod workflow;

#[cfg(test)]
mod tests;

pub use completeness::{
    normalize_completeness, CompletenessCheck, CompletenessError, CompletenessOutcome,
    CompletenessReport, CompletenessState, RequiredDocument,
};
pub use descriptor::{CheckDescriptor, DocumentCheckKind};
pub use mapping::MISSING_FIELD_PLACEHOLDER;
pub use progress::{ProgressPhase, UploadProgress, TICK_INTERVAL};
pub use report::{
    normalize, segment_issue_text, AnalysisReport, DisplayField, IssueSegment, Verdict,
    APPROVED_STATUS, REJECTED_STATUS,
};
pub use selection::{
    AcceptedTypes, FileCandidate, FileSelectionError, FileSlot, SelectedFile,
};
pub use view::ViewState;
pub use voucher::{VoucherError, VoucherGate, VoucherState, CONFIRMATION_DELAY};
pub use workflow::{CheckWorkflowError, DocumentCheckWorkflow, SubmissionOutcome};
