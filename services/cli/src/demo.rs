use std::sync::Arc;

use clap::Args;
use serde_json::{json, Value};

use bauportal::error::AppError;
use bauportal::portal::{AbortSignal, FilePayload, PortalError, PortalGateway, UploadTarget};
use bauportal::workflows::document_check::{
    CompletenessCheck, CompletenessOutcome, DocumentCheckKind, DocumentCheckWorkflow,
    FileCandidate, SubmissionOutcome,
};

use crate::render;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Show the rejected report instead of the approved one
    #[arg(long)]
    rejected: bool,
}

/// Offline portal double with canned responses, so the whole pipeline can be
/// demonstrated without credentials or connectivity.
#[derive(Debug)]
struct CannedPortal {
    rejected: bool,
}

impl PortalGateway for CannedPortal {
    fn check_voucher(&self, _code: &str) -> Result<(), PortalError> {
        Ok(())
    }

    fn mark_voucher_used(&self, _code: &str) -> Result<(), PortalError> {
        Ok(())
    }

    fn upload_document(
        &self,
        _target: &UploadTarget,
        _file: &FilePayload,
        _signal: AbortSignal,
    ) -> Result<Value, PortalError> {
        let result = if self.rejected {
            json!({
                "setbacks": { "issues": ["Grenzabstand unterschritten"] },
                "roof_shape": { "issues": "no any" },
                "overall_status": "non_compliant"
            })
        } else {
            json!({
                "setbacks": { "issues": "no any" },
                "roof_shape": { "issues": "no any" },
                "overall_status": "compliant"
            })
        };

        Ok(json!({
            "result": result,
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
        }))
    }

    fn request_completeness_check(
        &self,
        _doc_id: &str,
        _project_name: &str,
    ) -> Result<Value, PortalError> {
        self.completeness_status("demo")
    }

    fn completeness_status(&self, _project_id: &str) -> Result<Value, PortalError> {
        let (statics_status, statics_action) = if self.rejected {
            ("missing", "Dokument nachreichen")
        } else {
            ("present", "")
        };

        Ok(json!({
            "required_documents": {
                "Lageplan": { "status": "present" },
                "Baubeschreibung": { "status": "present" },
                "Statiknachweis": {
                    "status": statics_status,
                    "action_needed": statics_action
                }
            }
        }))
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Document check demo (offline)\n");

    let portal = Arc::new(CannedPortal {
        rejected: args.rejected,
    });
    let mut check = DocumentCheckWorkflow::new(DocumentCheckKind::BPlan, portal.clone());

    check.select_file(FileCandidate {
        name: "bplan.pdf".to_string(),
        mime_type: "application/pdf".to_string(),
        bytes: b"%PDF-1.7 demo".to_vec(),
    })?;

    let outcome = check.submit_with_voucher("DEMO-2024", "demo-project", AbortSignal::detached())?;
    match outcome {
        SubmissionOutcome::Completed(report) => render::render_report(&report),
        SubmissionOutcome::Cancelled => println!("Submission cancelled"),
        SubmissionOutcome::Failed(message) => println!("Check failed: {message}"),
    }

    println!();
    let mut completeness = CompletenessCheck::new(portal);
    match completeness.refresh("demo-project") {
        Ok(CompletenessOutcome::Completed(report)) => render::render_completeness(&report),
        Ok(CompletenessOutcome::Failed(message)) => {
            println!("Completeness check failed: {message}")
        }
        Err(err) => println!("Completeness check unavailable: {err}"),
    }

    Ok(())
}
