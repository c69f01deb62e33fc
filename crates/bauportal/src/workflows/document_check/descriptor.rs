use super::selection::AcceptedTypes;
use crate::portal::UploadTarget;

/// The analysis variants the portal offers. One parameterized workflow
/// serves all of them; only the descriptor differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentCheckKind {
    BPlan,
    FireProtection,
    Completeness,
}

impl DocumentCheckKind {
    pub const fn title(self) -> &'static str {
        match self {
            DocumentCheckKind::BPlan => "B-Plan Check",
            DocumentCheckKind::FireProtection => "Brandschutzprüfung",
            DocumentCheckKind::Completeness => "Vollständigkeitsprüfung",
        }
    }
}

/// Static per-kind wiring: endpoint, accepted upload types, and the message
/// shown while the backend analyzes the document.
#[derive(Debug, Clone)]
pub struct CheckDescriptor {
    pub kind: DocumentCheckKind,
    pub accepted: AcceptedTypes,
    pub upload_path: &'static str,
    pub processing_message: &'static str,
}

impl CheckDescriptor {
    pub fn for_kind(kind: DocumentCheckKind) -> Self {
        match kind {
            DocumentCheckKind::BPlan => Self {
                kind,
                accepted: AcceptedTypes::pdf_documents(),
                upload_path: "upload-B-Plan/",
                processing_message: "Dokument wird verarbeitet...",
            },
            DocumentCheckKind::FireProtection => Self {
                kind,
                accepted: AcceptedTypes::pdf_documents(),
                upload_path: "upload-fire-protection/",
                processing_message: "Brandschutzkonzept wird analysiert...",
            },
            DocumentCheckKind::Completeness => Self {
                kind,
                accepted: AcceptedTypes::zip_archives(),
                upload_path: "completeness-check/",
                processing_message: "Dokument wird verarbeitet...",
            },
        }
    }

    pub fn upload_target(&self, project_id: &str) -> UploadTarget {
        UploadTarget {
            path: self.upload_path.to_string(),
            query: vec![("project_id".to_string(), project_id.to_string())],
        }
    }
}
