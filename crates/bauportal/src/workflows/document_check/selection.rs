use mime::Mime;

/// Accepted-type policy for one upload control, including the user-facing
/// rejection message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedTypes {
    mimes: Vec<&'static str>,
    extensions: Vec<&'static str>,
    rejection_message: &'static str,
}

impl AcceptedTypes {
    /// PDF-only controls (B-Plan, Brandschutzkonzept).
    pub fn pdf_documents() -> Self {
        Self {
            mimes: vec!["application/pdf"],
            extensions: vec![".pdf"],
            rejection_message: "Nur PDF-Dateien sind erlaubt",
        }
    }

    /// Project archive uploads. Browsers report ZIP archives under several
    /// MIME types, so the extension counts as well.
    pub fn zip_archives() -> Self {
        Self {
            mimes: vec![
                "application/zip",
                "application/x-zip-compressed",
                "application/octet-stream",
            ],
            extensions: vec![".zip"],
            rejection_message: "Bitte laden Sie eine ZIP-Datei hoch",
        }
    }

    pub fn rejection_message(&self) -> &'static str {
        self.rejection_message
    }

    pub fn accepts(&self, candidate: &FileCandidate) -> bool {
        if let Ok(mime) = candidate.mime_type.parse::<Mime>() {
            if self.mimes.iter().any(|accepted| *accepted == mime.essence_str()) {
                return true;
            }
        }

        let name = candidate.name.to_lowercase();
        self.extensions.iter().any(|ext| name.ends_with(ext))
    }
}

/// A file as offered by the host (picker or drag-and-drop), not yet accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// An accepted file held in memory until removal or successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Size in megabytes as the portal displays it, e.g. "2.40 MB".
    pub fn size_label(&self) -> String {
        format!("{:.2} MB", self.size() as f64 / (1024.0 * 1024.0))
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FileSelectionError {
    #[error("{0}")]
    InvalidFileType(String),
}

/// Holds at most one accepted file. Rejected candidates never disturb a
/// previously accepted selection.
#[derive(Debug, Default, Clone)]
pub struct FileSlot {
    current: Option<SelectedFile>,
}

impl FileSlot {
    pub fn select(
        &mut self,
        candidate: FileCandidate,
        accepted: &AcceptedTypes,
    ) -> Result<&SelectedFile, FileSelectionError> {
        if !accepted.accepts(&candidate) {
            return Err(FileSelectionError::InvalidFileType(
                accepted.rejection_message().to_string(),
            ));
        }

        Ok(self.current.insert(SelectedFile {
            name: candidate.name,
            mime_type: candidate.mime_type,
            bytes: candidate.bytes,
        }))
    }

    pub fn current(&self) -> Option<&SelectedFile> {
        self.current.as_ref()
    }

    pub fn take(&mut self) -> Option<SelectedFile> {
        self.current.take()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}
