use std::path::Path;
use std::sync::Arc;

use bauportal::config::AppConfig;
use bauportal::error::AppError;
use bauportal::portal::HttpPortalGateway;
use bauportal::session::SessionStore;
use bauportal::workflows::document_check::FileCandidate;

pub(crate) fn session_store(config: &AppConfig) -> SessionStore {
    SessionStore::new(&config.session.store_path)
}

pub(crate) fn build_gateway(config: &AppConfig) -> Result<HttpPortalGateway, AppError> {
    let credentials = Arc::new(session_store(config));
    HttpPortalGateway::new(&config.portal, credentials).map_err(AppError::from)
}

/// Read a document from disk into the shape the file selector expects,
/// guessing the MIME type from the path.
pub(crate) fn file_candidate(path: &Path) -> Result<FileCandidate, AppError> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload.bin")
        .to_string();
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    Ok(FileCandidate {
        name,
        mime_type,
        bytes,
    })
}
