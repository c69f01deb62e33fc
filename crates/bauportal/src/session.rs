use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Storage key the portal front end uses for the bearer token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Capability handed to every network-calling component instead of a global
/// session singleton, so tests can substitute credentials freely.
pub trait CredentialProvider: Send + Sync {
    fn access_token(&self) -> Result<String, CredentialError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("no session token found; sign in first")]
    Missing,
    #[error("session store unreadable: {0}")]
    Store(String),
}

/// File-backed analog of the browser's session storage: a flat JSON object
/// persisted at a fixed path, tokens kept under [`ACCESS_TOKEN_KEY`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist a token, creating the store (and parent directories) if needed.
    pub fn store_token(&self, token: &str) -> Result<(), CredentialError> {
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(ACCESS_TOKEN_KEY.to_string(), token.trim().to_string());
        self.write_entries(&entries)
    }

    /// Drop the persisted token, keeping any other entries intact.
    pub fn clear_token(&self) -> Result<(), CredentialError> {
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(CredentialError::Missing) => return Ok(()),
            Err(err) => return Err(err),
        };
        entries.remove(ACCESS_TOKEN_KEY);
        self.write_entries(&entries)
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, CredentialError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(CredentialError::Missing)
            }
            Err(err) => return Err(CredentialError::Store(err.to_string())),
        };

        serde_json::from_str(&raw).map_err(|err| CredentialError::Store(err.to_string()))
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| CredentialError::Store(err.to_string()))?;
        }

        let body = serde_json::to_string_pretty(entries)
            .map_err(|err| CredentialError::Store(err.to_string()))?;
        std::fs::write(&self.path, body).map_err(|err| CredentialError::Store(err.to_string()))
    }
}

impl CredentialProvider for SessionStore {
    fn access_token(&self) -> Result<String, CredentialError> {
        let entries = self.read_entries()?;
        entries
            .get(ACCESS_TOKEN_KEY)
            .filter(|token| !token.is_empty())
            .cloned()
            .ok_or(CredentialError::Missing)
    }
}

/// Fixed-token provider for tests and demos.
#[derive(Debug, Clone)]
pub struct StaticCredentials(pub String);

impl CredentialProvider for StaticCredentials {
    fn access_token(&self) -> Result<String, CredentialError> {
        Ok(self.0.clone())
    }
}
