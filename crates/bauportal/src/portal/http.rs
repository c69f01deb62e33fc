use std::sync::Arc;

use reqwest::multipart;
use serde_json::Value;
use tokio::runtime::Runtime;
use tracing::debug;

use super::{detail_message, AbortSignal, FilePayload, PortalError, PortalGateway, UploadTarget};
use crate::config::PortalConfig;
use crate::session::CredentialProvider;

const VOUCHER_CHECK_FALLBACK: &str = "Invalid or already used voucher";
const VOUCHER_CONSUME_FALLBACK: &str = "Could not process voucher";
const UPLOAD_FALLBACK: &str = "Upload fehlgeschlagen";
const GENERIC_FALLBACK: &str = "Ein Fehler ist aufgetreten";

/// `reqwest`-backed portal client exposing a synchronous facade so the
/// workflows stay free of async plumbing. The runtime is owned by the
/// gateway; callers must not invoke it from inside another runtime.
pub struct HttpPortalGateway {
    base_url: String,
    client: reqwest::Client,
    credentials: Arc<dyn CredentialProvider>,
    runtime: Runtime,
}

impl HttpPortalGateway {
    pub fn new(
        config: &PortalConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, PortalError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|err| PortalError::Transport(err.to_string()))?;
        let runtime = Runtime::new().map_err(|err| PortalError::Runtime(err.to_string()))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            client,
            credentials,
            runtime,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn voucher_call(&self, path: &str, code: &str, fallback: &str) -> Result<(), PortalError> {
        let token = self.credentials.access_token()?;
        let url = self.endpoint(path);
        debug!(%url, "voucher call");

        self.runtime.block_on(async {
            let response = self
                .client
                .post(&url)
                .query(&[("code", code)])
                .bearer_auth(&token)
                .send()
                .await
                .map_err(map_transport)?;
            json_or_detail(response, fallback).await.map(|_| ())
        })
    }
}

impl std::fmt::Debug for HttpPortalGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPortalGateway")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl PortalGateway for HttpPortalGateway {
    fn check_voucher(&self, code: &str) -> Result<(), PortalError> {
        self.voucher_call("voucher/check", code, VOUCHER_CHECK_FALLBACK)
    }

    fn mark_voucher_used(&self, code: &str) -> Result<(), PortalError> {
        self.voucher_call("voucher/mark-used", code, VOUCHER_CONSUME_FALLBACK)
    }

    fn upload_document(
        &self,
        target: &UploadTarget,
        file: &FilePayload,
        signal: AbortSignal,
    ) -> Result<Value, PortalError> {
        let token = self.credentials.access_token()?;
        let url = self.endpoint(&target.path);
        debug!(%url, file = %file.file_name, "uploading document");

        self.runtime.block_on(async {
            let part = multipart::Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.mime_type)
                .map_err(|err| PortalError::Transport(err.to_string()))?;
            let form = multipart::Form::new().part("file", part);

            let request = self
                .client
                .post(&url)
                .query(&target.query)
                .bearer_auth(&token)
                .multipart(form)
                .send();

            tokio::select! {
                _ = signal.aborted() => {
                    debug!(%url, "upload aborted by caller");
                    Err(PortalError::Cancelled)
                }
                response = request => {
                    let response = response.map_err(map_transport)?;
                    json_or_detail(response, UPLOAD_FALLBACK).await
                }
            }
        })
    }

    fn request_completeness_check(
        &self,
        doc_id: &str,
        project_name: &str,
    ) -> Result<Value, PortalError> {
        let token = self.credentials.access_token()?;
        let url = self.endpoint("completeness-check/");

        self.runtime.block_on(async {
            let response = self
                .client
                .post(&url)
                .query(&[("doc_id", doc_id), ("project_name", project_name)])
                .bearer_auth(&token)
                .send()
                .await
                .map_err(map_transport)?;
            json_or_detail(response, GENERIC_FALLBACK).await
        })
    }

    fn completeness_status(&self, project_id: &str) -> Result<Value, PortalError> {
        let token = self.credentials.access_token()?;
        let url = self.endpoint(&format!("completeness-check/{project_id}"));

        self.runtime.block_on(async {
            let response = self
                .client
                .get(&url)
                .bearer_auth(&token)
                .send()
                .await
                .map_err(map_transport)?;
            json_or_detail(response, GENERIC_FALLBACK).await
        })
    }
}

fn map_transport(err: reqwest::Error) -> PortalError {
    PortalError::Transport(err.to_string())
}

async fn json_or_detail(response: reqwest::Response, fallback: &str) -> Result<Value, PortalError> {
    let status = response.status();
    if status.is_success() {
        return response.json::<Value>().await.map_err(map_transport);
    }

    let body = response.json::<Value>().await.unwrap_or(Value::Null);
    Err(PortalError::Server {
        status: status.as_u16(),
        message: detail_message(&body, fallback),
    })
}
