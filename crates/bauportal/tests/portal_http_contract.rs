//! Contract tests for the `reqwest`-backed gateway against an in-process
//! mock portal. The mock speaks the portal's actual wire shapes (query-coded
//! voucher calls, multipart uploads, `{detail}` error bodies) so bearer
//! propagation, error surfacing, and mid-request cancellation are exercised
//! over a real socket.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::runtime::Runtime;

use bauportal::config::PortalConfig;
use bauportal::portal::{
    AbortHandle, AbortSignal, FilePayload, HttpPortalGateway, PortalError, PortalGateway,
    UploadTarget,
};
use bauportal::session::{CredentialError, SessionStore, StaticCredentials};
use bauportal::workflows::document_check::{
    normalize_completeness, CompletenessState, DocumentCheckKind, DocumentCheckWorkflow,
    FileCandidate, SubmissionOutcome, Verdict,
};
use bauportal::workflows::geocode::{AddressResolver, GeocodeError, NominatimClient};

#[derive(Debug, Default)]
struct Recorded {
    last_auth: Mutex<Option<String>>,
    last_upload: Mutex<Option<(String, usize)>>,
}

#[derive(Debug, Deserialize)]
struct VoucherQuery {
    code: String,
}

#[derive(Debug, Deserialize)]
struct UploadQuery {
    project_id: String,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[allow(dead_code)]
    format: String,
    q: String,
}

struct MockPortal {
    addr: SocketAddr,
    recorded: Arc<Recorded>,
    _runtime: Runtime,
}

fn spawn_portal() -> MockPortal {
    let runtime = Runtime::new().expect("server runtime");
    let recorded = Arc::new(Recorded::default());

    let app = Router::new()
        .route("/voucher/check", post(check_voucher))
        .route("/voucher/mark-used", post(mark_voucher_used))
        .route("/upload-B-Plan/", post(upload_bplan))
        .route("/completeness-check/", post(request_completeness))
        .route("/completeness-check/:project_id", get(completeness_status))
        .route("/search", get(search))
        .with_state(recorded.clone());

    let listener = runtime
        .block_on(TcpListener::bind("127.0.0.1:0"))
        .expect("bind listener");
    let addr = listener.local_addr().expect("listener addr");
    runtime.spawn(async move {
        axum::serve(listener, app).await.expect("mock portal serves");
    });

    MockPortal {
        addr,
        recorded,
        _runtime: runtime,
    }
}

fn record_auth(recorded: &Recorded, headers: &HeaderMap) {
    let auth = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    *recorded.last_auth.lock().expect("auth mutex") = auth;
}

async fn check_voucher(
    State(recorded): State<Arc<Recorded>>,
    headers: HeaderMap,
    Query(query): Query<VoucherQuery>,
) -> impl IntoResponse {
    record_auth(&recorded, &headers);
    if query.code == "VALID" {
        (StatusCode::OK, Json(json!({ "message": "Voucher is valid" })))
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Invalid or already used voucher" })),
        )
    }
}

async fn mark_voucher_used(
    State(recorded): State<Arc<Recorded>>,
    headers: HeaderMap,
    Query(query): Query<VoucherQuery>,
) -> impl IntoResponse {
    record_auth(&recorded, &headers);
    if query.code == "VALID" {
        (
            StatusCode::OK,
            Json(json!({ "message": "Voucher marked as used" })),
        )
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Could not process voucher" })),
        )
    }
}

async fn upload_bplan(
    State(recorded): State<Arc<Recorded>>,
    headers: HeaderMap,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    record_auth(&recorded, &headers);

    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.expect("field bytes");
            *recorded.last_upload.lock().expect("upload mutex") =
                Some((file_name, bytes.len()));
        }
    }

    if query.project_id == "slow" {
        tokio::time::sleep(Duration::from_secs(5)).await;
    }

    (
        StatusCode::OK,
        Json(json!({
            "result": {
                "setbacks": { "issues": "no any" },
                "roof_shape": { "issues": ["Dachform abweichend"] },
                "overall_status": "non_compliant"
            },
            "analysis_result": {
                "result_data": {
                    "Project title": "Kindergarten Obersuhl",
                    " Project type": "Neubau"
                }
            }
        })),
    )
}

async fn request_completeness(headers: HeaderMap) -> impl IntoResponse {
    if !headers.contains_key("authorization") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Not authenticated" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "required_documents": {
                "Lageplan": { "status": "present", "action_needed": "" },
                "Statiknachweis": { "status": "missing", "action_needed": "Dokument nachreichen" }
            }
        })),
    )
}

async fn completeness_status(Path(project_id): Path<String>) -> impl IntoResponse {
    if project_id == "p-404" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Project not found" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "required_documents": {
                "Lageplan": { "status": "present" },
                "Baubeschreibung": { "status": "complete" }
            }
        })),
    )
}

async fn search(Query(query): Query<SearchQuery>) -> Json<Value> {
    if query.q == "nowhere" {
        return Json(json!([]));
    }

    Json(json!([
        {
            "lat": "50.9944",
            "lon": "9.9917",
            "display_name": "Goethestraße 23, 36208 Wildeck"
        }
    ]))
}

fn portal_config(addr: SocketAddr) -> PortalConfig {
    PortalConfig {
        base_url: format!("http://{addr}"),
        geocode_url: format!("http://{addr}"),
        request_timeout_secs: 30,
    }
}

fn gateway(addr: SocketAddr) -> HttpPortalGateway {
    HttpPortalGateway::new(
        &portal_config(addr),
        Arc::new(StaticCredentials("test-token".to_string())),
    )
    .expect("gateway builds")
}

fn pdf_payload() -> FilePayload {
    FilePayload {
        file_name: "bplan.pdf".to_string(),
        mime_type: "application/pdf".to_string(),
        bytes: b"%PDF-1.7 contract".to_vec(),
    }
}

#[test]
fn voucher_check_attaches_bearer_token() {
    let portal = spawn_portal();
    let gateway = gateway(portal.addr);

    gateway.check_voucher("VALID").expect("valid code accepted");

    let auth = portal
        .recorded
        .last_auth
        .lock()
        .expect("auth mutex")
        .clone();
    assert_eq!(auth.as_deref(), Some("Bearer test-token"));
}

#[test]
fn invalid_voucher_surfaces_server_detail() {
    let portal = spawn_portal();
    let gateway = gateway(portal.addr);

    let error = gateway.check_voucher("USED").expect_err("rejected");
    match error {
        PortalError::Server { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid or already used voucher");
        }
        other => panic!("expected server error, got {other:?}"),
    }

    let error = gateway.mark_voucher_used("USED").expect_err("rejected");
    match error {
        PortalError::Server { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Could not process voucher");
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[test]
fn upload_ships_multipart_file_and_returns_analysis() {
    let portal = spawn_portal();
    let gateway = gateway(portal.addr);

    let target = UploadTarget {
        path: "upload-B-Plan/".to_string(),
        query: vec![("project_id".to_string(), "p-7".to_string())],
    };
    let raw = gateway
        .upload_document(&target, &pdf_payload(), AbortSignal::detached())
        .expect("upload succeeds");

    assert_eq!(
        raw.pointer("/result/overall_status").and_then(Value::as_str),
        Some("non_compliant")
    );
    let upload = portal
        .recorded
        .last_upload
        .lock()
        .expect("upload mutex")
        .clone();
    let (file_name, size) = upload.expect("file field received");
    assert_eq!(file_name, "bplan.pdf");
    assert_eq!(size, b"%PDF-1.7 contract".len());
}

#[test]
fn aborting_mid_request_returns_cancelled_quickly() {
    let portal = spawn_portal();
    let gateway = gateway(portal.addr);

    let target = UploadTarget {
        path: "upload-B-Plan/".to_string(),
        query: vec![("project_id".to_string(), "slow".to_string())],
    };
    let (handle, signal) = AbortHandle::new();
    let aborter = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(200));
        handle.abort();
    });

    let started = Instant::now();
    let result = gateway.upload_document(&target, &pdf_payload(), signal);
    aborter.join().expect("aborter thread");

    assert!(matches!(result, Err(PortalError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[test]
fn workflow_swallows_cancellation_over_real_transport() {
    let portal = spawn_portal();
    let gateway = Arc::new(gateway(portal.addr));
    let mut check = DocumentCheckWorkflow::new(DocumentCheckKind::BPlan, gateway);
    check
        .select_file(FileCandidate {
            name: "bplan.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            bytes: b"%PDF-1.7".to_vec(),
        })
        .expect("accepted");

    let (handle, signal) = AbortHandle::new();
    let aborter = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(200));
        handle.abort();
    });

    let outcome = check.submit("slow", signal).expect("cancellation handled");
    aborter.join().expect("aborter thread");

    assert_eq!(outcome, SubmissionOutcome::Cancelled);
    assert!(check.error_message().is_none());
    assert!(check.report().is_none());
}

#[test]
fn workflow_normalizes_live_per_check_response() {
    let portal = spawn_portal();
    let gateway = Arc::new(gateway(portal.addr));
    let mut check = DocumentCheckWorkflow::new(DocumentCheckKind::BPlan, gateway);
    check
        .select_file(FileCandidate {
            name: "bplan.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            bytes: b"%PDF-1.7".to_vec(),
        })
        .expect("accepted");

    let outcome = check
        .submit("p-7", AbortSignal::detached())
        .expect("submission runs");

    let report = match outcome {
        SubmissionOutcome::Completed(report) => report,
        other => panic!("expected completion, got {other:?}"),
    };
    assert_eq!(report.verdict, Verdict::Rejected);
    assert_eq!(report.issues, vec!["Dachform abweichend".to_string()]);
}

#[test]
fn missing_session_token_fails_before_any_request() {
    let portal = spawn_portal();
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SessionStore::new(dir.path().join("session.json"));
    let gateway = HttpPortalGateway::new(&portal_config(portal.addr), Arc::new(store))
        .expect("gateway builds");

    let error = gateway.check_voucher("VALID").expect_err("no token");
    assert!(matches!(
        error,
        PortalError::Credential(CredentialError::Missing)
    ));
    assert!(portal
        .recorded
        .last_auth
        .lock()
        .expect("auth mutex")
        .is_none());
}

#[test]
fn completeness_contract_round_trips() {
    let portal = spawn_portal();
    let gateway = gateway(portal.addr);

    let raw = gateway
        .request_completeness_check("doc-1", "Kindergarten Obersuhl")
        .expect("request succeeds");
    let report = normalize_completeness(&raw);
    assert_eq!(report.state, CompletenessState::Incomplete);

    let raw = gateway.completeness_status("p-7").expect("poll succeeds");
    let report = normalize_completeness(&raw);
    assert_eq!(report.state, CompletenessState::Complete);

    let error = gateway.completeness_status("p-404").expect_err("missing project");
    match error {
        PortalError::Server { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Project not found");
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[test]
fn geocoder_parses_string_coordinates() {
    let portal = spawn_portal();
    let resolver =
        NominatimClient::new(format!("http://{}", portal.addr)).expect("client builds");

    let place = resolver
        .resolve("Goethestraße 23, 36208 Wildeck")
        .expect("address resolves");
    assert!((place.latitude - 50.9944).abs() < f64::EPSILON);
    assert!((place.longitude - 9.9917).abs() < f64::EPSILON);
    assert_eq!(place.display_name, "Goethestraße 23, 36208 Wildeck");

    let error = resolver.resolve("nowhere").expect_err("no hits");
    assert!(matches!(error, GeocodeError::NoMatch(_)));
}
