use crate::auth::AdminSession;
use crate::metrics::{metrics_middleware, render_metrics};
use crate::pages;
use crate::qr;
use crate::resolver::{resolve_assisted, resolve_direct};
use crate::state::AppState;
use crate::store::{AuditLogModel, CertificateFilter, CertificateModel};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::middleware;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use certverify_common::links::{build_verification_url, effective_base_url, origin_from_parts};
use certverify_common::models::{
    AssistedLookupRequest, CertificateListQuery, CreateCertificate, OperatorStatus, Role,
    TemplateType, UpdateCertificate,
};
use certverify_common::status::today_in;
use certverify_common::templates::{CertificateView, render};
use certverify_common::validation::{validate_create, validate_update};
use certverify_common::CertError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

type ApiResult<T> = std::result::Result<T, CertError>;

pub const NOT_FOUND_MESSAGE: &str = "certificate not found, check your input";

const DEFAULT_AUDIT_LIMIT: u64 = 100;
const MAX_AUDIT_LIMIT: u64 = 500;

pub fn router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();
    let static_files =
        ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html")));
    Router::new()
        .route("/verify", get(verify_page))
        .route("/api/v1/verify", get(verify_json))
        .route("/api/v1/verify/lookup", post(assisted_lookup))
        .route("/healthz", get(healthz))
        .route("/api/v1/metrics", get(metrics))
        .route("/api/v1/admin/session", get(admin_session))
        .route(
            "/api/v1/admin/certificates",
            get(list_certificates).post(create_certificate),
        )
        .route(
            "/api/v1/admin/certificates/{id}",
            get(get_certificate)
                .patch(update_certificate)
                .delete(delete_certificate),
        )
        .route("/api/v1/admin/certificates/{id}/qr", get(certificate_qr))
        .route("/api/v1/admin/audit", get(list_audit))
        .route_layer(middleware::from_fn(metrics_middleware))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct VerifyQuery {
    cert: Option<String>,
}

#[derive(Debug, Serialize)]
struct LookupResponse {
    verification_url: String,
    certificate: CertificateView,
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// 反向代理后面优先使用 `X-Forwarded-*`。
fn request_origin(headers: &HeaderMap) -> String {
    let host = header_str(headers, "x-forwarded-host")
        .or_else(|| header_str(headers, header::HOST.as_str()))
        .unwrap_or("localhost");
    origin_from_parts(header_str(headers, "x-forwarded-proto"), host)
}

fn verification_url(state: &AppState, headers: &HeaderMap, certificate_number: &str) -> String {
    let origin = request_origin(headers);
    let base = effective_base_url(state.config.public_base_url.as_deref(), &origin);
    build_verification_url(base, certificate_number)
}

fn certificate_view(
    state: &AppState,
    headers: &HeaderMap,
    record: &CertificateModel,
) -> CertificateView {
    let url = verification_url(state, headers, &record.certificate_number);
    render(record, today_in(state.config.status_utc_offset), url)
}

fn not_found_json() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"error": NOT_FOUND_MESSAGE}))).into_response()
}

fn error_page(err: CertError) -> Response {
    err.log();
    let status = err.axum_status_code();
    let title = if err.is_client_error() {
        "Invalid request"
    } else {
        "Verification unavailable"
    };
    (status, Html(pages::message_page(title, &err.public_message()))).into_response()
}

async fn verify_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<VerifyQuery>,
) -> Response {
    let cert = query.cert.unwrap_or_default();
    let record = match resolve_direct(state.store.as_ref(), &cert).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            let page = pages::message_page("Certificate not found", NOT_FOUND_MESSAGE);
            return (StatusCode::NOT_FOUND, Html(page)).into_response();
        }
        Err(err) => return error_page(err),
    };

    let view = certificate_view(&state, &headers, &record);
    match qr::encode_png(&view.verification_url, state.config.qr_size_px) {
        Ok(png) => Html(pages::certificate_page(&view, &png)).into_response(),
        Err(err) => error_page(err),
    }
}

async fn verify_json(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<VerifyQuery>,
) -> ApiResult<Response> {
    let cert = query.cert.unwrap_or_default();
    let Some(record) = resolve_direct(state.store.as_ref(), &cert).await? else {
        return Ok(not_found_json());
    };
    Ok(Json(certificate_view(&state, &headers, &record)).into_response())
}

/// 公开表单：前缀与编号都命中后返回验证链接，前端据此跳转。
async fn assisted_lookup(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<AssistedLookupRequest>,
) -> ApiResult<Response> {
    let found = resolve_assisted(
        state.store.as_ref(),
        &payload.company_name_prefix,
        &payload.certificate_number,
    )
    .await?;
    let Some(record) = found else {
        return Ok(not_found_json());
    };
    let certificate = certificate_view(&state, &headers, &record);
    Ok(Json(LookupResponse {
        verification_url: certificate.verification_url.clone(),
        certificate,
    })
    .into_response())
}

async fn healthz() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

async fn metrics() -> Response {
    render_metrics()
}

async fn admin_session(session: AdminSession) -> Json<serde_json::Value> {
    Json(json!({"user_id": session.user_id, "role": Role::Admin.as_str()}))
}

fn parse_filter(query: CertificateListQuery) -> ApiResult<CertificateFilter> {
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let template_type = match non_empty(query.template_type) {
        Some(raw) => Some(
            TemplateType::parse(&raw)
                .ok_or_else(|| CertError::BadRequest(format!("unknown template_type {raw}")))?,
        ),
        None => None,
    };
    let status = match non_empty(query.status) {
        Some(raw) => Some(
            OperatorStatus::parse(&raw)
                .ok_or_else(|| CertError::BadRequest(format!("unknown status {raw}")))?,
        ),
        None => None,
    };
    Ok(CertificateFilter {
        q: non_empty(query.q),
        template_type,
        status,
    })
}

async fn list_certificates(
    _session: AdminSession,
    State(state): State<AppState>,
    Query(query): Query<CertificateListQuery>,
) -> ApiResult<Json<Vec<CertificateModel>>> {
    let filter = parse_filter(query)?;
    Ok(Json(state.store.list(&filter).await?))
}

async fn create_certificate(
    session: AdminSession,
    State(state): State<AppState>,
    Json(payload): Json<CreateCertificate>,
) -> ApiResult<(StatusCode, Json<CertificateModel>)> {
    let fields = validate_create(payload)?;
    let model = state.store.insert(session.user_id, fields).await?;
    info!(
        actor = %session.user_id,
        certificate_id = %model.id,
        certificate_number = %model.certificate_number,
        "certificate created"
    );
    Ok((StatusCode::CREATED, Json(model)))
}

async fn load_certificate(state: &AppState, id: Uuid) -> ApiResult<CertificateModel> {
    state
        .store
        .get(id)
        .await?
        .ok_or_else(|| CertError::not_found("certificate"))
}

async fn get_certificate(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CertificateModel>> {
    Ok(Json(load_certificate(&state, id).await?))
}

async fn update_certificate(
    session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCertificate>,
) -> ApiResult<Json<CertificateModel>> {
    let current = load_certificate(&state, id).await?;
    let fields = validate_update(&current, payload)?;
    let updated = state
        .store
        .update(session.user_id, id, fields)
        .await?
        .ok_or_else(|| CertError::not_found("certificate"))?;
    info!(actor = %session.user_id, certificate_id = %id, "certificate updated");
    Ok(Json(updated))
}

async fn delete_certificate(
    session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !state.store.delete(session.user_id, id).await? {
        return Err(CertError::not_found("certificate"));
    }
    info!(actor = %session.user_id, certificate_id = %id, "certificate deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// 打印用的二维码下载
async fn certificate_qr(
    _session: AdminSession,
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let record = load_certificate(&state, id).await?;
    let url = verification_url(&state, &headers, &record.certificate_number);
    let png = qr::encode_png(&url, state.config.qr_size_px)?;

    let file_stem: String = record
        .certificate_number
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect();
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{file_stem}.png\""))
        .map_err(|e| CertError::Internal(e.into()))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("image/png")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        png,
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
struct AuditQuery {
    limit: Option<u64>,
}

async fn list_audit(
    _session: AdminSession,
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> ApiResult<Json<Vec<AuditLogModel>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_AUDIT_LIMIT)
        .clamp(1, MAX_AUDIT_LIMIT);
    Ok(Json(state.store.list_audit(limit).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::{SECRET, token_for};
    use crate::memory_store::{MemoryStore, date, sample_record};
    use crate::store::CertificateStore;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use certverify_common::AppConfig;
    use chrono::{Duration, FixedOffset};
    use serde_json::Value as JsonValue;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tower::ServiceExt;

    const BASE: &str = "https://certs.example.com";

    fn config(public_base_url: Option<&str>) -> AppConfig {
        AppConfig {
            database_url: "postgres://localhost/certs".to_string(),
            listen_addr: "127.0.0.1:0".to_string(),
            public_base_url: public_base_url.map(str::to_string),
            jwt_secret: SECRET.to_string(),
            jwt_audience: Some("authenticated".to_string()),
            admin_bootstrap_user_id: None,
            static_dir: PathBuf::from("web/dist"),
            status_utc_offset: FixedOffset::east_opt(0).unwrap(),
            qr_size_px: 512,
        }
    }

    fn app_with(store: Arc<MemoryStore>, public_base_url: Option<&str>) -> Router {
        router(AppState::new(store, config(public_base_url)))
    }

    fn seeded() -> Arc<MemoryStore> {
        let mut axis = sample_record("AXIS-001-2024", "Politeknik Perkeretaapian");
        axis.expiry_date = date("2099-12-31");
        let mut sis = sample_record("SIS-QMS-2024-001", "PT Example Corp");
        sis.expiry_date = date("2024-01-01");
        sis.template_type = "siscert".to_string();
        let mut modern = sample_record("MOD-7", "Modern Widgets Ltd");
        modern.template_type = "modern".to_string();
        Arc::new(MemoryStore::with_records(vec![axis, sis, modern]))
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body.to_vec())
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, JsonValue) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, _, body) = send(app, req).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn lookup(app: &Router, prefix: &str, number: &str) -> (StatusCode, JsonValue) {
        let payload = json!({"company_name_prefix": prefix, "certificate_number": number});
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/verify/lookup")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap();
        let (status, _, body) = send(app, req).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn admin_request(
        method: &str,
        uri: &str,
        token: &str,
        body: Option<JsonValue>,
    ) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"));
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn admin_token(store: &MemoryStore) -> (Uuid, String) {
        let admin = Uuid::new_v4();
        store.grant_role(admin, Role::Admin).await.unwrap();
        (admin, token_for(admin, Some("authenticated"), Duration::hours(1)))
    }

    #[tokio::test]
    async fn test_verify_page_renders_certificate_with_qr() {
        let app = app_with(seeded(), Some(BASE));
        let req = Request::builder()
            .uri("/verify?cert=AXIS-001-2024")
            .body(Body::empty())
            .unwrap();
        let (status, headers, body) = send(&app, req).await;
        let html = String::from_utf8(body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
        assert!(html.contains("Politeknik Perkeretaapian"));
        assert!(html.contains("template-americo"));
        assert!(html.contains("data-status=\"active\""));
        assert!(html.contains("data:image/png;base64,"));
        assert!(html.contains("https://certs.example.com/verify?cert=AXIS-001-2024"));
    }

    #[tokio::test]
    async fn test_verify_page_errors() {
        let app = app_with(seeded(), Some(BASE));

        let req = Request::builder().uri("/verify").body(Body::empty()).unwrap();
        let (status, _, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(String::from_utf8(body).unwrap().contains("certificate number required"));

        let req = Request::builder()
            .uri("/verify?cert=NOPE-1")
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(String::from_utf8(body).unwrap().contains(NOT_FOUND_MESSAGE));

        let failing = app_with(Arc::new(MemoryStore::failing()), Some(BASE));
        let req = Request::builder()
            .uri("/verify?cert=AXIS-001-2024")
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = send(&failing, req).await;
        let html = String::from_utf8(body).unwrap();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(html.contains("temporary failure, please try again"));
        assert!(!html.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_lookup_url_round_trips_through_direct_lookup() {
        let app = app_with(seeded(), Some(BASE));

        let (status, found) = lookup(&app, "pol", "AXIS-001-2024").await;
        assert_eq!(status, StatusCode::OK);
        let url = found["verification_url"].as_str().unwrap();
        assert_eq!(url, "https://certs.example.com/verify?cert=AXIS-001-2024");

        let path = url.strip_prefix(BASE).unwrap();
        let (status, direct) = get_json(&app, &format!("/api/v1{path}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(direct, found["certificate"]);
    }

    #[tokio::test]
    async fn test_lookup_rejections() {
        let app = app_with(seeded(), Some(BASE));

        let (status, body) = lookup(&app, "po", "AXIS-001-2024").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "prefix too short");

        let (status, body) = lookup(&app, "pol", "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "certificate number required");

        let (status, body) = lookup(&app, "xyz", "AXIS-001-2024").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn test_expired_certificate_scenario() {
        let app = app_with(seeded(), Some(BASE));

        for prefix in ["pt ", "PT "] {
            let (status, body) = lookup(&app, prefix, "SIS-QMS-2024-001").await;
            assert_eq!(status, StatusCode::OK, "prefix {prefix:?}");
            assert_eq!(body["certificate"]["company_name"], "PT Example Corp");
            assert_eq!(body["certificate"]["derived_status"]["status"], "expired");
        }

        let (status, direct) = get_json(&app, "/api/v1/verify?cert=SIS-QMS-2024-001").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(direct["company_name"], "PT Example Corp");
        assert_eq!(direct["derived_status"]["status"], "expired");
        assert_eq!(direct["operator_status"]["status"], "active");
    }

    #[tokio::test]
    async fn test_placeholder_template_falls_back() {
        let app = app_with(seeded(), Some(BASE));
        let (status, view) = get_json(&app, "/api/v1/verify?cert=MOD-7").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["template"], "americo");
    }

    #[tokio::test]
    async fn test_request_origin_used_without_public_base() {
        let app = app_with(seeded(), None);
        let req = Request::builder()
            .uri("/api/v1/verify?cert=AXIS-001-2024")
            .header(header::HOST, "internal:8080")
            .header("x-forwarded-host", "verify.example.org")
            .header("x-forwarded-proto", "https")
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = send(&app, req).await;
        let view: JsonValue = serde_json::from_slice(&body).unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            view["verification_url"],
            "https://verify.example.org/verify?cert=AXIS-001-2024"
        );
    }

    #[tokio::test]
    async fn test_admin_routes_require_admin() {
        let store = seeded();
        let app = app_with(store.clone(), Some(BASE));

        let req = Request::builder()
            .uri("/api/v1/admin/certificates")
            .body(Body::empty())
            .unwrap();
        let (status, _, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let req = admin_request("GET", "/api/v1/admin/certificates", "not-a-jwt", None);
        let (status, _, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let user = token_for(Uuid::new_v4(), Some("authenticated"), Duration::hours(1));
        let req = admin_request("GET", "/api/v1/admin/certificates", &user, None);
        let (status, _, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (admin, token) = admin_token(&store).await;
        let req = admin_request("GET", "/api/v1/admin/session", &token, None);
        let (status, _, body) = send(&app, req).await;
        let session: JsonValue = serde_json::from_slice(&body).unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(session["user_id"], admin.to_string());
        assert_eq!(session["role"], "admin");
    }

    #[tokio::test]
    async fn test_admin_crud_writes_audit_log() {
        let store = Arc::new(MemoryStore::default());
        let app = app_with(store.clone(), Some(BASE));
        let (admin, token) = admin_token(&store).await;

        let create = json!({
            "certificate_number": " EQ-2025-010 ",
            "company_name": "Equal Foods",
            "certificate_standard": "HAS 23000",
            "issue_date": "2025-01-10",
            "surveillance_date": "2026-01-10",
            "expiry_date": "2028-01-09",
            "template_type": "equal",
            "managing_partner": "J. Doe"
        });
        let req = admin_request("POST", "/api/v1/admin/certificates", &token, Some(create));
        let (status, _, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::CREATED);
        let created: JsonValue = serde_json::from_slice(&body).unwrap();
        assert_eq!(created["certificate_number"], "EQ-2025-010");
        assert_eq!(created["status"], "active");
        let id = created["id"].as_str().unwrap().to_string();

        let req = admin_request("GET", "/api/v1/admin/certificates?q=equal%20f", &token, None);
        let (status, _, body) = send(&app, req).await;
        let list: JsonValue = serde_json::from_slice(&body).unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);

        let patch = json!({"status": "suspended", "managing_partner": ""});
        let uri = format!("/api/v1/admin/certificates/{id}");
        let req = admin_request("PATCH", &uri, &token, Some(patch));
        let (status, _, body) = send(&app, req).await;
        let updated: JsonValue = serde_json::from_slice(&body).unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "suspended");
        assert!(updated["managing_partner"].is_null());
        assert_eq!(updated["company_name"], "Equal Foods");

        let req = admin_request("GET", &format!("{uri}/qr"), &token, None);
        let (status, headers, png) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "image/png");
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));

        let req = admin_request("DELETE", &uri, &token, None);
        let (status, _, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let req = admin_request("GET", &uri, &token, None);
        let (status, _, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let actions: Vec<String> = store
            .audit_entries()
            .into_iter()
            .map(|entry| {
                assert_eq!(entry.actor, admin.to_string());
                entry.action
            })
            .collect();
        assert_eq!(
            actions,
            ["certificate.create", "certificate.update", "certificate.delete"]
        );

        let req = admin_request("GET", "/api/v1/admin/audit?limit=2", &token, None);
        let (status, _, body) = send(&app, req).await;
        let audit: JsonValue = serde_json::from_slice(&body).unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(audit.as_array().unwrap().len(), 2);
        assert_eq!(audit[0]["action"], "certificate.delete");
    }

    #[tokio::test]
    async fn test_admin_write_validation() {
        let store = Arc::new(MemoryStore::default());
        let app = app_with(store.clone(), Some(BASE));
        let (_, token) = admin_token(&store).await;

        let bad_date = json!({
            "certificate_number": "X-1",
            "company_name": "Acme",
            "certificate_standard": "ISO 9001:2015",
            "issue_date": "2025-01-10",
            "surveillance_date": "10/01/2026",
            "expiry_date": "2028-01-09"
        });
        let req = admin_request("POST", "/api/v1/admin/certificates", &token, Some(bad_date));
        let (status, _, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let reversed = json!({
            "certificate_number": "X-1",
            "company_name": "Acme",
            "certificate_standard": "ISO 9001:2015",
            "issue_date": "2025-01-10",
            "surveillance_date": "2026-01-10",
            "expiry_date": "2024-01-09"
        });
        let req = admin_request("POST", "/api/v1/admin/certificates", &token, Some(reversed));
        let (status, _, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let req = admin_request("GET", "/api/v1/admin/certificates?status=revoked", &token, None);
        let (status, _, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert!(store.audit_entries().is_empty());
    }

    #[tokio::test]
    async fn test_healthz() {
        let app = app_with(seeded(), None);
        let (status, body) = get_json(&app, "/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
