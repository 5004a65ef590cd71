//! API integration tests against the in-memory backend.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use vreview_api::{create_router, ApiConfig, ApiError, AppState};
use vreview_core::{ReviewConfig, SessionError};
use vreview_models::{Disposition, ItemId, LabelState, ReviewSnapshot};
use vreview_storage::MemoryBackend;

const KEYS: [&str; 5] = ["clips/a.mp4", "clips/b.mp4", "clips/c.mp4", "clips/d.mp4", "clips/e.mp4"];

fn review_config() -> ReviewConfig {
    // Autosave far in the future so tests observe only explicit writes.
    ReviewConfig::default()
        .with_page_size(2)
        .with_autosave_delay(Duration::from_secs(3600))
}

fn create_test_app(backend: Arc<MemoryBackend>, review: ReviewConfig) -> (Router, AppState) {
    let state = AppState::with_backends(ApiConfig::default(), review, backend.clone(), backend.clone(), backend);
    (create_router(state.clone(), None), state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app(Arc::new(MemoryBackend::new(KEYS)), review_config());

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_ready_reports_storage_outage() {
    let backend = Arc::new(MemoryBackend::new(KEYS));
    let (app, _) = create_test_app(backend.clone(), review_config());

    let (status, _) = send(&app, "GET", "/ready", None).await;
    assert_eq!(status, StatusCode::OK);

    backend.set_available(false);
    let (status, body) = send(&app, "GET", "/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["checks"]["storage"]["status"], "error");
}

#[tokio::test]
async fn test_metrics_route_absent_when_disabled() {
    let (app, _) = create_test_app(Arc::new(MemoryBackend::new(KEYS)), review_config());

    let (status, _) = send(&app, "GET", "/metrics", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_init_upgrades_legacy_document_and_clamps_page() {
    let stored = ReviewSnapshot::from_json_slice(
        br#"{"lastPage": 9, "labels": {"clips/b.mp4": "FP", "clips/c.mp4": {"label": "FP", "tag": "dup"}}}"#,
    )
    .unwrap();
    let backend = Arc::new(MemoryBackend::new(KEYS).with_snapshot(stored));
    let (app, _) = create_test_app(backend, review_config());

    let (status, body) = send(&app, "GET", "/api/init", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["videoKeys"].as_array().unwrap().len(), 5);
    assert_eq!(body["lastPage"], 2);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["pageSize"], 2);
    assert_eq!(body["tagsEnabled"], true);
    assert_eq!(body["labels"]["clips/b.mp4"], json!({"disposition": "FP", "tag": ""}));
    assert_eq!(body["labels"]["clips/c.mp4"], json!({"disposition": "FP", "tag": "dup"}));
}

#[tokio::test]
async fn test_init_unavailable_then_retry_succeeds() {
    let backend = Arc::new(MemoryBackend::new(KEYS));
    backend.set_available(false);
    let (app, _) = create_test_app(backend.clone(), review_config());

    let (status, body) = send(&app, "GET", "/api/init", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "session_unavailable");

    backend.set_available(true);
    let (status, _) = send(&app, "GET", "/api/init", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_set_label_then_save_writes_document() {
    let backend = Arc::new(MemoryBackend::new(KEYS));
    let (app, _) = create_test_app(backend.clone(), review_config());

    let (status, body) = send(
        &app,
        "POST",
        "/api/labels",
        Some(json!({"key": "clips/a.mp4", "disposition": "reject", "tag": "blurry"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], json!({"disposition": "FP", "tag": "blurry"}));

    let (status, body) = send(&app, "POST", "/api/save", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["saved"], true);
    assert_eq!(body["status"]["state"], "saved");

    let stored = backend.stored().await.unwrap();
    assert_eq!(stored.labels[&ItemId::from("clips/a.mp4")].tag, "blurry");
    assert_eq!(backend.write_count().await, 1);
}

#[tokio::test]
async fn test_set_label_rejects_unknown_key_and_long_tag() {
    let (app, _) = create_test_app(Arc::new(MemoryBackend::new(KEYS)), review_config());

    let (status, body) = send(
        &app,
        "POST",
        "/api/labels",
        Some(json!({"key": "clips/zzz.mp4", "disposition": "TP"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "unknown_item");

    let (status, _) = send(
        &app,
        "POST",
        "/api/labels",
        Some(json!({"key": "clips/a.mp4", "disposition": "TP", "tag": "x".repeat(513)})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tags_disabled_keeps_stored_tag() {
    let mut stored = ReviewSnapshot::default();
    stored.labels.insert(
        ItemId::from("clips/a.mp4"),
        vreview_models::LabelState::new(Disposition::Reject, "keep me"),
    );
    let backend = Arc::new(MemoryBackend::new(KEYS).with_snapshot(stored));
    let (app, _) = create_test_app(backend, review_config().with_tags_enabled(false));

    let (status, body) = send(
        &app,
        "POST",
        "/api/labels",
        Some(json!({"key": "clips/a.mp4", "disposition": "TP", "tag": "ignored"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], json!({"disposition": "TP", "tag": "keep me"}));
}

#[tokio::test]
async fn test_toggle_flips_disposition_and_keeps_tag() {
    let (app, _) = create_test_app(Arc::new(MemoryBackend::new(KEYS)), review_config());

    send(
        &app,
        "POST",
        "/api/labels",
        Some(json!({"key": "clips/b.mp4", "disposition": "TP", "tag": "edge"})),
    )
    .await;

    let (status, body) = send(&app, "POST", "/api/labels/toggle", Some(json!({"index": 1}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["key"], "clips/b.mp4");
    assert_eq!(body["label"], json!({"disposition": "FP", "tag": "edge"}));

    let (_, body) = send(&app, "POST", "/api/labels/toggle", Some(json!({"index": 1}))).await;
    assert_eq!(body["label"], json!({"disposition": "TP", "tag": "edge"}));

    let (_, status_body) = send(&app, "GET", "/api/status", None).await;
    assert_eq!(status_body["cursor"]["focusedIndex"], 1);
}

#[tokio::test]
async fn test_toggle_empty_slot_is_not_found() {
    let (app, _) = create_test_app(Arc::new(MemoryBackend::new(KEYS)), review_config());

    send(&app, "POST", "/api/navigate", Some(json!({"page": 2}))).await;
    let (status, body) = send(&app, "POST", "/api/labels/toggle", Some(json!({"index": 1}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "empty_slot");
}

#[tokio::test]
async fn test_videos_page_is_clamped_and_annotated() {
    let (app, _) = create_test_app(Arc::new(MemoryBackend::new(KEYS)), review_config());

    send(
        &app,
        "POST",
        "/api/labels",
        Some(json!({"key": "clips/e.mp4", "disposition": "FP"})),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/videos?page=99", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 2);
    let videos = body["videos"].as_array().unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0]["key"], "clips/e.mp4");
    assert_eq!(videos[0]["url"], "memory://media/clips/e.mp4?expires=900");
    assert_eq!(videos[0]["label"]["disposition"], "FP");

    // Viewing another page does not move the cursor.
    let (_, body) = send(&app, "GET", "/api/page", None).await;
    assert_eq!(body["page"], 0);
    assert_eq!(body["videos"][0]["label"], json!({"disposition": "TP", "tag": ""}));
}

#[tokio::test]
async fn test_page_fetch_failure_is_bad_gateway() {
    let backend = Arc::new(MemoryBackend::new(KEYS));
    let (app, _) = create_test_app(backend.clone(), review_config());
    send(&app, "GET", "/api/init", None).await;

    backend.set_available(false);
    let (status, body) = send(&app, "GET", "/api/page", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "page_fetch_failed");
}

#[tokio::test]
async fn test_navigation_clamps_and_focus_range() {
    let (app, _) = create_test_app(Arc::new(MemoryBackend::new(KEYS)), review_config());

    let (_, body) = send(&app, "POST", "/api/navigate", Some(json!({"direction": "prev"}))).await;
    assert_eq!(body["page"], 0);

    let (_, body) = send(&app, "POST", "/api/navigate", Some(json!({"direction": "next"}))).await;
    assert_eq!(body["page"], 1);

    let (_, body) = send(&app, "POST", "/api/navigate", Some(json!({"page": -4}))).await;
    assert_eq!(body["page"], 0);

    let (_, body) = send(&app, "POST", "/api/navigate", Some(json!({"page": 40}))).await;
    assert_eq!(body["page"], 2);

    let (_, body) = send(&app, "POST", "/api/focus", Some(json!({"index": 1}))).await;
    assert_eq!(body["accepted"], true);
    assert_eq!(body["cursor"]["focusedIndex"], 1);

    let (_, body) = send(&app, "POST", "/api/focus", Some(json!({"index": 2}))).await;
    assert_eq!(body["accepted"], false);
    assert_eq!(body["cursor"]["focusedIndex"], 1);

    let (_, body) = send(&app, "POST", "/api/focus", Some(json!({"index": -1}))).await;
    assert_eq!(body["accepted"], false);
}

#[tokio::test]
async fn test_search_moves_cursor_on_hit() {
    let (app, _) = create_test_app(Arc::new(MemoryBackend::new(KEYS)), review_config());

    let (status, body) = send(&app, "GET", "/api/search?q=D.MP4", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"found": true, "page": 1, "index": 1}));

    let (_, status_body) = send(&app, "GET", "/api/status", None).await;
    assert_eq!(status_body["cursor"]["page"], 1);
    assert_eq!(status_body["cursor"]["focusedIndex"], 1);

    let (_, body) = send(&app, "GET", "/api/search?q=missing", None).await;
    assert_eq!(body["found"], false);
    let (_, body) = send(&app, "GET", "/api/search?q=", None).await;
    assert_eq!(body["found"], false);
}

#[tokio::test]
async fn test_save_failure_keeps_labels() {
    let backend = Arc::new(MemoryBackend::new(KEYS));
    let (app, _) = create_test_app(backend.clone(), review_config());

    send(
        &app,
        "POST",
        "/api/labels",
        Some(json!({"key": "clips/a.mp4", "disposition": "FP"})),
    )
    .await;
    backend.set_available(false);

    let (status, body) = send(&app, "POST", "/api/save", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["saved"], false);
    assert_eq!(body["status"]["state"], "failed");
    assert!(body["error"].as_str().unwrap().contains("Save failed"));

    let (_, summary) = send(&app, "GET", "/api/summary", None).await;
    assert_eq!(summary["rejected"], 1);

    backend.set_available(true);
    let (status, body) = send(&app, "POST", "/api/save", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["saved"], true);
}

#[tokio::test]
async fn test_save_with_document_replaces_state() {
    let backend = Arc::new(MemoryBackend::new(KEYS));
    let (app, _) = create_test_app(backend.clone(), review_config());

    let (status, _) = send(
        &app,
        "POST",
        "/api/save",
        Some(json!({"lastPage": 1, "labels": {"clips/c.mp4": "FP"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let stored = backend.stored().await.unwrap();
    assert_eq!(stored.last_page, 1);
    assert_eq!(stored.labels[&ItemId::from("clips/c.mp4")].disposition, Disposition::Reject);

    let (status, _) = send(&app, "POST", "/api/save", Some(json!({"lastPage": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reload_writes_running_session_first() {
    let backend = Arc::new(MemoryBackend::new(KEYS));
    let (app, _) = create_test_app(backend.clone(), review_config());

    send(
        &app,
        "POST",
        "/api/labels",
        Some(json!({"key": "clips/d.mp4", "disposition": "FP", "tag": "late"})),
    )
    .await;
    send(&app, "POST", "/api/navigate", Some(json!({"page": 1}))).await;

    let (status, body) = send(&app, "GET", "/api/init?reload=true", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(backend.write_count().await, 1);
    assert_eq!(body["lastPage"], 1);
    assert_eq!(body["labels"]["clips/d.mp4"], json!({"disposition": "FP", "tag": "late"}));
}

#[tokio::test]
async fn test_session_handle_from_before_reload_refuses_edits() {
    let backend = Arc::new(MemoryBackend::new(KEYS));
    let (app, state) = create_test_app(backend.clone(), review_config());

    let stale = state.session().await.unwrap();
    state.reload_session().await.unwrap();

    let err = stale.write().await.err().unwrap();
    assert!(matches!(err, SessionError::Closed));
    let response = ApiError::from(err).into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // A retry reaches the reopened session and is saved from there.
    let (status, _) = send(
        &app,
        "POST",
        "/api/labels",
        Some(json!({"key": "clips/b.mp4", "disposition": "FP"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    state.close_session().await;
    let stored = backend.stored().await.unwrap();
    assert_eq!(stored.labels[&ItemId::from("clips/b.mp4")].disposition, Disposition::Reject);
}

#[tokio::test]
async fn test_mixed_case_dispositions_are_accepted() {
    let backend = Arc::new(MemoryBackend::new(KEYS));
    let (app, _) = create_test_app(backend.clone(), review_config());

    let (status, body) = send(
        &app,
        "POST",
        "/api/labels",
        Some(json!({"key": "clips/a.mp4", "disposition": "Reject"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"]["disposition"], "FP");

    let document = json!({
        "lastPage": 0,
        "labels": {"clips/b.mp4": "Fp", "clips/c.mp4": {"disposition": "rEJECT", "tag": "dup"}}
    });
    let (status, _) = send(&app, "POST", "/api/save", Some(document)).await;
    assert_eq!(status, StatusCode::OK);

    let stored = backend.stored().await.unwrap();
    assert_eq!(stored.labels[&ItemId::from("clips/b.mp4")], LabelState::new(Disposition::Reject, ""));
    assert_eq!(stored.labels[&ItemId::from("clips/c.mp4")], LabelState::new(Disposition::Reject, "dup"));
}

#[tokio::test]
async fn test_close_session_performs_final_save() {
    let backend = Arc::new(MemoryBackend::new(KEYS));
    let (app, state) = create_test_app(backend.clone(), review_config());

    send(
        &app,
        "POST",
        "/api/labels",
        Some(json!({"key": "clips/a.mp4", "disposition": "FP"})),
    )
    .await;
    state.close_session().await;

    assert_eq!(backend.write_count().await, 1);
    assert!(backend.stored().await.unwrap().labels.contains_key(&ItemId::from("clips/a.mp4")));
}

#[tokio::test]
async fn test_rate_limiting_per_client_ip() {
    let backend = Arc::new(MemoryBackend::new(KEYS));
    let config = ApiConfig {
        rate_limit_rps: 1,
        ..ApiConfig::default()
    };
    let state = AppState::with_backends(config, review_config(), backend.clone(), backend.clone(), backend);
    let app = create_router(state, None);

    let request = || {
        Request::builder()
            .uri("/api/summary")
            .header("X-Forwarded-For", "192.0.2.10")
            .body(Body::empty())
            .unwrap()
    };

    let first = app.clone().oneshot(request()).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let second = app.clone().oneshot(request()).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

    // Probes are outside the limited routes.
    let health = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("X-Forwarded-For", "192.0.2.10")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let (app, _) = create_test_app(Arc::new(MemoryBackend::new(KEYS)), review_config());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("X-Request-ID", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-request-id"], "req-123");
}
