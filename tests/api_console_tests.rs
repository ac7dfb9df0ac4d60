//! 审计日志与颜色模式 API 集成测试

mod common;

use admin_console::{
    models::{AuditEvent, SessionRecord},
    routes::create_router,
};
use axum::http::{header, StatusCode};
use common::{body_json, create_test_state, empty_request, get, json_request};
use serde_json::json;
use tower::ServiceExt;

fn sign_in(state: &admin_console::middleware::AppState) {
    state
        .session_service
        .sign_in(&SessionRecord::new("Ada", "ada@example.com", "Administrator"))
        .unwrap();
}

#[tokio::test]
async fn test_list_audit_events_newest_first() {
    let (_, state) = create_test_state();
    sign_in(&state);
    for name in ["zone.create", "zone.update", "zone.delete"] {
        state.audit_service.append(AuditEvent::new(name)).unwrap();
    }
    let app = create_router(state);

    let response = app.oneshot(get("/api/audit")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["capacity"], 500);
    assert_eq!(body["dropped_total"], 0);
    assert_eq!(body["published_total"], 0);
    assert_eq!(body["events"][0]["event"], "zone.delete");
    assert_eq!(body["events"][2]["event"], "zone.create");
}

#[tokio::test]
async fn test_list_audit_events_with_filter() {
    let (_, state) = create_test_state();
    sign_in(&state);
    state
        .audit_service
        .append(AuditEvent::new("zone.update").with_actor("ops@example.com"))
        .unwrap();
    state
        .audit_service
        .append(AuditEvent::new("pricing.update").with_actor("ada@example.com"))
        .unwrap();
    state
        .audit_service
        .append(AuditEvent::new("zone.update").with_actor("ada@example.com"))
        .unwrap();
    let app = create_router(state);

    let response = app
        .oneshot(get("/api/audit?event=zone.update&limit=1"))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["total"], 3);
    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["actor"], "ada@example.com");
}

#[tokio::test]
async fn test_list_audit_events_rejects_bad_query() {
    let (_, state) = create_test_state();
    sign_in(&state);
    let app = create_router(state);

    let response = app.oneshot(get("/api/audit?limit=many")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_published_total_counts_bus_events() {
    let (_, state) = create_test_state();
    sign_in(&state);
    let app = create_router(state.clone());

    app.clone()
        .oneshot(empty_request("POST", "/api/theme/toggle"))
        .await
        .unwrap();
    let response = app.oneshot(get("/api/audit")).await.unwrap();

    let body = body_json(response).await;
    assert_eq!(body["published_total"], 1);
    assert_eq!(state.audit_bus.subscriber_count(), 1);
}

#[tokio::test]
async fn test_clear_audit_events() {
    let (_, state) = create_test_state();
    sign_in(&state);
    state.audit_service.append(AuditEvent::new("x")).unwrap();
    let app = create_router(state.clone());

    let response = app
        .oneshot(empty_request("DELETE", "/api/audit"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(state.audit_service.list_events().is_empty());
}

#[tokio::test]
async fn test_theme_defaults_to_light() {
    let (_, state) = create_test_state();
    let app = create_router(state);

    let response = app.oneshot(get("/api/theme")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"mode": "light"}));
}

#[tokio::test]
async fn test_set_and_toggle_theme() {
    let (storage, state) = create_test_state();
    let app = create_router(state.clone());

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/theme", json!({"mode": "dark"})))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["mode"], "dark");

    // 重新构建状态模拟刷新页面
    let shared: std::sync::Arc<dyn admin_console::storage::KeyValueStorage> = storage;
    let reloaded = std::sync::Arc::new(admin_console::middleware::AppState::build(
        state.config.clone(),
        shared,
        std::sync::Arc::new(admin_console::realtime::AuditBus::new()),
    ));
    assert_eq!(reloaded.theme_service.mode().as_str(), "dark");

    let response = app
        .oneshot(empty_request("POST", "/api/theme/toggle"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["mode"], "light");
}

#[tokio::test]
async fn test_theme_change_is_audited() {
    let (_, state) = create_test_state();
    sign_in(&state);
    let app = create_router(state.clone());

    app.oneshot(empty_request("POST", "/api/theme/toggle"))
        .await
        .unwrap();

    let events = state.audit_service.list_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event, "theme.change");
    assert_eq!(events[0].extra["mode"], "dark");
    assert_eq!(events[0].actor.as_deref(), Some("ada@example.com"));
}

#[tokio::test]
async fn test_set_theme_rejects_unknown_token() {
    let (_, state) = create_test_state();
    let app = create_router(state.clone());

    let response = app
        .oneshot(json_request("PUT", "/api/theme", json!({"mode": "sepia"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], 400);
    assert_eq!(state.theme_service.mode().as_str(), "light");
}

#[tokio::test]
async fn test_theme_stream_is_event_stream() {
    let (_, state) = create_test_state();
    let app = create_router(state);

    let response = app.oneshot(get("/api/theme/stream")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/event-stream"
    );
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (_, state) = create_test_state();
    let app = create_router(state);

    let request = axum::http::Request::builder()
        .uri("/health")
        .header("x-request-id", "req-42")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.headers().get("x-request-id").unwrap(), "req-42");
}
