//! 存储故障测试
//!
//! 读取失败时各存储返回默认值，写入失败时 HTTP 层返回 500 且不暴露细节

mod common;

use admin_console::{
    models::{AuditEvent, ColorMode, SessionRecord},
    routes::create_router,
};
use axum::http::StatusCode;
use common::{body_json, create_failing_state, empty_request, get, json_request};
use serde_json::json;
use tower::ServiceExt;

#[test]
fn test_read_failures_fall_back_to_defaults() {
    let state = create_failing_state();

    assert_eq!(state.session_service.current_user(), None);
    assert!(!state.session_service.is_authenticated());
    assert!(state.audit_service.list_events().is_empty());
    assert_eq!(state.theme_service.mode(), ColorMode::Light);
}

#[test]
fn test_write_failures_are_returned_to_caller() {
    let state = create_failing_state();

    assert!(state
        .session_service
        .sign_in(&SessionRecord::new("Ada", "ada@example.com", "Administrator"))
        .is_err());
    assert!(state.session_service.sign_out().is_err());
    assert!(state.audit_service.append(AuditEvent::new("x")).is_err());
    assert!(state.audit_service.clear().is_err());
    assert!(state.theme_service.toggle().is_err());
    assert_eq!(state.audit_service.dropped_total(), 0);
}

#[test]
fn test_bus_swallows_sink_failure() {
    let state = create_failing_state();

    assert_eq!(state.audit_bus.publish(AuditEvent::new("zone.update")), 0);
}

#[tokio::test]
async fn test_set_theme_write_failure_is_500() {
    let app = create_router(create_failing_state());

    let response = app
        .oneshot(json_request("PUT", "/api/theme", json!({"mode": "dark"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], 500);
    assert_eq!(body["error"]["message"], "Local storage error occurred");
}

#[tokio::test]
async fn test_toggle_and_login_write_failures_are_500() {
    let app = create_router(create_failing_state());

    let response = app
        .clone()
        .oneshot(empty_request("POST", "/api/theme/toggle"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({"email": "ada@example.com", "password": "pw"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await["error"]["message"],
        "Local storage error occurred"
    );
}

#[tokio::test]
async fn test_reads_still_render_with_failing_storage() {
    let app = create_router(create_failing_state());

    let response = app.clone().oneshot(get("/api/theme")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["mode"], "light");

    // 会话读取失败即视为未登录
    let response = app.oneshot(get("/console/dashboard")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}
