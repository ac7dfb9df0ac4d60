//! 审计日志处理器

use crate::{error::AppError, middleware::AppState, models::AuditQuery};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// 查询审计日志（最新在前）
pub async fn list_audit_events(
    State(state): State<Arc<AppState>>,
    query: Result<Query<AuditQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(query) = query?;
    let events = state.audit_service.list_events();
    let total = events.len();
    let events = query.apply(events);

    Ok(Json(json!({
        "events": events,
        "total": total,
        "capacity": state.audit_service.capacity(),
        "dropped_total": state.audit_service.dropped_total(),
        "published_total": state.audit_bus.published_total(),
    })))
}

/// 清空审计日志
pub async fn clear_audit_events(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    state.audit_service.clear()?;
    Ok(Json(json!({"message": "Audit log cleared"})))
}
