//! 登录相关的 HTTP 处理器

use crate::{
    auth::AuthContext,
    error::AppError,
    middleware::AppState,
    models::{AuditAction, LoginRequest, LoginResponse, SessionRecord},
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::IntoResponse,
    Json,
};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct LoginPageQuery {
    pub from: Option<String>,
}

/// 登录页描述
pub async fn login_page(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LoginPageQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(query) = query?;

    Ok(Json(json!({
        "page": "login",
        "from": query.from,
        "redirect_to": state.guard.return_location(query.from.as_deref()),
        "authenticated": state.session_service.is_authenticated(),
        "color_mode": state.theme_service.mode(),
    })))
}

/// 登录
///
/// 不校验凭据：邮箱格式正确、密码非空即伪造会话记录并写入。
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(req) = payload?;
    req.validate()?;
    if req.password.expose_secret().is_empty() {
        return Err(AppError::Validation("password must not be empty".to_string()));
    }

    let record = SessionRecord::fabricate(&req.email, &state.config.auth.default_role);
    state.session_service.sign_in(&record)?;

    state.audit_bus.publish(
        AuditAction::SignIn
            .event()
            .with_actor(record.email.clone())
            .with_field("role", record.role.clone()),
    );

    Ok(Json(LoginResponse {
        redirect_to: state.guard.return_location(req.from.as_deref()),
        user: record,
    }))
}

/// 登出
pub async fn logout(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    state
        .audit_bus
        .publish(AuditAction::SignOut.event().with_actor(auth_context.user.email.clone()));

    state.session_service.sign_out()?;

    Ok(Json(json!({
        "message": "Signed out",
        "redirect_to": state.guard.sign_in_path(),
    })))
}

/// 当前用户
pub async fn get_current_user(auth_context: AuthContext) -> Json<SessionRecord> {
    Json(auth_context.user)
}
