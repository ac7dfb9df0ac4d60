//! 路由守卫中间件

use crate::{auth::guard::GuardDecision, error::AppError, middleware::AppState, models::SessionRecord};
use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

/// 认证上下文（附加到请求扩展）
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: SessionRecord,
}

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
// 缺失时按配置的登录页生成跳转地址
impl FromRequestParts<Arc<AppState>> for AuthContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(context) = parts.extensions.get::<AuthContext>() {
            return Ok(context.clone());
        }

        let target = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| parts.uri.path());

        Err(AppError::Unauthorized {
            location: state.guard.sign_in_location(target),
        })
    }
}

/// 路由守卫中间件
///
/// 页面导航未登录时 303 跳转到登录页；`/api/` 请求返回 401，错误体中带跳转地址。
pub async fn route_guard_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let target = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    match state.guard.evaluate(&target) {
        GuardDecision::Render { user } => {
            if let Some(user) = user {
                req.extensions_mut().insert(AuthContext { user });
            }
            Ok(next.run(req).await)
        }
        GuardDecision::Redirect { location, from } => {
            if req.uri().path().starts_with("/api/") {
                return Err(AppError::Unauthorized { location });
            }

            tracing::info!(from = %from, location = %location, "Redirecting to sign-in");
            Ok(Redirect::to(&location).into_response())
        }
    }
}
