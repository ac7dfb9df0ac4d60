//! 路由注册
//! 控制台外壳的全部路由，受保护路由统一经过路由守卫

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

use crate::{auth::route_guard_middleware, handlers, middleware::AppState};

/// 请求体大小上限
const MAX_BODY_BYTES: usize = 64 * 1024;

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开路由（无需登录）
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/login", get(handlers::auth::login_page))
        .route("/api/auth/login", post(handlers::auth::login))
        .route(
            "/api/theme",
            get(handlers::theme::get_theme).put(handlers::theme::set_theme),
        )
        .route("/api/theme/toggle", post(handlers::theme::toggle_theme))
        .route("/api/theme/stream", get(handlers::theme::theme_stream));

    // 需要登录的路由
    let guarded_routes = Router::new()
        .route("/", get(handlers::pages::console_root))
        .route("/console/{page}", get(handlers::pages::console_page))
        .route("/api/auth/me", get(handlers::auth::get_current_user))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route(
            "/api/audit",
            get(handlers::audit::list_audit_events).delete(handlers::audit::clear_audit_events),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            route_guard_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(guarded_routes)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}
