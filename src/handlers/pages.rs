//! 控制台页面处理器
//! 页面内容本身不在这里实现，只返回页面描述供外壳渲染

use crate::{
    auth::AuthContext,
    error::AppError,
    middleware::AppState,
    models::{ColorMode, SessionRecord},
};
use axum::{
    extract::{Path, State},
    response::Redirect,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

/// 控制台页面（路径段，标题）
pub const CONSOLE_PAGES: [(&str, &str); 10] = [
    ("dashboard", "Dashboard"),
    ("riders", "Riders"),
    ("drivers", "Drivers"),
    ("agents", "Agents"),
    ("companies", "Companies"),
    ("pricing", "Pricing"),
    ("zones", "Zones"),
    ("localization", "Localization"),
    ("audit-log", "Audit Log"),
    ("settings", "Settings"),
];

#[derive(Debug, Serialize)]
pub struct PageDescriptor {
    pub page: String,
    pub title: String,
    pub user: SessionRecord,
    pub color_mode: ColorMode,
}

pub async fn console_page(
    State(state): State<Arc<AppState>>,
    Path(page): Path<String>,
    auth_context: AuthContext,
) -> Result<Json<PageDescriptor>, AppError> {
    let (slug, title) = CONSOLE_PAGES
        .iter()
        .find(|(slug, _)| *slug == page)
        .ok_or_else(|| AppError::NotFound(format!("Page '{}'", page)))?;

    Ok(Json(PageDescriptor {
        page: slug.to_string(),
        title: title.to_string(),
        user: auth_context.user,
        color_mode: state.theme_service.mode(),
    }))
}

/// 控制台根路径跳转到默认页面
pub async fn console_root(State(state): State<Arc<AppState>>) -> Redirect {
    Redirect::to(state.guard.default_route())
}
