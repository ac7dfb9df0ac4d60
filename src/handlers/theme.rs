//! 颜色模式处理器

use crate::{
    error::AppError,
    middleware::AppState,
    models::{AuditAction, ColorMode},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::{wrappers::WatchStream, StreamExt};

#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub mode: ColorMode,
}

#[derive(Debug, Deserialize)]
pub struct SetThemeRequest {
    pub mode: ColorMode,
}

pub async fn get_theme(State(state): State<Arc<AppState>>) -> Json<ThemeResponse> {
    Json(ThemeResponse {
        mode: state.theme_service.mode(),
    })
}

pub async fn set_theme(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SetThemeRequest>, JsonRejection>,
) -> Result<Json<ThemeResponse>, AppError> {
    let Json(req) = payload?;
    state.theme_service.set_mode(req.mode)?;
    publish_change(&state, req.mode);

    Ok(Json(ThemeResponse { mode: req.mode }))
}

pub async fn toggle_theme(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ThemeResponse>, AppError> {
    let mode = state.theme_service.toggle()?;
    publish_change(&state, mode);

    Ok(Json(ThemeResponse { mode }))
}

/// 颜色模式变更推送（SSE），连接建立时先推送当前值
pub async fn theme_stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = WatchStream::new(state.theme_service.subscribe())
        .map(|mode| Ok(Event::default().event("color_mode").data(mode.as_str())));

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn publish_change(state: &AppState, mode: ColorMode) {
    let mut event = AuditAction::ThemeChange.event().with_field("mode", mode.as_str());
    if let Some(user) = state.session_service.current_user() {
        event = event.with_actor(user.email);
    }
    state.audit_bus.publish(event);
}
