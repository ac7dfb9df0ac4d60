//! HTTP 中间件与应用状态
//! 请求追踪、控制台存储的装配

use crate::{
    auth::RouteGuard,
    config::AppConfig,
    realtime::AuditBus,
    services::{AuditService, SessionService, ThemeService},
    storage::{KeyValueStorage, StorageKeys},
};
use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// 应用状态
///
/// 一个运行中的控制台就是一个客户端，三个存储在进程内各只有一个实例。
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub session_service: Arc<SessionService>,
    pub audit_service: Arc<AuditService>,
    pub theme_service: Arc<ThemeService>,
    pub audit_bus: Arc<AuditBus>,
    pub guard: Arc<RouteGuard>,
}

impl AppState {
    /// 在给定存储和总线上构建全部存储，并让审计环形缓冲区订阅总线
    pub fn build(
        config: AppConfig,
        storage: Arc<dyn KeyValueStorage>,
        audit_bus: Arc<AuditBus>,
    ) -> Self {
        let keys = StorageKeys::with_prefix(&config.storage.key_prefix);

        let session_service = Arc::new(SessionService::new(storage.clone(), &keys));
        let audit_service = Arc::new(AuditService::new(
            storage.clone(),
            &keys,
            config.audit.capacity,
        ));
        let theme_service = Arc::new(ThemeService::new(storage, &keys));
        let guard = Arc::new(RouteGuard::new(session_service.clone(), &config.auth));

        audit_bus.subscribe(audit_service.clone());

        Self {
            config,
            session_service,
            audit_service,
            theme_service,
            audit_bus,
            guard,
        }
    }
}

/// 请求追踪中间件
/// 为每个请求生成 request_id，并记录指标
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    let request_id = extract_or_generate_request_id(req.headers());
    let method = req.method().to_string();
    let uri = req.uri().to_string();

    let span = tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    async move {
        let start = Instant::now();

        let mut response = next.run(req).await;

        let elapsed = start.elapsed();
        let status = response.status().as_u16();

        let method_name = match method.as_str() {
            "GET" => "GET",
            "POST" => "POST",
            "PUT" => "PUT",
            "DELETE" => "DELETE",
            _ => "OTHER",
        };
        let status_class = match status {
            200..=299 => "2xx",
            300..=399 => "3xx",
            400..=499 => "4xx",
            _ => "5xx",
        };

        metrics::counter!("http_requests_total", "method" => method_name, "status" => status_class)
            .increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        tracing::info!(
            method = %method,
            uri = %uri,
            status = status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Request completed"
        );

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }

        response
    }
    .instrument(span)
    .await
}

/// 从请求头中提取或生成 request_id
fn extract_or_generate_request_id(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
