//! 日志与追踪系统
//! 初始化结构化日志，并挂载审计桥接 layer

use crate::{config::AppConfig, realtime::AuditLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// 初始化日志与追踪系统
///
/// 日志级别过滤只作用于输出 layer，审计 layer 能看到所有标记事件。
pub fn init_telemetry(config: &AppConfig, audit_layer: AuditLayer) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let log_layer = match config.logging.format.to_lowercase().as_str() {
        "json" => {
            // JSON 格式（生产环境）
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .boxed()
        }
        "pretty" => {
            // 美化格式（开发环境）
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_target(true)
                .boxed()
        }
        _ => tracing_subscriber::fmt::layer().with_target(true).boxed(),
    };

    let bridge_target = audit_layer.target().to_string();

    tracing_subscriber::registry()
        .with(log_layer.with_filter(env_filter))
        .with(audit_layer)
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        level = %config.logging.level,
        format = %config.logging.format,
        audit_target = %bridge_target,
        "Telemetry initialized"
    );
}
