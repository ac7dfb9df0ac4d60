//! 管理控制台主入口

use admin_console::{
    config::AppConfig,
    error::AppError,
    handlers::health,
    middleware::AppState,
    realtime::{AuditBus, AuditLayer},
    routes, storage, telemetry,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ===== CLI 参数处理 =====
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" => {
                println!("admin-console {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("未知参数: {}", args[1]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    // 加载 .env 文件（开发环境）
    if let Ok(env) = std::env::var("CONSOLE_ENV") {
        dotenv::from_filename(format!(".env.{}", env)).ok();
    } else {
        dotenv::from_filename(".env.local").ok();
        dotenv::dotenv().ok();
    }

    health::set_start_time();

    // 1. 加载配置
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        AppError::from(e)
    })?;

    // 2. 审计总线 + 日志（审计 layer 在整个进程生命周期内只安装一次）
    let audit_bus = Arc::new(AuditBus::new());
    telemetry::init_telemetry(
        &config,
        AuditLayer::new(config.audit.bridge_target.clone(), audit_bus.clone()),
    );

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Admin console starting...");

    // 3. 本地存储
    let storage = storage::open_storage(&config.storage)?;
    tracing::info!(
        backend = %config.storage.backend,
        path = config.storage.path.as_deref().unwrap_or("-"),
        "Local storage opened"
    );

    // 4. 构建应用状态（审计缓冲区在此订阅总线）
    let state = Arc::new(AppState::build(config.clone(), storage, audit_bus));

    tracing::info!(
        audit_capacity = state.audit_service.capacity(),
        audit_events = state.audit_service.list_events().len(),
        color_mode = %state.theme_service.mode(),
        signed_in = state.session_service.is_authenticated(),
        audit_sinks = state.audit_bus.subscriber_count(),
        "Console stores ready"
    );

    // 5. 构建路由
    let app = routes::create_router(state);

    // 6. 启动服务器
    let addr = &config.server.addr;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(addr = %addr, "Console shell listening");

    // 7. 优雅关闭
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.graceful_shutdown_timeout_secs))
        .await?;

    tracing::info!("Console shutdown complete");
    Ok(())
}

/// 优雅关闭信号处理
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Terminate signal received, starting graceful shutdown");
        },
    }

    // 超时后强制退出（例如 SSE 长连接一直不断开）
    tokio::spawn(async move {
        tokio::time::sleep(tokio::time::Duration::from_secs(timeout_secs)).await;
        tracing::warn!("Graceful shutdown timeout reached, forcing exit");
        std::process::exit(0);
    });
}

/// 打印帮助信息
fn print_help() {
    println!("admin-console {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("用法: admin-console [选项]");
    println!();
    println!("选项:");
    println!("  --version     打印版本信息并退出");
    println!("  --help        打印此帮助信息并退出");
    println!();
    println!("环境变量:");
    println!("  所有配置通过 CONSOLE_ 前缀的环境变量完成");
    println!("  例如 CONSOLE_STORAGE__BACKEND=memory, CONSOLE_AUDIT__CAPACITY=1000");
}
