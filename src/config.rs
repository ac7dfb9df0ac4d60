//! 配置系统
//! 从环境变量加载所有配置（前缀 CONSOLE_，嵌套分隔符 __）

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址，默认只绑定本机回环地址
    pub addr: String,
    /// 优雅关闭超时时间（秒）
    pub graceful_shutdown_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别: trace, debug, info, warn, error
    pub level: String,
    /// 日志格式: json, pretty
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 存储后端: memory, file
    pub backend: String,
    /// file 后端的文件路径
    pub path: Option<String>,
    /// 存储键名前缀
    pub key_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// 审计环形缓冲区容量
    pub capacity: usize,
    /// 诊断桥接使用的 tracing target
    pub bridge_target: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// 登录页路径
    pub sign_in_path: String,
    /// 登录后没有有效回跳地址时的默认页面
    pub default_route: String,
    /// 伪造会话记录使用的角色
    pub default_role: String,
    /// 无需登录即可访问的路径（精确匹配或以 `/*` 结尾的前缀）
    pub public_paths: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub audit: AuditConfig,
    pub auth: AuthConfig,
}

/// 默认审计容量
pub const DEFAULT_AUDIT_CAPACITY: usize = 500;

/// 审计容量上限
pub const MAX_AUDIT_CAPACITY: usize = 10_000;

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Config::builder();

        // 添加默认配置
        settings = settings
            .set_default("server.addr", "127.0.0.1:4173")?
            .set_default("server.graceful_shutdown_timeout_secs", 5)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .set_default("storage.backend", "file")?
            .set_default("storage.path", "data/admin-console.json")?
            .set_default("storage.key_prefix", "admin_console")?
            .set_default("audit.capacity", DEFAULT_AUDIT_CAPACITY as i64)?
            .set_default("audit.bridge_target", "audit")?
            .set_default("auth.sign_in_path", "/login")?
            .set_default("auth.default_route", "/console/dashboard")?
            .set_default("auth.default_role", "Administrator")?
            .set_default(
                "auth.public_paths",
                vec!["/login", "/health", "/api/auth/login", "/api/theme", "/api/theme/*", "/assets/*"],
            )?;

        settings = settings.add_source(
            Environment::with_prefix("CONSOLE")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("auth.public_paths")
                .try_parsing(true),
        );

        let config: AppConfig = settings.build()?.try_deserialize()?;

        config.validate()?;

        Ok(config)
    }

    /// 验证配置合法性
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                )))
            }
        }

        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log format: {}. Must be one of: json, pretty",
                    self.logging.format
                )))
            }
        }

        match self.storage.backend.to_lowercase().as_str() {
            "memory" => {}
            "file" => {
                if self.storage.path.as_deref().map_or(true, |p| p.trim().is_empty()) {
                    return Err(ConfigError::Message(
                        "storage.path is required for the file backend".to_string(),
                    ));
                }
            }
            other => {
                return Err(ConfigError::Message(format!(
                    "Invalid storage backend: {}. Must be one of: memory, file",
                    other
                )))
            }
        }

        if self.storage.key_prefix.trim().is_empty() {
            return Err(ConfigError::Message("storage.key_prefix must not be empty".to_string()));
        }

        if self.audit.capacity < 1 || self.audit.capacity > MAX_AUDIT_CAPACITY {
            return Err(ConfigError::Message(format!(
                "audit.capacity must be between 1 and {}",
                MAX_AUDIT_CAPACITY
            )));
        }

        if self.audit.bridge_target.trim().is_empty() {
            return Err(ConfigError::Message("audit.bridge_target must not be empty".to_string()));
        }

        for (name, path) in [
            ("auth.sign_in_path", &self.auth.sign_in_path),
            ("auth.default_route", &self.auth.default_route),
        ] {
            if !path.starts_with('/') {
                return Err(ConfigError::Message(format!("{} must start with '/'", name)));
            }
        }

        Ok(())
    }
}
