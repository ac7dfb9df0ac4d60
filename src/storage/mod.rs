//! 本地键值存储层
//! 会话、审计、主题三个存储共用的同步 get/set/remove 接口

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::{config::StorageConfig, error::StorageError};
use std::sync::Arc;

/// 同步本地键值存储
///
/// 所有方法都在调用线程内完成，不做异步 IO。
pub trait KeyValueStorage: Send + Sync {
    /// 读取键值，键不存在时返回 `None`
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// 写入键值，覆盖已有内容
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// 删除键，键不存在时不报错
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// 存储键名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub session: String,
    pub audit_events: String,
    pub color_mode: String,
}

impl StorageKeys {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            session: format!("{}.session", prefix),
            audit_events: format!("{}.audit_events", prefix),
            color_mode: format!("{}.color_mode", prefix),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix("admin_console")
    }
}

/// 根据配置创建存储后端
pub fn open_storage(config: &StorageConfig) -> Result<Arc<dyn KeyValueStorage>, StorageError> {
    match config.backend.to_lowercase().as_str() {
        "file" => {
            // 配置校验已保证 file 后端必有路径
            let path = config.path.clone().unwrap_or_else(|| "admin-console.json".to_string());
            Ok(Arc::new(FileStorage::open(path)?))
        }
        _ => Ok(Arc::new(MemoryStorage::new())),
    }
}
