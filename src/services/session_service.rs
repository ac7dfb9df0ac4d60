//! 会话存储
//! 以本地存储为唯一事实来源，记录当前登录的管理员

use crate::{
    error::StorageError,
    models::SessionRecord,
    storage::{KeyValueStorage, StorageKeys},
};
use std::sync::Arc;

pub struct SessionService {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl SessionService {
    pub fn new(storage: Arc<dyn KeyValueStorage>, keys: &StorageKeys) -> Self {
        Self {
            storage,
            key: keys.session.clone(),
        }
    }

    /// 当前登录用户
    ///
    /// 键不存在、内容无法解析或存储读取失败都返回 `None`。
    pub fn current_user(&self) -> Option<SessionRecord> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to read session, treating as signed out");
                return None;
            }
        };

        match serde_json::from_str::<SessionRecord>(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Stored session is malformed, treating as signed out");
                None
            }
        }
    }

    /// 登录：覆盖写入会话记录，不校验字段内容
    pub fn sign_in(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let raw = serde_json::to_string(record)?;
        self.storage.set(&self.key, &raw)?;

        tracing::info!(email = %record.email, role = %record.role, "Session started");
        Ok(())
    }

    /// 登出：删除会话键，没有会话时同样成功
    pub fn sign_out(&self) -> Result<(), StorageError> {
        self.storage.remove(&self.key)?;

        tracing::info!("Session cleared");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }
}
