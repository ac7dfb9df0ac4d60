//! 审计日志服务
//! 最新在前、容量有限的审计环形缓冲区，整个列表存放在一个存储键中

use crate::{
    error::StorageError,
    models::AuditEvent,
    realtime::AuditSink,
    storage::{KeyValueStorage, StorageKeys},
};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// 单次追加的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendOutcome {
    /// 追加后保留的条数
    pub retained: usize,
    /// 因超出容量被丢弃的最旧条数
    pub dropped: usize,
}

pub struct AuditService {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    capacity: usize,
    dropped_total: AtomicU64,
    // 本进程内串行化读-改-写；多个进程共享同一存储文件时仍可能丢失更新
    write_lock: Mutex<()>,
}

impl AuditService {
    pub fn new(storage: Arc<dyn KeyValueStorage>, keys: &StorageKeys, capacity: usize) -> Self {
        Self {
            storage,
            key: keys.audit_events.clone(),
            capacity: capacity.max(1),
            dropped_total: AtomicU64::new(0),
            write_lock: Mutex::new(()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 本进程启动以来因溢出丢弃的事件总数
    pub fn dropped_total(&self) -> u64 {
        self.dropped_total.load(Ordering::Relaxed)
    }

    /// 列出全部事件（最新在前）
    ///
    /// 键不存在、内容不是数组或读取失败时返回空列表；数组中无法解析的元素被跳过。
    pub fn list_events(&self) -> Vec<AuditEvent> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to read audit events");
                return Vec::new();
            }
        };

        let items = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                tracing::warn!(key = %self.key, "Stored audit events are not a list, ignoring");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Stored audit events are malformed, ignoring");
                return Vec::new();
            }
        };

        let total = items.len();
        let events: Vec<AuditEvent> = items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect();

        if events.len() < total {
            tracing::warn!(
                key = %self.key,
                skipped = total - events.len(),
                "Skipped malformed audit entries"
            );
        }

        events
    }

    /// 追加事件：插入到最前面，截断到容量，然后整体覆盖写回
    pub fn append(&self, event: AuditEvent) -> Result<AppendOutcome, StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;

        let mut events = self.list_events();
        events.insert(0, event);

        let dropped = events.len().saturating_sub(self.capacity);
        events.truncate(self.capacity);

        let raw = serde_json::to_string(&events)?;
        self.storage.set(&self.key, &raw)?;

        metrics::counter!("audit_events_appended_total").increment(1);
        if dropped > 0 {
            self.dropped_total.fetch_add(dropped as u64, Ordering::Relaxed);
            metrics::counter!("audit_events_dropped_total").increment(dropped as u64);
            tracing::debug!(
                dropped = dropped,
                capacity = self.capacity,
                "Audit log full, oldest entries dropped"
            );
        }

        Ok(AppendOutcome {
            retained: events.len(),
            dropped,
        })
    }

    /// 清空全部事件
    pub fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        self.storage.remove(&self.key)?;

        tracing::info!("Audit log cleared");
        Ok(())
    }
}

impl AuditSink for AuditService {
    fn name(&self) -> &str {
        "audit_log"
    }

    fn record(&self, event: AuditEvent) -> Result<(), StorageError> {
        self.append(event).map(|_| ())
    }
}
