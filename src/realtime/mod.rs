//! 审计事件总线
//! 生产者发布带类型的审计事件，订阅者（审计环形缓冲区等）同步接收

pub mod bridge;

pub use bridge::AuditLayer;

use crate::{error::StorageError, models::AuditEvent};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// 审计事件订阅者
pub trait AuditSink: Send + Sync {
    fn name(&self) -> &str;

    fn record(&self, event: AuditEvent) -> Result<(), StorageError>;
}

/// 审计事件总线
///
/// 发布是同步的，按发布顺序逐个投递给订阅者；对生产者而言是 fire-and-forget，
/// 投递失败只记录日志。
#[derive(Default)]
pub struct AuditBus {
    subscribers: RwLock<Vec<Arc<dyn AuditSink>>>,
    published: AtomicU64,
}

impl AuditBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册订阅者
    pub fn subscribe(&self, sink: Arc<dyn AuditSink>) {
        match self.subscribers.write() {
            Ok(mut subscribers) => {
                tracing::debug!(sink = sink.name(), "Audit sink subscribed");
                subscribers.push(sink);
            }
            Err(_) => tracing::error!(sink = sink.name(), "Audit bus lock poisoned, sink not registered"),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().map(|s| s.len()).unwrap_or(0)
    }

    /// 已成功投递过的事件数
    pub fn published_total(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// 发布事件，返回成功接收的订阅者数量
    ///
    /// 事件名或时间为空的事件直接忽略。
    pub fn publish(&self, event: AuditEvent) -> usize {
        if !event.is_well_formed() {
            tracing::debug!(event = %event.event, "Ignoring malformed audit event");
            return 0;
        }

        // 复制订阅者列表后再投递，订阅者内部可以再次发布
        let subscribers: Vec<Arc<dyn AuditSink>> = match self.subscribers.read() {
            Ok(subscribers) => subscribers.clone(),
            Err(_) => {
                tracing::error!("Audit bus lock poisoned, event dropped");
                return 0;
            }
        };

        let mut delivered = 0;
        for sink in subscribers {
            match sink.record(event.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!(
                    sink = sink.name(),
                    event = %event.event,
                    error = %e,
                    "Failed to deliver audit event"
                ),
            }
        }

        if delivered > 0 {
            self.published.fetch_add(1, Ordering::Relaxed);
        }
        delivered
    }
}
