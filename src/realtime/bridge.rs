//! 诊断日志到审计日志的桥接
//!
//! `AuditLayer` 挂在 tracing subscriber 上：target 等于保留标记（默认 `audit`）
//! 且带有非空 `event`、`at` 字段的日志事件会被转换为 [`AuditEvent`] 发布到总线。
//! 原始日志事件照常交给其他 layer 输出。
//!
//! ```ignore
//! tracing::info!(target: "audit", event = "zone.update", at = %now, zone = "north", "Zone updated");
//! ```

use super::AuditBus;
use crate::models::AuditEvent;
use serde_json::{Map, Number, Value};
use std::fmt;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

pub struct AuditLayer {
    target: String,
    bus: Arc<AuditBus>,
}

impl AuditLayer {
    pub fn new(target: impl Into<String>, bus: Arc<AuditBus>) -> Self {
        Self {
            target: target.into(),
            bus,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

impl<S> Layer<S> for AuditLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() != self.target {
            return;
        }

        let mut visitor = AuditFieldVisitor::default();
        event.record(&mut visitor);

        // 缺少 event/at 的标记日志不构成审计记录，静默忽略
        if let Some(audit_event) = visitor.into_event() {
            self.bus.publish(audit_event);
        }
    }
}

#[derive(Default)]
struct AuditFieldVisitor {
    event: Option<String>,
    at: Option<String>,
    actor: Option<String>,
    extra: Map<String, Value>,
}

impl AuditFieldVisitor {
    fn into_event(self) -> Option<AuditEvent> {
        let event = self.event.filter(|e| !e.trim().is_empty())?;
        let at = self.at.filter(|a| !a.trim().is_empty())?;

        Some(AuditEvent {
            event,
            at,
            actor: self.actor,
            extra: self.extra,
        })
    }

    fn record_value(&mut self, field: &Field, value: Value) {
        match field.name() {
            "message" => {}
            "event" | "at" | "actor" => {
                let text = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                match field.name() {
                    "event" => self.event = Some(text),
                    "at" => self.at = Some(text),
                    _ => self.actor = Some(text),
                }
            }
            name => {
                self.extra.insert(name.to_string(), value);
            }
        }
    }
}

impl Visit for AuditFieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_value(field, Value::String(value.to_string()));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_value(field, Value::Number(value.into()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_value(field, Value::Number(value.into()));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        let value = Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null);
        self.record_value(field, value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record_value(field, Value::Bool(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_value(field, Value::String(format!("{:?}", value)));
    }
}
