//! 审计事件模型

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 审计事件中由固定字段占用的键名，不能出现在 extra 中
pub const RESERVED_FIELDS: [&str; 3] = ["event", "at", "actor"];

/// 一条管理操作审计记录
///
/// 持久化格式为扁平对象 `{ event, at, actor?, ...extra }`，`extra` 在写入时展开、
/// 读取时收集。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// 事件名，例如 `auth.sign_in`
    pub event: String,
    /// 发生时间（RFC 3339 文本）
    pub at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    /// 与具体操作相关的附加字段（模块名、目标 ID 等）
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AuditEvent {
    /// 以当前时间创建事件
    pub fn new(event: impl Into<String>) -> Self {
        Self::new_at(event, Utc::now())
    }

    pub fn new_at(event: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            event: event.into(),
            at: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            actor: None,
            extra: Map::new(),
        }
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// 添加附加字段，保留字段名会被忽略
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if RESERVED_FIELDS.contains(&key.as_str()) {
            tracing::debug!(field = %key, "Ignoring reserved audit field in extra data");
            return self;
        }
        self.extra.insert(key, value.into());
        self
    }

    /// 事件名和时间都非空
    pub fn is_well_formed(&self) -> bool {
        !self.event.trim().is_empty() && !self.at.trim().is_empty()
    }
}

/// 审计操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    SignIn,
    SignOut,
    ThemeChange,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::SignIn => "auth.sign_in",
            AuditAction::SignOut => "auth.sign_out",
            AuditAction::ThemeChange => "theme.change",
        }
    }

    /// 以当前时间创建该操作的事件
    pub fn event(&self) -> AuditEvent {
        AuditEvent::new(self.as_str())
    }
}

/// 审计日志查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    /// 按事件名过滤
    pub event: Option<String>,
    /// 按操作人过滤
    pub actor: Option<String>,
    /// 最多返回条数
    pub limit: Option<usize>,
}

impl AuditQuery {
    pub fn matches(&self, entry: &AuditEvent) -> bool {
        if let Some(ref event) = self.event {
            if &entry.event != event {
                return false;
            }
        }

        if let Some(ref actor) = self.actor {
            if entry.actor.as_ref() != Some(actor) {
                return false;
            }
        }

        true
    }

    /// 过滤并截断，保持原有（最新在前）顺序
    pub fn apply(&self, events: Vec<AuditEvent>) -> Vec<AuditEvent> {
        let limit = self.limit.unwrap_or(usize::MAX);
        events
            .into_iter()
            .filter(|e| self.matches(e))
            .take(limit)
            .collect()
    }
}
