//! 会话记录模型

use serde::{Deserialize, Serialize};

/// 当前登录管理员的展示身份
///
/// 存储格式为 `{ "name", "email", "role" }`，三个字段缺一即视为没有会话。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub name: String,
    pub email: String,
    pub role: String,
}

impl SessionRecord {
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role: role.into(),
        }
    }

    /// 根据登录邮箱伪造会话记录：显示名取邮箱 @ 前的部分
    pub fn fabricate(email: &str, role: &str) -> Self {
        let name = email
            .split('@')
            .next()
            .filter(|local| !local.is_empty())
            .unwrap_or(email);

        Self::new(name, email, role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fabricate_uses_local_part() {
        let record = SessionRecord::fabricate("ops.lead@example.com", "Administrator");
        assert_eq!(record.name, "ops.lead");
        assert_eq!(record.email, "ops.lead@example.com");
        assert_eq!(record.role, "Administrator");
    }

    #[test]
    fn test_decode_rejects_partial_record() {
        let partial = r#"{"name":"Ada","email":"ada@example.com"}"#;
        assert!(serde_json::from_str::<SessionRecord>(partial).is_err());

        let full = r#"{"name":"Ada","email":"ada@example.com","role":"Admin"}"#;
        let record: SessionRecord = serde_json::from_str(full).unwrap();
        assert_eq!(record, SessionRecord::new("Ada", "ada@example.com", "Admin"));
    }
}
