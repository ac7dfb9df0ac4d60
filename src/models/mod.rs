//! 数据模型模块
//! 会话记录、审计事件、颜色模式以及登录请求

pub mod audit;
pub mod auth;
pub mod session;
pub mod theme;

pub use audit::{AuditAction, AuditEvent, AuditQuery};
pub use auth::{LoginRequest, LoginResponse};
pub use session::SessionRecord;
pub use theme::ColorMode;
