//! Business logic services layer
//! 会话存储、审计环形缓冲区、颜色模式存储

pub mod audit_service;
pub mod session_service;
pub mod theme_service;

pub use audit_service::{AppendOutcome, AuditService};
pub use session_service::SessionService;
pub use theme_service::ThemeService;
