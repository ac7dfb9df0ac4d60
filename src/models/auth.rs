//! Authentication-related models

use super::session::SessionRecord;
use secrecy::Secret;
use serde::{Deserialize, Serialize};

/// 登录请求
///
/// 演示控制台不校验凭据，只做邮箱格式和密码非空检查。
#[derive(Debug, Deserialize, validator::Validate)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub password: Secret<String>,
    /// 登录前被拦截的原始路径
    pub from: Option<String>,
}

/// 登录响应
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: SessionRecord,
    /// 登录成功后应跳转的位置
    pub redirect_to: String,
}
