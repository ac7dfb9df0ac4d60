//! 路由守卫
//! 每次导航都重新判断：已登录则渲染，未登录则带上原始路径跳转到登录页

use crate::{config::AuthConfig, models::SessionRecord, services::SessionService};
use std::sync::Arc;

/// 守卫判定结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// 渲染目标页面；公开页面在未登录时 user 为 `None`
    Render { user: Option<SessionRecord> },
    /// 跳转到登录页
    Redirect {
        /// 登录页地址（含 `from` 查询参数）
        location: String,
        /// 原始请求路径
        from: String,
    },
}

pub struct RouteGuard {
    session: Arc<SessionService>,
    sign_in_path: String,
    default_route: String,
    public_paths: Vec<String>,
}

impl RouteGuard {
    pub fn new(session: Arc<SessionService>, config: &AuthConfig) -> Self {
        Self {
            session,
            sign_in_path: config.sign_in_path.clone(),
            default_route: config.default_route.clone(),
            public_paths: config.public_paths.clone(),
        }
    }

    pub fn sign_in_path(&self) -> &str {
        &self.sign_in_path
    }

    pub fn default_route(&self) -> &str {
        &self.default_route
    }

    /// 公开路径：登录页本身、精确匹配项、以及 `/*` 结尾的前缀项
    pub fn is_public(&self, target: &str) -> bool {
        let path = target.split(['?', '#']).next().unwrap_or(target);

        if path == self.sign_in_path {
            return true;
        }

        self.public_paths.iter().any(|public| match public.strip_suffix("/*") {
            Some(prefix) => path == prefix || path.starts_with(&format!("{}/", prefix)),
            None => path == public,
        })
    }

    /// 判定导航目标（路径，可带查询串）
    pub fn evaluate(&self, target: &str) -> GuardDecision {
        let user = self.session.current_user();

        if user.is_some() || self.is_public(target) {
            return GuardDecision::Render { user };
        }

        tracing::debug!(target_path = %target, "Unauthenticated navigation, redirecting to sign-in");

        GuardDecision::Redirect {
            location: self.sign_in_location(target),
            from: target.to_string(),
        }
    }

    /// 登录页地址，携带原始路径
    pub fn sign_in_location(&self, from: &str) -> String {
        format!("{}?from={}", self.sign_in_path, urlencoding::encode(from))
    }

    /// 登录成功后的跳转地址
    pub fn return_location(&self, from: Option<&str>) -> String {
        resolve_return_path(from, &self.default_route, &self.sign_in_path)
    }
}

/// 解析登录后回跳地址
///
/// 只接受以单个 `/` 开头的站内相对路径，且不能回到登录页本身；否则使用默认页面。
/// 含控制字符（tab、CR、LF 等）的地址一律拒绝。
pub fn resolve_return_path(from: Option<&str>, default_route: &str, sign_in_path: &str) -> String {
    let Some(from) = from.map(str::trim).filter(|f| !f.is_empty()) else {
        return default_route.to_string();
    };

    let is_local = from.starts_with('/')
        && !from.starts_with("//")
        && !from.contains('\\')
        && !from.chars().any(char::is_control);
    let path = from.split(['?', '#']).next().unwrap_or(from);

    if !is_local || path == sign_in_path {
        return default_route.to_string();
    }

    from.to_string()
}
