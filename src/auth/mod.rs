//! Authentication and route guarding module

pub mod guard;
pub mod middleware;

pub use guard::{resolve_return_path, GuardDecision, RouteGuard};
pub use middleware::{route_guard_middleware, AuthContext};
