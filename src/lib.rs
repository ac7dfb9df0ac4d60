//! 管理控制台库
//! 会话存储、审计环形缓冲区、颜色模式存储以及控制台外壳

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod realtime;
pub mod routes;
pub mod services;
pub mod storage;
pub mod telemetry;
