//! 测试公共模块
//! 提供测试配置、内存存储上的应用状态和请求辅助函数

#![allow(dead_code)]

use admin_console::{
    config::{AppConfig, AuditConfig, AuthConfig, LoggingConfig, ServerConfig, StorageConfig},
    error::StorageError,
    middleware::AppState,
    realtime::AuditBus,
    storage::{KeyValueStorage, MemoryStorage},
};
use axum::{
    body::Body,
    http::{header, Request, Response},
};
use http_body_util::BodyExt;
use std::sync::Arc;

/// 创建测试配置
pub fn create_test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(),
            graceful_shutdown_timeout_secs: 1,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        storage: StorageConfig {
            backend: "memory".to_string(),
            path: None,
            key_prefix: "admin_console".to_string(),
        },
        audit: AuditConfig {
            capacity: 500,
            bridge_target: "audit".to_string(),
        },
        auth: AuthConfig {
            sign_in_path: "/login".to_string(),
            default_route: "/console/dashboard".to_string(),
            default_role: "Administrator".to_string(),
            public_paths: vec![
                "/login".to_string(),
                "/health".to_string(),
                "/api/auth/login".to_string(),
                "/api/theme/*".to_string(),
            ],
        },
    }
}

/// 在内存存储上创建应用状态
pub fn create_test_state() -> (Arc<MemoryStorage>, Arc<AppState>) {
    create_test_state_with(create_test_config())
}

pub fn create_test_state_with(config: AppConfig) -> (Arc<MemoryStorage>, Arc<AppState>) {
    let storage = Arc::new(MemoryStorage::new());
    let shared: Arc<dyn KeyValueStorage> = storage.clone();
    let state = Arc::new(AppState::build(config, shared, Arc::new(AuditBus::new())));
    (storage, state)
}

/// 所有读写都失败的存储
pub struct FailingStorage;

impl KeyValueStorage for FailingStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Poisoned)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Poisoned)
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Poisoned)
    }
}

/// 在总是失败的存储上创建应用状态
pub fn create_failing_state() -> Arc<AppState> {
    let storage: Arc<dyn KeyValueStorage> = Arc::new(FailingStorage);
    Arc::new(AppState::build(
        create_test_config(),
        storage,
        Arc::new(AuditBus::new()),
    ))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
