//! Shared test helpers for integration tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use codepad::{AppConfig, CollabEngine};
use codepad_core::config::limits::PolicyOverride;
use codepad_core::error::AppError;
use codepad_core::result::AppResult;
use codepad_core::traits::store::KeyValueStore;
use codepad_store::memory::MemoryStore;

/// Engine wired to a fresh in-memory store with default configuration.
pub fn test_engine() -> CollabEngine {
    engine_with_config(AppConfig::default())
}

/// Engine wired to a fresh in-memory store with the given configuration.
pub fn engine_with_config(config: AppConfig) -> CollabEngine {
    CollabEngine::from_backend(config, Arc::new(MemoryStore::new()))
        .expect("Failed to build test engine")
}

/// Default configuration with one rate limit override, for tests that need
/// short windows.
pub fn config_with_override(class: &str, window_millis: u64, max_requests: u32) -> AppConfig {
    let mut config = AppConfig::default();
    config.limits.overrides.insert(
        class.to_string(),
        PolicyOverride {
            window_millis,
            max_requests,
            message: None,
        },
    );
    config
}

/// Store backend where every operation fails with a transport error.
#[derive(Debug)]
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> AppResult<Option<String>> {
        Err(AppError::store_unavailable("store is down"))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> AppResult<()> {
        Err(AppError::store_unavailable("store is down"))
    }

    async fn delete(&self, _key: &str) -> AppResult<()> {
        Err(AppError::store_unavailable("store is down"))
    }

    async fn ttl(&self, _key: &str) -> AppResult<Option<Duration>> {
        Err(AppError::store_unavailable("store is down"))
    }

    async fn scan(&self, _pattern: &str) -> AppResult<Vec<String>> {
        Err(AppError::store_unavailable("store is down"))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Err(AppError::store_unavailable("store is down"))
    }
}

/// Engine whose store backend rejects everything.
pub fn engine_with_failing_store() -> CollabEngine {
    CollabEngine::from_backend(AppConfig::default(), Arc::new(FailingStore))
        .expect("Failed to build test engine")
}
