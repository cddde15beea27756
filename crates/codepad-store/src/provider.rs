//! Store manager that dispatches to the configured backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use codepad_core::config::store::StoreConfig;
use codepad_core::error::AppError;
use codepad_core::result::AppResult;
use codepad_core::traits::store::KeyValueStore;

/// Store manager that wraps the configured key-value backend.
///
/// The backend is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct StoreManager {
    /// The inner store backend.
    inner: Arc<dyn KeyValueStore>,
}

impl StoreManager {
    /// Create a new store manager from configuration.
    pub async fn new(config: &StoreConfig) -> AppResult<Self> {
        let inner: Arc<dyn KeyValueStore> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis store backend");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                let store = crate::redis::RedisStore::new(client, config.op_timeout_ms);
                Arc::new(store)
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory store backend");
                Arc::new(crate::memory::MemoryStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown store provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a store manager from an existing backend (for testing).
    pub fn from_backend(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { inner: backend }
    }
}

#[async_trait]
impl KeyValueStore for StoreManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key).await
    }

    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        self.inner.ttl(key).await
    }

    async fn scan(&self, pattern: &str) -> AppResult<Vec<String>> {
        self.inner.scan(pattern).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
