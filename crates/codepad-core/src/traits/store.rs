//! Key-value store trait for pluggable storage backends.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for the shared key-value store (Redis or in-memory).
///
/// All values are serialized as strings (JSON). The adapter carries no
/// business logic and no retry policy: transport failures surface as
/// `StoreUnavailable` errors and callers decide what to do with them.
/// Every operation must be bounded by a timeout in the implementation.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value with an expiry. Millisecond precision is honored.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Delete a key from the store.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Remaining time-to-live of a key.
    ///
    /// Returns `None` when the key is absent or carries no expiry.
    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>>;

    /// List all keys matching a glob-style pattern (e.g., `"session:*"`).
    async fn scan(&self, pattern: &str) -> AppResult<Vec<String>>;

    /// Check that the store backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Get a typed value by deserializing from JSON.
    async fn get_json<T: serde::de::DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> AppResult<Option<T>>
    where
        Self: Sized,
    {
        match self.get(key).await? {
            Some(value) => {
                let parsed = serde_json::from_str(&value)?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Set a typed value by serializing to JSON.
    async fn set_json<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()>
    where
        Self: Sized,
    {
        let json = serde_json::to_string(value)?;
        self.set(key, &json, ttl).await
    }
}
