//! Redis key-value store implementation.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use codepad_core::error::{AppError, ErrorKind};
use codepad_core::result::AppResult;
use codepad_core::traits::store::KeyValueStore;

use super::client::RedisClient;

/// Redis-backed key-value store.
///
/// Every command is bounded by the configured operation timeout; a timed-out
/// or failed command surfaces as a `StoreUnavailable` error. Expiries use
/// millisecond precision (`PX`/`PTTL`) because rate-limit windows are
/// specified in milliseconds.
#[derive(Debug, Clone)]
pub struct RedisStore {
    /// Redis client.
    client: RedisClient,
    /// Upper bound on any single command.
    op_timeout: Duration,
}

impl RedisStore {
    /// Create a new Redis store.
    pub fn new(client: RedisClient, op_timeout_ms: u64) -> Self {
        Self {
            client,
            op_timeout: Duration::from_millis(op_timeout_ms),
        }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::StoreUnavailable, format!("Redis error: {e}"), e)
    }

    /// Run a command future under the operation timeout.
    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, redis::RedisError>>,
    ) -> AppResult<T> {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(result) => result.map_err(Self::map_err),
            Err(_) => Err(AppError::store_unavailable(format!(
                "Redis operation timed out after {}ms",
                self.op_timeout.as_millis()
            ))),
        }
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let result: Option<String> = self.bounded(async move { conn.get(&full_key).await }).await?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let value = value.to_string();
        let ttl_millis = ttl.as_millis().max(1) as u64;

        // SET key value PX ttl
        let _: () = self
            .bounded(async move {
                redis::cmd("SET")
                    .arg(&full_key)
                    .arg(&value)
                    .arg("PX")
                    .arg(ttl_millis)
                    .query_async(&mut conn)
                    .await
            })
            .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let _: () = self.bounded(async move { conn.del(&full_key).await }).await?;
        Ok(())
    }

    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();

        // PTTL returns -2 for a missing key and -1 for a key without expiry.
        let millis: i64 = self
            .bounded(async move {
                redis::cmd("PTTL")
                    .arg(&full_key)
                    .query_async(&mut conn)
                    .await
            })
            .await?;

        if millis < 0 {
            Ok(None)
        } else {
            Ok(Some(Duration::from_millis(millis as u64)))
        }
    }

    async fn scan(&self, pattern: &str) -> AppResult<Vec<String>> {
        let full_pattern = self.client.prefixed_key(pattern);
        let mut conn = self.client.conn_mut();

        let keys: Vec<String> = self
            .bounded(async move {
                redis::cmd("KEYS")
                    .arg(&full_pattern)
                    .query_async(&mut conn)
                    .await
            })
            .await?;

        // Callers work with logical keys; strip the deployment prefix.
        let prefix = self.client.prefix();
        Ok(keys
            .into_iter()
            .filter_map(|k| k.strip_prefix(prefix).map(str::to_string))
            .collect())
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = self
            .bounded(async move { redis::cmd("PING").query_async(&mut conn).await })
            .await?;
        Ok(pong == "PONG")
    }
}
