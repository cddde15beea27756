//! Key-value store configuration.

use serde::{Deserialize, Serialize};

/// Top-level store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store provider type: `"memory"` or `"redis"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Upper bound on any single store operation, in milliseconds.
    #[serde(default = "default_op_timeout")]
    pub op_timeout_ms: u64,
    /// Redis-specific store configuration.
    #[serde(default)]
    pub redis: RedisStoreConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            op_timeout_ms: default_op_timeout(),
            redis: RedisStoreConfig::default(),
        }
    }
}

/// Redis store backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisStoreConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Key prefix for all Codepad store keys.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_op_timeout() -> u64 {
    2000
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_key_prefix() -> String {
    "codepad:".to_string()
}
