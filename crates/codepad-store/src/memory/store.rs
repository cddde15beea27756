//! In-memory store implementation with per-entry expiry.
//!
//! Backs tests and single-node development. Entries carry their own
//! deadline and are dropped lazily on access, so TTL behavior matches the
//! Redis backend closely enough to exercise expiry-dependent logic.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use codepad_core::result::AppResult;
use codepad_core::traits::store::KeyValueStore;

/// A stored value with its expiry deadline.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at <= now
    }
}

/// In-memory key-value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, Entry>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Drop every expired entry. Called opportunistically before scans.
    fn purge_expired(&self) {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| entry.value().is_expired(now))
            .map(|entry| entry.key().clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
        }

        if !expired.is_empty() {
            debug!(count = expired.len(), "Purged expired entries");
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(Instant::now()) {
                return Ok(Some(entry.value.clone()));
            }
        }
        // Expired entries are removed on first read past the deadline.
        self.entries
            .remove_if(key, |_, entry| entry.is_expired(Instant::now()));
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        let now = Instant::now();
        Ok(self
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.expires_at - now))
    }

    async fn scan(&self, pattern: &str) -> AppResult<Vec<String>> {
        self.purge_expired();

        // Glob support is limited to a trailing `*`, which is all the
        // subsystem's key families need.
        let prefix = pattern.trim_end_matches('*');
        Ok(self
            .entries
            .iter()
            .map(|entry| entry.key().clone())
            .filter(|key| key.starts_with(prefix))
            .collect())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
