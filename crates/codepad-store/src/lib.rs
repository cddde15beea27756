//! # codepad-store
//!
//! Key-value store adapters for Codepad. Supports two backends:
//!
//! - **memory**: In-process store with per-entry expiry, for tests and
//!   single-node development
//! - **redis**: Shared store using the [redis](https://crates.io/crates/redis)
//!   crate, for multi-process deployments
//!
//! The backend is selected at runtime based on configuration. The adapter
//! owns no domain semantics; sessions and rate-limit counters serialize
//! into and out of it.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::StoreManager;
