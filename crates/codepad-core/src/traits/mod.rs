//! Trait definitions shared across Codepad crates.

pub mod store;

pub use store::KeyValueStore;
