//! # codepad-session
//!
//! Session entities and the store-backed session lifecycle: lazy creation,
//! membership, content/language updates, activity tracking, and TTL
//! management. Sessions are ephemeral; every mutation refreshes the record's
//! expiry so abandoned state cannot outlive its grace period.

pub mod model;
pub mod store;

pub use model::{Participant, Session};
pub use store::SessionStore;
