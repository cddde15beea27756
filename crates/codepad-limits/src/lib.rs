//! # codepad-limits
//!
//! Per-event-class admission control backed by the shared key-value store.
//! A [`PolicyTable`] maps event classes to fixed-window counting policies;
//! the [`AdmissionController`] applies them to inbound events before they
//! are allowed to touch session state.

pub mod admission;
pub mod event;
pub mod policy;

pub use admission::{AdmissionController, Verdict};
pub use event::EventClass;
pub use policy::{PolicyTable, RateLimitPolicy};
