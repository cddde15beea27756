//! Rate limit configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-event-class rate limit overrides.
///
/// Keys are event class names in snake_case (`join`, `content_change`,
/// `cursor_move`, `selection_change`, `typing_status`, `sync_request`).
/// Classes without an override use the built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Event class name → policy override.
    #[serde(default)]
    pub overrides: HashMap<String, PolicyOverride>,
}

/// Override for a single event class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyOverride {
    /// Window length in milliseconds. Must be greater than zero.
    pub window_millis: u64,
    /// Maximum accepted events per window. Must be greater than zero.
    pub max_requests: u32,
    /// Human-readable rejection message. Falls back to the built-in
    /// message for the class when omitted.
    #[serde(default)]
    pub message: Option<String>,
}
