//! Session lifecycle configuration.

use serde::{Deserialize, Serialize};

/// Session lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum number of participants a session may hold.
    #[serde(default = "default_max_users")]
    pub max_users_per_session: usize,
    /// Store TTL for a session with at least one participant, in seconds.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_seconds: u64,
    /// Store TTL for a session whose participant set is empty, in seconds.
    ///
    /// An emptied session keeps its content around for this grace period so
    /// a quick rejoin does not lose state.
    #[serde(default = "default_empty_session_ttl")]
    pub empty_session_ttl_seconds: u64,
    /// Document payload assigned to newly created sessions.
    #[serde(default)]
    pub default_content: String,
    /// Language tag assigned to newly created sessions.
    #[serde(default = "default_language")]
    pub default_language: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_users_per_session: default_max_users(),
            session_ttl_seconds: default_session_ttl(),
            empty_session_ttl_seconds: default_empty_session_ttl(),
            default_content: String::new(),
            default_language: default_language(),
        }
    }
}

fn default_max_users() -> usize {
    5
}

fn default_session_ttl() -> u64 {
    // 4 hours
    14400
}

fn default_empty_session_ttl() -> u64 {
    // 1 hour
    3600
}

fn default_language() -> String {
    "plaintext".to_string()
}
