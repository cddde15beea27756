//! Store key builders for all Codepad entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the subsystem uses. These are logical keys; the
//! Redis backend applies the configured deployment prefix on top.

// ── Session keys ───────────────────────────────────────────

/// Store key for a session record.
pub fn session(session_id: &str) -> String {
    format!("session:{session_id}")
}

/// Pattern matching every session record.
pub fn session_pattern() -> String {
    "session:*".to_string()
}

/// Extract the session id from a session record key.
pub fn session_id_from_key(key: &str) -> Option<&str> {
    key.strip_prefix("session:")
}

// ── Rate limit keys ────────────────────────────────────────

/// Store key for a rate-limit counter.
///
/// `subject` is the user id once one is assigned, or a connection-scoped
/// identifier for pre-join events.
pub fn rate_counter(event_class: &str, session_id: &str, subject: &str) -> String {
    format!("rate:{event_class}:{session_id}:{subject}")
}
