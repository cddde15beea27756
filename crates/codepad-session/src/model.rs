//! Session and participant entity models.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Presentation colors assigned to participants at join time.
const COLOR_PALETTE: &[&str] = &[
    "#e06c75", "#61afef", "#98c379", "#c678dd", "#d19a66", "#56b6c2", "#e5c07b", "#abb2bf",
];

/// A user participating in a collaboration session.
///
/// Owned exclusively by its [`Session`]; participant records are never
/// shared across sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    /// Opaque unique identifier, stable for the connection's lifetime.
    pub id: Uuid,
    /// Display name, unique within the session (case-sensitive).
    pub username: String,
    /// Presentation color, assigned randomly at join.
    pub color: String,
    /// Last accepted mutating event from this user.
    pub last_active: DateTime<Utc>,
    /// Back-reference to the owning session.
    pub session_id: String,
}

impl Participant {
    /// Create a new participant with a fresh id and a random color.
    pub fn new(session_id: &str, username: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            color: random_color(),
            last_active: Utc::now(),
            session_id: session_id.to_string(),
        }
    }

    /// Seconds since this participant's last accepted event.
    pub fn idle_seconds(&self) -> i64 {
        (Utc::now() - self.last_active).num_seconds().max(0)
    }
}

/// An ephemeral collaboration session.
///
/// The participant collection is serialized as a flat list of records (not
/// a native map) so it round-trips through string-payload stores; by-id
/// access goes through [`Session::participant`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque identifier, caller-supplied (e.g., derived from a room token).
    pub id: String,
    /// Latest document payload. Opaque to this subsystem; last write wins.
    pub content: String,
    /// Language tag, opaque to this subsystem.
    pub language: String,
    /// Current participants.
    pub users: Vec<Participant>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// Last mutation to the session or any of its participants.
    pub last_active: DateTime<Utc>,
}

impl Session {
    /// Create a new session with the given defaults and no participants.
    pub fn new(id: &str, content: &str, language: &str) -> Self {
        let now = Utc::now();
        Self {
            id: id.to_string(),
            content: content.to_string(),
            language: language.to_string(),
            users: Vec::new(),
            created_at: now,
            last_active: now,
        }
    }

    /// Look up a participant by id.
    pub fn participant(&self, user_id: Uuid) -> Option<&Participant> {
        self.users.iter().find(|u| u.id == user_id)
    }

    /// Look up a participant by id, mutably.
    pub fn participant_mut(&mut self, user_id: Uuid) -> Option<&mut Participant> {
        self.users.iter_mut().find(|u| u.id == user_id)
    }

    /// Whether a username is already taken in this session.
    pub fn has_username(&self, username: &str) -> bool {
        self.users.iter().any(|u| u.username == username)
    }

    /// Remove a participant. Returns whether one was removed.
    pub fn remove_participant(&mut self, user_id: Uuid) -> bool {
        let before = self.users.len();
        self.users.retain(|u| u.id != user_id);
        self.users.len() < before
    }

    /// Whether the session has no participants.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Record a mutation.
    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    /// Seconds since the last mutation.
    pub fn idle_seconds(&self) -> i64 {
        (Utc::now() - self.last_active).num_seconds().max(0)
    }
}

/// Pick a random color from the palette.
fn random_color() -> String {
    let idx = rand::thread_rng().gen_range(0..COLOR_PALETTE.len());
    COLOR_PALETTE[idx].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_lookup_is_case_sensitive() {
        let mut session = Session::new("room-1", "", "plaintext");
        session.users.push(Participant::new("room-1", "Alice"));
        assert!(session.has_username("Alice"));
        assert!(!session.has_username("alice"));
    }

    #[test]
    fn test_remove_participant() {
        let mut session = Session::new("room-1", "", "plaintext");
        let user = Participant::new("room-1", "alice");
        let id = user.id;
        session.users.push(user);

        assert!(session.remove_participant(id));
        assert!(session.is_empty());
        // Second removal is a no-op.
        assert!(!session.remove_participant(id));
    }

    #[test]
    fn test_new_participant_gets_palette_color() {
        let user = Participant::new("room-1", "alice");
        assert!(COLOR_PALETTE.contains(&user.color.as_str()));
    }

    #[test]
    fn test_serialized_users_are_a_flat_list() {
        let mut session = Session::new("room-1", "", "plaintext");
        session.users.push(Participant::new("room-1", "alice"));

        let json = serde_json::to_value(&session).unwrap();
        assert!(json["users"].is_array());
        assert_eq!(json["users"][0]["username"], "alice");
    }
}
