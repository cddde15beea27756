//! Store-backed session lifecycle operations.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use uuid::Uuid;

use codepad_core::config::session::SessionConfig;
use codepad_core::error::AppError;
use codepad_core::result::AppResult;
use codepad_core::traits::store::KeyValueStore;
use codepad_store::{StoreManager, keys};

use crate::model::{Participant, Session};

/// CRUD and membership operations over sessions in the shared store.
///
/// Every operation is a read-modify-write against the store; concurrent
/// writers on the same session resolve last-writer-wins. No session state
/// is cached in-process — every read goes to the store, so all worker
/// processes observe the same truth. Mutations always refresh the record's
/// TTL (full-length while participants remain, the short grace period once
/// the session is empty); the TTL is what keeps orphaned records from
/// leaking.
#[derive(Debug, Clone)]
pub struct SessionStore {
    /// Shared key-value store.
    store: Arc<StoreManager>,
    /// Session lifecycle configuration.
    config: SessionConfig,
}

impl SessionStore {
    /// Create a new session store.
    pub fn new(store: Arc<StoreManager>, config: SessionConfig) -> Self {
        Self { store, config }
    }

    /// Fetch a session, or lazily create it with configured defaults.
    pub async fn get_or_create(&self, session_id: &str) -> AppResult<Session> {
        if let Some(session) = self.load(session_id).await? {
            return Ok(session);
        }

        let session = Session::new(
            session_id,
            &self.config.default_content,
            &self.config.default_language,
        );
        self.persist(&session).await?;
        debug!(session_id, "Created session");
        Ok(session)
    }

    /// Fetch a session if it exists.
    pub async fn load(&self, session_id: &str) -> AppResult<Option<Session>> {
        self.store.get_json(&keys::session(session_id)).await
    }

    /// Add a user to a session, creating the session if needed.
    ///
    /// Fails with `DuplicateUsername` if the name is taken and with
    /// `SessionFull` once the configured participant limit is reached.
    pub async fn add_user(&self, session_id: &str, username: &str) -> AppResult<Participant> {
        let mut session = self.get_or_create(session_id).await?;

        if session.has_username(username) {
            return Err(AppError::duplicate_username(format!(
                "Username '{username}' is already taken in session '{session_id}'"
            )));
        }
        if session.users.len() >= self.config.max_users_per_session {
            return Err(AppError::session_full(format!(
                "Session '{session_id}' already has {} participants",
                session.users.len()
            )));
        }

        let participant = Participant::new(session_id, username);
        session.users.push(participant.clone());
        session.touch();
        self.persist(&session).await?;

        debug!(session_id, username, user_id = %participant.id, "User joined session");
        Ok(participant)
    }

    /// Remove a user from a session.
    ///
    /// A missing session or participant is a no-op, not an error. When the
    /// last participant leaves, the session is kept with the shortened
    /// empty-session TTL so a quick rejoin does not lose its state.
    pub async fn remove_user(&self, session_id: &str, user_id: Uuid) -> AppResult<()> {
        let Some(mut session) = self.load(session_id).await? else {
            return Ok(());
        };
        if !session.remove_participant(user_id) {
            return Ok(());
        }

        session.touch();
        self.persist(&session).await?;

        debug!(
            session_id,
            %user_id,
            remaining = session.users.len(),
            "User left session"
        );
        Ok(())
    }

    /// Overwrite the session's document payload. Last write wins.
    pub async fn update_content(&self, session_id: &str, content: &str) -> AppResult<()> {
        let mut session = self.get_or_create(session_id).await?;
        session.content = content.to_string();
        session.touch();
        self.persist(&session).await
    }

    /// Overwrite the session's language tag.
    pub async fn update_language(&self, session_id: &str, language: &str) -> AppResult<()> {
        let mut session = self.get_or_create(session_id).await?;
        session.language = language.to_string();
        session.touch();
        self.persist(&session).await
    }

    /// Replace a participant's record, only if they are currently a member.
    ///
    /// Silently no-ops for unknown sessions or participants so a late
    /// update can never resurrect a removed user. The participant's id and
    /// session back-reference are preserved regardless of the incoming
    /// record. Renaming onto another member's username fails with
    /// `DuplicateUsername`, same as `add_user`.
    pub async fn update_user(
        &self,
        session_id: &str,
        user_id: Uuid,
        update: Participant,
    ) -> AppResult<()> {
        let Some(mut session) = self.load(session_id).await? else {
            return Ok(());
        };
        let Some(idx) = session.users.iter().position(|u| u.id == user_id) else {
            debug!(session_id, %user_id, "Ignoring update for unknown participant");
            return Ok(());
        };
        if session
            .users
            .iter()
            .any(|u| u.id != user_id && u.username == update.username)
        {
            return Err(AppError::duplicate_username(format!(
                "Username '{}' is already taken in session '{session_id}'",
                update.username
            )));
        }

        let existing = &mut session.users[idx];
        existing.username = update.username;
        existing.color = update.color;
        existing.last_active = update.last_active;

        session.touch();
        self.persist(&session).await
    }

    /// Persist a session with the TTL its membership state calls for.
    pub async fn persist(&self, session: &Session) -> AppResult<()> {
        let ttl = if session.is_empty() {
            Duration::from_secs(self.config.empty_session_ttl_seconds)
        } else {
            Duration::from_secs(self.config.session_ttl_seconds)
        };
        self.store
            .set_json(&keys::session(&session.id), session, ttl)
            .await
    }

    /// Delete a session outright.
    pub async fn delete(&self, session_id: &str) -> AppResult<()> {
        self.store.delete(&keys::session(session_id)).await
    }

    /// Enumerate the ids of every session currently in the store.
    pub async fn session_ids(&self) -> AppResult<Vec<String>> {
        let session_keys = self.store.scan(&keys::session_pattern()).await?;
        Ok(session_keys
            .iter()
            .filter_map(|key| keys::session_id_from_key(key).map(str::to_string))
            .collect())
    }

    /// Remaining store TTL of a session record (for diagnostics and tests).
    pub async fn remaining_ttl(&self, session_id: &str) -> AppResult<Option<Duration>> {
        self.store.ttl(&keys::session(session_id)).await
    }
}
