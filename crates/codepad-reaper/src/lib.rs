//! # codepad-reaper
//!
//! Recurring background sweep that prunes inactive participants and deletes
//! abandoned sessions. Deliberately redundant with store TTLs: the TTL is
//! the backstop against leaks if no sweep runs, while the sweep is the
//! backstop against sessions kept alive by TTL refreshes from a user who
//! has gone silent without disconnecting.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tracing::{debug, info, warn};

use codepad_core::config::reaper::ReaperConfig;
use codepad_core::result::AppResult;
use codepad_session::SessionStore;

/// Counters summarizing one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Sessions enumerated from the store.
    pub sessions_scanned: usize,
    /// Participants pruned for inactivity.
    pub users_pruned: usize,
    /// Sessions deleted outright (empty or idle past the threshold).
    pub sessions_deleted: usize,
    /// Sessions that could not be processed.
    pub errors: usize,
}

/// Background task that reclaims inactive sessions and participants.
#[derive(Debug, Clone)]
pub struct Reaper {
    /// Session lifecycle operations.
    sessions: Arc<SessionStore>,
    /// Reaper configuration.
    config: ReaperConfig,
}

impl Reaper {
    /// Create a new reaper.
    pub fn new(sessions: Arc<SessionStore>, config: ReaperConfig) -> Self {
        Self { sessions, config }
    }

    /// Run sweeps on the configured interval until the cancel signal flips.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        let interval = Duration::from_secs(self.config.interval_seconds);
        info!(
            interval_seconds = self.config.interval_seconds,
            inactivity_threshold_seconds = self.config.inactivity_threshold_seconds,
            "Reaper started"
        );

        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        info!("Reaper received shutdown signal");
                        break;
                    }
                }
                _ = time::sleep(interval) => {
                    match self.sweep().await {
                        Ok(stats) => {
                            if stats.users_pruned > 0 || stats.sessions_deleted > 0 {
                                info!(
                                    sessions_scanned = stats.sessions_scanned,
                                    users_pruned = stats.users_pruned,
                                    sessions_deleted = stats.sessions_deleted,
                                    errors = stats.errors,
                                    "Reaper sweep complete"
                                );
                            }
                        }
                        Err(e) => warn!(error = %e, "Reaper sweep failed to enumerate sessions"),
                    }
                }
            }
        }

        info!("Reaper shut down");
    }

    /// Run one sweep over every session in the store.
    ///
    /// Processing is best-effort per session: a failure on one session is
    /// logged and counted, and the sweep moves on to the rest. Only a
    /// failure to enumerate sessions at all aborts the sweep.
    pub async fn sweep(&self) -> AppResult<SweepStats> {
        let session_ids = self.sessions.session_ids().await?;

        let mut stats = SweepStats {
            sessions_scanned: session_ids.len(),
            ..SweepStats::default()
        };

        for session_id in &session_ids {
            match self.sweep_session(session_id).await {
                Ok((pruned, deleted)) => {
                    stats.users_pruned += pruned;
                    if deleted {
                        stats.sessions_deleted += 1;
                    }
                }
                Err(e) => {
                    stats.errors += 1;
                    warn!(session_id, error = %e, "Failed to sweep session");
                }
            }
        }

        Ok(stats)
    }

    /// Sweep one session. Returns (participants pruned, session deleted).
    async fn sweep_session(&self, session_id: &str) -> AppResult<(usize, bool)> {
        let Some(mut session) = self.sessions.load(session_id).await? else {
            // Expired between scan and load.
            return Ok((0, false));
        };

        let threshold = self.config.inactivity_threshold_seconds as i64;

        // Session-level inactivity is judged on the timestamp as loaded,
        // before any pruning refreshes it.
        let session_idle = session.idle_seconds();

        let before = session.users.len();
        session.users.retain(|user| {
            let idle = user.idle_seconds();
            if idle > threshold {
                debug!(
                    session_id,
                    user_id = %user.id,
                    username = %user.username,
                    idle_seconds = idle,
                    "Pruning inactive participant"
                );
                false
            } else {
                true
            }
        });
        let pruned = before - session.users.len();

        if session_idle > threshold || session.is_empty() {
            self.sessions.delete(session_id).await?;
            debug!(
                session_id,
                idle_seconds = session_idle,
                "Deleted inactive session"
            );
            return Ok((pruned, true));
        }

        if pruned > 0 {
            session.touch();
            self.sessions.persist(&session).await?;
        }

        Ok((pruned, false))
    }
}
