//! Admission controller — per-key fixed-window counting over the shared store.

use std::sync::Arc;

use tracing::{debug, warn};

use codepad_core::result::AppResult;
use codepad_core::traits::store::KeyValueStore;
use codepad_store::{StoreManager, keys};

use crate::event::EventClass;
use crate::policy::{PolicyTable, RateLimitPolicy};

/// Outcome of an admission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Whether the event must be dropped or rejected.
    pub limited: bool,
    /// Rejection message for the end user, present only when limited.
    pub message: Option<String>,
}

impl Verdict {
    /// The event may proceed.
    pub fn allowed() -> Self {
        Self {
            limited: false,
            message: None,
        }
    }

    /// The event exceeded its policy.
    pub fn limited(message: impl Into<String>) -> Self {
        Self {
            limited: true,
            message: Some(message.into()),
        }
    }
}

/// Decides whether inbound events are admitted, using counters in the
/// shared key-value store.
///
/// Counters are keyed by `(event class, session, subject)` where `subject`
/// is the user id, or a connection-scoped identifier for events arriving
/// before a user id is assigned. The check-then-increment sequence is not
/// atomic; under concurrent events on the same key the effective limit can
/// be exceeded by a small margin. Admission control here is advisory, not
/// a ledger.
#[derive(Debug, Clone)]
pub struct AdmissionController {
    /// Shared key-value store.
    store: Arc<StoreManager>,
    /// Event class → policy lookup.
    policies: PolicyTable,
}

impl AdmissionController {
    /// Create a new admission controller.
    pub fn new(store: Arc<StoreManager>, policies: PolicyTable) -> Self {
        Self { store, policies }
    }

    /// Check whether an event for `(event, session_id, subject)` is admitted.
    ///
    /// Unlimited event classes are admitted without touching the store. If
    /// the store is unreachable the check **fails open**: availability of
    /// the collaboration service wins over strict enforcement during
    /// outages.
    pub async fn check(&self, event: EventClass, session_id: &str, subject: &str) -> Verdict {
        let Some(policy) = self.policies.get(event) else {
            return Verdict::allowed();
        };

        let key = keys::rate_counter(event.as_str(), session_id, subject);
        match self.count(&key, policy).await {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!(
                    %event,
                    session_id,
                    subject,
                    error = %e,
                    "Admission check failed, failing open"
                );
                Verdict::allowed()
            }
        }
    }

    /// Fixed-window counting with sliding expiry.
    ///
    /// Accepted events rewrite the counter with a full-window expiry, so a
    /// steady stream of below-limit traffic keeps its window open instead
    /// of resetting on a fixed cadence. Rejected events leave the counter
    /// untouched and the window runs out on its own.
    async fn count(&self, key: &str, policy: &RateLimitPolicy) -> AppResult<Verdict> {
        let current = self
            .store
            .get(key)
            .await?
            .and_then(|raw| raw.parse::<u32>().ok());

        match current {
            None => {
                // Fresh window.
                self.store.set(key, "1", policy.window).await?;
                Ok(Verdict::allowed())
            }
            Some(count) if count < policy.max_requests => {
                self.store
                    .set(key, &(count + 1).to_string(), policy.window)
                    .await?;
                Ok(Verdict::allowed())
            }
            Some(count) => {
                debug!(key, count, max = policy.max_requests, "Event rate limited");
                Ok(Verdict::limited(policy.message.clone()))
            }
        }
    }

    /// Delete the counters for every event class for one (session, subject)
    /// pair. Used on disconnect so a rejoin does not inherit stale counts.
    ///
    /// Cleanup is best-effort: a failed deletion is logged and the rest
    /// proceed.
    pub async fn clear(&self, session_id: &str, subject: &str) {
        for event in EventClass::ALL {
            let key = keys::rate_counter(event.as_str(), session_id, subject);
            if let Err(e) = self.store.delete(&key).await {
                warn!(
                    %event,
                    session_id,
                    subject,
                    error = %e,
                    "Failed to clear rate counter"
                );
            }
        }
    }
}
