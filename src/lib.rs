//! # codepad
//!
//! Admission control and session lifecycle for a real-time collaborative
//! editor backend. Gateway processes embed [`CollabEngine`] and call
//! [`AdmissionController::check`] before applying any inbound event to the
//! [`SessionStore`]; the [`Reaper`] runs in the background (in-process or
//! as the standalone `codepadd` daemon) and reclaims abandoned state.
//!
//! All mutable state lives in a shared key-value store, so any number of
//! processes can run this subsystem against the same Redis instance.

use std::sync::Arc;

use codepad_core::traits::store::KeyValueStore;

pub use codepad_core::config::AppConfig;
pub use codepad_core::error::{AppError, ErrorKind};
pub use codepad_core::result::AppResult;
pub use codepad_limits::{AdmissionController, EventClass, PolicyTable, RateLimitPolicy, Verdict};
pub use codepad_reaper::{Reaper, SweepStats};
pub use codepad_session::{Participant, Session, SessionStore};
pub use codepad_store::StoreManager;

/// Fully wired subsystem: store, admission controller, session store, and
/// reaper, all built from one [`AppConfig`].
#[derive(Debug, Clone)]
pub struct CollabEngine {
    store: Arc<StoreManager>,
    admission: AdmissionController,
    sessions: Arc<SessionStore>,
    reaper: Reaper,
    config: AppConfig,
}

impl CollabEngine {
    /// Build the engine from configuration, connecting to the configured
    /// store backend. Malformed rate limit policies fail construction.
    pub async fn new(config: AppConfig) -> AppResult<Self> {
        let store = Arc::new(StoreManager::new(&config.store).await?);
        Self::with_store(config, store)
    }

    /// Build the engine around an existing store backend (for tests).
    pub fn from_backend(config: AppConfig, backend: Arc<dyn KeyValueStore>) -> AppResult<Self> {
        Self::with_store(config, Arc::new(StoreManager::from_backend(backend)))
    }

    fn with_store(config: AppConfig, store: Arc<StoreManager>) -> AppResult<Self> {
        let policies = PolicyTable::from_config(&config.limits)?;
        let admission = AdmissionController::new(Arc::clone(&store), policies);
        let sessions = Arc::new(SessionStore::new(
            Arc::clone(&store),
            config.session.clone(),
        ));
        let reaper = Reaper::new(Arc::clone(&sessions), config.reaper.clone());

        Ok(Self {
            store,
            admission,
            sessions,
            reaper,
            config,
        })
    }

    /// The admission controller.
    pub fn admission(&self) -> &AdmissionController {
        &self.admission
    }

    /// The session store.
    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// The inactivity reaper.
    pub fn reaper(&self) -> &Reaper {
        &self.reaper
    }

    /// The underlying key-value store.
    pub fn store(&self) -> &Arc<StoreManager> {
        &self.store
    }

    /// The configuration the engine was built from.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Check that the store backend is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        self.store.health_check().await
    }
}
