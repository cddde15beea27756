//! Inactivity reaper configuration.

use serde::{Deserialize, Serialize};

/// Inactivity reaper configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaperConfig {
    /// Whether the reaper loop runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between sweeps.
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
    /// Seconds of inactivity after which a participant or session is
    /// considered abandoned.
    #[serde(default = "default_inactivity_threshold")]
    pub inactivity_threshold_seconds: u64,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: default_interval(),
            inactivity_threshold_seconds: default_inactivity_threshold(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u64 {
    // 2 hours
    7200
}

fn default_inactivity_threshold() -> u64 {
    // 15 minutes
    900
}
