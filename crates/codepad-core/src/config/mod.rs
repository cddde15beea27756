//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Everything is read once at startup; nothing is hot-reloaded.

pub mod limits;
pub mod logging;
pub mod reaper;
pub mod session;
pub mod store;

use serde::{Deserialize, Serialize};

use self::limits::LimitsConfig;
use self::logging::LoggingConfig;
use self::reaper::ReaperConfig;
use self::session::SessionConfig;
use self::store::StoreConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Shared key-value store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Session lifecycle settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Per-event-class rate limit overrides.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Inactivity reaper settings.
    #[serde(default)]
    pub reaper: ReaperConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `CODEPAD__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("CODEPAD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
