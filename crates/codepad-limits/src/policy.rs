//! Rate limit policy table.

use std::collections::HashMap;
use std::time::Duration;

use codepad_core::config::limits::LimitsConfig;
use codepad_core::error::AppError;
use codepad_core::result::AppResult;

use crate::event::EventClass;

/// Fixed-window counting policy for one event class.
#[derive(Debug, Clone)]
pub struct RateLimitPolicy {
    /// Window length.
    pub window: Duration,
    /// Maximum accepted events per window.
    pub max_requests: u32,
    /// Human-readable rejection message surfaced to the end user.
    pub message: String,
}

impl RateLimitPolicy {
    fn new(window_millis: u64, max_requests: u32, message: &str) -> Self {
        Self {
            window: Duration::from_millis(window_millis),
            max_requests,
            message: message.to_string(),
        }
    }
}

/// Immutable event class → policy lookup table, built once at startup.
///
/// Lookup of a class with no policy returns `None`, which admission control
/// treats as "not limited". The permissive default is deliberate: an
/// unconfigured event class is open, not an error.
#[derive(Debug, Clone, Default)]
pub struct PolicyTable {
    policies: HashMap<EventClass, RateLimitPolicy>,
}

impl PolicyTable {
    /// Build the table from the built-in defaults plus configured overrides.
    ///
    /// Fails with a `Configuration` error on unknown class names or
    /// non-positive window/count values; a malformed policy must prevent
    /// process start rather than silently limp along.
    pub fn from_config(config: &LimitsConfig) -> AppResult<Self> {
        let mut policies = Self::defaults();

        for (name, overlay) in &config.overrides {
            let class = EventClass::from_name(name).ok_or_else(|| {
                AppError::configuration(format!("Unknown event class in [limits]: '{name}'"))
            })?;

            if overlay.window_millis == 0 {
                return Err(AppError::configuration(format!(
                    "window_millis for '{name}' must be greater than zero"
                )));
            }
            if overlay.max_requests == 0 {
                return Err(AppError::configuration(format!(
                    "max_requests for '{name}' must be greater than zero"
                )));
            }

            let message = overlay
                .message
                .clone()
                .or_else(|| policies.get(&class).map(|p| p.message.clone()))
                .unwrap_or_else(|| "Rate limit exceeded. Please slow down.".to_string());

            policies.insert(
                class,
                RateLimitPolicy {
                    window: Duration::from_millis(overlay.window_millis),
                    max_requests: overlay.max_requests,
                    message,
                },
            );
        }

        Ok(Self { policies })
    }

    /// Build a table with a single policy (for tests).
    pub fn with_policy(class: EventClass, policy: RateLimitPolicy) -> Self {
        let mut policies = HashMap::new();
        policies.insert(class, policy);
        Self { policies }
    }

    /// Look up the policy for an event class.
    pub fn get(&self, class: EventClass) -> Option<&RateLimitPolicy> {
        self.policies.get(&class)
    }

    fn defaults() -> HashMap<EventClass, RateLimitPolicy> {
        let mut policies = HashMap::new();
        policies.insert(
            EventClass::Join,
            RateLimitPolicy::new(60000, 10, "Too many join attempts. Please wait before rejoining."),
        );
        policies.insert(
            EventClass::ContentChange,
            RateLimitPolicy::new(1000, 20, "You are editing too quickly. Changes are being throttled."),
        );
        policies.insert(
            EventClass::CursorMove,
            RateLimitPolicy::new(1000, 50, "Cursor updates are being throttled."),
        );
        policies.insert(
            EventClass::SelectionChange,
            RateLimitPolicy::new(1000, 20, "Selection updates are being throttled."),
        );
        policies.insert(
            EventClass::TypingStatus,
            RateLimitPolicy::new(1000, 10, "Typing notifications are being throttled."),
        );
        policies.insert(
            EventClass::SyncRequest,
            RateLimitPolicy::new(10000, 5, "Too many sync requests. Please wait a moment."),
        );
        policies
    }
}
