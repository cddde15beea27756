//! Unified application error types for Codepad.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The shared key-value store could not be reached (transport or timeout).
    StoreUnavailable,
    /// The requested username is already taken inside the session.
    DuplicateUsername,
    /// The session already holds the maximum number of participants.
    SessionFull,
    /// The referenced user is not a member of the session.
    UserNotFound,
    /// A configuration error occurred (fatal at startup).
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StoreUnavailable => write!(f, "STORE_UNAVAILABLE"),
            Self::DuplicateUsername => write!(f, "DUPLICATE_USERNAME"),
            Self::SessionFull => write!(f, "SESSION_FULL"),
            Self::UserNotFound => write!(f, "USER_NOT_FOUND"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout Codepad.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. This provides a single error type for
/// the entire subsystem boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a store-unavailable error.
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreUnavailable, message)
    }

    /// Create a duplicate-username error.
    pub fn duplicate_username(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateUsername, message)
    }

    /// Create a session-full error.
    pub fn session_full(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SessionFull, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether the caller may retry the failed operation.
    ///
    /// Only store transport failures are transient; everything else reflects
    /// a decision that will not change on retry.
    pub fn is_retryable(&self) -> bool {
        self.kind == ErrorKind::StoreUnavailable
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
