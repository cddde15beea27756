//! Event classes subject to admission control.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named category of client action with its own rate-limit policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventClass {
    /// A user joining a session.
    Join,
    /// A document content edit.
    ContentChange,
    /// A cursor position update.
    CursorMove,
    /// A selection range update.
    SelectionChange,
    /// A typing indicator update.
    TypingStatus,
    /// A full-document sync request.
    SyncRequest,
}

impl EventClass {
    /// Every recognized event class.
    pub const ALL: [EventClass; 6] = [
        EventClass::Join,
        EventClass::ContentChange,
        EventClass::CursorMove,
        EventClass::SelectionChange,
        EventClass::TypingStatus,
        EventClass::SyncRequest,
    ];

    /// Stable snake_case name, used in store keys and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventClass::Join => "join",
            EventClass::ContentChange => "content_change",
            EventClass::CursorMove => "cursor_move",
            EventClass::SelectionChange => "selection_change",
            EventClass::TypingStatus => "typing_status",
            EventClass::SyncRequest => "sync_request",
        }
    }

    /// Resolve a class from its configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        EventClass::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for EventClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
