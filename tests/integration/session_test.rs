//! Integration tests for session lifecycle through the assembled engine.

use std::time::Duration;

use codepad::EventClass;
use codepad_core::error::ErrorKind;

use crate::helpers;

#[tokio::test]
async fn test_gateway_join_flow() {
    let engine = helpers::test_engine();

    // A gateway checks admission first, then mutates the session.
    let verdict = engine
        .admission()
        .check(EventClass::Join, "room-1", "conn-1")
        .await;
    assert!(!verdict.limited);

    let participant = engine.sessions().add_user("room-1", "alice").await.unwrap();
    assert_eq!(participant.username, "alice");
    assert_eq!(participant.session_id, "room-1");
    assert!(participant.color.starts_with('#'));

    let session = engine.sessions().load("room-1").await.unwrap().unwrap();
    assert_eq!(session.users.len(), 1);
    assert_eq!(session.users[0].id, participant.id);
}

#[tokio::test]
async fn test_capacity_and_duplicate_names() {
    let engine = helpers::test_engine();

    for name in ["a", "b", "c", "d", "e"] {
        engine.sessions().add_user("room-2", name).await.unwrap();
    }

    let err = engine.sessions().add_user("room-2", "f").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::SessionFull);
    assert!(!err.is_retryable());

    let err = engine.sessions().add_user("room-2", "a").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateUsername);

    // Usernames are case-sensitive; "A" is a different name.
    let err = engine.sessions().add_user("room-2", "A").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::SessionFull);
}

#[tokio::test]
async fn test_document_updates_survive_membership_churn() {
    let engine = helpers::test_engine();

    let alice = engine.sessions().add_user("room-3", "alice").await.unwrap();
    engine
        .sessions()
        .update_content("room-3", "fn main() {}")
        .await
        .unwrap();
    engine.sessions().update_language("room-3", "rust").await.unwrap();

    engine.sessions().remove_user("room-3", alice.id).await.unwrap();

    // Content sticks around for the empty-session grace period.
    let session = engine.sessions().load("room-3").await.unwrap().unwrap();
    assert!(session.is_empty());
    assert_eq!(session.content, "fn main() {}");
    assert_eq!(session.language, "rust");

    let ttl = engine
        .sessions()
        .remaining_ttl("room-3")
        .await
        .unwrap()
        .unwrap();
    assert!(ttl <= Duration::from_secs(3600));

    // A rejoin within the grace period sees the same document.
    let bob = engine.sessions().add_user("room-3", "bob").await.unwrap();
    let session = engine.sessions().load("room-3").await.unwrap().unwrap();
    assert_eq!(session.content, "fn main() {}");
    assert_eq!(session.users[0].id, bob.id);

    let ttl = engine
        .sessions()
        .remaining_ttl("room-3")
        .await
        .unwrap()
        .unwrap();
    assert!(ttl > Duration::from_secs(3600));
}

#[tokio::test]
async fn test_freed_seat_and_name_are_reusable() {
    let engine = helpers::test_engine();

    let mut members = Vec::new();
    for name in ["a", "b", "c", "d", "e"] {
        members.push(engine.sessions().add_user("room-4", name).await.unwrap());
    }

    engine
        .sessions()
        .remove_user("room-4", members[0].id)
        .await
        .unwrap();

    // Both the seat and the username become available again.
    let replacement = engine.sessions().add_user("room-4", "a").await.unwrap();
    assert_ne!(replacement.id, members[0].id);

    let session = engine.sessions().load("room-4").await.unwrap().unwrap();
    assert_eq!(session.users.len(), 5);
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let engine = helpers::test_engine();

    engine.sessions().add_user("room-5", "alice").await.unwrap();
    engine.sessions().add_user("room-6", "alice").await.unwrap();
    engine
        .sessions()
        .update_content("room-5", "only in five")
        .await
        .unwrap();

    let five = engine.sessions().load("room-5").await.unwrap().unwrap();
    let six = engine.sessions().load("room-6").await.unwrap().unwrap();
    assert_eq!(five.content, "only in five");
    assert_eq!(six.content, "");

    let ids = engine.sessions().session_ids().await.unwrap();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&"room-5".to_string()));
    assert!(ids.contains(&"room-6".to_string()));
}
