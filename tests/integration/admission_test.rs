//! Integration tests for admission control through the assembled engine.

use std::time::Duration;

use codepad::EventClass;
use codepad_core::error::ErrorKind;

use crate::helpers;

#[tokio::test]
async fn test_join_burst_hits_default_limit() {
    let engine = helpers::test_engine();

    for _ in 0..10 {
        let verdict = engine
            .admission()
            .check(EventClass::Join, "room-1", "conn-7")
            .await;
        assert!(!verdict.limited);
    }

    let verdict = engine
        .admission()
        .check(EventClass::Join, "room-1", "conn-7")
        .await;
    assert!(verdict.limited);
    assert_eq!(
        verdict.message.as_deref(),
        Some("Too many join attempts. Please wait before rejoining.")
    );
}

#[tokio::test]
async fn test_configured_override_applies() {
    let config = helpers::config_with_override("sync_request", 50, 2);
    let engine = helpers::engine_with_config(config);

    for _ in 0..2 {
        let verdict = engine
            .admission()
            .check(EventClass::SyncRequest, "room-1", "alice")
            .await;
        assert!(!verdict.limited);
    }

    let verdict = engine
        .admission()
        .check(EventClass::SyncRequest, "room-1", "alice")
        .await;
    assert!(verdict.limited);
    // Override without a message keeps the class's built-in one.
    assert_eq!(
        verdict.message.as_deref(),
        Some("Too many sync requests. Please wait a moment.")
    );

    // The shortened window expires and the subject is admitted again.
    tokio::time::sleep(Duration::from_millis(80)).await;
    let verdict = engine
        .admission()
        .check(EventClass::SyncRequest, "room-1", "alice")
        .await;
    assert!(!verdict.limited);
}

#[tokio::test]
async fn test_clear_on_disconnect_resets_counters() {
    let config = helpers::config_with_override("typing_status", 60000, 1);
    let engine = helpers::engine_with_config(config);

    assert!(
        !engine
            .admission()
            .check(EventClass::TypingStatus, "room-1", "alice")
            .await
            .limited
    );
    assert!(
        engine
            .admission()
            .check(EventClass::TypingStatus, "room-1", "alice")
            .await
            .limited
    );

    engine.admission().clear("room-1", "alice").await;

    assert!(
        !engine
            .admission()
            .check(EventClass::TypingStatus, "room-1", "alice")
            .await
            .limited
    );
}

#[tokio::test]
async fn test_admission_fails_open_when_store_down() {
    let engine = helpers::engine_with_failing_store();

    // Far past every configured limit, yet everything is admitted.
    for _ in 0..100 {
        let verdict = engine
            .admission()
            .check(EventClass::ContentChange, "room-1", "alice")
            .await;
        assert!(!verdict.limited);
    }
}

#[tokio::test]
async fn test_session_mutations_fail_closed_when_store_down() {
    let engine = helpers::engine_with_failing_store();

    let err = engine.sessions().add_user("room-1", "alice").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::StoreUnavailable);
    assert!(err.is_retryable());

    let err = engine
        .sessions()
        .update_content("room-1", "hello")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::StoreUnavailable);
}

#[tokio::test]
async fn test_health_check_reports_store_outage() {
    let engine = helpers::engine_with_failing_store();
    assert!(engine.health_check().await.is_err());

    let engine = helpers::test_engine();
    assert!(engine.health_check().await.unwrap());
}
