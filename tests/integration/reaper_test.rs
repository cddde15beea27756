//! Integration tests for the inactivity reaper through the assembled engine.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;

use codepad::{Participant, Session};

use crate::helpers;

fn stale() -> chrono::DateTime<Utc> {
    // Past the default 15 minute inactivity threshold.
    Utc::now() - chrono::Duration::seconds(1200)
}

#[tokio::test]
async fn test_sweep_reclaims_abandoned_state() {
    let engine = helpers::test_engine();

    // room-a: one stale participant among active ones.
    let mut mixed = Session::new("room-a", "", "plaintext");
    let mut ghost = Participant::new("room-a", "ghost");
    ghost.last_active = stale();
    mixed.users.push(ghost);
    mixed.users.push(Participant::new("room-a", "alice"));
    engine.sessions().persist(&mixed).await.unwrap();

    // room-b: the whole session has gone quiet.
    let mut idle = Session::new("room-b", "old content", "plaintext");
    idle.last_active = stale();
    engine.sessions().persist(&idle).await.unwrap();

    // room-c: healthy.
    engine.sessions().add_user("room-c", "bob").await.unwrap();

    let stats = engine.reaper().sweep().await.unwrap();
    assert_eq!(stats.sessions_scanned, 3);
    assert_eq!(stats.users_pruned, 1);
    assert_eq!(stats.sessions_deleted, 1);
    assert_eq!(stats.errors, 0);

    let room_a = engine.sessions().load("room-a").await.unwrap().unwrap();
    assert_eq!(room_a.users.len(), 1);
    assert_eq!(room_a.users[0].username, "alice");

    assert!(engine.sessions().load("room-b").await.unwrap().is_none());

    let room_c = engine.sessions().load("room-c").await.unwrap().unwrap();
    assert_eq!(room_c.users.len(), 1);
}

#[tokio::test]
async fn test_sweep_is_idempotent() {
    let engine = helpers::test_engine();

    let mut idle = Session::new("room-d", "", "plaintext");
    idle.last_active = stale();
    engine.sessions().persist(&idle).await.unwrap();

    let first = engine.reaper().sweep().await.unwrap();
    assert_eq!(first.sessions_deleted, 1);

    let second = engine.reaper().sweep().await.unwrap();
    assert_eq!(second.sessions_scanned, 0);
    assert_eq!(second.sessions_deleted, 0);
}

#[tokio::test]
async fn test_sweep_aborts_when_store_down() {
    let engine = helpers::engine_with_failing_store();
    assert!(engine.reaper().sweep().await.is_err());
}

#[tokio::test]
async fn test_run_loop_stops_on_cancel() {
    let engine = helpers::test_engine();
    let reaper = engine.reaper().clone();

    let (cancel_tx, cancel_rx) = watch::channel(false);
    let handle = tokio::spawn(async move {
        reaper.run(cancel_rx).await;
    });

    cancel_tx.send(true).unwrap();

    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("reaper did not stop on cancel")
        .unwrap();
}
