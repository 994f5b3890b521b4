use huddle_core::{Participant, RoomId};
use huddle_server::{CoordinatorError, RetryPolicy, RetryingStore, RoomConfig, RoomManager};
use std::sync::Arc;
use std::time::Duration;

use crate::integration::init_tracing;
use crate::utils::{FlakyStore, offer, sdp_of, wait_for_room_count};

fn flaky_manager() -> (RoomManager, FlakyStore) {
    let store = FlakyStore::new();
    let retrying = RetryingStore::new(
        store.clone(),
        RetryPolicy {
            attempts: 2,
            backoff: Duration::from_millis(1),
        },
    );
    (RoomManager::new(Arc::new(retrying), RoomConfig::default()), store)
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    init_tracing();

    let (manager, store) = flaky_manager();
    let room = RoomId::from("room1");

    store.fail_next(1);
    let existing = manager
        .join(&room, Participant::new("s1", "Alice"))
        .await
        .expect("one failure is absorbed by the retry");
    assert!(existing.is_empty());
    assert_eq!(store.writes(), 1);
    assert!(store.inner.get(&room).is_some());
}

#[tokio::test]
async fn test_failed_write_is_not_observed() {
    init_tracing();

    let (manager, store) = flaky_manager();
    let room = RoomId::from("room1");

    manager.join(&room, Participant::new("s1", "Alice")).await.unwrap();
    let persisted = store.inner.get(&room);

    store.fail_next(10);
    let err = manager
        .join(&room, Participant::new("s2", "Bob"))
        .await
        .expect_err("exhausted retries surface as unavailable");
    assert_eq!(err, CoordinatorError::Unavailable);
    store.fail_next(0);

    assert_eq!(store.inner.get(&room), persisted);
    assert_eq!(
        manager.participants(&room).await.unwrap(),
        Some(vec![Participant::new("s1", "Alice")]),
        "the half-done join left no trace"
    );

    let existing = manager
        .join(&room, Participant::new("s2", "Bob"))
        .await
        .unwrap();
    assert_eq!(existing, vec![Participant::new("s1", "Alice")]);

    manager.send(&room, offer("s2", "s1", "keep me")).await.unwrap();
    manager.drain(&room, &"s1".into()).await.unwrap();
    manager.send(&room, offer("s2", "s1", "keep me too")).await.unwrap();

    store.fail_next(10);
    assert_eq!(
        manager.drain(&room, &"s1".into()).await,
        Err(CoordinatorError::Unavailable)
    );
    store.fail_next(0);

    let inbox = manager.drain(&room, &"s1".into()).await.unwrap();
    assert_eq!(inbox.iter().map(sdp_of).collect::<Vec<_>>(), ["keep me too"]);
}

#[tokio::test]
async fn test_failed_first_join_leaves_no_room() {
    init_tracing();

    let (manager, store) = flaky_manager();
    let room = RoomId::from("never");

    store.fail_next(10);
    assert_eq!(
        manager.join(&room, Participant::new("s1", "Alice")).await,
        Err(CoordinatorError::Unavailable)
    );
    store.fail_next(0);

    assert!(wait_for_room_count(&manager, 0, 1000).await);
    assert!(store.inner.is_empty());
    assert_eq!(manager.participants(&room).await.unwrap(), None);
}
