use huddle_core::{Participant, RoomId, SignalMessage};
use huddle_server::{RoomConfig, RoomManager};
use std::sync::Arc;

use crate::integration::{create_test_manager, init_tracing};
use crate::utils::{joined, offer};

#[tokio::test]
async fn test_rooms_survive_restart() {
    init_tracing();

    let (before, store) = create_test_manager();
    let room = RoomId::from("room1");

    before.join(&room, Participant::new("s1", "Alice")).await.unwrap();
    before.join(&room, Participant::new("s2", "Bob")).await.unwrap();
    before.send(&room, offer("s1", "s2", "v=0")).await.unwrap();
    before.join(&RoomId::from("gone"), Participant::new("x", "X")).await.unwrap();
    before.leave(&RoomId::from("gone"), &"x".into()).await.unwrap();

    let after = RoomManager::restore(Arc::new(store.clone()), RoomConfig::default())
        .await
        .expect("restore");

    assert_eq!(after.room_count(), 1, "only non-empty rooms come back");
    assert_eq!(
        after.participants(&room).await.unwrap(),
        Some(vec![Participant::new("s1", "Alice"), Participant::new("s2", "Bob")])
    );
    assert_eq!(
        after.drain(&room, &"s1".into()).await.unwrap(),
        vec![joined("s2", "Bob")]
    );
    assert_eq!(
        after.drain(&room, &"s2".into()).await.unwrap(),
        vec![SignalMessage::from(offer("s1", "s2", "v=0"))]
    );

    let existing = after
        .join(&room, Participant::new("s3", "Carl"))
        .await
        .unwrap();
    assert_eq!(existing.len(), 2);
}
