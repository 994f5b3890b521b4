use huddle_core::{Participant, RoomId};

use crate::integration::{create_test_manager, init_tracing};
use crate::utils::left;

#[tokio::test]
async fn test_leave_is_safe_to_repeat() {
    init_tracing();

    let (manager, _store) = create_test_manager();
    let room = RoomId::from("room1");

    // Unknown room.
    manager
        .leave(&RoomId::from("nowhere"), &"s1".into())
        .await
        .expect("leaving an unknown room is a no-op");
    assert_eq!(manager.room_count(), 0, "leave must not create rooms");

    manager.join(&room, Participant::new("s1", "Alice")).await.unwrap();
    manager.join(&room, Participant::new("s2", "Bob")).await.unwrap();
    manager.drain(&room, &"s1".into()).await.unwrap();

    // Unknown participant.
    manager.leave(&room, &"ghost".into()).await.unwrap();
    assert!(manager.drain(&room, &"s1".into()).await.unwrap().is_empty());

    manager.leave(&room, &"s2".into()).await.unwrap();
    manager.leave(&room, &"s2".into()).await.unwrap();

    assert_eq!(
        manager.drain(&room, &"s1".into()).await.unwrap(),
        vec![left("s2")],
        "a repeated leave is announced once"
    );
    assert_eq!(
        manager.participants(&room).await.unwrap(),
        Some(vec![Participant::new("s1", "Alice")])
    );
}
