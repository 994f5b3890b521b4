use huddle_core::{Participant, RoomId};
use huddle_server::{MemoryStore, RoomConfig, RoomManager, RoomState, RoomStore};
use std::sync::Arc;

use crate::integration::init_tracing;

#[tokio::test]
async fn test_empty_records_dropped_on_restore() {
    init_tracing();

    let store = MemoryStore::new();
    let mut live = RoomState::new(RoomId::from("live"));
    live.join(Participant::new("s1", "Alice"));
    store.save(&live).await.unwrap();
    store.save(&RoomState::new(RoomId::from("stale"))).await.unwrap();

    let manager = RoomManager::restore(Arc::new(store.clone()), RoomConfig::default())
        .await
        .expect("restore");

    assert_eq!(manager.room_count(), 1);
    assert!(manager.contains_room(&RoomId::from("live")));
    assert!(!manager.contains_room(&RoomId::from("stale")));
    assert!(store.get(&RoomId::from("stale")).is_none(), "empty record is deleted");
    assert_eq!(store.get(&RoomId::from("live")), Some(live));
}
