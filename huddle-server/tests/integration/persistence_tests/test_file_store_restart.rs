use huddle_core::{Participant, RoomId, SignalMessage};
use huddle_server::{RoomManager, ServerConfig, open_store};

use crate::integration::init_tracing;
use crate::utils::{ice, wait_for_room_count};

#[tokio::test]
async fn test_file_store_restart() {
    init_tracing();

    let dir = tempfile::tempdir().expect("tempdir");
    let config = ServerConfig {
        data_dir: Some(dir.path().to_path_buf()),
        ..ServerConfig::default()
    };
    let room = RoomId::from("room/with:odd chars");

    {
        let store = open_store(&config).await.expect("open store");
        let manager = RoomManager::restore(store, config.room).await.expect("restore");
        manager.join(&room, Participant::new("s1", "Alice")).await.unwrap();
        manager.join(&room, Participant::new("s2", "Bob")).await.unwrap();
        manager.send(&room, ice("s2", "s1", "candidate:9")).await.unwrap();

        let temp = RoomId::from("temp");
        manager.join(&temp, Participant::new("t", "T")).await.unwrap();
        manager.leave(&temp, &"t".into()).await.unwrap();
        assert!(wait_for_room_count(&manager, 1, 1000).await);
    }

    let store = open_store(&config).await.expect("reopen store");
    let manager = RoomManager::restore(store, config.room).await.expect("restore");

    assert_eq!(manager.room_count(), 1);
    let inbox = manager.drain(&room, &"s1".into()).await.unwrap();
    assert_eq!(inbox.len(), 2);
    assert!(matches!(inbox[0], SignalMessage::ParticipantJoined { .. }));
    assert_eq!(inbox[1], SignalMessage::from(ice("s2", "s1", "candidate:9")));

    let files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(files.len(), 1, "one record file, no scratch files: {files:?}");
}
