use crate::room::RoomState;
use crate::store::{RoomStore, StoreError};
use async_trait::async_trait;
use dashmap::DashMap;
use huddle_core::RoomId;
use std::sync::Arc;

/// Keeps records in process memory. Cloning shares the same records.
#[derive(Clone, Default)]
pub struct MemoryStore {
    rooms: Arc<DashMap<RoomId, RoomState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, room_id: &RoomId) -> Option<RoomState> {
        self.rooms.get(room_id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

#[async_trait]
impl RoomStore for MemoryStore {
    async fn load_all(&self) -> Result<Vec<RoomState>, StoreError> {
        Ok(self.rooms.iter().map(|entry| entry.value().clone()).collect())
    }

    async fn save(&self, room: &RoomState) -> Result<(), StoreError> {
        self.rooms.insert(room.id().clone(), room.clone());
        Ok(())
    }

    async fn remove(&self, room_id: &RoomId) -> Result<(), StoreError> {
        self.rooms.remove(room_id);
        Ok(())
    }
}
