mod file_store;
mod memory_store;
mod retrying_store;

pub use file_store::*;
pub use memory_store::*;
pub use retrying_store::*;

use crate::config::ServerConfig;
use crate::room::RoomState;
use async_trait::async_trait;
use huddle_core::RoomId;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable home of room records. A record is always written and replaced as a
/// whole, never field by field.
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Every room currently persisted.
    async fn load_all(&self) -> Result<Vec<RoomState>, StoreError>;

    /// Replaces the stored record of `room.id()`.
    async fn save(&self, room: &RoomState) -> Result<(), StoreError>;

    /// Deletes the record. Removing an unknown room is not an error.
    async fn remove(&self, room_id: &RoomId) -> Result<(), StoreError>;
}

/// Picks the backend for `config`: a file store when a data dir is set,
/// otherwise memory. Either way writes are retried per `config.store_retry`.
pub async fn open_store(config: &ServerConfig) -> Result<Arc<dyn RoomStore>, StoreError> {
    match &config.data_dir {
        Some(dir) => {
            let store = FileStore::open(dir).await?;
            Ok(Arc::new(RetryingStore::new(store, config.store_retry)))
        }
        None => Ok(Arc::new(RetryingStore::new(
            MemoryStore::new(),
            config.store_retry,
        ))),
    }
}
