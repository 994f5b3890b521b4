use async_trait::async_trait;
use huddle_core::RoomId;
use huddle_server::{MemoryStore, RoomState, RoomStore, StoreError};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// MemoryStore that can be told to fail its next writes.
#[derive(Clone, Default)]
pub struct FlakyStore {
    /// Records that made it through.
    pub inner: MemoryStore,
    failures: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` save/remove calls fail.
    pub fn fail_next(&self, n: usize) {
        self.failures.store(n, Ordering::SeqCst);
    }

    /// Successful save/remove calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), StoreError> {
        let injected = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(io::Error::other("injected failure").into());
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl RoomStore for FlakyStore {
    async fn load_all(&self) -> Result<Vec<RoomState>, StoreError> {
        self.inner.load_all().await
    }

    async fn save(&self, room: &RoomState) -> Result<(), StoreError> {
        self.check()?;
        self.inner.save(room).await
    }

    async fn remove(&self, room_id: &RoomId) -> Result<(), StoreError> {
        self.check()?;
        self.inner.remove(room_id).await
    }
}
