use crate::config::RetryPolicy;
use crate::room::RoomState;
use crate::store::{RoomStore, StoreError};
use async_trait::async_trait;
use huddle_core::RoomId;
use std::future::Future;
use tracing::warn;

/// Retries transient failures of the wrapped store before giving up.
pub struct RetryingStore<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: RoomStore> RetryingStore<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    async fn retry<'a, T, F, Fut>(&'a self, op: &str, mut call: F) -> Result<T, StoreError>
    where
        F: FnMut(&'a S) -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let attempts = self.policy.attempts.max(1);
        let mut attempt = 1;
        loop {
            match call(&self.inner).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < attempts => {
                    warn!("Store {} failed (attempt {}/{}): {}", op, attempt, attempts, e);
                    tokio::time::sleep(self.policy.backoff * attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl<S: RoomStore> RoomStore for RetryingStore<S> {
    async fn load_all(&self) -> Result<Vec<RoomState>, StoreError> {
        self.retry("load", |store| store.load_all()).await
    }

    async fn save(&self, room: &RoomState) -> Result<(), StoreError> {
        self.retry("save", |store| store.save(room)).await
    }

    async fn remove(&self, room_id: &RoomId) -> Result<(), StoreError> {
        self.retry("remove", |store| store.remove(room_id)).await
    }
}
