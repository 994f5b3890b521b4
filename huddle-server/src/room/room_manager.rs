use crate::config::RoomConfig;
use crate::error::CoordinatorError;
use crate::room::{Room, RoomCommand, RoomState};
use crate::store::{RoomStore, StoreError};
use dashmap::DashMap;
use huddle_core::{Negotiation, Participant, RoomId, SessionId, SignalMessage};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

pub(crate) type RoomRegistry = DashMap<RoomId, RoomHandle>;

/// Mailbox of a running room actor, tagged with the incarnation it belongs to.
pub(crate) struct RoomHandle {
    tx: mpsc::Sender<RoomCommand>,
    generation: u64,
}

impl RoomHandle {
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}

/// Routes every operation to the actor that owns the room.
///
/// Actors are spawned on the first join and unregister themselves once their
/// room is empty. The registry is only touched to look a room up, so rooms never
/// wait on each other.
#[derive(Clone)]
pub struct RoomManager {
    rooms: Arc<RoomRegistry>,
    store: Arc<dyn RoomStore>,
    next_generation: Arc<AtomicU64>,
    config: RoomConfig,
}

impl RoomManager {
    pub fn new(store: Arc<dyn RoomStore>, config: RoomConfig) -> Self {
        Self {
            rooms: Arc::new(DashMap::new()),
            store,
            next_generation: Arc::new(AtomicU64::new(0)),
            config,
        }
    }

    /// Builds a manager and brings back every room found in `store`.
    pub async fn restore(store: Arc<dyn RoomStore>, config: RoomConfig) -> Result<Self, StoreError> {
        let manager = Self::new(store.clone(), config);

        let records = store.load_all().await?;
        for state in records {
            if state.is_empty() {
                warn!(room = %state.id(), "Dropping empty persisted room");
                store.remove(state.id()).await?;
                continue;
            }
            let room_id = state.id().clone();
            let handle = manager.spawn(state);
            manager.rooms.insert(room_id, handle);
        }

        info!("Restored {} rooms", manager.rooms.len());
        Ok(manager)
    }

    /// Adds `participant` to the room, creating the room if needed.
    ///
    /// Returns the participants that were present before this call.
    pub async fn join(
        &self,
        room_id: &RoomId,
        participant: Participant,
    ) -> Result<Vec<Participant>, CoordinatorError> {
        if participant.session_id.is_empty() {
            return Err(CoordinatorError::InvalidArgument(
                "session id is required".to_owned(),
            ));
        }

        self.dispatch(room_id, true, |reply| RoomCommand::Join {
            participant: participant.clone(),
            reply,
        })
        .await?
        .ok_or(CoordinatorError::Unavailable)?
    }

    pub async fn leave(&self, room_id: &RoomId, session_id: &SessionId) -> Result<(), CoordinatorError> {
        self.dispatch(room_id, false, |reply| RoomCommand::Leave {
            session_id: session_id.clone(),
            reply,
        })
        .await?
        .unwrap_or(Ok(()))
    }

    pub async fn send(&self, room_id: &RoomId, message: Negotiation) -> Result<(), CoordinatorError> {
        self.dispatch(room_id, false, |reply| RoomCommand::Signal {
            message: message.clone(),
            reply,
        })
        .await?
        .unwrap_or(Ok(()))
    }

    /// Takes every message waiting for `session_id`, in the order they were queued.
    pub async fn drain(
        &self,
        room_id: &RoomId,
        session_id: &SessionId,
    ) -> Result<Vec<SignalMessage>, CoordinatorError> {
        self.dispatch(room_id, false, |reply| RoomCommand::Drain {
            session_id: session_id.clone(),
            reply,
        })
        .await?
        .unwrap_or_else(|| Ok(Vec::new()))
    }

    /// Current members, or `None` if the room does not exist.
    pub async fn participants(
        &self,
        room_id: &RoomId,
    ) -> Result<Option<Vec<Participant>>, CoordinatorError> {
        self.dispatch(room_id, false, |reply| RoomCommand::Participants { reply })
            .await?
            .transpose()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn contains_room(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Delivers a command to the room's actor and waits for its answer.
    ///
    /// `Ok(None)` means the room does not exist and `create` was false. A command
    /// that hits an actor in the middle of retiring is rebuilt and re-routed.
    async fn dispatch<T, F>(
        &self,
        room_id: &RoomId,
        create: bool,
        make: F,
    ) -> Result<Option<Result<T, CoordinatorError>>, CoordinatorError>
    where
        F: Fn(oneshot::Sender<Result<T, CoordinatorError>>) -> RoomCommand,
    {
        let attempts = self.config.dispatch_attempts.max(1);
        for attempt in 0..attempts {
            let tx = if create {
                self.sender_or_spawn(room_id)
            } else {
                match self.rooms.get(room_id) {
                    Some(handle) => handle.tx.clone(),
                    None => return Ok(None),
                }
            };

            let (reply_tx, reply_rx) = oneshot::channel();
            if tx.send(make(reply_tx)).await.is_err() {
                debug!(room = %room_id, attempt, "Room mailbox closed, re-routing");
                self.rooms
                    .remove_if(room_id, |_, handle| handle.tx.same_channel(&tx));
                tokio::task::yield_now().await;
                continue;
            }

            match reply_rx.await {
                Ok(res) => return Ok(Some(res)),
                Err(_) => {
                    debug!(room = %room_id, attempt, "Room retired before answering, re-routing");
                    tokio::task::yield_now().await;
                }
            }
        }

        warn!(room = %room_id, "Giving up after {} attempts", attempts);
        Err(CoordinatorError::Unavailable)
    }

    fn sender_or_spawn(&self, room_id: &RoomId) -> mpsc::Sender<RoomCommand> {
        if let Some(handle) = self.rooms.get(room_id) {
            return handle.tx.clone();
        }

        self.rooms
            .entry(room_id.clone())
            .or_insert_with(|| {
                info!("Creating new room: {}", room_id);
                self.spawn(RoomState::new(room_id.clone()))
            })
            .tx
            .clone()
    }

    fn spawn(&self, state: RoomState) -> RoomHandle {
        let (tx, rx) = mpsc::channel(self.config.mailbox_capacity.max(1));
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);

        let room = Room::new(state, generation, rx, self.store.clone(), self.rooms.clone());
        tokio::spawn(room.run());

        RoomHandle { tx, generation }
    }
}
