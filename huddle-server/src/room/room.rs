use crate::error::CoordinatorError;
use crate::room::room_command::RoomCommand;
use crate::room::room_manager::RoomRegistry;
use crate::room::room_state::RoomState;
use crate::store::RoomStore;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Single owner of one room's state. Every operation on the room goes through
/// `command_rx`, so operations on the same room never interleave.
pub struct Room {
    state: RoomState,
    generation: u64,
    command_rx: mpsc::Receiver<RoomCommand>,
    store: Arc<dyn RoomStore>,
    registry: Arc<RoomRegistry>,
}

impl Room {
    pub(crate) fn new(
        state: RoomState,
        generation: u64,
        command_rx: mpsc::Receiver<RoomCommand>,
        store: Arc<dyn RoomStore>,
        registry: Arc<RoomRegistry>,
    ) -> Self {
        Self {
            state,
            generation,
            command_rx,
            store,
            registry,
        }
    }

    pub async fn run(mut self) {
        info!(room = %self.state.id(), "Room event loop started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;

            if self.state.is_empty() && self.retire() {
                break;
            }
        }

        // Anything still buffered is dropped unanswered; senders see the closed
        // reply channel and re-route to a fresh actor.
        self.command_rx.close();
        info!(room = %self.state.id(), "Room event loop finished");
    }

    async fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join { participant, reply } => {
                let mut next = self.state.clone();
                let session_id = participant.session_id.clone();
                let existing = next.join(participant);
                let res = self.commit(next).await.map(|()| existing);
                if res.is_ok() {
                    info!(room = %self.state.id(), session = %session_id, "Participant joined");
                }
                let _ = reply.send(res);
            }

            RoomCommand::Leave { session_id, reply } => {
                let mut next = self.state.clone();
                if !next.leave(&session_id) {
                    let _ = reply.send(Ok(()));
                    return;
                }
                let res = self.commit(next).await;
                if res.is_ok() {
                    info!(room = %self.state.id(), session = %session_id, "Participant left");
                }
                let _ = reply.send(res);
            }

            RoomCommand::Signal { message, reply } => {
                let mut next = self.state.clone();
                let kind = message.kind();
                let recipient = message.recipient().clone();
                if !next.enqueue(message) {
                    debug!(
                        room = %self.state.id(),
                        recipient = %recipient,
                        "Dropping {} for absent recipient",
                        kind
                    );
                    let _ = reply.send(Ok(()));
                    return;
                }
                let _ = reply.send(self.commit(next).await);
            }

            RoomCommand::Drain { session_id, reply } => {
                if self.state.pending(&session_id) == 0 {
                    let _ = reply.send(Ok(Vec::new()));
                    return;
                }
                let mut next = self.state.clone();
                let messages = next.drain(&session_id);
                let res = self.commit(next).await.map(|()| messages);
                let _ = reply.send(res);
            }

            RoomCommand::Participants { reply } => {
                let _ = reply.send(Ok(self.state.participants().to_vec()));
            }
        }
    }

    /// Persists `next` and only then makes it the live state, so a failed write
    /// leaves the room exactly as it was.
    async fn commit(&mut self, next: RoomState) -> Result<(), CoordinatorError> {
        if next == self.state {
            return Ok(());
        }

        let res = if next.is_empty() {
            self.store.remove(next.id()).await
        } else {
            self.store.save(&next).await
        };

        if let Err(e) = res {
            error!(room = %self.state.id(), "Failed to persist room: {}", e);
            return Err(CoordinatorError::Unavailable);
        }

        self.state = next;
        Ok(())
    }

    /// Unregisters this actor if it is still the registered one and nothing is
    /// waiting in the mailbox.
    fn retire(&self) -> bool {
        let removed = self.registry.remove_if(self.state.id(), |_, handle| {
            handle.generation() == self.generation && self.command_rx.is_empty()
        });

        if removed.is_some() {
            debug!(room = %self.state.id(), "Room is empty, retiring");
            return true;
        }

        !self
            .registry
            .get(self.state.id())
            .is_some_and(|handle| handle.generation() == self.generation)
    }
}
