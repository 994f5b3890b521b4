use crate::error::CoordinatorError;
use huddle_core::{Negotiation, Participant, SessionId, SignalMessage};
use tokio::sync::oneshot;

pub type Reply<T> = oneshot::Sender<Result<T, CoordinatorError>>;

/// Commands handled by a room actor, one at a time, in mailbox order.
#[derive(Debug)]
pub enum RoomCommand {
    /// Add a participant; replies with the participants that were already there.
    Join {
        participant: Participant,
        reply: Reply<Vec<Participant>>,
    },

    /// Remove a participant; a no-op for unknown sessions.
    Leave {
        session_id: SessionId,
        reply: Reply<()>,
    },

    /// Queue a negotiation message for its recipient.
    Signal {
        message: Negotiation,
        reply: Reply<()>,
    },

    /// Hand over and clear a participant's queue.
    Drain {
        session_id: SessionId,
        reply: Reply<Vec<SignalMessage>>,
    },

    /// Read-only view of the current members.
    Participants { reply: Reply<Vec<Participant>> },
}
