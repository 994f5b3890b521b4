use huddle_core::{Negotiation, Participant, RoomId, SessionId, SignalMessage};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Everything the coordinator knows about one room. This is also the unit that
/// gets persisted, so a record on disk is always a complete room.
///
/// Invariant: `signal_queues` has exactly one entry per participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomState {
    id: RoomId,
    participants: Vec<Participant>,
    signal_queues: HashMap<SessionId, VecDeque<SignalMessage>>,
}

impl RoomState {
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            participants: Vec::new(),
            signal_queues: HashMap::new(),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// Participants in join order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn contains(&self, session_id: &SessionId) -> bool {
        self.participants.iter().any(|p| &p.session_id == session_id)
    }

    pub fn pending(&self, session_id: &SessionId) -> usize {
        self.signal_queues.get(session_id).map_or(0, VecDeque::len)
    }

    /// Adds `participant` and announces it to everybody else.
    ///
    /// Returns the participants that were present before, never including the
    /// joiner. Joining again with a known session id changes nothing.
    pub fn join(&mut self, participant: Participant) -> Vec<Participant> {
        let existing: Vec<Participant> = self
            .participants
            .iter()
            .filter(|p| p.session_id != participant.session_id)
            .cloned()
            .collect();

        if self.contains(&participant.session_id) {
            self.signal_queues
                .entry(participant.session_id)
                .or_default();
            return existing;
        }

        let event = SignalMessage::ParticipantJoined {
            participant: participant.clone(),
        };
        for other in &existing {
            self.push(&other.session_id, event.clone());
        }

        self.signal_queues
            .insert(participant.session_id.clone(), VecDeque::new());
        self.participants.push(participant);

        existing
    }

    /// Removes the participant together with its queue. Returns `false` if it was
    /// not present.
    pub fn leave(&mut self, session_id: &SessionId) -> bool {
        let Some(pos) = self
            .participants
            .iter()
            .position(|p| &p.session_id == session_id)
        else {
            return false;
        };

        self.participants.remove(pos);
        self.signal_queues.remove(session_id);

        let event = SignalMessage::ParticipantLeft {
            session_id: session_id.clone(),
        };
        let remaining: Vec<SessionId> = self
            .participants
            .iter()
            .map(|p| p.session_id.clone())
            .collect();
        for other in &remaining {
            self.push(other, event.clone());
        }

        true
    }

    /// Queues `message` for its recipient. Returns `false` if the recipient is gone.
    pub fn enqueue(&mut self, message: Negotiation) -> bool {
        let recipient = message.recipient().clone();
        self.push(&recipient, message.into())
    }

    /// Takes the whole queue of `session_id`, oldest first.
    pub fn drain(&mut self, session_id: &SessionId) -> Vec<SignalMessage> {
        self.signal_queues
            .get_mut(session_id)
            .map(|queue| queue.drain(..).collect())
            .unwrap_or_default()
    }

    fn push(&mut self, recipient: &SessionId, message: SignalMessage) -> bool {
        match self.signal_queues.get_mut(recipient) {
            Some(queue) => {
                queue.push_back(message);
                true
            }
            None => false,
        }
    }
}
