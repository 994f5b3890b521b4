use crate::model::participant::{Participant, SessionId};
use serde::{Deserialize, Serialize};

/// Opaque ICE candidate descriptor, shaped like the browser's `RTCIceCandidateInit`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidateInit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp_mid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp_m_line_index: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_fragment: Option<String>,
}

/// A negotiation message submitted by a peer and addressed to exactly one recipient.
///
/// Membership events are deliberately absent: they are only ever produced by the
/// coordinator itself, see [`SignalMessage`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Negotiation {
    Offer {
        #[serde(default)]
        sdp: Option<String>,
        sender: SessionId,
        recipient: SessionId,
    },
    Answer {
        #[serde(default)]
        sdp: Option<String>,
        sender: SessionId,
        recipient: SessionId,
    },
    IceCandidate {
        candidate: IceCandidateInit,
        sender: SessionId,
        recipient: SessionId,
    },
}

impl Negotiation {
    pub fn sender(&self) -> &SessionId {
        match self {
            Negotiation::Offer { sender, .. }
            | Negotiation::Answer { sender, .. }
            | Negotiation::IceCandidate { sender, .. } => sender,
        }
    }

    pub fn recipient(&self) -> &SessionId {
        match self {
            Negotiation::Offer { recipient, .. }
            | Negotiation::Answer { recipient, .. }
            | Negotiation::IceCandidate { recipient, .. } => recipient,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Negotiation::Offer { .. } => "offer",
            Negotiation::Answer { .. } => "answer",
            Negotiation::IceCandidate { .. } => "ice-candidate",
        }
    }
}

/// Everything that can sit in a participant's signal queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum SignalMessage {
    Offer {
        #[serde(default)]
        sdp: Option<String>,
        sender: SessionId,
        recipient: SessionId,
    },
    Answer {
        #[serde(default)]
        sdp: Option<String>,
        sender: SessionId,
        recipient: SessionId,
    },
    IceCandidate {
        candidate: IceCandidateInit,
        sender: SessionId,
        recipient: SessionId,
    },
    ParticipantJoined {
        participant: Participant,
    },
    ParticipantLeft {
        session_id: SessionId,
    },
}

impl SignalMessage {
    /// Session the message originates from or is about.
    pub fn subject(&self) -> &SessionId {
        match self {
            SignalMessage::Offer { sender, .. }
            | SignalMessage::Answer { sender, .. }
            | SignalMessage::IceCandidate { sender, .. } => sender,
            SignalMessage::ParticipantJoined { participant } => &participant.session_id,
            SignalMessage::ParticipantLeft { session_id } => session_id,
        }
    }

    pub fn is_membership_event(&self) -> bool {
        match self {
            SignalMessage::ParticipantJoined { .. } | SignalMessage::ParticipantLeft { .. } => true,
            SignalMessage::Offer { .. }
            | SignalMessage::Answer { .. }
            | SignalMessage::IceCandidate { .. } => false,
        }
    }
}

impl From<Negotiation> for SignalMessage {
    fn from(msg: Negotiation) -> Self {
        match msg {
            Negotiation::Offer {
                sdp,
                sender,
                recipient,
            } => SignalMessage::Offer {
                sdp,
                sender,
                recipient,
            },
            Negotiation::Answer {
                sdp,
                sender,
                recipient,
            } => SignalMessage::Answer {
                sdp,
                sender,
                recipient,
            },
            Negotiation::IceCandidate {
                candidate,
                sender,
                recipient,
            } => SignalMessage::IceCandidate {
                candidate,
                sender,
                recipient,
            },
        }
    }
}
