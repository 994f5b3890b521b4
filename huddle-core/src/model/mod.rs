mod participant;
mod response;
mod room;
mod signaling;

pub use participant::{Participant, SessionId};
pub use response::ApiResponse;
pub use room::RoomId;
pub use signaling::{IceCandidateInit, Negotiation, SignalMessage};
