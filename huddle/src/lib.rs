pub use huddle_core::model::{Participant, RoomId, SessionId};

pub mod model {
    pub use huddle_core::model::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use huddle_server::*;
}
