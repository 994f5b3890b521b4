use thiserror::Error;

/// Failures a caller of the room coordinator can observe.
///
/// Everything else (unknown room, departed recipient, idle queue) is a successful
/// no-op, since a caller cannot tell "never existed" apart from "already cleaned up".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Room state could not be persisted, or the room's actor kept retiring under us.
    #[error("room coordinator unavailable")]
    Unavailable,
}
