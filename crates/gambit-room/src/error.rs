//! Error types for the room layer.

use gambit_engine::JoinError;
use gambit_protocol::RoomCode;

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No room exists under this code.
    #[error("room {0} not found")]
    NotFound(RoomCode),

    /// The room has no free seats.
    #[error("room {0} is full")]
    RoomFull(RoomCode),

    /// The game already started and the identity is not a known seat.
    #[error("the game in room {0} is already in progress")]
    InProgress(RoomCode),

    /// The room's command channel is closed or full.
    #[error("room {0} is unavailable")]
    Unavailable(RoomCode),
}

impl RoomError {
    pub(crate) fn from_join(err: JoinError, code: RoomCode) -> Self {
        match err {
            JoinError::RoomFull => RoomError::RoomFull(code),
            JoinError::InProgress => RoomError::InProgress(code),
        }
    }
}
