use serde::{Deserialize, Serialize};
use std::fmt;

/// Error codes for structured error handling on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The roster already holds the maximum number of players.
    RoomFull,
    /// A join or reconnect arrived while the room is mid-game.
    GameInProgress,
    /// The message type is valid but not accepted in the current phase.
    InvalidState,
    /// A host-only command arrived from a non-host player.
    Unauthorized,
    /// The frame was malformed, oversized, or of an unknown type.
    BadMessage,
}

impl ErrorCode {
    /// Returns a human-readable description of this error code, suitable
    /// for display by clients that do not map codes themselves.
    pub fn description(&self) -> &'static str {
        match self {
            Self::RoomFull => {
                "The room has reached its maximum player capacity. Try joining a different room."
            }
            Self::GameInProgress => {
                "A game is already in progress in this room. Wait for it to finish or join another room."
            }
            Self::InvalidState => {
                "The room is in the wrong phase for this action. Refresh your view of the room and try again."
            }
            Self::Unauthorized => {
                "Only the host can perform this action."
            }
            Self::BadMessage => {
                "The message could not be understood. Check the frame format and payload fields."
            }
        }
    }

    /// Capacity errors close the connection after the error frame;
    /// protocol errors leave it open.
    pub fn closes_connection(&self) -> bool {
        matches!(self, Self::RoomFull | Self::GameInProgress)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}
