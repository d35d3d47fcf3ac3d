//! Wire protocol definitions.
//!
//! Every frame on the wire is a JSON object of the form
//! `{"type": "...", "data": {...}}`. Inbound frames decode into
//! [`ClientMessage`], outbound frames encode from [`ServerMessage`].
//! Decoding is strict: unknown types and malformed payloads are reported
//! to the sender as `BAD_MESSAGE` without touching room state.

pub mod error_codes;
pub mod messages;
pub mod room_codes;
pub mod types;
pub mod validation;

pub use error_codes::ErrorCode;

pub use messages::{ClientMessage, RoomStatePayload, ServerMessage};

pub use room_codes::{generate_room_code, is_valid_room_code, normalize_room_code};

pub use types::{
    CardDifficulty, ConnectionId, GameConfig, GameDuration, GameOverReason, PlayerId,
    PlayerSnapshot, PlayerStatus, RoomPhase, ScoreEntry,
};

pub use validation::validate_player_name;

use thiserror::Error;

/// Why an inbound text frame was rejected before reaching the room.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame is not valid JSON or does not match any known message: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("frame of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },
}

impl FrameError {
    /// All frame errors map to the same protocol error code.
    pub fn error_code(&self) -> ErrorCode {
        ErrorCode::BadMessage
    }
}

/// Decode a single inbound text frame, enforcing the configured size limit.
pub fn decode_client_message(text: &str, max_size: usize) -> Result<ClientMessage, FrameError> {
    if text.len() > max_size {
        return Err(FrameError::TooLarge {
            size: text.len(),
            limit: max_size,
        });
    }
    Ok(serde_json::from_str(text)?)
}
