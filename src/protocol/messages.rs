use serde::{Deserialize, Serialize};

use super::error_codes::ErrorCode;
use super::types::{
    GameConfig, GameOverReason, PlayerId, PlayerSnapshot, RoomPhase, ScoreEntry,
};
use crate::deck::Card;

/// Message types sent from client to server.
///
/// Phase validity is enforced by the room task, not the decoder: an
/// out-of-phase message decodes fine and is answered with `INVALID_STATE`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Join the room as a new player (WAITING and GAME_OVER only).
    #[serde(rename_all = "camelCase")]
    Join { player_name: String },
    /// Rebind this connection to a disconnected player within the grace
    /// period. Valid whenever the connection is not yet bound.
    #[serde(rename_all = "camelCase")]
    Reconnect { player_id: PlayerId },
    /// Leave the room for good. The seat is not preserved.
    Leave {},
    /// Replace the room configuration (WAITING only, host only).
    #[serde(rename_all = "camelCase")]
    SetConfig { config: GameConfig },
    /// Begin the start countdown (WAITING, host only, two or more
    /// connected). An inline config is applied first when present.
    #[serde(rename_all = "camelCase")]
    StartGame {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        config: Option<GameConfig>,
    },
    /// Claim the common symbol between the sender's card and the center
    /// card. The client timestamp is echoed back for latency display only;
    /// adjudication is by arrival order.
    #[serde(rename_all = "camelCase")]
    MatchAttempt { symbol_id: u32, client_timestamp: i64 },
    /// Request a rematch while the room is GAME_OVER.
    PlayAgain {},
    /// Application-level heartbeat; answered with `pong`.
    #[serde(rename_all = "camelCase")]
    Ping { timestamp: i64 },
}

/// Payload for the `room_state` server message.
/// Boxed in [`ServerMessage`] to keep the enum small.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStatePayload {
    pub phase: RoomPhase,
    pub players: Vec<PlayerSnapshot>,
    pub config: GameConfig,
    /// Epoch milliseconds at which the idle room will be destroyed.
    /// Present only while the idle timer is armed (WAITING).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_expires_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_card: Option<Card>,
    /// The recipient's own top card, resolved per recipient.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub your_card: Option<Card>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deck_remaining: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_number: Option<u32>,
}

/// Message types sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Full per-recipient view of the room (boxed to reduce enum size).
    RoomState(Box<RoomStatePayload>),
    /// Another player joined. `player.is_you` is true only for the joiner.
    PlayerJoined { player: PlayerSnapshot },
    #[serde(rename_all = "camelCase")]
    PlayerLeft { player_id: PlayerId },
    /// A player lost their connection and entered the grace period.
    #[serde(rename_all = "camelCase")]
    PlayerDisconnected { player_id: PlayerId },
    #[serde(rename_all = "camelCase")]
    HostChanged { player_id: PlayerId },
    ConfigUpdated { config: GameConfig },
    /// Countdown tick. `seconds == -1` signals cancellation.
    Countdown { seconds: i8 },
    #[serde(rename_all = "camelCase")]
    RoundStart {
        round_number: u32,
        /// The recipient's own top card, resolved per recipient. Absent for
        /// players without a hand (e.g. joined during GAME_OVER).
        #[serde(skip_serializing_if = "Option::is_none")]
        your_card: Option<Card>,
        center_card: Card,
        deck_remaining: usize,
    },
    #[serde(rename_all = "camelCase")]
    RoundWinner {
        winner_id: PlayerId,
        symbol_id: u32,
        round_number: u32,
        scores: Vec<ScoreEntry>,
    },
    /// Sent only to the player who attempted an invalid match.
    #[serde(rename_all = "camelCase")]
    Penalty {
        duration_ms: u64,
        server_timestamp: i64,
    },
    #[serde(rename_all = "camelCase")]
    GameOver {
        reason: GameOverReason,
        final_scores: Vec<ScoreEntry>,
        #[serde(skip_serializing_if = "Option::is_none")]
        bonus_awarded: Option<u32>,
        rejoin_window_ms: u64,
    },
    #[serde(rename_all = "camelCase")]
    PlayAgainAck { player_id: PlayerId },
    /// The lone player left after the rejoin window is closed out.
    SoloRejoinBoot { message: String },
    /// Terminal frame before the room destroys itself.
    RoomExpired { reason: String },
    #[serde(rename_all = "camelCase")]
    Pong {
        client_timestamp: i64,
        server_timestamp: i64,
    },
    Error { code: ErrorCode, message: String },
}

impl ServerMessage {
    /// Convenience constructor for protocol errors.
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Error {
            code,
            message: message.into(),
        }
    }
}
