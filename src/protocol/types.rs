use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use uuid::Uuid;

/// Unique identifier for players. Stable for the lifetime of the room,
/// including across reconnects.
pub type PlayerId = Uuid;
/// Unique identifier for a single WebSocket connection. A player may be
/// served by several connections over their lifetime; a connection serves
/// at most one player.
pub type ConnectionId = Uuid;

/// Room capacity is fixed by the game rules, not configuration.
pub const MAX_PLAYERS_PER_ROOM: usize = 8;
/// Minimum connected players required to start or continue a game.
pub const MIN_PLAYERS_TO_PLAY: usize = 2;

/// Lifecycle phase of a room.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomPhase {
    #[default]
    Waiting,
    Countdown,
    Playing,
    RoundEnd,
    GameOver,
}

/// Whether a player currently has a live connection bound to them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerStatus {
    #[default]
    Connected,
    Disconnected,
}

/// Visual difficulty of the dealt cards. The server never interprets this;
/// it is carried in room config so every client renders the same way.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardDifficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    Insane,
}

/// How many cards a game plays through. Serialized as the literal card
/// count so clients display it without a lookup table.
#[derive(Debug, Clone, Copy, Serialize_repr, Deserialize_repr, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum GameDuration {
    Quick = 10,
    #[default]
    Standard = 25,
    Marathon = 50,
}

impl GameDuration {
    /// Number of cards drawn from the shuffled deck for one game.
    pub fn card_count(self) -> usize {
        self as u8 as usize
    }
}

/// Per-room game configuration, set by the host while WAITING.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub card_difficulty: CardDifficulty,
    pub game_duration: GameDuration,
    pub card_set_id: String,
    /// When set, reaching this many connected players auto-starts the
    /// countdown. Never bypasses the two-player minimum.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_players: Option<u8>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            card_difficulty: CardDifficulty::default(),
            game_duration: GameDuration::default(),
            card_set_id: crate::deck::card_sets::DEFAULT_CARD_SET_ID.to_string(),
            target_players: None,
        }
    }
}

impl GameConfig {
    /// Validate the host-supplied target player count against room capacity.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(target) = self.target_players {
            let target = target as usize;
            if !(MIN_PLAYERS_TO_PLAY..=MAX_PLAYERS_PER_ROOM).contains(&target) {
                return Err(format!(
                    "targetPlayers must be between {MIN_PLAYERS_TO_PLAY} and {MAX_PLAYERS_PER_ROOM}, got {target}"
                ));
            }
        }
        Ok(())
    }
}

/// Why a game ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    DeckExhausted,
    LastPlayerStanding,
}

/// Public view of one roster entry. `is_you` is computed per recipient at
/// broadcast time and is never stored in room state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub name: String,
    pub is_host: bool,
    pub is_you: bool,
    pub status: PlayerStatus,
    pub score: u32,
}

/// One row of a scoreboard (`round_winner` and `game_over` payloads).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub player_id: PlayerId,
    pub name: String,
    pub score: u32,
}
