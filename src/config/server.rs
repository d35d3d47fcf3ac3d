//! Room timing configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults::{
    default_countdown_seconds, default_disconnect_grace_ms, default_inter_round_ms,
    default_penalty_ms, default_rejoin_window_ms, default_room_idle_ms,
};

/// Server configuration for room lifecycle timing.
///
/// The defaults are the protocol's published constants; changing them
/// changes what connected clients experience, so production deployments
/// normally leave all of these alone.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Seconds counted down before a game starts (one broadcast per second)
    #[serde(default = "default_countdown_seconds")]
    pub countdown_seconds: u8,
    /// Pause between a round win and the next round (milliseconds)
    #[serde(default = "default_inter_round_ms")]
    pub inter_round_ms: u64,
    /// Lockout after an invalid match attempt (milliseconds)
    #[serde(default = "default_penalty_ms")]
    pub penalty_ms: u64,
    /// How long a disconnected player keeps their seat (milliseconds)
    #[serde(default = "default_disconnect_grace_ms")]
    pub disconnect_grace_ms: u64,
    /// How long after game over rematch requests are accepted (milliseconds)
    #[serde(default = "default_rejoin_window_ms")]
    pub rejoin_window_ms: u64,
    /// How long an inactive WAITING room survives (milliseconds)
    #[serde(default = "default_room_idle_ms")]
    pub room_idle_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            countdown_seconds: default_countdown_seconds(),
            inter_round_ms: default_inter_round_ms(),
            penalty_ms: default_penalty_ms(),
            disconnect_grace_ms: default_disconnect_grace_ms(),
            rejoin_window_ms: default_rejoin_window_ms(),
            room_idle_ms: default_room_idle_ms(),
        }
    }
}

impl ServerConfig {
    /// Resolve the raw config numbers into the durations the room task
    /// arms its timers with.
    pub fn timings(&self) -> RoomTimings {
        RoomTimings {
            countdown_start: self.countdown_seconds,
            countdown_tick: Duration::from_secs(1),
            inter_round: Duration::from_millis(self.inter_round_ms),
            penalty: Duration::from_millis(self.penalty_ms),
            disconnect_grace: Duration::from_millis(self.disconnect_grace_ms),
            rejoin_window: Duration::from_millis(self.rejoin_window_ms),
            room_idle: Duration::from_millis(self.room_idle_ms),
        }
    }
}

/// Resolved timer durations handed to each room task.
#[derive(Debug, Clone, Copy)]
pub struct RoomTimings {
    /// Initial value of the start countdown, in ticks.
    pub countdown_start: u8,
    pub countdown_tick: Duration,
    pub inter_round: Duration,
    pub penalty: Duration,
    pub disconnect_grace: Duration,
    pub rejoin_window: Duration,
    pub room_idle: Duration,
}

impl Default for RoomTimings {
    fn default() -> Self {
        ServerConfig::default().timings()
    }
}
