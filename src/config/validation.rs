//! Configuration validation functions.

use thiserror::Error;

use super::Config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("server.{field} must be greater than zero")]
    ZeroTimer { field: &'static str },
    #[error("server.countdown_seconds must be between 1 and 30, got {0}")]
    CountdownOutOfRange(u8),
    #[error("websocket.max_message_size must be at least 256 bytes, got {0}")]
    MessageSizeTooSmall(usize),
    #[error("websocket.outbound_queue_capacity must be at least 8, got {0}")]
    QueueTooSmall(usize),
}

/// Reject configurations the server cannot run with. Called once by the
/// loader (warn-only) and once by `main` (fatal).
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let server = &config.server;

    for (field, value) in [
        ("inter_round_ms", server.inter_round_ms),
        ("penalty_ms", server.penalty_ms),
        ("disconnect_grace_ms", server.disconnect_grace_ms),
        ("rejoin_window_ms", server.rejoin_window_ms),
        ("room_idle_ms", server.room_idle_ms),
    ] {
        if value == 0 {
            return Err(ConfigError::ZeroTimer { field });
        }
    }

    if server.countdown_seconds == 0 || server.countdown_seconds > 30 {
        return Err(ConfigError::CountdownOutOfRange(server.countdown_seconds));
    }

    if config.websocket.max_message_size < 256 {
        return Err(ConfigError::MessageSizeTooSmall(
            config.websocket.max_message_size,
        ));
    }

    if config.websocket.outbound_queue_capacity < 8 {
        return Err(ConfigError::QueueTooSmall(
            config.websocket.outbound_queue_capacity,
        ));
    }

    Ok(())
}
