//! Default value functions referenced by the serde attributes in the
//! config types. Each lives here so the JSON schema and the compiled-in
//! defaults cannot drift apart.

use super::logging::LogFormat;

pub fn default_port() -> u16 {
    3541
}

// Server timing defaults. These are the protocol's published constants;
// integration tests override them to keep wall-clock time short.

pub fn default_countdown_seconds() -> u8 {
    3
}

pub fn default_inter_round_ms() -> u64 {
    2_000
}

pub fn default_penalty_ms() -> u64 {
    3_000
}

pub fn default_disconnect_grace_ms() -> u64 {
    5_000
}

pub fn default_rejoin_window_ms() -> u64 {
    10_000
}

pub fn default_room_idle_ms() -> u64 {
    60_000
}

// WebSocket defaults

pub fn default_max_message_size() -> usize {
    16 * 1024
}

pub fn default_outbound_queue_capacity() -> usize {
    64
}

// Security defaults

pub fn default_cors_origins() -> String {
    "*".to_string()
}

// Logging defaults

pub fn default_log_dir() -> String {
    "logs".to_string()
}

pub fn default_log_filename() -> String {
    "symbol-snap.log".to_string()
}

pub fn default_rotation() -> String {
    "daily".to_string()
}

pub fn default_enable_file_logging() -> bool {
    false
}

pub fn default_log_format() -> LogFormat {
    LogFormat::Text
}
