//! WebSocket connection settings.

use serde::{Deserialize, Serialize};

use super::defaults::{default_max_message_size, default_outbound_queue_capacity};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WebSocketConfig {
    /// Largest accepted inbound text frame, in bytes. Larger frames are
    /// answered with `BAD_MESSAGE` and dropped.
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
    /// Capacity of the per-connection outbound queue. A recipient whose
    /// queue is full is treated as too slow and disconnected rather than
    /// allowed to stall the room loop.
    #[serde(default = "default_outbound_queue_capacity")]
    pub outbound_queue_capacity: usize,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            max_message_size: default_max_message_size(),
            outbound_queue_capacity: default_outbound_queue_capacity(),
        }
    }
}
