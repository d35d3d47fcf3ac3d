//! Events consumed by a room task.
//!
//! Everything that can touch room state (parsed frames, socket lifecycle,
//! timer firings) arrives through one FIFO queue and is handled by the
//! room's single consumer. Arbitration order *is* queue order.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::protocol::{ClientMessage, ConnectionId, PlayerId, ServerMessage};

use super::timers::TimerFired;

/// Handle for delivering frames to one connection's writer task.
///
/// The channel is bounded: a recipient that cannot keep up is dropped
/// rather than allowed to stall the room loop.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    pub id: ConnectionId,
    tx: mpsc::Sender<Arc<ServerMessage>>,
}

impl ConnectionHandle {
    pub fn new(id: ConnectionId, tx: mpsc::Sender<Arc<ServerMessage>>) -> Self {
        Self { id, tx }
    }

    /// Queue a frame for delivery. Returns false when the writer is gone or
    /// its queue is full; the caller treats either as a dead connection.
    pub fn push(&self, message: Arc<ServerMessage>) -> bool {
        self.tx.try_send(message).is_ok()
    }
}

/// An event on a room's queue.
#[derive(Debug)]
pub enum RoomEvent {
    /// A new socket attached to this room. `reconnect_id` carries the
    /// `?reconnectId=` query parameter when the client used URL-based
    /// reconnect; the preferred path is a post-connect `reconnect` frame.
    Attach {
        conn: ConnectionHandle,
        reconnect_id: Option<PlayerId>,
    },
    /// A decoded inbound frame from a connection.
    Frame {
        conn_id: ConnectionId,
        message: ClientMessage,
    },
    /// An inbound frame that failed to decode. Answered with `BAD_MESSAGE`;
    /// never mutates state.
    Malformed {
        conn_id: ConnectionId,
        detail: String,
    },
    /// The socket's read side ended (close frame, transport error, or the
    /// writer dropped it for being too slow).
    Closed { conn_id: ConnectionId },
    /// A one-shot timer fired.
    Timer(TimerFired),
}
