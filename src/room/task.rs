//! The per-room task.
//!
//! One task owns one room. It receives every event targeting the room
//! (decoded frames, socket closures, timer firings) from a single queue
//! and processes them in FIFO order. Different rooms run in parallel;
//! within a room nothing is concurrent, which is what makes match
//! arbitration race-free.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::RoomTimings;
use crate::protocol::{
    ClientMessage, ConnectionId, ErrorCode, PlayerId, RoomPhase, ServerMessage,
};

use super::event::{ConnectionHandle, RoomEvent};
use super::state::{ConnectionEntry, RoomState};
use super::timers::{TimerFired, TimerKind, TimerManager};

/// Cheap, cloneable address of a live room task.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    pub code: String,
    tx: mpsc::UnboundedSender<RoomEvent>,
}

impl RoomHandle {
    /// Enqueue an event. Returns false when the room task has stopped.
    pub fn send(&self, event: RoomEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Whether the room task has terminated.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Spawn a fresh room in WAITING and return its handle.
///
/// The room arms its idle timer immediately: a room nobody joins destroys
/// itself after the idle timeout.
pub fn spawn_room(code: &str, timings: RoomTimings) -> RoomHandle {
    spawn_room_seeded(code, timings, None)
}

/// Like [`spawn_room`] but with a fixed RNG seed, for deterministic decks
/// in tests.
pub fn spawn_room_seeded(code: &str, timings: RoomTimings, seed: Option<u64>) -> RoomHandle {
    let (tx, rx) = mpsc::unbounded_channel();
    let task = RoomTask {
        state: RoomState::new(code.to_string(), seed),
        timers: TimerManager::new(tx.clone()),
        timings,
        tx: tx.clone(),
        running: true,
    };
    tokio::spawn(task.run(rx));
    RoomHandle {
        code: code.to_string(),
        tx,
    }
}

pub(crate) struct RoomTask {
    pub(crate) state: RoomState,
    pub(crate) timers: TimerManager,
    pub(crate) timings: RoomTimings,
    /// The room's own sender, used to requeue synthetic events (e.g. a
    /// connection whose writer queue overflowed mid-broadcast).
    pub(crate) tx: mpsc::UnboundedSender<RoomEvent>,
    pub(crate) running: bool,
}

impl RoomTask {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<RoomEvent>) {
        tracing::info!(code = %self.state.code, "Room created");
        self.rearm_idle_timer();

        while self.running {
            let Some(event) = rx.recv().await else {
                break;
            };
            self.handle_event(event);
        }

        self.timers.cancel_all();
        self.state.connections.clear();
        tracing::info!(code = %self.state.code, "Room task stopped");
    }

    fn handle_event(&mut self, event: RoomEvent) {
        match event {
            RoomEvent::Attach { conn, reconnect_id } => self.handle_attach(conn, reconnect_id),
            RoomEvent::Frame { conn_id, message } => self.handle_frame(conn_id, message),
            RoomEvent::Malformed { conn_id, detail } => self.handle_malformed(conn_id, &detail),
            RoomEvent::Closed { conn_id } => self.handle_closed(conn_id),
            RoomEvent::Timer(fired) => self.handle_timer(fired),
        }
    }

    fn handle_attach(&mut self, conn: ConnectionHandle, reconnect_id: Option<PlayerId>) {
        let conn_id = conn.id;
        tracing::debug!(code = %self.state.code, %conn_id, "Connection attached");
        self.state
            .connections
            .insert(conn_id, ConnectionEntry {
                handle: conn,
                player: None,
            });

        // URL-based reconnect intent; the post-connect `reconnect` frame is
        // the preferred path and goes through the same handler.
        if let Some(player_id) = reconnect_id {
            self.handle_reconnect(conn_id, player_id);
        }
    }

    /// Route one decoded frame into the state machine.
    fn handle_frame(&mut self, conn_id: ConnectionId, message: ClientMessage) {
        if !self.state.connections.contains_key(&conn_id) {
            // The connection was dropped earlier in the queue; late frames
            // from it are meaningless.
            return;
        }

        match message {
            ClientMessage::Join { player_name } => self.handle_join(conn_id, player_name),
            ClientMessage::Reconnect { player_id } => self.handle_reconnect(conn_id, player_id),
            ClientMessage::Leave {} => self.handle_leave(conn_id),
            ClientMessage::SetConfig { config } => self.handle_set_config(conn_id, config),
            ClientMessage::StartGame { config } => self.handle_start_game(conn_id, config),
            ClientMessage::MatchAttempt {
                symbol_id,
                client_timestamp,
            } => self.handle_match_attempt(conn_id, symbol_id, client_timestamp),
            ClientMessage::PlayAgain {} => self.handle_play_again(conn_id),
            ClientMessage::Ping { timestamp } => self.handle_ping(conn_id, timestamp),
        }
    }

    fn handle_malformed(&mut self, conn_id: ConnectionId, detail: &str) {
        tracing::debug!(code = %self.state.code, %conn_id, detail, "Rejected malformed frame");
        self.send_to_conn(
            conn_id,
            ServerMessage::error(ErrorCode::BadMessage, detail.to_string()),
        );
    }

    fn handle_ping(&mut self, conn_id: ConnectionId, client_timestamp: i64) {
        self.send_to_conn(
            conn_id,
            ServerMessage::Pong {
                client_timestamp,
                server_timestamp: now_ms(),
            },
        );
    }

    fn handle_timer(&mut self, fired: TimerFired) {
        if !self.timers.accept(fired) {
            tracing::trace!(code = %self.state.code, ?fired, "Dropped stale timer firing");
            return;
        }

        match fired.kind {
            TimerKind::RoomIdle => self.handle_idle_expiry(),
            TimerKind::CountdownTick => self.handle_countdown_tick(),
            TimerKind::InterRound => self.handle_inter_round_expiry(),
            TimerKind::DisconnectGrace(player_id) => self.handle_grace_expiry(player_id),
            TimerKind::RejoinWindow => self.handle_rejoin_window_expiry(),
        }
    }

    fn handle_idle_expiry(&mut self) {
        if self.state.phase != RoomPhase::Waiting {
            return;
        }
        tracing::info!(code = %self.state.code, "Room idle timeout");
        self.destroy_room("idle");
    }

    /// Rearm the idle-destruction timer to now + idle window. Armed while
    /// WAITING only; the countdown cancels it and gameplay phases manage
    /// room lifetime through their own timers.
    pub(crate) fn rearm_idle_timer(&mut self) {
        self.timers.arm(TimerKind::RoomIdle, self.timings.room_idle);
    }

    /// Epoch-millisecond deadline of the idle timer, surfaced to clients
    /// as `roomExpiresAt`.
    pub(crate) fn room_expires_at(&self) -> Option<i64> {
        self.timers.deadline_ms(TimerKind::RoomIdle)
    }

    /// Terminal teardown: tell everyone, close everything, stop the task.
    /// Recovery is local to the room; neighbors are untouched.
    pub(crate) fn destroy_room(&mut self, reason: &str) {
        tracing::info!(code = %self.state.code, reason, "Destroying room");
        self.broadcast(ServerMessage::RoomExpired {
            reason: reason.to_string(),
        });
        self.timers.cancel_all();
        // Dropping the entries drops the writer senders; writers flush
        // their queues and close the sockets.
        self.state.connections.clear();
        self.running = false;
    }

    /// Close one connection from the server side. The reader task will
    /// observe the socket closing and enqueue `Closed`, which is a no-op
    /// by then.
    pub(crate) fn drop_connection(&mut self, conn_id: ConnectionId) {
        self.state.connections.remove(&conn_id);
    }

    /// Queue a synthetic `Closed` for a connection whose writer queue
    /// overflowed. Processing it through the queue (instead of recursing
    /// here) keeps disconnect handling serialized with everything else.
    pub(crate) fn mark_connection_dead(&self, conn_id: ConnectionId) {
        let _ = self.tx.send(RoomEvent::Closed { conn_id });
    }
}

/// Wall-clock now in epoch milliseconds, as carried by wire timestamps.
pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
