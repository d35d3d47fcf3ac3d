//! Player identity: joins, reconnects, leaves, disconnects.
//!
//! A player is the durable entity; a connection is a transient capability
//! to deliver and receive frames. The grace period exists precisely to
//! keep the player alive while their stream is absent.

use crate::protocol::types::MAX_PLAYERS_PER_ROOM;
use crate::protocol::{
    validate_player_name, ConnectionId, ErrorCode, PlayerId, PlayerStatus, RoomPhase,
    ServerMessage,
};

use super::state::Player;
use super::task::RoomTask;
use super::timers::TimerKind;

/// Why a player is being removed from the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RemovalCause {
    /// Explicit `leave` message. Takes effect immediately.
    Leave,
    /// Disconnect grace period expired without a reconnect.
    GraceExpired,
}

impl RoomTask {
    pub(crate) fn handle_join(&mut self, conn_id: ConnectionId, requested_name: String) {
        // Race rule: once a connection has a player bound (by either join
        // or reconnect), later `join` frames on it are silently ignored.
        // This defeats client retries that send both a reconnect and a
        // fallback join.
        if self.state.bound_player(conn_id).is_some() {
            tracing::debug!(code = %self.state.code, %conn_id, "Ignoring join on bound connection");
            return;
        }

        if let Err(reason) = validate_player_name(&requested_name) {
            self.send_to_conn(conn_id, ServerMessage::error(ErrorCode::BadMessage, reason));
            return;
        }

        if !matches!(self.state.phase, RoomPhase::Waiting | RoomPhase::GameOver) {
            self.reject_and_close(conn_id, ErrorCode::GameInProgress);
            return;
        }

        if self.state.players.len() >= MAX_PLAYERS_PER_ROOM {
            self.reject_and_close(conn_id, ErrorCode::RoomFull);
            return;
        }

        let name = self.state.resolve_duplicate_name(requested_name.trim());
        let was_empty = self.state.players.is_empty();
        let player = Player::new(name, conn_id);
        let player_id = player.id;
        tracing::info!(
            code = %self.state.code,
            %player_id,
            name = %player.name,
            "Player joined"
        );
        self.state.players.push(player);
        if let Some(entry) = self.state.connections.get_mut(&conn_id) {
            entry.player = Some(player_id);
        }
        // First connected seat takes the host flag. This covers both the
        // empty room and a roster whose every other seat sits in grace.
        let promoted = self.state.ensure_host();

        if self.state.phase == RoomPhase::Waiting {
            self.rearm_idle_timer();
        }

        self.broadcast_player_joined(player_id);
        if let (Some(promoted), false) = (promoted, was_empty) {
            self.broadcast(ServerMessage::HostChanged {
                player_id: promoted,
            });
        }
        self.send_room_state(player_id);
        self.maybe_auto_start();
    }

    pub(crate) fn handle_reconnect(&mut self, conn_id: ConnectionId, player_id: PlayerId) {
        if self.state.bound_player(conn_id).is_some() {
            tracing::debug!(
                code = %self.state.code,
                %conn_id,
                "Ignoring reconnect on bound connection"
            );
            return;
        }

        let reconnectable = self
            .state
            .player(player_id)
            .is_some_and(|p| p.status == PlayerStatus::Disconnected);
        if !reconnectable {
            // Unknown id, or the seat is live on another stream: either
            // way this stream cannot take it over.
            self.reject_and_close(conn_id, ErrorCode::GameInProgress);
            return;
        }

        self.timers.cancel(TimerKind::DisconnectGrace(player_id));
        if let Some(player) = self.state.player_mut(player_id) {
            player.status = PlayerStatus::Connected;
            player.connection = Some(conn_id);
        }
        if let Some(entry) = self.state.connections.get_mut(&conn_id) {
            entry.player = Some(player_id);
        }
        tracing::info!(code = %self.state.code, %player_id, "Player reconnected");

        if let Some(promoted) = self.state.ensure_host() {
            self.broadcast(ServerMessage::HostChanged {
                player_id: promoted,
            });
        }
        if self.state.phase == RoomPhase::Waiting {
            self.rearm_idle_timer();
        }

        // Everyone converges on the rebound roster; no player_joined is
        // emitted for a reconnect.
        self.broadcast_room_state();
        self.maybe_auto_start();
        // This reconnect may have been the last pending grace period of a
        // room already below minimum; settle the termination decision now.
        self.check_mid_game_termination();
    }

    pub(crate) fn handle_leave(&mut self, conn_id: ConnectionId) {
        match self.state.bound_player(conn_id) {
            Some(player_id) => {
                tracing::info!(code = %self.state.code, %player_id, "Player left");
                self.remove_player(player_id, RemovalCause::Leave);
            }
            None => {
                // A spectating (never-joined) connection saying goodbye.
                self.drop_connection(conn_id);
            }
        }
    }

    /// A connection's read side ended: transport error, close frame, or a
    /// server-side drop of a slow writer. The player keeps their seat for
    /// the grace period.
    pub(crate) fn handle_closed(&mut self, conn_id: ConnectionId) {
        let Some(entry) = self.state.connections.remove(&conn_id) else {
            return;
        };
        let Some(player_id) = entry.player else {
            tracing::debug!(code = %self.state.code, %conn_id, "Unbound connection closed");
            return;
        };

        // A reconnect may already have bound a newer stream to this seat;
        // the stale closure then carries no information.
        let is_current = self
            .state
            .player(player_id)
            .is_some_and(|p| p.connection == Some(conn_id));
        if !is_current {
            return;
        }

        if let Some(player) = self.state.player_mut(player_id) {
            player.connection = None;
            player.status = PlayerStatus::Disconnected;
        }
        tracing::info!(code = %self.state.code, %player_id, "Player disconnected, grace period started");

        self.broadcast(ServerMessage::PlayerDisconnected { player_id });
        if let Some(promoted) = self.state.ensure_host() {
            self.broadcast(ServerMessage::HostChanged {
                player_id: promoted,
            });
        }
        self.timers.arm(
            TimerKind::DisconnectGrace(player_id),
            self.timings.disconnect_grace,
        );

        // A countdown cannot survive dropping below two connected players.
        if self.state.phase == RoomPhase::Countdown
            && self.state.connected_count() < crate::protocol::types::MIN_PLAYERS_TO_PLAY
        {
            self.cancel_countdown();
        }
    }

    pub(crate) fn handle_grace_expiry(&mut self, player_id: PlayerId) {
        let still_disconnected = self
            .state
            .player(player_id)
            .is_some_and(|p| p.status == PlayerStatus::Disconnected);
        if !still_disconnected {
            return;
        }
        tracing::info!(code = %self.state.code, %player_id, "Grace period expired");
        self.remove_player(player_id, RemovalCause::GraceExpired);
    }

    /// Remove a player from the roster and run the phase consequences.
    ///
    /// In GAME_OVER this must not re-trigger end-of-game logic: the
    /// rematch set and the rejoin-window deadline stay untouched.
    pub(crate) fn remove_player(&mut self, player_id: PlayerId, cause: RemovalCause) {
        let Some(player) = self.state.remove_player_record(player_id) else {
            return;
        };
        self.timers.cancel(TimerKind::DisconnectGrace(player_id));
        if let Some(conn_id) = player.connection {
            self.drop_connection(conn_id);
        }

        self.broadcast(ServerMessage::PlayerLeft { player_id });
        if let Some(promoted) = self.state.ensure_host() {
            self.broadcast(ServerMessage::HostChanged {
                player_id: promoted,
            });
        }

        match self.state.phase {
            RoomPhase::GameOver => {
                // Cleanup only; the rejoin window keeps running and the
                // rematch votes already cast stay counted.
            }
            RoomPhase::Waiting => {
                // Roster shrank; the idle timer keeps its deadline.
            }
            RoomPhase::Countdown => {
                if self.state.connected_count() < crate::protocol::types::MIN_PLAYERS_TO_PLAY {
                    self.cancel_countdown();
                }
            }
            RoomPhase::Playing | RoomPhase::RoundEnd => {
                self.resolve_mid_game_departure(player, cause);
            }
        }
    }

    /// A seat emptied mid-game. Either the game continues (the departed
    /// hand goes to the bottom of the deck, preserving deck conservation)
    /// or the last player standing wins.
    fn resolve_mid_game_departure(&mut self, departed: Player, cause: RemovalCause) {
        let connected = self.state.connected_count();
        let grace_pending = !self.timers.pending_grace().is_empty();

        if connected >= crate::protocol::types::MIN_PLAYERS_TO_PLAY {
            if let Some(hand) = departed.hand {
                self.state.deck.push_back(hand);
            }
            return;
        }

        // Below the minimum. Termination becomes irrevocable only once no
        // grace period can still restore a second player.
        if grace_pending {
            tracing::debug!(
                code = %self.state.code,
                ?cause,
                "Below player minimum but grace periods pending, deferring termination"
            );
            if let Some(hand) = departed.hand {
                self.state.deck.push_back(hand);
            }
            return;
        }

        match connected {
            1 => self.finish_last_player_standing(),
            _ => {
                tracing::info!(code = %self.state.code, "No players remain mid-game");
                self.destroy_room("abandoned");
            }
        }
    }

    /// Reply with a capacity error and close the stream.
    fn reject_and_close(&mut self, conn_id: ConnectionId, code: ErrorCode) {
        tracing::debug!(code = %self.state.code, %conn_id, error = ?code, "Rejecting connection");
        self.send_to_conn(conn_id, ServerMessage::error(code, code.description()));
        self.drop_connection(conn_id);
    }
}
