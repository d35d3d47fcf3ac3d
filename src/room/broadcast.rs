//! Outbound fan-out.
//!
//! Two primitives: send to one player, broadcast to every connected
//! player. Personalized fields (`yourCard`, `isYou`) are computed per
//! recipient at send time and never stored in shared state. For any one
//! recipient, delivery order equals the order the room emitted.

use std::sync::Arc;

use crate::protocol::{
    ConnectionId, PlayerId, RoomPhase, RoomStatePayload, ServerMessage,
};

use super::task::RoomTask;

impl RoomTask {
    /// Deliver a frame to one connection, bound or not. A full writer
    /// queue marks the connection dead; the room never waits for it.
    pub(crate) fn send_to_conn(&self, conn_id: ConnectionId, message: ServerMessage) {
        let Some(entry) = self.state.connections.get(&conn_id) else {
            return;
        };
        if !entry.handle.push(Arc::new(message)) {
            tracing::warn!(
                code = %self.state.code,
                %conn_id,
                "Writer queue full or closed, dropping connection"
            );
            self.mark_connection_dead(conn_id);
        }
    }

    /// Deliver a frame to a player's bound connection, if they have one.
    pub(crate) fn send_to_player(&self, player_id: PlayerId, message: ServerMessage) {
        let Some(conn_id) = self
            .state
            .player(player_id)
            .and_then(|p| p.connection)
        else {
            return;
        };
        self.send_to_conn(conn_id, message);
    }

    /// Broadcast an identical frame to every connected player. The frame
    /// is serialized from one shared allocation per recipient queue.
    pub(crate) fn broadcast(&self, message: ServerMessage) {
        let shared = Arc::new(message);
        let mut dead: Vec<ConnectionId> = Vec::new();
        for player in &self.state.players {
            let Some(conn_id) = player.connection else {
                continue;
            };
            let Some(entry) = self.state.connections.get(&conn_id) else {
                continue;
            };
            if !entry.handle.push(Arc::clone(&shared)) {
                dead.push(conn_id);
            }
        }
        for conn_id in dead {
            tracing::warn!(
                code = %self.state.code,
                %conn_id,
                "Writer queue full or closed during broadcast, dropping connection"
            );
            self.mark_connection_dead(conn_id);
        }
    }

    /// Broadcast with a per-recipient projection.
    pub(crate) fn broadcast_projected<F>(&self, mut build: F)
    where
        F: FnMut(PlayerId) -> ServerMessage,
    {
        let mut dead: Vec<ConnectionId> = Vec::new();
        for player in &self.state.players {
            let Some(conn_id) = player.connection else {
                continue;
            };
            let Some(entry) = self.state.connections.get(&conn_id) else {
                continue;
            };
            if !entry.handle.push(Arc::new(build(player.id))) {
                dead.push(conn_id);
            }
        }
        for conn_id in dead {
            self.mark_connection_dead(conn_id);
        }
    }

    /// The full room view as one recipient sees it.
    pub(crate) fn room_state_for(&self, recipient: PlayerId) -> RoomStatePayload {
        let in_round = self.state.in_round();
        RoomStatePayload {
            phase: self.state.phase,
            players: self.state.snapshots_for(recipient),
            config: self.state.config.clone(),
            room_expires_at: self.room_expires_at(),
            center_card: if in_round {
                self.state.center_card.clone()
            } else {
                None
            },
            your_card: if in_round {
                self.state.player(recipient).and_then(|p| p.hand.clone())
            } else {
                None
            },
            deck_remaining: in_round.then(|| self.state.deck.len()),
            round_number: if self.state.phase == RoomPhase::Waiting {
                None
            } else {
                Some(self.state.round_number)
            },
        }
    }

    /// Send the recipient their own view of the room.
    pub(crate) fn send_room_state(&self, player_id: PlayerId) {
        self.send_to_player(
            player_id,
            ServerMessage::RoomState(Box::new(self.room_state_for(player_id))),
        );
    }

    /// Broadcast per-recipient room views to everyone connected.
    pub(crate) fn broadcast_room_state(&self) {
        self.broadcast_projected(|recipient| {
            ServerMessage::RoomState(Box::new(self.room_state_for(recipient)))
        });
    }

    /// Announce a new roster entry. `is_you` is true only on the joiner's
    /// own copy.
    pub(crate) fn broadcast_player_joined(&self, joiner: PlayerId) {
        let Some(player) = self.state.player(joiner) else {
            return;
        };
        let base = crate::protocol::PlayerSnapshot {
            id: player.id,
            name: player.name.clone(),
            is_host: player.is_host,
            is_you: false,
            status: player.status,
            score: player.score,
        };
        self.broadcast_projected(|recipient| {
            let mut snapshot = base.clone();
            snapshot.is_you = recipient == joiner;
            ServerMessage::PlayerJoined { player: snapshot }
        });
    }

    /// Announce a round start with per-recipient hands.
    pub(crate) fn broadcast_round_start(&self) {
        let Some(center) = self.state.center_card.clone() else {
            return;
        };
        let round_number = self.state.round_number;
        let deck_remaining = self.state.deck.len();
        self.broadcast_projected(|recipient| ServerMessage::RoundStart {
            round_number,
            your_card: self.state.player(recipient).and_then(|p| p.hand.clone()),
            center_card: center.clone(),
            deck_remaining,
        });
    }
}
