//! Match arbitration.
//!
//! Attempts are adjudicated strictly in the order they come off the room
//! queue: the first valid claim wins the round because nothing else can
//! run between validation and the phase change. Client timestamps never
//! influence the outcome; they exist for latency display only.

use tokio::time::Instant;

use crate::protocol::{ConnectionId, RoomPhase, ServerMessage};

use super::task::{now_ms, RoomTask};
use super::timers::TimerKind;

impl RoomTask {
    pub(crate) fn handle_match_attempt(
        &mut self,
        conn_id: ConnectionId,
        symbol_id: u32,
        _client_timestamp: i64,
    ) {
        let Some(player_id) = self.state.bound_player(conn_id) else {
            return;
        };
        // Attempts outside an open round carry no information: the sender
        // raced a round that already ended. Not an error, not a penalty.
        if self.state.phase != RoomPhase::Playing {
            return;
        }

        let now = Instant::now();
        let Some(player) = self.state.player(player_id) else {
            return;
        };
        if player.penalty_until.is_some_and(|until| now < until) {
            tracing::trace!(code = %self.state.code, %player_id, "Attempt ignored during penalty");
            return;
        }

        let valid = player.hand.as_ref().is_some_and(|hand| hand.has_symbol(symbol_id))
            && self
                .state
                .center_card
                .as_ref()
                .is_some_and(|center| center.has_symbol(symbol_id));

        if !valid {
            let duration = self.timings.penalty;
            if let Some(player) = self.state.player_mut(player_id) {
                player.penalty_until = Some(now + duration);
            }
            tracing::debug!(code = %self.state.code, %player_id, symbol_id, "Invalid match attempt");
            self.send_to_player(
                player_id,
                ServerMessage::Penalty {
                    duration_ms: duration.as_millis() as u64,
                    server_timestamp: now_ms(),
                },
            );
            return;
        }

        self.award_round(player_id, symbol_id);
    }

    /// First valid attempt of the round: score it, rotate the winner's
    /// card into the center, and pause before the next round.
    fn award_round(&mut self, winner_id: crate::protocol::PlayerId, symbol_id: u32) {
        let round_number = self.state.round_number;
        let winning_hand = {
            let Some(winner) = self.state.player_mut(winner_id) else {
                return;
            };
            winner.score += 1;
            winner.hand.take()
        };
        // The winner's card becomes the new center; their next card comes
        // off the deck tail (and may be nothing when the deck runs dry).
        self.state.center_card = winning_hand;
        let next_hand = self.state.deck.pop_front();
        if let Some(winner) = self.state.player_mut(winner_id) {
            winner.hand = next_hand;
        }
        self.state.phase = RoomPhase::RoundEnd;

        tracing::info!(
            code = %self.state.code,
            %winner_id,
            symbol_id,
            round_number,
            deck_remaining = self.state.deck.len(),
            "Round won"
        );
        self.broadcast(ServerMessage::RoundWinner {
            winner_id,
            symbol_id,
            round_number,
            scores: self.state.score_entries(),
        });
        self.timers.arm(TimerKind::InterRound, self.timings.inter_round);
    }
}
