//! Phase machine: WAITING ↔ COUNTDOWN → PLAYING ↔ ROUND_END → GAME_OVER.
//!
//! Transitions are driven by frames (start_game, play_again), roster
//! changes, and timer firings, all serialized through the room queue.

use crate::deck::{self, card_sets};
use crate::protocol::types::MIN_PLAYERS_TO_PLAY;
use crate::protocol::{
    ConnectionId, ErrorCode, GameConfig, GameOverReason, PlayerStatus, RoomPhase, ServerMessage,
};

use super::task::RoomTask;
use super::timers::TimerKind;

impl RoomTask {
    pub(crate) fn handle_set_config(&mut self, conn_id: ConnectionId, config: GameConfig) {
        let Some(player_id) = self.state.bound_player(conn_id) else {
            self.send_invalid_state(conn_id, "join the room before configuring it");
            return;
        };
        if self.state.phase != RoomPhase::Waiting {
            self.send_invalid_state(conn_id, "config can only change while waiting");
            return;
        }
        if self.state.host_id() != Some(player_id) {
            self.send_to_conn(
                conn_id,
                ServerMessage::error(ErrorCode::Unauthorized, ErrorCode::Unauthorized.description()),
            );
            return;
        }
        if let Err(reason) = config.validate() {
            self.send_to_conn(conn_id, ServerMessage::error(ErrorCode::BadMessage, reason));
            return;
        }

        tracing::info!(code = %self.state.code, ?config, "Config updated");
        self.state.config = config.clone();
        self.rearm_idle_timer();
        self.broadcast(ServerMessage::ConfigUpdated { config });
        self.maybe_auto_start();
    }

    pub(crate) fn handle_start_game(&mut self, conn_id: ConnectionId, config: Option<GameConfig>) {
        let Some(player_id) = self.state.bound_player(conn_id) else {
            self.send_invalid_state(conn_id, "join the room before starting it");
            return;
        };
        if self.state.phase != RoomPhase::Waiting {
            self.send_invalid_state(conn_id, "the game can only start from the waiting phase");
            return;
        }
        if self.state.host_id() != Some(player_id) {
            self.send_to_conn(
                conn_id,
                ServerMessage::error(ErrorCode::Unauthorized, ErrorCode::Unauthorized.description()),
            );
            return;
        }
        if self.state.connected_count() < MIN_PLAYERS_TO_PLAY {
            self.send_invalid_state(conn_id, "need at least 2 connected players to start");
            return;
        }

        if let Some(config) = config {
            if let Err(reason) = config.validate() {
                self.send_to_conn(conn_id, ServerMessage::error(ErrorCode::BadMessage, reason));
                return;
            }
            self.state.config = config.clone();
            self.broadcast(ServerMessage::ConfigUpdated { config });
        }

        self.begin_countdown();
    }

    /// Auto-start when the connected count reaches the configured target.
    /// Shares the countdown guard with the manual path, so it can never
    /// bypass the two-player minimum.
    pub(crate) fn maybe_auto_start(&mut self) {
        if self.state.phase != RoomPhase::Waiting {
            return;
        }
        let Some(target) = self.state.config.target_players else {
            return;
        };
        if self.state.connected_count() == target as usize {
            tracing::info!(code = %self.state.code, target, "Target player count reached");
            self.begin_countdown();
        }
    }

    pub(crate) fn begin_countdown(&mut self) {
        if self.state.phase != RoomPhase::Waiting
            || self.state.connected_count() < MIN_PLAYERS_TO_PLAY
        {
            return;
        }
        tracing::info!(code = %self.state.code, "Countdown started");
        self.state.phase = RoomPhase::Countdown;
        self.state.countdown_remaining = self.timings.countdown_start;
        self.timers.cancel(TimerKind::RoomIdle);
        self.broadcast(ServerMessage::Countdown {
            seconds: self.state.countdown_remaining as i8,
        });
        self.timers
            .arm(TimerKind::CountdownTick, self.timings.countdown_tick);
    }

    pub(crate) fn handle_countdown_tick(&mut self) {
        if self.state.phase != RoomPhase::Countdown {
            return;
        }
        if self.state.connected_count() < MIN_PLAYERS_TO_PLAY {
            self.cancel_countdown();
            return;
        }

        self.state.countdown_remaining = self.state.countdown_remaining.saturating_sub(1);
        self.broadcast(ServerMessage::Countdown {
            seconds: self.state.countdown_remaining as i8,
        });
        if self.state.countdown_remaining == 0 {
            self.start_playing();
        } else {
            self.timers
                .arm(TimerKind::CountdownTick, self.timings.countdown_tick);
        }
    }

    /// Abort the countdown and fall back to WAITING. Clients are told via
    /// the `-1` sentinel, then converge on a fresh room state carrying the
    /// rearmed idle deadline.
    pub(crate) fn cancel_countdown(&mut self) {
        if self.state.phase != RoomPhase::Countdown {
            return;
        }
        tracing::info!(code = %self.state.code, "Countdown cancelled");
        self.timers.cancel(TimerKind::CountdownTick);
        self.state.phase = RoomPhase::Waiting;
        self.state.countdown_remaining = 0;
        self.broadcast(ServerMessage::Countdown { seconds: -1 });
        self.rearm_idle_timer();
        self.broadcast_room_state();
    }

    /// Countdown hit zero: build the deck, deal, and open round one.
    fn start_playing(&mut self) {
        let pool = card_sets::resolve_pool(&self.state.config.card_set_id);
        let mut cards = match deck::generate(deck::DECK_ORDER, &pool) {
            Ok(cards) => cards,
            Err(err) => {
                // Unreachable with a well-formed pool; refusing to deal a
                // bad deck beats corrupting a game.
                tracing::error!(code = %self.state.code, error = %err, "Deck generation failed");
                self.destroy_room("internal");
                return;
            }
        };
        deck::shuffle(&mut cards, &mut self.state.rng);
        cards.truncate(self.state.config.game_duration.card_count());
        self.state.deck = cards.into();

        // Every roster seat gets a hand, including seats in grace: a
        // reconnecting player resumes with the card they were dealt.
        for player in &mut self.state.players {
            player.score = 0;
            player.penalty_until = None;
            player.hand = self.state.deck.pop_front();
        }
        self.state.center_card = self.state.deck.pop_front();
        self.state.round_number = 1;
        self.state.players_want_rematch.clear();
        self.state.phase = RoomPhase::Playing;

        tracing::info!(
            code = %self.state.code,
            players = self.state.players.len(),
            deck_remaining = self.state.deck.len(),
            "Game started"
        );
        self.broadcast_round_start();
    }

    /// The post-win pause ended; open the next round or end the game.
    pub(crate) fn handle_inter_round_expiry(&mut self) {
        if self.state.phase != RoomPhase::RoundEnd {
            return;
        }

        if self.state.deck.is_empty() {
            self.finish_game(GameOverReason::DeckExhausted, None);
            return;
        }

        if self.state.connected_count() < MIN_PLAYERS_TO_PLAY {
            // Grace periods are still pending (otherwise termination would
            // already have fired); hold the round until they resolve.
            self.timers.arm(TimerKind::InterRound, self.timings.inter_round);
            return;
        }

        self.state.round_number += 1;
        self.state.phase = RoomPhase::Playing;
        self.broadcast_round_start();
    }

    /// Below two players with no grace pending: the game cannot continue.
    /// The survivor banks one point per undealt card.
    pub(crate) fn finish_last_player_standing(&mut self) {
        let bonus = self.state.deck.len() as u32;
        let survivor = self
            .state
            .players
            .iter_mut()
            .find(|p| p.status == PlayerStatus::Connected);
        let Some(survivor) = survivor else {
            self.destroy_room("abandoned");
            return;
        };
        survivor.score += bonus;
        let survivor_id = survivor.id;
        tracing::info!(
            code = %self.state.code,
            %survivor_id,
            bonus,
            "Last player standing"
        );
        self.finish_game(GameOverReason::LastPlayerStanding, Some(bonus));
    }

    /// Re-check the player minimum after a grace period resolves by
    /// reconnect: if the reconnect still leaves the room below minimum
    /// with no other grace pending, termination is now irrevocable.
    pub(crate) fn check_mid_game_termination(&mut self) {
        if !self.state.in_round() {
            return;
        }
        if self.state.connected_count() >= MIN_PLAYERS_TO_PLAY {
            return;
        }
        if !self.timers.pending_grace().is_empty() {
            return;
        }
        self.finish_last_player_standing();
    }

    /// Enter GAME_OVER and open the rejoin window.
    fn finish_game(&mut self, reason: GameOverReason, bonus_awarded: Option<u32>) {
        self.timers.cancel(TimerKind::InterRound);
        self.state.phase = RoomPhase::GameOver;
        self.state.players_want_rematch.clear();

        let rejoin_window_ms = self.timings.rejoin_window.as_millis() as u64;
        tracing::info!(code = %self.state.code, ?reason, "Game over");
        self.broadcast(ServerMessage::GameOver {
            reason,
            final_scores: self.state.score_entries(),
            bonus_awarded,
            rejoin_window_ms,
        });
        self.timers
            .arm(TimerKind::RejoinWindow, self.timings.rejoin_window);
    }

    pub(crate) fn handle_play_again(&mut self, conn_id: ConnectionId) {
        let Some(player_id) = self.state.bound_player(conn_id) else {
            self.send_invalid_state(conn_id, "join the room before requesting a rematch");
            return;
        };
        if self.state.phase != RoomPhase::GameOver {
            self.send_invalid_state(conn_id, "rematches can only be requested after game over");
            return;
        }
        if self.state.players_want_rematch.insert(player_id) {
            tracing::info!(code = %self.state.code, %player_id, "Rematch requested");
            self.broadcast(ServerMessage::PlayAgainAck { player_id });
        }
    }

    /// The rejoin window closed: either reset for a rematch or tear the
    /// room down.
    pub(crate) fn handle_rejoin_window_expiry(&mut self) {
        if self.state.phase != RoomPhase::GameOver {
            return;
        }

        let rematch_votes = self.state.players_want_rematch.len();
        if rematch_votes >= MIN_PLAYERS_TO_PLAY {
            self.reset_for_rematch();
            return;
        }

        tracing::info!(
            code = %self.state.code,
            rematch_votes,
            "Rejoin window closed without a rematch"
        );
        let connected: Vec<_> = self
            .state
            .players
            .iter()
            .filter(|p| p.is_connected())
            .map(|p| p.id)
            .collect();
        if connected.len() == 1 {
            self.send_to_player(
                connected[0],
                ServerMessage::SoloRejoinBoot {
                    message: "Nobody rejoined for a rematch".to_string(),
                },
            );
        }
        self.destroy_room("rejoin_window_closed");
    }

    /// Enough rematch votes: back to WAITING with the surviving roster.
    /// Seats still in grace are released; connected players keep their
    /// identity with a zeroed score.
    fn reset_for_rematch(&mut self) {
        tracing::info!(code = %self.state.code, "Resetting room for rematch");

        let stale: Vec<_> = self
            .state
            .players
            .iter()
            .filter(|p| !p.is_connected())
            .map(|p| p.id)
            .collect();
        for player_id in stale {
            self.timers.cancel(TimerKind::DisconnectGrace(player_id));
            self.state.remove_player_record(player_id);
            self.broadcast(ServerMessage::PlayerLeft { player_id });
        }

        for player in &mut self.state.players {
            player.score = 0;
            player.hand = None;
            player.penalty_until = None;
        }
        self.state.deck.clear();
        self.state.center_card = None;
        self.state.round_number = 0;
        self.state.players_want_rematch.clear();
        self.state.phase = RoomPhase::Waiting;

        if let Some(promoted) = self.state.ensure_host() {
            self.broadcast(ServerMessage::HostChanged {
                player_id: promoted,
            });
        }
        self.rearm_idle_timer();
        self.broadcast_room_state();
    }

    pub(crate) fn send_invalid_state(&self, conn_id: ConnectionId, detail: &str) {
        self.send_to_conn(
            conn_id,
            ServerMessage::error(ErrorCode::InvalidState, detail.to_string()),
        );
    }
}
