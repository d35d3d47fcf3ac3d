//! In-memory room state.
//!
//! The room task is the only mutator; nothing here is shared or locked.

use std::collections::{HashMap, HashSet, VecDeque};

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use tokio::time::Instant;

use crate::deck::Card;
use crate::protocol::{
    ConnectionId, GameConfig, PlayerId, PlayerSnapshot, PlayerStatus, RoomPhase, ScoreEntry,
};

/// A durable seat in the room. The player outlives any individual
/// connection: a grace-period reconnect rebinds a fresh stream to the same
/// `Player`, keeping id, name, score and hand.
#[derive(Debug)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_host: bool,
    pub status: PlayerStatus,
    pub score: u32,
    pub hand: Option<Card>,
    /// Match attempts before this instant are ignored.
    pub penalty_until: Option<Instant>,
    /// The currently bound connection, if any.
    pub connection: Option<ConnectionId>,
}

impl Player {
    pub fn new(name: String, connection: ConnectionId) -> Self {
        Self {
            id: PlayerId::new_v4(),
            name,
            is_host: false,
            status: PlayerStatus::Connected,
            score: 0,
            hand: None,
            penalty_until: None,
            connection: Some(connection),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status == PlayerStatus::Connected
    }
}

/// A socket attached to the room. `player` is set once a `join` or
/// `reconnect` binds it; an unbound connection can only ping or bind.
#[derive(Debug)]
pub struct ConnectionEntry {
    pub handle: super::event::ConnectionHandle,
    pub player: Option<PlayerId>,
}

/// Everything a room knows. Owned exclusively by its task.
pub struct RoomState {
    pub code: String,
    pub phase: RoomPhase,
    pub config: GameConfig,
    /// Roster in join order. Capacity is small (≤ 8), so linear scans are
    /// the natural representation and iteration order is stable.
    pub players: Vec<Player>,
    pub connections: HashMap<ConnectionId, ConnectionEntry>,
    /// Undealt tail of the shuffled deck.
    pub deck: VecDeque<Card>,
    pub center_card: Option<Card>,
    pub round_number: u32,
    pub players_want_rematch: HashSet<PlayerId>,
    /// Remaining ticks of an active countdown.
    pub countdown_remaining: u8,
    /// Per-room RNG; seedable so deck order is reproducible in tests.
    pub rng: StdRng,
}

impl RoomState {
    pub fn new(code: String, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::rng().random_range(0..u64::MAX)),
        };
        Self {
            code,
            phase: RoomPhase::Waiting,
            config: GameConfig::default(),
            players: Vec::new(),
            connections: HashMap::new(),
            deck: VecDeque::new(),
            center_card: None,
            round_number: 0,
            players_want_rematch: HashSet::new(),
            countdown_remaining: 0,
            rng,
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// The player bound to a connection, if it is bound.
    pub fn bound_player(&self, conn_id: ConnectionId) -> Option<PlayerId> {
        self.connections.get(&conn_id).and_then(|entry| entry.player)
    }

    pub fn connected_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_connected()).count()
    }

    pub fn host_id(&self) -> Option<PlayerId> {
        self.players.iter().find(|p| p.is_host).map(|p| p.id)
    }

    /// Restore the exactly-one-host invariant after a roster or status
    /// change. Returns the newly promoted player when the host moved.
    ///
    /// With at least one connected player, the host is the first connected
    /// player in join order unless a connected host already exists. With
    /// none, nobody is host.
    pub fn ensure_host(&mut self) -> Option<PlayerId> {
        let host_ok = self
            .players
            .iter()
            .any(|p| p.is_host && p.is_connected());
        if host_ok {
            return None;
        }

        for p in &mut self.players {
            p.is_host = false;
        }
        let promoted = self
            .players
            .iter_mut()
            .find(|p| p.is_connected())
            .map(|p| {
                p.is_host = true;
                p.id
            });
        promoted
    }

    /// Resolve a requested display name against the roster, appending
    /// " 2", " 3", … until it is unique.
    pub fn resolve_duplicate_name(&self, requested: &str) -> String {
        let taken = |name: &str| self.players.iter().any(|p| p.name == name);
        if !taken(requested) {
            return requested.to_string();
        }
        let mut suffix = 2u32;
        loop {
            let candidate = format!("{requested} {suffix}");
            if !taken(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    /// Remove a player from the roster, returning the record.
    pub fn remove_player_record(&mut self, id: PlayerId) -> Option<Player> {
        let idx = self.players.iter().position(|p| p.id == id)?;
        Some(self.players.remove(idx))
    }

    /// Roster view projected for one recipient: exactly the entry with
    /// `id == recipient` carries `is_you = true`.
    pub fn snapshots_for(&self, recipient: PlayerId) -> Vec<PlayerSnapshot> {
        self.players
            .iter()
            .map(|p| PlayerSnapshot {
                id: p.id,
                name: p.name.clone(),
                is_host: p.is_host,
                is_you: p.id == recipient,
                status: p.status,
                score: p.score,
            })
            .collect()
    }

    pub fn score_entries(&self) -> Vec<ScoreEntry> {
        self.players
            .iter()
            .map(|p| ScoreEntry {
                player_id: p.id,
                name: p.name.clone(),
                score: p.score,
            })
            .collect()
    }

    /// Whether the game phase accepts match attempts.
    pub fn in_round(&self) -> bool {
        matches!(self.phase, RoomPhase::Playing | RoomPhase::RoundEnd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_players(names: &[&str]) -> RoomState {
        let mut state = RoomState::new("TEST".to_string(), Some(7));
        for name in names {
            let resolved = state.resolve_duplicate_name(name);
            let player = Player::new(resolved, ConnectionId::new_v4());
            state.players.push(player);
            state.ensure_host();
        }
        state
    }

    #[test]
    fn test_duplicate_names_get_suffixes() {
        let state = state_with_players(&["Alex", "Alex", "Alex"]);
        let names: Vec<&str> = state.players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alex", "Alex 2", "Alex 3"]);
    }

    #[test]
    fn test_suffix_collision_skips_taken_names() {
        let mut state = state_with_players(&["Alex 2"]);
        let resolved = state.resolve_duplicate_name("Alex");
        assert_eq!(resolved, "Alex");
        state
            .players
            .push(Player::new(resolved, ConnectionId::new_v4()));
        // "Alex 2" is taken, so the next duplicate jumps to "Alex 3".
        assert_eq!(state.resolve_duplicate_name("Alex"), "Alex 3");
    }

    #[test]
    fn test_first_player_becomes_host() {
        let state = state_with_players(&["Ana", "Ben"]);
        assert_eq!(state.host_id(), Some(state.players[0].id));
        assert_eq!(
            state.players.iter().filter(|p| p.is_host).count(),
            1,
            "exactly one host"
        );
    }

    #[test]
    fn test_host_succession_follows_join_order() {
        let mut state = state_with_players(&["Ana", "Ben", "Cal"]);
        let ana = state.players[0].id;
        let ben = state.players[1].id;

        state.remove_player_record(ana);
        assert_eq!(state.ensure_host(), Some(ben));
        assert_eq!(state.host_id(), Some(ben));
    }

    #[test]
    fn test_disconnected_host_loses_seat() {
        let mut state = state_with_players(&["Ana", "Ben"]);
        let ben = state.players[1].id;
        state.players[0].status = PlayerStatus::Disconnected;

        assert_eq!(state.ensure_host(), Some(ben));
        assert!(!state.players[0].is_host);
    }

    #[test]
    fn test_no_host_without_connected_players() {
        let mut state = state_with_players(&["Ana"]);
        state.players[0].status = PlayerStatus::Disconnected;
        assert_eq!(state.ensure_host(), None);
        assert_eq!(state.host_id(), None);
    }

    #[test]
    fn test_snapshot_projection_marks_single_recipient() {
        let state = state_with_players(&["Ana", "Ben", "Cal"]);
        for player in &state.players {
            let snapshots = state.snapshots_for(player.id);
            let yours: Vec<_> = snapshots.iter().filter(|s| s.is_you).collect();
            assert_eq!(yours.len(), 1);
            assert_eq!(yours[0].id, player.id);
        }
    }
}
