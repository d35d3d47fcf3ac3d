//! Room state-machine coverage.
//!
//! These tests drive a room task directly through its event queue with
//! shortened timings, playing both sides of the wire: test clients own
//! the receiving end of their connection channels and inject frames the
//! way the socket layer would.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use symbol_snap_server::config::RoomTimings;
use symbol_snap_server::deck::Card;
use symbol_snap_server::protocol::{
    CardDifficulty, ClientMessage, ConnectionId, ErrorCode, GameConfig, GameDuration,
    GameOverReason, PlayerId, PlayerStatus, RoomPhase, ServerMessage,
};
use symbol_snap_server::room::{spawn_room_seeded, ConnectionHandle, RoomEvent, RoomHandle};

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

fn fast_timings() -> RoomTimings {
    RoomTimings {
        countdown_start: 1,
        countdown_tick: Duration::from_millis(20),
        inter_round: Duration::from_millis(30),
        penalty: Duration::from_millis(80),
        disconnect_grace: Duration::from_millis(60),
        rejoin_window: Duration::from_millis(100),
        room_idle: Duration::from_millis(400),
    }
}

fn fast_room(code: &str) -> RoomHandle {
    spawn_room_seeded(code, fast_timings(), Some(0xC0FFEE))
}

fn game_config(duration: GameDuration) -> GameConfig {
    GameConfig {
        card_difficulty: CardDifficulty::Easy,
        game_duration: duration,
        card_set_id: "classic".to_string(),
        target_players: None,
    }
}

struct TestClient {
    conn_id: ConnectionId,
    rx: mpsc::Receiver<Arc<ServerMessage>>,
    room: RoomHandle,
}

fn attach(room: &RoomHandle) -> TestClient {
    attach_with_reconnect(room, None)
}

fn attach_with_reconnect(room: &RoomHandle, reconnect_id: Option<PlayerId>) -> TestClient {
    let conn_id = ConnectionId::new_v4();
    let (tx, rx) = mpsc::channel(256);
    assert!(room.send(RoomEvent::Attach {
        conn: ConnectionHandle::new(conn_id, tx),
        reconnect_id,
    }));
    TestClient {
        conn_id,
        rx,
        room: room.clone(),
    }
}

impl TestClient {
    fn send(&self, message: ClientMessage) {
        assert!(self.room.send(RoomEvent::Frame {
            conn_id: self.conn_id,
            message,
        }));
    }

    /// Simulate the transport dropping (the socket reader's Closed event).
    fn drop_transport(&self) {
        let _ = self.room.send(RoomEvent::Closed {
            conn_id: self.conn_id,
        });
    }

    async fn recv(&mut self) -> ServerMessage {
        let msg = timeout(RECV_TIMEOUT, self.rx.recv())
            .await
            .expect("timed out waiting for a server message")
            .expect("connection channel closed");
        (*msg).clone()
    }

    /// Read frames until the matcher yields, discarding the rest.
    async fn recv_until<T>(&mut self, mut pick: impl FnMut(ServerMessage) -> Option<T>) -> T {
        loop {
            let msg = self.recv().await;
            if let Some(out) = pick(msg) {
                return out;
            }
        }
    }

    async fn recv_room_state(&mut self) -> symbol_snap_server::protocol::RoomStatePayload {
        self.recv_until(|m| match m {
            ServerMessage::RoomState(state) => Some(*state),
            _ => None,
        })
        .await
    }

    async fn expect_no_message(&mut self, window: Duration) {
        match timeout(window, self.rx.recv()).await {
            Err(_) => {}
            Ok(Some(msg)) => panic!("unexpected message: {msg:?}"),
            Ok(None) => panic!("connection channel closed"),
        }
    }

    /// True once the room has dropped this connection's sender.
    async fn closed_by_server(&mut self) -> bool {
        loop {
            match timeout(RECV_TIMEOUT, self.rx.recv()).await {
                Ok(Some(_)) => continue,
                Ok(None) => return true,
                Err(_) => return false,
            }
        }
    }
}

async fn join_with_state(
    room: &RoomHandle,
    name: &str,
) -> (
    TestClient,
    PlayerId,
    symbol_snap_server::protocol::RoomStatePayload,
) {
    let mut client = attach(room);
    client.send(ClientMessage::Join {
        player_name: name.to_string(),
    });
    let state = client.recv_room_state().await;
    let id = state
        .players
        .iter()
        .find(|p| p.is_you)
        .expect("joiner must appear in their own roster view")
        .id;
    (client, id, state)
}

async fn join(room: &RoomHandle, name: &str) -> (TestClient, PlayerId) {
    let (client, id, _state) = join_with_state(room, name).await;
    (client, id)
}

#[derive(Debug, Clone)]
struct RoundView {
    round_number: u32,
    your_card: Option<Card>,
    center_card: Card,
    deck_remaining: usize,
}

async fn recv_round_start(client: &mut TestClient) -> RoundView {
    client
        .recv_until(|m| match m {
            ServerMessage::RoundStart {
                round_number,
                your_card,
                center_card,
                deck_remaining,
            } => Some(RoundView {
                round_number,
                your_card,
                center_card,
                deck_remaining,
            }),
            _ => None,
        })
        .await
}

/// The symbol shared between this player's card and the center.
fn shared_symbol(view: &RoundView) -> u32 {
    let hand = view.your_card.as_ref().expect("player must hold a card");
    hand.symbols
        .iter()
        .find(|s| view.center_card.has_symbol(s.id))
        .expect("every card pair shares a symbol")
        .id
}

/// A symbol on this player's card that is absent from the center.
fn non_matching_symbol(view: &RoundView) -> u32 {
    let hand = view.your_card.as_ref().expect("player must hold a card");
    hand.symbols
        .iter()
        .find(|s| !view.center_card.has_symbol(s.id))
        .expect("a card shares exactly one of its symbols with the center")
        .id
}

fn attempt(symbol_id: u32) -> ClientMessage {
    ClientMessage::MatchAttempt {
        symbol_id,
        client_timestamp: 1_714_000_000_000,
    }
}

#[tokio::test]
async fn test_two_players_join_with_host_and_duplicate_names() {
    let room = fast_room("JOIN");
    let (mut host, host_id) = join(&room, "Alex").await;
    let (_guest, guest_id, state) = join_with_state(&room, "Alex").await;

    // The guest's own view: duplicate name suffixed, exactly one host,
    // exactly one is_you entry pointing at themselves.
    assert_eq!(state.phase, RoomPhase::Waiting);
    let names: Vec<&str> = state.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Alex", "Alex 2"]);
    assert_eq!(
        state.players.iter().filter(|p| p.is_host).count(),
        1,
        "exactly one host"
    );
    assert!(state.players.iter().find(|p| p.id == host_id).unwrap().is_host);
    let yours: Vec<_> = state.players.iter().filter(|p| p.is_you).collect();
    assert_eq!(yours.len(), 1);
    assert_eq!(yours[0].id, guest_id);
    assert!(state.room_expires_at.is_some(), "idle deadline is advertised");

    // The host observed the guest joining, never as themselves.
    let joined = host
        .recv_until(|m| match m {
            ServerMessage::PlayerJoined { player } => Some(player),
            _ => None,
        })
        .await;
    assert_eq!(joined.id, guest_id);
    assert!(!joined.is_you);
}

#[tokio::test]
async fn test_basic_round_flow() {
    let room = fast_room("PLAY");
    let (mut host, host_id) = join(&room, "Ana").await;
    let (mut guest, _guest_id) = join(&room, "Ben").await;

    host.send(ClientMessage::StartGame {
        config: Some(game_config(GameDuration::Marathon)),
    });

    let host_view = recv_round_start(&mut host).await;
    let guest_view = recv_round_start(&mut guest).await;

    // 50 cards dealt: one per player, one to the center, 47 remain.
    assert_eq!(host_view.round_number, 1);
    assert_eq!(host_view.deck_remaining, 47);
    assert_eq!(guest_view.deck_remaining, 47);
    assert_eq!(host_view.center_card, guest_view.center_card);
    assert_ne!(host_view.your_card, guest_view.your_card);

    let symbol_id = shared_symbol(&host_view);
    host.send(attempt(symbol_id));

    for client in [&mut host, &mut guest] {
        let (winner_id, won_symbol, round_number, scores) = client
            .recv_until(|m| match m {
                ServerMessage::RoundWinner {
                    winner_id,
                    symbol_id,
                    round_number,
                    scores,
                } => Some((winner_id, symbol_id, round_number, scores)),
                _ => None,
            })
            .await;
        assert_eq!(winner_id, host_id);
        assert_eq!(won_symbol, symbol_id);
        assert_eq!(round_number, 1);
        let winner_score = scores.iter().find(|s| s.player_id == host_id).unwrap();
        assert_eq!(winner_score.score, 1);
    }

    // The next round opens with the winner's old card as the center.
    let next = recv_round_start(&mut guest).await;
    assert_eq!(next.round_number, 2);
    assert_eq!(next.deck_remaining, 46);
    assert_eq!(Some(&next.center_card), host_view.your_card.as_ref());
}

#[tokio::test]
async fn test_invalid_attempt_penalty_and_arbitration_order() {
    let room = fast_room("PNLT");
    let (mut host, _host_id) = join(&room, "Ana").await;
    let (mut guest, guest_id) = join(&room, "Ben").await;

    host.send(ClientMessage::StartGame {
        config: Some(game_config(GameDuration::Marathon)),
    });
    let host_view = recv_round_start(&mut host).await;
    let guest_view = recv_round_start(&mut guest).await;

    // Guest claims a symbol from their hand that is not on the center.
    guest.send(attempt(non_matching_symbol(&guest_view)));
    let duration_ms = guest
        .recv_until(|m| match m {
            ServerMessage::Penalty { duration_ms, .. } => Some(duration_ms),
            _ => None,
        })
        .await;
    assert_eq!(duration_ms, 80);

    // Penalties are private; no round ended.
    host.expect_no_message(Duration::from_millis(40)).await;

    // While locked out, even a correct claim is void.
    guest.send(attempt(shared_symbol(&guest_view)));
    guest.expect_no_message(Duration::from_millis(40)).await;

    // The host takes the round; the guest's later valid claim for the
    // finished round is dropped without a second winner or a penalty.
    host.send(attempt(shared_symbol(&host_view)));
    let winner_id = host
        .recv_until(|m| match m {
            ServerMessage::RoundWinner { winner_id, .. } => Some(winner_id),
            _ => None,
        })
        .await;
    assert_ne!(winner_id, guest_id);

    guest.send(attempt(shared_symbol(&guest_view)));
    let next = recv_round_start(&mut guest).await;
    assert_eq!(next.round_number, 2);
    assert_eq!(next.deck_remaining, 46, "exactly one card was drawn");
}

#[tokio::test]
async fn test_countdown_cancelled_by_disconnect() {
    let timings = RoomTimings {
        countdown_start: 3,
        countdown_tick: Duration::from_millis(50),
        ..fast_timings()
    };
    let room = spawn_room_seeded("CNCL", timings, Some(1));
    let (mut host, _host_id) = join(&room, "Ana").await;
    let (mut guest, _guest_id) = join(&room, "Ben").await;

    host.send(ClientMessage::StartGame { config: None });
    let seconds = host
        .recv_until(|m| match m {
            ServerMessage::Countdown { seconds } => Some(seconds),
            _ => None,
        })
        .await;
    assert_eq!(seconds, 3);

    // Guest's transport drops during the countdown.
    guest.drop_transport();

    host.recv_until(|m| match m {
        ServerMessage::PlayerDisconnected { .. } => Some(()),
        _ => None,
    })
    .await;
    let seconds = host
        .recv_until(|m| match m {
            ServerMessage::Countdown { seconds } => Some(seconds),
            _ => None,
        })
        .await;
    assert_eq!(seconds, -1, "cancellation sentinel");

    let state = host.recv_room_state().await;
    assert_eq!(state.phase, RoomPhase::Waiting);
    assert!(
        state.room_expires_at.is_some(),
        "idle deadline rearmed by the cancel"
    );
}

#[tokio::test]
async fn test_leave_mid_game_awards_last_player_standing() {
    let room = fast_room("LAST");
    let (mut host, host_id) = join(&room, "Ana").await;
    let (mut guest, _guest_id) = join(&room, "Ben").await;

    host.send(ClientMessage::StartGame {
        config: Some(game_config(GameDuration::Marathon)),
    });
    let host_view = recv_round_start(&mut host).await;
    let _ = recv_round_start(&mut guest).await;

    // Host banks one round first so the final score is bonus + 1.
    host.send(attempt(shared_symbol(&host_view)));
    let next = recv_round_start(&mut host).await;
    assert_eq!(next.deck_remaining, 46);

    guest.send(ClientMessage::Leave {});

    let (reason, final_scores, bonus) = host
        .recv_until(|m| match m {
            ServerMessage::GameOver {
                reason,
                final_scores,
                bonus_awarded,
                rejoin_window_ms,
            } => {
                assert_eq!(rejoin_window_ms, 100);
                Some((reason, final_scores, bonus_awarded))
            }
            _ => None,
        })
        .await;
    assert_eq!(reason, GameOverReason::LastPlayerStanding);
    assert_eq!(bonus, Some(46), "one point per undealt card");
    assert_eq!(final_scores.len(), 1, "the leaver is off the roster");
    assert_eq!(final_scores[0].player_id, host_id);
    assert_eq!(final_scores[0].score, 47);
}

#[tokio::test]
async fn test_reconnect_preserves_identity() {
    let room = fast_room("RCNT");
    let (mut host, _host_id) = join(&room, "Ana").await;
    let (guest, guest_id) = join(&room, "Ben").await;

    guest.drop_transport();
    host.recv_until(|m| match m {
        ServerMessage::PlayerDisconnected { player_id } => {
            assert_eq!(player_id, guest_id);
            Some(())
        }
        _ => None,
    })
    .await;

    // Rebind within the grace period.
    let mut revenant = attach(&room);
    revenant.send(ClientMessage::Reconnect {
        player_id: guest_id,
    });
    let state = revenant.recv_room_state().await;
    let me = state.players.iter().find(|p| p.is_you).unwrap();
    assert_eq!(me.id, guest_id, "identity survives the reconnect");
    assert_eq!(me.status, PlayerStatus::Connected);
    assert_eq!(me.name, "Ben");

    // The host converges through room_state, never via player_joined.
    host.recv_until(|m| match m {
        ServerMessage::PlayerJoined { .. } => {
            panic!("a reconnect must not look like a fresh join")
        }
        ServerMessage::RoomState(state) => Some(state),
        _ => None,
    })
    .await;

    // The race rule: a fallback join on the bound stream is ignored.
    revenant.send(ClientMessage::Join {
        player_name: "Ben".to_string(),
    });
    revenant.expect_no_message(Duration::from_millis(40)).await;
}

#[tokio::test]
async fn test_grace_expiry_ends_game_for_survivor() {
    let room = fast_room("GRCE");
    let (mut host, host_id) = join(&room, "Ana").await;
    let (mut guest, _guest_id) = join(&room, "Ben").await;

    host.send(ClientMessage::StartGame {
        config: Some(game_config(GameDuration::Quick)),
    });
    let _ = recv_round_start(&mut host).await;
    let _ = recv_round_start(&mut guest).await;

    // Transport loss, not a leave: the game holds through the grace
    // period, then terminates in the survivor's favor.
    guest.drop_transport();
    let (reason, final_scores, bonus) = host
        .recv_until(|m| match m {
            ServerMessage::GameOver {
                reason,
                final_scores,
                bonus_awarded,
                ..
            } => Some((reason, final_scores, bonus_awarded)),
            _ => None,
        })
        .await;
    assert_eq!(reason, GameOverReason::LastPlayerStanding);
    // 10 cards: two hands and a center dealt, 7 undealt.
    assert_eq!(bonus, Some(7));
    assert_eq!(final_scores.len(), 1);
    assert_eq!(final_scores[0].player_id, host_id);
    assert_eq!(final_scores[0].score, 7);
}

#[tokio::test]
async fn test_deck_exhaustion_and_rematch_reset() {
    let room = fast_room("FULL");
    let (mut host, host_id) = join(&room, "Ana").await;
    let (mut guest, guest_id) = join(&room, "Ben").await;

    host.send(ClientMessage::StartGame {
        config: Some(game_config(GameDuration::Quick)),
    });

    // 10 cards: 2 hands + 1 center leaves a 7-card tail, so exactly 7
    // winnable rounds before the deck runs dry.
    for round in 1..=7u32 {
        let host_view = recv_round_start(&mut host).await;
        let _ = recv_round_start(&mut guest).await;
        assert_eq!(host_view.round_number, round);
        assert_eq!(host_view.deck_remaining as u32, 8 - round);

        host.send(attempt(shared_symbol(&host_view)));
        host.recv_until(|m| match m {
            ServerMessage::RoundWinner { round_number, .. } => {
                assert_eq!(round_number, round);
                Some(())
            }
            _ => None,
        })
        .await;
    }

    let (reason, final_scores) = guest
        .recv_until(|m| match m {
            ServerMessage::GameOver {
                reason,
                final_scores,
                bonus_awarded,
                ..
            } => {
                assert_eq!(bonus_awarded, None);
                Some((reason, final_scores))
            }
            _ => None,
        })
        .await;
    assert_eq!(reason, GameOverReason::DeckExhausted);
    let host_score = final_scores.iter().find(|s| s.player_id == host_id).unwrap();
    assert_eq!(host_score.score, 7);

    // Both ask for a rematch; the window expiry resets the room.
    host.send(ClientMessage::PlayAgain {});
    guest.send(ClientMessage::PlayAgain {});
    let acked = guest
        .recv_until(|m| match m {
            ServerMessage::PlayAgainAck { player_id } => Some(player_id),
            _ => None,
        })
        .await;
    assert!(acked == host_id || acked == guest_id);

    let state = guest.recv_room_state().await;
    assert_eq!(state.phase, RoomPhase::Waiting);
    assert_eq!(state.players.len(), 2);
    assert!(state.players.iter().all(|p| p.score == 0));
    assert!(state.room_expires_at.is_some());
}

#[tokio::test]
async fn test_game_over_leave_keeps_window_and_solo_boot() {
    let room = fast_room("SOLO");
    let (mut host, host_id) = join(&room, "Ana").await;
    let (mut guest, _guest_id) = join(&room, "Ben").await;

    host.send(ClientMessage::StartGame {
        config: Some(game_config(GameDuration::Quick)),
    });
    let _ = recv_round_start(&mut host).await;
    let _ = recv_round_start(&mut guest).await;

    guest.send(ClientMessage::Leave {});
    host.recv_until(|m| match m {
        ServerMessage::GameOver { .. } => Some(()),
        _ => None,
    })
    .await;

    // A newcomer may take a seat during GAME_OVER and leave again; none
    // of that reopens the game-over decision or moves the deadline.
    host.send(ClientMessage::PlayAgain {});
    let (mut visitor, _visitor_id) = join(&room, "Cal").await;
    visitor.send(ClientMessage::Leave {});

    // Lone voter: the window closes with a solo boot, then teardown.
    host.recv_until(|m| match m {
        ServerMessage::GameOver { .. } => panic!("game over must not be re-broadcast"),
        ServerMessage::SoloRejoinBoot { .. } => Some(()),
        _ => None,
    })
    .await;
    host.recv_until(|m| match m {
        ServerMessage::RoomExpired { .. } => Some(()),
        _ => None,
    })
    .await;

    assert!(host.closed_by_server().await, "room closed the connection");
    let _ = host_id;
}

#[tokio::test]
async fn test_join_rejections() {
    let room = fast_room("CAPS");
    let (mut host, _host_id) = join(&room, "Ana").await;

    let mut others = Vec::new();
    for i in 1..8 {
        let (client, _) = join(&room, &format!("P{i}")).await;
        others.push(client);
    }

    // Ninth seat: full house.
    let mut ninth = attach(&room);
    ninth.send(ClientMessage::Join {
        player_name: "Nia".to_string(),
    });
    let code = ninth
        .recv_until(|m| match m {
            ServerMessage::Error { code, .. } => Some(code),
            _ => None,
        })
        .await;
    assert_eq!(code, ErrorCode::RoomFull);
    assert!(ninth.closed_by_server().await, "capacity errors close");

    // Mid-game joins are refused outright.
    host.send(ClientMessage::StartGame {
        config: Some(game_config(GameDuration::Quick)),
    });
    let _ = recv_round_start(&mut host).await;
    let mut latecomer = attach(&room);
    latecomer.send(ClientMessage::Join {
        player_name: "Zoe".to_string(),
    });
    let code = latecomer
        .recv_until(|m| match m {
            ServerMessage::Error { code, .. } => Some(code),
            _ => None,
        })
        .await;
    assert_eq!(code, ErrorCode::GameInProgress);
    assert!(latecomer.closed_by_server().await);
}

#[tokio::test]
async fn test_config_authority_and_auto_start() {
    let room = fast_room("CONF");
    let (mut host, _host_id) = join(&room, "Ana").await;
    let (mut guest, _guest_id) = join(&room, "Ben").await;

    // Only the host may reconfigure.
    guest.send(ClientMessage::SetConfig {
        config: game_config(GameDuration::Quick),
    });
    let code = guest
        .recv_until(|m| match m {
            ServerMessage::Error { code, .. } => Some(code),
            _ => None,
        })
        .await;
    assert_eq!(code, ErrorCode::Unauthorized);

    // Host arms auto-start at three players.
    let mut config = game_config(GameDuration::Quick);
    config.target_players = Some(3);
    host.send(ClientMessage::SetConfig {
        config: config.clone(),
    });
    let updated = host
        .recv_until(|m| match m {
            ServerMessage::ConfigUpdated { config } => Some(config),
            _ => None,
        })
        .await;
    assert_eq!(updated.target_players, Some(3));

    // The third join trips the countdown without host intervention.
    let (mut third, _) = join(&room, "Cal").await;
    let seconds = third
        .recv_until(|m| match m {
            ServerMessage::Countdown { seconds } => Some(seconds),
            _ => None,
        })
        .await;
    assert_eq!(seconds, 1);
    let view = recv_round_start(&mut third).await;
    // 10 cards: three hands and a center leave 6.
    assert_eq!(view.deck_remaining, 6);
}

#[tokio::test]
async fn test_room_idle_expiry_destroys_room() {
    let room = fast_room("IDLE");
    let (mut lonely, _id) = join(&room, "Ana").await;

    lonely
        .recv_until(|m| match m {
            ServerMessage::RoomExpired { reason } => Some(reason),
            _ => None,
        })
        .await;
    assert!(lonely.closed_by_server().await);

    // The handle goes dead once the task stops.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(room.is_closed());
}

#[tokio::test]
async fn test_protocol_errors_do_not_close_or_mutate() {
    let room = fast_room("ERRS");
    let (mut host, _host_id) = join(&room, "Ana").await;
    let (mut guest, _guest_id) = join(&room, "Ben").await;

    // Malformed frame: answered, not punished.
    assert!(room.send(RoomEvent::Malformed {
        conn_id: guest.conn_id,
        detail: "frame is not valid JSON".to_string(),
    }));
    let code = guest
        .recv_until(|m| match m {
            ServerMessage::Error { code, .. } => Some(code),
            _ => None,
        })
        .await;
    assert_eq!(code, ErrorCode::BadMessage);

    // Out-of-phase commands: INVALID_STATE, still connected.
    guest.send(ClientMessage::PlayAgain {});
    let code = guest
        .recv_until(|m| match m {
            ServerMessage::Error { code, .. } => Some(code),
            _ => None,
        })
        .await;
    assert_eq!(code, ErrorCode::InvalidState);

    // A non-host start is refused but the connection survives to play.
    guest.send(ClientMessage::StartGame { config: None });
    let code = guest
        .recv_until(|m| match m {
            ServerMessage::Error { code, .. } => Some(code),
            _ => None,
        })
        .await;
    assert_eq!(code, ErrorCode::Unauthorized);

    // Match attempts outside PLAYING are dropped silently.
    guest.send(attempt(0));
    guest.expect_no_message(Duration::from_millis(40)).await;

    // The room still works.
    host.send(ClientMessage::StartGame {
        config: Some(game_config(GameDuration::Quick)),
    });
    let view = recv_round_start(&mut guest).await;
    assert_eq!(view.round_number, 1);
}

#[tokio::test]
async fn test_ping_pong_echoes_timestamp() {
    let room = fast_room("PING");
    // Even an unbound connection can heartbeat.
    let mut probe = attach(&room);
    probe.send(ClientMessage::Ping {
        timestamp: 123_456_789,
    });
    let (client_ts, server_ts) = probe
        .recv_until(|m| match m {
            ServerMessage::Pong {
                client_timestamp,
                server_timestamp,
            } => Some((client_timestamp, server_timestamp)),
            _ => None,
        })
        .await;
    assert_eq!(client_ts, 123_456_789);
    assert!(server_ts > 0);
}
