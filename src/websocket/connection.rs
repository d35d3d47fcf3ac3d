use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::protocol::{decode_client_message, ConnectionId, PlayerId, ServerMessage};
use crate::room::{ConnectionHandle, RoomEvent};
use crate::server::GameServer;

pub(super) async fn handle_socket(
    socket: WebSocket,
    server: Arc<GameServer>,
    code: String,
    reconnect_id: Option<PlayerId>,
    addr: SocketAddr,
) {
    let (mut sender, mut receiver) = socket.split();
    let queue_capacity = server.config().websocket.outbound_queue_capacity;
    let (tx, mut rx) = mpsc::channel::<Arc<ServerMessage>>(queue_capacity);
    let conn_id = ConnectionId::new_v4();

    // Resolve-or-allocate: connecting to a well-formed code is enough to
    // bring a WAITING room into existence.
    let room = server.directory().resolve(&code);
    let attached = room.send(RoomEvent::Attach {
        conn: ConnectionHandle::new(conn_id, tx),
        reconnect_id,
    });
    if !attached {
        // Lost a race against room termination; the client can retry and
        // get a fresh room.
        tracing::debug!(%conn_id, room_code = %code, "Room terminated during attach");
        let _ = sender.close().await;
        return;
    }
    tracing::info!(
        %conn_id,
        room_code = %code,
        client_addr = %addr,
        "WebSocket connection established"
    );

    // Writer: drain the bounded queue into the socket. The room never
    // waits on this task; when the room drops the sender the queue drains
    // and the socket is closed.
    let send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let json = match serde_json::to_string(&*message) {
                Ok(json) => json,
                Err(err) => {
                    tracing::error!(%conn_id, error = %err, "Failed to serialize server message");
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    });

    // Reader: decode frames and feed the room queue in arrival order.
    let max_size = server.config().websocket.max_message_size;
    let room_reader = room.clone();
    let receive_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(err) => {
                    tracing::debug!(%conn_id, error = %err, "WebSocket read error");
                    break;
                }
            };

            let event = match msg {
                Message::Text(text) => match decode_client_message(&text, max_size) {
                    Ok(message) => RoomEvent::Frame { conn_id, message },
                    Err(err) => RoomEvent::Malformed {
                        conn_id,
                        detail: err.to_string(),
                    },
                },
                Message::Binary(_) => RoomEvent::Malformed {
                    conn_id,
                    detail: "binary frames are not part of this protocol".to_string(),
                },
                Message::Close(_) => break,
                // Transport-level keepalive; the websocket stack answers.
                Message::Ping(_) | Message::Pong(_) => continue,
            };

            if !room_reader.send(event) {
                break;
            }
        }
        // Transport loss and client close both funnel into the same
        // disconnect path; the room decides what the grace period means.
        let _ = room_reader.send(RoomEvent::Closed { conn_id });
    });

    tokio::select! {
        _ = send_task => {
            tracing::debug!(%conn_id, "Send task completed");
        }
        _ = receive_task => {
            tracing::debug!(%conn_id, "Receive task completed");
        }
    }

    // Safety net: duplicate Closed events are no-ops in the room.
    let _ = room.send(RoomEvent::Closed { conn_id });
}
