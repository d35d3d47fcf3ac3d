use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::protocol::{is_valid_room_code, normalize_room_code, PlayerId};
use crate::server::GameServer;

use super::connection::handle_socket;

/// WebSocket upgrade handler for `/ws/{code}`.
///
/// The room code is the URL path segment; `?reconnectId=<uuid>` carries an
/// optional prior player id for URL-based reconnect. Malformed codes are
/// rejected before the upgrade.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Path(code): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(server): State<Arc<GameServer>>,
) -> Response {
    let code = normalize_room_code(&code);
    if !is_valid_room_code(&code) {
        tracing::debug!(code = %code, client_addr = %addr, "Rejected malformed room code");
        return (StatusCode::BAD_REQUEST, "invalid room code").into_response();
    }

    // An unparseable reconnectId is treated as absent: the client can
    // still bind with a post-connect `reconnect` frame.
    let reconnect_id: Option<PlayerId> = params
        .get("reconnectId")
        .and_then(|raw| raw.parse().ok());

    ws.on_upgrade(move |socket| handle_socket(socket, server, code, reconnect_id, addr))
}
