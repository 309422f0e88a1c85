//! WebSocket handler for game clients.
//!
//! # Endpoints
//!
//! - `GET /ws` - WebSocket upgrade for the learning protocol
//!
//! # Protocol
//!
//! Each text frame is one JSON [`ClientMessage`]; replies are JSON
//! [`ServerMessage`]s (see `types::messages`). Frames are handled strictly in
//! arrival order, so a reward always sees the decision recorded by any
//! earlier observation on the same connection. Frames that do not decode are
//! dropped (and counted) and the connection stays open. Binary frames are
//! treated the same way.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tracing::{debug, warn};

use types::ClientMessage;

use crate::coordinator::Session;
use crate::state::ServerState;

/// WebSocket upgrade handler: `GET /ws`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<ServerState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_socket(socket: WebSocket, state: ServerState) {
    state.metrics.ws_connect();
    debug!("WebSocket client connected");

    let (mut sender, mut receiver) = socket.split();
    let mut session = Session::new();

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let Some(request) = ClientMessage::parse(text.as_str()) else {
                    state.metrics.record_dropped();
                    debug!(len = text.len(), "dropping undecodable frame");
                    continue;
                };

                let Some(reply) = state.coordinator.handle_message(&mut session, request).await
                else {
                    continue;
                };

                match serde_json::to_string(&reply) {
                    Ok(json) => {
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break; // Client disconnected
                        }
                    }
                    Err(e) => {
                        warn!("Failed to serialize reply: {}", e);
                    }
                }
            }
            Ok(Message::Binary(data)) => {
                state.metrics.record_dropped();
                debug!(len = data.len(), "dropping binary frame");
            }
            Ok(Message::Close(_)) => break,
            Err(e) => {
                warn!("WebSocket error: {}", e);
                break;
            }
            _ => {} // ping/pong
        }
    }

    state.metrics.ws_disconnect();
    debug!(
        discarded = session.tracker().len(),
        "WebSocket client disconnected"
    );
}
