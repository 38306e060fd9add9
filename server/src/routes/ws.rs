//! WebSocket handler — one-way order feed relay.
//!
//! DESIGN
//! ======
//! On upgrade, the connection subscribes to the order broadcast channel and
//! enters a `select!` loop:
//! - Feed events → serialize as JSON text frames → client
//! - Client frames → only `Close` matters; pings are answered by axum
//!
//! A subscriber that falls behind the channel capacity skips the missed
//! events and is told how many with a `feed:lagged` message; it should
//! refetch `/api/orders` to resync.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → send `feed:connected` with `client_id`
//! 2. Relay events until the client closes or a send fails
//! 3. Drop the receiver

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use uuid::Uuid;

use crate::state::AppState;

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();
    let mut events = state.feed.subscribe();

    let welcome = json!({ "event": "feed:connected", "client_id": client_id });
    if send_json(&mut socket, &welcome).await.is_err() {
        return;
    }
    info!(%client_id, "ws: feed client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
            event = events.recv() => {
                let payload = match event {
                    Ok(event) => match serde_json::to_value(&event) {
                        Ok(value) => value,
                        Err(e) => {
                            warn!(%client_id, error = %e, "ws: failed to serialize order event");
                            continue;
                        }
                    },
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(%client_id, skipped, "ws: feed client lagged");
                        json!({ "event": "feed:lagged", "skipped": skipped })
                    }
                    Err(RecvError::Closed) => break,
                };
                if send_json(&mut socket, &payload).await.is_err() {
                    break;
                }
            }
        }
    }

    info!(%client_id, "ws: feed client disconnected");
}

async fn send_json(socket: &mut WebSocket, value: &serde_json::Value) -> Result<(), axum::Error> {
    socket.send(Message::Text(value.to_string().into())).await
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
