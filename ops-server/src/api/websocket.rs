//! WebSocket endpoint and per-connection session loop
//!
//! Each accepted connection gets its own session task and an unbounded
//! outbound channel drained by a writer task. The session registers the
//! connection, replays the current emergency/restoration state to late
//! joiners, pushes one initial snapshot, and then serves inbound commands
//! interleaved with the periodic snapshot timer until the socket closes.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::api::AppState;
use crate::protocol::ClientCommand;

/// WebSocket upgrade handler
pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(|socket| handle_websocket(socket, state))
}

/// Run one connection's session until it closes or errors
async fn handle_websocket(socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();
    tracing::info!(client_id = %client_id, "Client connected to WebSocket");

    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();
    state.registry.add(client_id, outbound_tx).await;

    let (mut sink, mut stream) = socket.split();

    // Writer task: drains the per-connection channel into the socket in
    // FIFO order. Exits when the channel closes (registry removal) or the
    // transport fails.
    let writer = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sink.send(message).await.is_err() {
                break;
            }
        }
    });

    // Connect handshake: current global state first, then one snapshot.
    // The channel is FIFO, so the client sees the replay before any data.
    state.coordinator.replay_state_to(client_id).await;
    state.hub.push_snapshot_to(client_id).await;

    let mut snapshot_interval = tokio::time::interval(state.config.realtime.snapshot_interval());
    // The first tick fires immediately; the handshake already pushed one
    snapshot_interval.tick().await;

    loop {
        tokio::select! {
            inbound = stream.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientCommand>(&text) {
                            Ok(command) => {
                                tracing::info!(client_id = %client_id, ?command, "Command received");
                                state.coordinator.handle_command(command).await;
                            }
                            Err(e) => {
                                tracing::warn!(
                                    client_id = %client_id,
                                    "Ignoring unrecognized message: {}",
                                    e
                                );
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!(client_id = %client_id, "Client disconnected from WebSocket");
                        break;
                    }
                    Some(Ok(_)) => {
                        // Binary/ping/pong frames carry no commands
                    }
                    Some(Err(e)) => {
                        tracing::debug!(client_id = %client_id, "WebSocket transport error: {}", e);
                        break;
                    }
                }
            }
            _ = snapshot_interval.tick() => {
                state.hub.push_snapshot_to(client_id).await;
            }
        }
    }

    // Removal drops the registry's sender, which closes the outbound
    // channel and lets the writer task finish on its own
    state.registry.remove(client_id).await;
    let _ = writer.await;
}
