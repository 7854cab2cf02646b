//! Broadcast hub
//!
//! Serializes each outbound message once and fans it out to every
//! registered connection. One broken connection never aborts delivery to
//! the rest, and no failure in here surfaces to the caller: closed sockets
//! are detected and cleaned up by their own session tasks.

use axum::extract::ws::Message;
use std::sync::Arc;

use crate::protocol::ControlMessage;
use crate::registry::{ClientId, ClientRegistry};
use crate::simulation::SnapshotSource;

pub struct BroadcastHub {
    registry: Arc<ClientRegistry>,
    source: Arc<dyn SnapshotSource>,
}

impl BroadcastHub {
    pub fn new(registry: Arc<ClientRegistry>, source: Arc<dyn SnapshotSource>) -> Self {
        Self { registry, source }
    }

    /// Deliver a control message to every registered connection.
    ///
    /// Serialization happens once; per-connection send failures are logged
    /// and skipped so the remaining members still receive the message.
    pub async fn broadcast(&self, message: &ControlMessage) {
        let text = match serde_json::to_string(message) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Failed to serialize control message: {}", e);
                return;
            }
        };

        let senders = self.registry.senders().await;
        let mut delivered = 0usize;
        for (id, tx) in &senders {
            if tx.send(Message::Text(text.clone())).is_ok() {
                delivered += 1;
            } else {
                tracing::debug!(client_id = %id, "Skipping closed connection during broadcast");
            }
        }
        tracing::debug!(
            delivered,
            total = senders.len(),
            "Control message broadcast"
        );
    }

    /// Deliver a control message to a single connection
    pub async fn send_to(&self, client: ClientId, message: &ControlMessage) {
        let text = match serde_json::to_string(message) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Failed to serialize control message: {}", e);
                return;
            }
        };

        if !self.registry.send_to(client, Message::Text(text)).await {
            tracing::debug!(client_id = %client, "Dropped control message to closed connection");
        }
    }

    /// Fetch one fresh snapshot and deliver it to a single connection.
    /// A provider failure skips this push; the next scheduled push retries.
    pub async fn push_snapshot_to(&self, client: ClientId) {
        let snapshot = match self.source.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(client_id = %client, "Snapshot assembly failed, skipping push: {}", e);
                return;
            }
        };

        let text = match serde_json::to_string(&snapshot) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Failed to serialize snapshot: {}", e);
                return;
            }
        };

        if !self.registry.send_to(client, Message::Text(text)).await {
            tracing::debug!(client_id = %client, "Dropped snapshot to closed connection");
        }
    }
}
