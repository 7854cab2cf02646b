//! Connection registry for the WebSocket push channel
//!
//! Maps each live connection to its outbound send handle. The session task
//! owns the socket itself; the registry only holds the sender so the hub
//! can fan out. Removal is idempotent, and fan-out works on a point-in-time
//! snapshot of the member set, so membership changes apply to the next
//! broadcast rather than one already in flight.

use axum::extract::ws::Message;
use std::collections::HashMap;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

pub type ClientId = Uuid;

pub struct ClientRegistry {
    clients: RwLock<HashMap<ClientId, mpsc::UnboundedSender<Message>>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
        }
    }

    pub async fn add(&self, id: ClientId, sender: mpsc::UnboundedSender<Message>) {
        let mut clients = self.clients.write().await;
        clients.insert(id, sender);
        tracing::debug!(client_id = %id, total = clients.len(), "Client registered");
    }

    /// Remove a connection. Removing twice or removing an unknown id is a no-op.
    pub async fn remove(&self, id: ClientId) {
        let mut clients = self.clients.write().await;
        if clients.remove(&id).is_some() {
            tracing::debug!(client_id = %id, total = clients.len(), "Client removed");
        }
    }

    /// Point-in-time snapshot of the live senders, used for fan-out
    pub async fn senders(&self) -> Vec<(ClientId, mpsc::UnboundedSender<Message>)> {
        let clients = self.clients.read().await;
        clients.iter().map(|(id, tx)| (*id, tx.clone())).collect()
    }

    /// Send one message to a single connection. Returns false if the
    /// connection is unknown or its channel has closed.
    pub async fn send_to(&self, id: ClientId, message: Message) -> bool {
        let clients = self.clients.read().await;
        match clients.get(&id) {
            Some(tx) => tx.send(message).is_ok(),
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.clients.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.clients.read().await.is_empty()
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}
