use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;
use tracing::{debug, info};

use crate::chat::{Content, Keyboard, Notifier};
use crate::error::NotifierError;
use crate::session::UserId;
use crate::websocket::ServerMessage;

#[derive(Debug)]
struct PoolEntry {
    connection_id: Uuid,
    sender: mpsc::UnboundedSender<Message>,
}

/// Authenticated connections, one per user. A newer connection for the
/// same user replaces the older one.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    connections: Arc<RwLock<HashMap<UserId, PoolEntry>>>,
}

impl ConnectionPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, user: UserId, connection_id: Uuid, sender: mpsc::UnboundedSender<Message>) {
        let previous = self
            .connections
            .write()
            .await
            .insert(user, PoolEntry { connection_id, sender });

        match previous {
            Some(old) => info!(
                "Connection {} replaced {} for user {}",
                connection_id, old.connection_id, user
            ),
            None => info!("Added connection {} for user {} to pool", connection_id, user),
        }
    }

    /// Removes the user's entry only if it still belongs to `connection_id`.
    pub async fn remove(&self, user: UserId, connection_id: Uuid) -> bool {
        let mut connections = self.connections.write().await;
        let owned = connections
            .get(&user)
            .map(|entry| entry.connection_id == connection_id)
            .unwrap_or(false);

        if owned {
            connections.remove(&user);
            info!("Removed connection {} for user {} from pool", connection_id, user);
        }
        owned
    }

    pub async fn send_to(&self, user: UserId, msg: &ServerMessage) -> Result<(), NotifierError> {
        let text = serde_json::to_string(msg)
            .map_err(|e| NotifierError::SendFailed(format!("Failed to serialize message: {}", e)))?;

        let connections = self.connections.read().await;
        let entry = connections.get(&user).ok_or(NotifierError::Unreachable(user))?;
        entry
            .sender
            .send(Message::Text(text))
            .map_err(|e| NotifierError::SendFailed(format!("Failed to send message: {}", e)))?;

        debug!("Queued outbound message for user {}", user);
        Ok(())
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    pub async fn is_connected(&self, user: UserId) -> bool {
        self.connections.read().await.contains_key(&user)
    }
}

#[async_trait]
impl Notifier for ConnectionPool {
    async fn send(&self, user: UserId, content: Content) -> Result<(), NotifierError> {
        self.send_to(user, &ServerMessage::from_content(content)).await
    }

    async fn send_with_keyboard(
        &self,
        user: UserId,
        content: Content,
        keyboard: Keyboard,
    ) -> Result<(), NotifierError> {
        self.send_to(user, &ServerMessage::with_keyboard(content, keyboard)).await
    }
}
