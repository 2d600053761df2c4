use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Notify, RwLock};
use tokio::time::sleep;
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;
use tracing::{error, info, warn};

use crate::auth::AuthService;
use crate::bot::Dispatcher;
use crate::error::{AppError, AuthError, WebSocketError};
use crate::session::UserId;
use crate::websocket::{ClientMessage, ConnectionPool, ServerMessage};

#[derive(Debug, Clone, Copy)]
pub struct HeartbeatConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

/// One gateway socket. Frames are handled in arrival order, so a single
/// user's events never interleave with each other.
pub struct Connection {
    id: Uuid,
    user_id: Option<UserId>,
    tx: mpsc::UnboundedSender<Message>,
    auth_service: Arc<AuthService>,
    dispatcher: Arc<Dispatcher>,
    pool: Arc<ConnectionPool>,
    last_heartbeat: Arc<RwLock<Instant>>,
    shutdown: Arc<Notify>,
}

impl Connection {
    pub fn new(
        tx: mpsc::UnboundedSender<Message>,
        auth_service: Arc<AuthService>,
        dispatcher: Arc<Dispatcher>,
        pool: Arc<ConnectionPool>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: None,
            tx,
            auth_service,
            dispatcher,
            pool,
            last_heartbeat: Arc::new(RwLock::new(Instant::now())),
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Handles one frame. An `Err` means the connection should close.
    pub async fn handle_message(&mut self, msg: Message) -> Result<(), AppError> {
        // any inbound frame proves the peer is alive
        self.touch_heartbeat().await;

        match msg {
            Message::Text(text) => {
                let client_msg = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(msg) => msg,
                    Err(e) => {
                        warn!("Malformed frame on connection {}: {}", self.id, e);
                        return self.send_error(&format!("Invalid message format: {}", e));
                    }
                };

                match client_msg {
                    ClientMessage::Authenticate { token } => self.handle_auth(&token).await?,
                    ClientMessage::Ping => self.send_message(&ServerMessage::Pong)?,
                    ClientMessage::Pong => {}
                    other => self.handle_event(other).await?,
                }
            }
            Message::Close(_) => {
                info!("Client initiated close for connection {}", self.id);
                return Err(WebSocketError::ConnectionError("Connection closed by client".to_string()).into());
            }
            // tungstenite answers pings itself
            Message::Ping(_) | Message::Pong(_) => {}
            _ => {
                warn!("Received unsupported message type on connection {}", self.id);
                self.send_error("Binary messages are not supported")?;
            }
        }
        Ok(())
    }

    async fn handle_auth(&mut self, token: &str) -> Result<(), AppError> {
        match self.auth_service.validate_token(token) {
            Ok(user) => {
                if let Some(previous) = self.user_id.replace(user) {
                    if previous != user {
                        self.release(previous).await;
                    }
                }
                self.pool.add(user, self.id, self.tx.clone()).await;
                info!("User {} authenticated on connection {}", user, self.id);
                self.send_message(&ServerMessage::AuthResult {
                    success: true,
                    error: None,
                })
            }
            Err(e) => {
                warn!("Authentication failed for connection {}: {}", self.id, e);
                self.send_message(&ServerMessage::AuthResult {
                    success: false,
                    error: Some(e.to_string()),
                })
            }
        }
    }

    async fn handle_event(&mut self, msg: ClientMessage) -> Result<(), AppError> {
        let Some(user) = self.user_id else {
            return self.send_error(&AuthError::Unauthenticated.to_string());
        };
        let Some(event) = msg.into_event() else {
            return Ok(());
        };

        // Event failures are reported to the log; they never drop the socket.
        if let Err(e) = self.dispatcher.handle(user, event).await {
            match e {
                AppError::Validation(_) | AppError::Notifier(_) => {
                    warn!("Event from user {} not applied: {}", user, e)
                }
                _ => error!("Error handling event from user {}: {}", user, e),
            }
        }
        Ok(())
    }

    /// Ends the user's conversation when their last socket goes away.
    pub async fn close(&mut self) {
        if let Some(user) = self.user_id.take() {
            self.release(user).await;
        }
    }

    async fn release(&self, user: UserId) {
        if self.pool.remove(user, self.id).await {
            if let Some(partner) = self.dispatcher.matchmaker().disconnect(user, true).await {
                info!("User {} went offline, released partner {}", user, partner);
            }
        }
    }

    async fn touch_heartbeat(&self) {
        *self.last_heartbeat.write().await = Instant::now();
    }

    fn send_message(&self, msg: &ServerMessage) -> Result<(), AppError> {
        let text = serde_json::to_string(msg)?;
        self.tx.send(Message::Text(text))
            .map_err(|e| WebSocketError::ConnectionError(format!("Failed to send message: {}", e)))?;
        Ok(())
    }

    fn send_error(&self, message: &str) -> Result<(), AppError> {
        self.send_message(&ServerMessage::Error {
            message: message.to_string(),
        })
    }

    pub fn start_heartbeat(&self, config: HeartbeatConfig) {
        let last_heartbeat = self.last_heartbeat.clone();
        let shutdown = self.shutdown.clone();
        let tx = self.tx.clone();
        let id = self.id;

        tokio::spawn(async move {
            loop {
                sleep(config.interval).await;

                let elapsed = Instant::now()
                    .duration_since(*last_heartbeat.read().await);

                if elapsed > config.timeout {
                    error!("Heartbeat timeout for connection {}", id);
                    let _ = tx.send(Message::Close(None));
                    shutdown.notify_one();
                    break;
                }

                if let Err(e) = tx.send(Message::Ping(vec![])) {
                    info!("Stopping heartbeat for connection {}: {}", id, e);
                    break;
                }
            }
        });
    }

    /// Resolves once the heartbeat has given up on the peer.
    pub fn shutdown_signal(&self) -> Arc<Notify> {
        self.shutdown.clone()
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }
}
