use std::net::SocketAddr;
use std::sync::Arc;
use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::auth::AuthService;
use crate::bot::Dispatcher;
use crate::websocket::{Connection as WebSocketConnection, ConnectionPool, HeartbeatConfig};

pub struct WebSocketServer {
    pool: Arc<ConnectionPool>,
    auth_service: Arc<AuthService>,
    dispatcher: Arc<Dispatcher>,
    heartbeat: HeartbeatConfig,
}

impl WebSocketServer {
    pub fn new(
        pool: Arc<ConnectionPool>,
        auth_service: Arc<AuthService>,
        dispatcher: Arc<Dispatcher>,
        heartbeat: HeartbeatConfig,
    ) -> Self {
        Self {
            pool,
            auth_service,
            dispatcher,
            heartbeat,
        }
    }

    /// Accepts connections until the listener fails.
    pub async fn run(self: Arc<Self>, listener: TcpListener) {
        loop {
            match listener.accept().await {
                Ok((stream, addr)) => {
                    let server = self.clone();
                    tokio::spawn(async move {
                        server.handle_connection(stream, addr).await;
                    });
                }
                Err(e) => {
                    error!("Failed to accept gateway connection: {}", e);
                    break;
                }
            }
        }
    }

    pub async fn handle_connection(self: Arc<Self>, raw_stream: TcpStream, addr: SocketAddr) {
        info!("New WebSocket connection from: {}", addr);

        let ws_stream = match tokio_tungstenite::accept_async(raw_stream).await {
            Ok(ws) => ws,
            Err(e) => {
                error!("Error during WebSocket handshake: {}", e);
                return;
            }
        };

        let (mut ws_sink, mut ws_stream) = ws_stream.split();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut connection = WebSocketConnection::new(
            tx,
            self.auth_service.clone(),
            self.dispatcher.clone(),
            self.pool.clone(),
        );
        connection.start_heartbeat(self.heartbeat);
        let connection_id = connection.id();

        // Forward queued messages to the socket
        let send_task = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                if let Err(e) = ws_sink.send(message).await {
                    error!("Error sending WebSocket message: {}", e);
                    break;
                }
            }

            if let Err(e) = ws_sink.close().await {
                info!("Error closing WebSocket connection: {}", e);
            }
        });

        let shutdown = connection.shutdown_signal();
        loop {
            let message = tokio::select! {
                message = ws_stream.next() => message,
                _ = shutdown.notified() => {
                    info!("Dropping unresponsive connection {}", connection_id);
                    break;
                }
            };

            match message {
                Some(Ok(msg)) => {
                    if let Err(e) = connection.handle_message(msg).await {
                        info!("Closing connection {}: {}", connection_id, e);
                        break;
                    }
                }
                Some(Err(e)) => {
                    error!("Error receiving WebSocket message: {}", e);
                    break;
                }
                None => break,
            }
        }

        connection.close().await;
        send_task.abort();
        info!("Connection {} closed", connection_id);
    }

    pub fn pool(&self) -> Arc<ConnectionPool> {
        self.pool.clone()
    }
}
