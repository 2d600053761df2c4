pub mod auth;
pub mod bot;
pub mod chat;
pub mod config;
pub mod error;
pub mod profile;
pub mod session;
pub mod websocket;

use std::sync::Arc;
use std::time::Duration;
use actix_web::{web, HttpResponse};
use serde::Serialize;

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use auth::AuthService;
pub use bot::{Dispatcher, InboundEvent};
pub use chat::{Matchmaker, Notifier, Relay};
pub use session::{SessionState, SessionStore, SharedSessions, UserId};
pub use websocket::{ConnectionPool, HeartbeatConfig, WebSocketServer};

use profile::{InMemoryProfileStore, InMemoryTermsStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub waiting: usize,
    pub paired: usize,
    pub connections: usize,
}

/// Health check endpoint handler
/// Returns server status, timestamp and current queue/pair counts
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let stats = state.stats().await;

    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "waiting": stats.waiting,
        "paired": stats.paired,
        "connections": stats.connections,
    }))
}

/// Application state shared across all components
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub sessions: SharedSessions,
    pub pool: Arc<ConnectionPool>,
    pub auth_service: Arc<AuthService>,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// Wires the session store, chat core and in-memory collaborators to
    /// the gateway's connection pool.
    pub fn new(config: Settings) -> Self {
        let sessions = session::shared(SessionStore::new());
        let pool = Arc::new(ConnectionPool::new());
        let profiles = Arc::new(InMemoryProfileStore::new());
        let terms = Arc::new(InMemoryTermsStore::new());

        let matchmaker = Arc::new(Matchmaker::new(sessions.clone(), pool.clone(), profiles.clone()));
        let relay = Relay::new(sessions.clone(), pool.clone());
        let dispatcher = Arc::new(Dispatcher::new(
            matchmaker,
            relay,
            profiles,
            terms,
            pool.clone(),
            config.chat.profile_max_chars,
        ));

        let auth_service = Arc::new(AuthService::new(
            config.auth.jwt_secret.clone(),
            config.auth.token_expiry_hours,
        ));

        Self {
            config: Arc::new(config),
            sessions,
            pool,
            auth_service,
            dispatcher,
        }
    }

    pub fn websocket_server(&self) -> Arc<WebSocketServer> {
        let heartbeat = HeartbeatConfig {
            interval: Duration::from_secs(self.config.gateway.heartbeat_interval_secs),
            timeout: Duration::from_secs(self.config.gateway.heartbeat_timeout_secs),
        };
        Arc::new(WebSocketServer::new(
            self.pool.clone(),
            self.auth_service.clone(),
            self.dispatcher.clone(),
            heartbeat,
        ))
    }

    pub async fn stats(&self) -> SessionStats {
        let (waiting, paired) = {
            let sessions = self.sessions.lock().await;
            (sessions.waiting_count(), sessions.pair_count())
        };

        SessionStats {
            waiting,
            paired,
            connections: self.pool.connection_count().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_app_state_creation() {
        let config = Settings::defaults().expect("Failed to load test config");
        let state = AppState::new(config);

        assert_eq!(
            state.stats().await,
            SessionStats { waiting: 0, paired: 0, connections: 0 }
        );
        assert_eq!(state.config.chat.profile_max_chars, 250);
    }

    #[tokio::test]
    async fn test_app_state_clone() {
        let config = Settings::defaults().expect("Failed to load test config");
        let state = AppState::new(config);
        let cloned = state.clone();

        // Verify Arc references are shared
        assert!(Arc::ptr_eq(&state.config, &cloned.config));
        assert!(Arc::ptr_eq(&state.sessions, &cloned.sessions));
        assert!(Arc::ptr_eq(&state.pool, &cloned.pool));

        cloned.sessions.lock().await.enqueue(UserId(3)).unwrap();
        assert_eq!(state.stats().await.waiting, 1);
    }

    #[tokio::test]
    async fn test_websocket_server_shares_pool() {
        let config = Settings::defaults().expect("Failed to load test config");
        let state = AppState::new(config);
        let server = state.websocket_server();
        assert!(Arc::ptr_eq(&server.pool(), &state.pool));
    }
}
