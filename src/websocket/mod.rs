//! WebSocket module for the pairchat server
//!
//! The gateway standing in for the bot platform: token-authenticated
//! sockets, the JSON wire protocol, and the connection pool that
//! delivers outbound messages.

mod connection;
mod pool;
mod protocol;
mod server;

pub use connection::{Connection, HeartbeatConfig};
pub use pool::ConnectionPool;
pub use protocol::{ClientMessage, ServerMessage};
pub use server::WebSocketServer;
