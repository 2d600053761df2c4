//! Session module for the pairchat server
//!
//! Per-user session state (idle, waiting, paired) and the waiting queue.
//! Pure data; locking is the caller's job.

pub mod models;
pub mod store;

pub use models::{SessionState, UserId};
pub use store::SessionStore;

use std::sync::Arc;
use tokio::sync::Mutex;

/// The one lock guarding every session mutation.
pub type SharedSessions = Arc<Mutex<SessionStore>>;

pub fn shared(store: SessionStore) -> SharedSessions {
    Arc::new(Mutex::new(store))
}
