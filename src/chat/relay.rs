use std::sync::Arc;
use tracing::debug;

use crate::chat::content::Content;
use crate::chat::notifier::Notifier;
use crate::error::AppError;
use crate::session::{SharedSessions, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    Delivered { to: UserId },
    /// Sender has no partner; content is dropped.
    NoPartner,
    /// Command-like text; left to the command layer.
    Directive,
}

/// Forwards user content to the sender's partner, unmodified.
pub struct Relay {
    sessions: SharedSessions,
    notifier: Arc<dyn Notifier>,
}

impl Relay {
    pub fn new(sessions: SharedSessions, notifier: Arc<dyn Notifier>) -> Self {
        Self { sessions, notifier }
    }

    pub async fn route(&self, sender: UserId, content: Content) -> Result<RelayOutcome, AppError> {
        let partner = self.sessions.lock().await.partner_of(sender);

        let Some(partner) = partner else {
            debug!("Dropping {} from unpaired user {}", content.kind(), sender);
            return Ok(RelayOutcome::NoPartner);
        };

        if content.is_directive() {
            debug!("Not relaying directive from user {}", sender);
            return Ok(RelayOutcome::Directive);
        }

        debug!("Relaying {} from {} to {}", content.kind(), sender, partner);
        self.notifier.send(partner, content).await?;
        Ok(RelayOutcome::Delivered { to: partner })
    }
}
