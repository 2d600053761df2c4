use std::sync::Arc;
use tracing::{info, warn};

use crate::chat::content::{Content, Keyboard};
use crate::chat::notifier::Notifier;
use crate::chat::texts;
use crate::error::AppError;
use crate::profile::ProfileStore;
use crate::session::{SessionState, SharedSessions, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Paired { partner: UserId },
    Waiting,
}

/// Pairs waiting users and tears pairs down.
///
/// Session changes happen under one lock acquisition; notifications go out
/// after the lock is released. A failed notification is logged and never
/// undoes the state change.
pub struct Matchmaker {
    sessions: SharedSessions,
    notifier: Arc<dyn Notifier>,
    profiles: Arc<dyn ProfileStore>,
}

impl Matchmaker {
    pub fn new(
        sessions: SharedSessions,
        notifier: Arc<dyn Notifier>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Self {
        Self {
            sessions,
            notifier,
            profiles,
        }
    }

    pub async fn state_of(&self, user: UserId) -> SessionState {
        self.sessions.lock().await.state_of(user)
    }

    /// Pairs `user` with the longest-waiting user, or queues them.
    ///
    /// Fails with `InvalidStateError::AlreadyPaired` if `user` is paired;
    /// callers disconnect first.
    pub async fn find_partner(&self, user: UserId) -> Result<MatchOutcome, AppError> {
        let outcome = {
            let mut sessions = self.sessions.lock().await;
            sessions.touch(user);

            match sessions.pair_with_next(user) {
                Ok(Some(partner)) => MatchOutcome::Paired { partner },
                Ok(None) => MatchOutcome::Waiting,
                Err(e) => {
                    warn!("find_partner refused for user {}: {}", user, e);
                    return Err(e.into());
                }
            }
        };

        match outcome {
            MatchOutcome::Paired { partner } => {
                info!("Matched user {} with {}", user, partner);
                self.announce_pair(user, partner).await;
            }
            MatchOutcome::Waiting => {
                info!("User {} is waiting for a partner", user);
                self.deliver(user, Content::text(texts::SEARCHING)).await;
            }
        }

        Ok(outcome)
    }

    /// Ends the user's conversation and drops them from the queue.
    /// Returns the former partner, if any.
    pub async fn disconnect(&self, user: UserId, notify_partner: bool) -> Option<UserId> {
        let partner = {
            let mut sessions = self.sessions.lock().await;
            let partner = sessions.unpair(user);
            sessions.remove_from_queue(user);
            partner
        };

        if let Some(partner) = partner {
            info!("User {} left the conversation with {}", user, partner);
            if notify_partner {
                self.deliver(partner, Content::text(texts::PARTNER_LEFT)).await;
                self.deliver_with_keyboard(partner, Content::text(texts::MENU_PROMPT), Keyboard::MainMenu)
                    .await;
            }
        }

        partner
    }

    async fn announce_pair(&self, user: UserId, partner: UserId) {
        let user_profile = self.profiles.get_profile(user).await;
        let partner_profile = self.profiles.get_profile(partner).await;

        if let Some(profile) = user_profile.filter(|p| !p.as_str().is_empty()) {
            self.deliver(partner, Content::text(texts::partner_profile(profile.as_str()))).await;
        }
        if let Some(profile) = partner_profile.filter(|p| !p.as_str().is_empty()) {
            self.deliver(user, Content::text(texts::partner_profile(profile.as_str()))).await;
        }

        for target in [user, partner] {
            self.deliver(target, Content::text(texts::CONNECTED)).await;
        }
        for target in [user, partner] {
            self.deliver_with_keyboard(
                target,
                Content::text(texts::CHAT_CONTROLS_PROMPT),
                Keyboard::ChatControls,
            )
            .await;
        }
    }

    async fn deliver(&self, user: UserId, content: Content) {
        if let Err(e) = self.notifier.send(user, content).await {
            warn!("Failed to notify user {}: {}", user, e);
        }
    }

    async fn deliver_with_keyboard(&self, user: UserId, content: Content, keyboard: Keyboard) {
        if let Err(e) = self.notifier.send_with_keyboard(user, content, keyboard).await {
            warn!("Failed to send keyboard to user {}: {}", user, e);
        }
    }
}
