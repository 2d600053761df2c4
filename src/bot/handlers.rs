use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::bot::commands::{InboundEvent, MenuAction};
use crate::chat::{texts, ButtonAction, Content, Keyboard, Matchmaker, Notifier, Relay};
use crate::error::{AppError, ValidationError};
use crate::profile::{Profile, ProfileStore, TermsStore};
use crate::session::{SessionState, UserId};

/// Turns inbound user events into matchmaking, relay and profile calls.
pub struct Dispatcher {
    matchmaker: Arc<Matchmaker>,
    relay: Relay,
    profiles: Arc<dyn ProfileStore>,
    terms: Arc<dyn TermsStore>,
    notifier: Arc<dyn Notifier>,
    profile_max_chars: usize,
}

impl Dispatcher {
    pub fn new(
        matchmaker: Arc<Matchmaker>,
        relay: Relay,
        profiles: Arc<dyn ProfileStore>,
        terms: Arc<dyn TermsStore>,
        notifier: Arc<dyn Notifier>,
        profile_max_chars: usize,
    ) -> Self {
        Self {
            matchmaker,
            relay,
            profiles,
            terms,
            notifier,
            profile_max_chars,
        }
    }

    pub fn matchmaker(&self) -> Arc<Matchmaker> {
        self.matchmaker.clone()
    }

    pub async fn handle(&self, user: UserId, event: InboundEvent) -> Result<(), AppError> {
        debug!("User {} event: {:?}", user, event);

        match event {
            InboundEvent::Start => self.handle_start(user).await,
            InboundEvent::Menu(MenuAction::Start) => self.handle_menu_start(user).await,
            InboundEvent::Stop => self.handle_stop(user, true).await,
            InboundEvent::Menu(MenuAction::Stop) | InboundEvent::Button(ButtonAction::Stop) => {
                self.handle_stop(user, false).await
            }
            InboundEvent::Next | InboundEvent::Button(ButtonAction::Next) => {
                self.handle_next(user).await
            }
            InboundEvent::SetProfile(text) => self.handle_set_profile(user, text).await,
            InboundEvent::Menu(MenuAction::ViewProfile) => self.handle_view_profile(user).await,
            InboundEvent::UnknownCommand(name) => {
                debug!("Ignoring unknown command /{} from user {}", name, user);
                Ok(())
            }
            InboundEvent::Content(content) => {
                self.relay.route(user, content).await?;
                Ok(())
            }
        }
    }

    async fn handle_start(&self, user: UserId) -> Result<(), AppError> {
        match self.matchmaker.state_of(user).await {
            SessionState::Paired { .. } => {
                self.reply(user, texts::ALREADY_IN_CHAT).await;
                return Ok(());
            }
            SessionState::Waiting => {
                self.reply(user, texts::ALREADY_SEARCHING).await;
                return Ok(());
            }
            SessionState::Idle => {}
        }

        if !self.terms.has_accepted(user).await {
            self.reply(user, texts::TERMS_NOTICE).await;
        }
        self.show_main_menu(user).await;
        Ok(())
    }

    async fn handle_menu_start(&self, user: UserId) -> Result<(), AppError> {
        match self.matchmaker.state_of(user).await {
            SessionState::Paired { .. } => {
                self.reply(user, texts::ALREADY_IN_CHAT).await;
                return Ok(());
            }
            // keeps the existing queue slot
            SessionState::Waiting => {
                self.reply(user, texts::ALREADY_SEARCHING).await;
                return Ok(());
            }
            SessionState::Idle => {}
        }

        self.terms.accept(user).await;
        self.matchmaker.find_partner(user).await?;
        Ok(())
    }

    async fn handle_stop(&self, user: UserId, with_hint: bool) -> Result<(), AppError> {
        self.matchmaker.disconnect(user, true).await;
        let text = if with_hint { texts::LEFT_CHAT_WITH_HINT } else { texts::LEFT_CHAT };
        self.reply(user, text).await;
        self.show_main_menu(user).await;
        Ok(())
    }

    async fn handle_next(&self, user: UserId) -> Result<(), AppError> {
        self.matchmaker.disconnect(user, true).await;
        self.matchmaker.find_partner(user).await?;
        Ok(())
    }

    async fn handle_set_profile(&self, user: UserId, text: Option<String>) -> Result<(), AppError> {
        let Some(text) = text else {
            self.reply(user, texts::ABOUT_USAGE).await;
            return Ok(());
        };

        match Profile::parse(&text, self.profile_max_chars) {
            Ok(profile) => {
                self.profiles.set_profile(user, profile).await;
                self.reply(user, texts::PROFILE_SAVED).await;
                Ok(())
            }
            Err(e) => {
                info!("Rejected profile from user {}: {}", user, e);
                match e {
                    ValidationError::ProfileEmpty => self.reply(user, texts::ABOUT_USAGE).await,
                    ValidationError::ProfileTooLong { max, .. } => {
                        self.reply(user, &texts::profile_too_long(max)).await
                    }
                }
                Err(e.into())
            }
        }
    }

    async fn handle_view_profile(&self, user: UserId) -> Result<(), AppError> {
        match self.profiles.get_profile(user).await {
            Some(profile) => self.reply(user, &texts::own_profile(profile.as_str())).await,
            None => self.reply(user, texts::NO_PROFILE).await,
        }
        Ok(())
    }

    async fn show_main_menu(&self, user: UserId) {
        if let Err(e) = self
            .notifier
            .send_with_keyboard(user, Content::text(texts::MENU_PROMPT), Keyboard::MainMenu)
            .await
        {
            warn!("Failed to show main menu to user {}: {}", user, e);
        }
    }

    async fn reply(&self, user: UserId, text: &str) {
        if let Err(e) = self.notifier.send(user, Content::text(text)).await {
            warn!("Failed to reply to user {}: {}", user, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::RecordingNotifier;
    use crate::profile::{InMemoryProfileStore, InMemoryTermsStore, MAX_PROFILE_CHARS};
    use crate::session::{self, SessionStore, SharedSessions};

    const A: UserId = UserId(11);
    const B: UserId = UserId(22);

    struct Harness {
        sessions: SharedSessions,
        notifier: Arc<RecordingNotifier>,
        terms: Arc<InMemoryTermsStore>,
        dispatcher: Dispatcher,
    }

    fn harness() -> Harness {
        let sessions = session::shared(SessionStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let profiles = Arc::new(InMemoryProfileStore::new());
        let terms = Arc::new(InMemoryTermsStore::new());
        let matchmaker = Arc::new(Matchmaker::new(sessions.clone(), notifier.clone(), profiles.clone()));
        let relay = Relay::new(sessions.clone(), notifier.clone());
        let dispatcher = Dispatcher::new(
            matchmaker,
            relay,
            profiles,
            terms.clone(),
            notifier.clone(),
            MAX_PROFILE_CHARS,
        );
        Harness { sessions, notifier, terms, dispatcher }
    }

    async fn pair_up(h: &Harness) {
        h.dispatcher.handle(A, InboundEvent::Menu(MenuAction::Start)).await.unwrap();
        h.dispatcher.handle(B, InboundEvent::Menu(MenuAction::Start)).await.unwrap();
        assert_eq!(h.sessions.lock().await.partner_of(A), Some(B));
        h.notifier.clear().await;
    }

    #[tokio::test]
    async fn test_start_shows_terms_once_accepted_never_again() {
        let h = harness();
        h.dispatcher.handle(A, InboundEvent::Start).await.unwrap();

        let sent = h.notifier.sent_to(A).await;
        assert_eq!(sent[0].content, Content::text(texts::TERMS_NOTICE));
        assert_eq!(sent[1].keyboard, Some(Keyboard::MainMenu));
        assert_eq!(h.sessions.lock().await.state_of(A), SessionState::Idle);

        h.dispatcher.handle(A, InboundEvent::Menu(MenuAction::Start)).await.unwrap();
        assert!(h.terms.has_accepted(A).await);
        h.dispatcher.handle(A, InboundEvent::Stop).await.unwrap();
        h.notifier.clear().await;

        h.dispatcher.handle(A, InboundEvent::Start).await.unwrap();
        assert!(!h.notifier.texts_to(A).await.contains(&texts::TERMS_NOTICE.to_string()));
    }

    #[tokio::test]
    async fn test_start_while_paired_only_warns() {
        let h = harness();
        pair_up(&h).await;

        h.dispatcher.handle(A, InboundEvent::Start).await.unwrap();
        assert_eq!(h.notifier.texts_to(A).await, vec![texts::ALREADY_IN_CHAT.to_string()]);
        assert!(h.notifier.sent_to(B).await.is_empty());
        assert_eq!(h.sessions.lock().await.partner_of(A), Some(B));
    }

    #[tokio::test]
    async fn test_start_while_waiting_warns_and_keeps_queue_slot() {
        let h = harness();
        h.dispatcher.handle(A, InboundEvent::Menu(MenuAction::Start)).await.unwrap();
        h.notifier.clear().await;

        h.dispatcher.handle(A, InboundEvent::Start).await.unwrap();
        assert_eq!(h.notifier.texts_to(A).await, vec![texts::ALREADY_SEARCHING.to_string()]);
        assert_eq!(h.sessions.lock().await.queued_users(), vec![A]);

        h.dispatcher.handle(A, InboundEvent::Menu(MenuAction::Start)).await.unwrap();
        assert_eq!(h.notifier.texts_to(A).await.len(), 2);
        assert_eq!(h.sessions.lock().await.queued_users(), vec![A]);
    }

    #[tokio::test]
    async fn test_stop_notifies_partner() {
        let h = harness();
        pair_up(&h).await;

        h.dispatcher.handle(A, InboundEvent::Button(ButtonAction::Stop)).await.unwrap();

        assert_eq!(h.notifier.texts_to(B).await[0], texts::PARTNER_LEFT);
        let to_a = h.notifier.sent_to(A).await;
        assert_eq!(to_a[0].content, Content::text(texts::LEFT_CHAT));
        assert_eq!(to_a[1].keyboard, Some(Keyboard::MainMenu));
        assert!(!h.sessions.lock().await.is_paired(B));
    }

    #[tokio::test]
    async fn test_next_requeues_user() {
        let h = harness();
        pair_up(&h).await;

        h.dispatcher.handle(A, InboundEvent::Next).await.unwrap();

        let sessions = h.sessions.lock().await;
        assert_eq!(sessions.queued_users(), vec![A]);
        assert_eq!(sessions.state_of(B), SessionState::Idle);
        drop(sessions);
        assert_eq!(h.notifier.texts_to(A).await, vec![texts::SEARCHING.to_string()]);
    }

    #[tokio::test]
    async fn test_set_profile_boundary() {
        let h = harness();

        let accepted = "x".repeat(250);
        h.dispatcher
            .handle(A, InboundEvent::SetProfile(Some(accepted)))
            .await
            .unwrap();
        assert_eq!(h.notifier.texts_to(A).await, vec![texts::PROFILE_SAVED.to_string()]);
        h.notifier.clear().await;

        let rejected = "y".repeat(251);
        let err = h
            .dispatcher
            .handle(A, InboundEvent::SetProfile(Some(rejected)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ValidationError::ProfileTooLong { .. })));
        assert_eq!(h.notifier.texts_to(A).await, vec![texts::profile_too_long(250)]);
        h.notifier.clear().await;

        h.dispatcher.handle(A, InboundEvent::Menu(MenuAction::ViewProfile)).await.unwrap();
        assert_eq!(h.notifier.texts_to(A).await, vec![texts::own_profile(&"x".repeat(250))]);
    }

    #[tokio::test]
    async fn test_view_missing_profile_and_about_usage() {
        let h = harness();
        h.dispatcher.handle(A, InboundEvent::Menu(MenuAction::ViewProfile)).await.unwrap();
        h.dispatcher.handle(A, InboundEvent::SetProfile(None)).await.unwrap();
        assert_eq!(
            h.notifier.texts_to(A).await,
            vec![texts::NO_PROFILE.to_string(), texts::ABOUT_USAGE.to_string()]
        );
    }

    #[tokio::test]
    async fn test_content_is_relayed_but_commands_are_not() {
        let h = harness();
        pair_up(&h).await;

        h.dispatcher
            .handle(A, InboundEvent::from_content(Content::text("hello")))
            .await
            .unwrap();
        h.dispatcher
            .handle(A, InboundEvent::from_content(Content::text("/whatever")))
            .await
            .unwrap();

        assert_eq!(h.notifier.texts_to(B).await, vec!["hello".to_string()]);
        assert!(h.notifier.sent_to(A).await.is_empty());
    }
}
