use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::RwLock;

use crate::chat::content::{Content, Keyboard};
use crate::error::NotifierError;
use crate::session::UserId;

/// Outward channel of the core. The transport implements this; the core
/// never addresses the transport directly.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, user: UserId, content: Content) -> Result<(), NotifierError>;

    async fn send_with_keyboard(
        &self,
        user: UserId,
        content: Content,
        keyboard: Keyboard,
    ) -> Result<(), NotifierError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub user: UserId,
    pub content: Content,
    pub keyboard: Option<Keyboard>,
}

/// Notifier that records every call instead of delivering it.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: RwLock<Vec<SentMessage>>,
    unreachable: RwLock<HashSet<UserId>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later delivery to `user` fail with `Unreachable`.
    pub async fn make_unreachable(&self, user: UserId) {
        self.unreachable.write().await.insert(user);
    }

    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.read().await.clone()
    }

    pub async fn sent_to(&self, user: UserId) -> Vec<SentMessage> {
        self.sent
            .read()
            .await
            .iter()
            .filter(|msg| msg.user == user)
            .cloned()
            .collect()
    }

    /// Text bodies delivered to `user`, in order.
    pub async fn texts_to(&self, user: UserId) -> Vec<String> {
        self.sent_to(user)
            .await
            .into_iter()
            .filter_map(|msg| msg.content.as_text().map(str::to_string))
            .collect()
    }

    pub async fn clear(&self) {
        self.sent.write().await.clear();
    }

    async fn record(&self, msg: SentMessage) -> Result<(), NotifierError> {
        if self.unreachable.read().await.contains(&msg.user) {
            return Err(NotifierError::Unreachable(msg.user));
        }
        self.sent.write().await.push(msg);
        Ok(())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, user: UserId, content: Content) -> Result<(), NotifierError> {
        self.record(SentMessage { user, content, keyboard: None }).await
    }

    async fn send_with_keyboard(
        &self,
        user: UserId,
        content: Content,
        keyboard: Keyboard,
    ) -> Result<(), NotifierError> {
        self.record(SentMessage { user, content, keyboard: Some(keyboard) }).await
    }
}
