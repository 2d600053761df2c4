use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::profile::{Profile, ProfileStore, TermsStore};
use crate::session::UserId;

#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: Arc<RwLock<HashMap<UserId, Profile>>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_profile(&self, user: UserId) -> Option<Profile> {
        self.profiles.read().await.get(&user).cloned()
    }

    async fn set_profile(&self, user: UserId, profile: Profile) {
        self.profiles.write().await.insert(user, profile);
        info!("Stored profile for user {}", user);
    }
}

#[derive(Debug, Default)]
pub struct InMemoryTermsStore {
    accepted: Arc<RwLock<HashSet<UserId>>>,
}

impl InMemoryTermsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TermsStore for InMemoryTermsStore {
    async fn has_accepted(&self, user: UserId) -> bool {
        self.accepted.read().await.contains(&user)
    }

    async fn accept(&self, user: UserId) {
        if self.accepted.write().await.insert(user) {
            info!("User {} accepted the terms", user);
        }
    }
}
