//! Profile module for the pairchat server
//!
//! Collaborator-owned user data: free-text profiles and terms acceptance.
//! Both are plain key-value lookups behind async traits so a durable
//! backend can replace the in-memory one.

mod memory;
mod models;

pub use memory::{InMemoryProfileStore, InMemoryTermsStore};
pub use models::{Profile, MAX_PROFILE_CHARS};

use async_trait::async_trait;

use crate::session::UserId;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, user: UserId) -> Option<Profile>;

    async fn set_profile(&self, user: UserId, profile: Profile);
}

/// Terms acceptance is set once and never cleared.
#[async_trait]
pub trait TermsStore: Send + Sync {
    async fn has_accepted(&self, user: UserId) -> bool;

    async fn accept(&self, user: UserId);
}
