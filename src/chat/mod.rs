//! Chat module for the pairchat server
//!
//! Matchmaking, message relay and the notifier boundary the transport
//! implements.

pub mod content;
mod matchmaker;
pub mod notifier;
mod relay;
pub mod texts;

pub use content::{Button, ButtonAction, Content, Keyboard, KeyboardKind, KeyboardLayout};
pub use matchmaker::{MatchOutcome, Matchmaker};
pub use notifier::{Notifier, RecordingNotifier, SentMessage};
pub use relay::{Relay, RelayOutcome};
