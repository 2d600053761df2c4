//! Bot module for the pairchat server
//!
//! The command layer: classifies inbound events (commands, menu labels,
//! inline buttons, content) and drives the chat core accordingly.

mod commands;
mod handlers;

pub use commands::{InboundEvent, MenuAction};
pub use handlers::Dispatcher;
