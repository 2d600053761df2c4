//! Authentication module for the pairchat server
//!
//! Maps gateway tokens to platform user ids.

mod service;

pub use service::{AuthService, Claims};
