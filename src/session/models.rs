use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform-assigned user handle.
///
/// Chat ids on the messaging platform are signed 64-bit integers; the core
/// only ever compares and hashes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        UserId(id)
    }
}

impl std::str::FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(UserId)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    Waiting,
    Paired { partner: UserId },
}

impl SessionState {
    pub fn partner(&self) -> Option<UserId> {
        match self {
            SessionState::Paired { partner } => Some(*partner),
            _ => None,
        }
    }
}
