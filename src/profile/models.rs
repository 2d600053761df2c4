use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

pub const MAX_PROFILE_CHARS: usize = 250;

/// Short free-text description a user shares with each new partner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(String);

impl Profile {
    /// Trims and validates raw profile text. Length is counted in
    /// characters, not bytes.
    pub fn parse(text: &str, max_chars: usize) -> Result<Self, ValidationError> {
        let text = text.trim();
        let len = text.chars().count();

        if len == 0 {
            return Err(ValidationError::ProfileEmpty);
        }
        if len > max_chars {
            return Err(ValidationError::ProfileTooLong { len, max: max_chars });
        }
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_boundary() {
        let exact = "a".repeat(MAX_PROFILE_CHARS);
        assert_eq!(Profile::parse(&exact, MAX_PROFILE_CHARS).unwrap().as_str(), exact);

        let over = "a".repeat(MAX_PROFILE_CHARS + 1);
        assert_eq!(
            Profile::parse(&over, MAX_PROFILE_CHARS),
            Err(ValidationError::ProfileTooLong { len: 251, max: 250 })
        );
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // 250 two-byte characters
        let cyrillic = "ж".repeat(250);
        assert!(Profile::parse(&cyrillic, MAX_PROFILE_CHARS).is_ok());
    }

    #[test]
    fn test_trims_and_rejects_blank() {
        assert_eq!(Profile::parse("  loves movies \n", 250).unwrap().as_str(), "loves movies");
        assert_eq!(Profile::parse("   ", 250), Err(ValidationError::ProfileEmpty));
    }
}
