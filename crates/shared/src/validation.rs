//! Common validation logic for request payloads.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Usernames: 3-32 chars, alphanumeric plus underscore and dash,
    /// starting with a letter or digit.
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{2,31}$").unwrap();

    /// Game pins are six digits.
    static ref GAME_PIN_RE: Regex = Regex::new(r"^[0-9]{6}$").unwrap();
}

/// Validates a username against the platform's naming rules.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_username"))
    }
}

/// Returns true when `pin` is a well-formed six-digit game pin.
pub fn is_valid_game_pin(pin: &str) -> bool {
    GAME_PIN_RE.is_match(pin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("Alice_42").is_ok());
        assert!(validate_username("4chan-refugee").is_ok());
    }

    #[test]
    fn test_username_too_short() {
        assert!(validate_username("ab").is_err());
    }

    #[test]
    fn test_username_too_long() {
        assert!(validate_username(&"a".repeat(33)).is_err());
    }

    #[test]
    fn test_username_bad_leading_char() {
        assert!(validate_username("_alice").is_err());
        assert!(validate_username("-alice").is_err());
    }

    #[test]
    fn test_username_bad_characters() {
        assert!(validate_username("alice bob").is_err());
        assert!(validate_username("alice@example").is_err());
    }

    #[test]
    fn test_game_pin() {
        assert!(is_valid_game_pin("123456"));
        assert!(!is_valid_game_pin("12345"));
        assert!(!is_valid_game_pin("1234567"));
        assert!(!is_valid_game_pin("12345a"));
        assert!(!is_valid_game_pin(""));
    }
}
