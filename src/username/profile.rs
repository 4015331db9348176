use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static SPECIAL_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[!@#$%^&*(),.?":{}|<>]"#).unwrap());
static UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").unwrap());
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").unwrap());

/// Character classes present in a username. Used for diagnostics only; a
/// profile never changes what gets stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsernameProfile {
    pub username: String,
    /// Length in characters
    pub length: usize,
    pub has_special_chars: bool,
    pub has_uppercase: bool,
    pub has_numbers: bool,
}

impl UsernameProfile {
    pub fn of(username: &str) -> Self {
        Self {
            username: username.to_string(),
            length: username.chars().count(),
            has_special_chars: SPECIAL_CHARS.is_match(username),
            has_uppercase: UPPERCASE.is_match(username),
            has_numbers: DIGITS.is_match(username),
        }
    }

    /// True when the username is anything other than plain lowercase letters.
    pub fn is_notable(&self) -> bool {
        self.has_special_chars || self.has_uppercase || self.has_numbers
    }

    /// Emit the profile as a debug event.
    pub fn trace(&self, context: &'static str) {
        if self.is_notable() {
            tracing::debug!(
                context,
                username = %self.username,
                length = self.length,
                special = self.has_special_chars,
                uppercase = self.has_uppercase,
                numbers = self.has_numbers,
                "username characteristics"
            );
        } else {
            tracing::debug!(context, username = %self.username, length = self.length, "username characteristics");
        }
    }
}
