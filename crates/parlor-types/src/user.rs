//! Username newtype.
//!
//! A username is an opaque identifier; uniqueness among live sessions is
//! enforced by the presence lock, not here. The only local rule is that a
//! name must not be empty or all whitespace.

use std::fmt;

use thiserror::Error;

/// Rejected username at construction time.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("username must not be empty")]
pub struct InvalidUsername;

/// An opaque, non-empty username identifying one chat session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Validate and wrap a raw name.
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidUsername> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(InvalidUsername);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_name() {
        let user = Username::new("alice").unwrap();
        assert_eq!(user.as_str(), "alice");
        assert_eq!(user.to_string(), "alice");
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(Username::new(""), Err(InvalidUsername));
    }

    #[test]
    fn test_rejects_whitespace_only() {
        assert_eq!(Username::new("   "), Err(InvalidUsername));
        assert_eq!(Username::new("\t\n"), Err(InvalidUsername));
    }

    #[test]
    fn test_preserves_raw_name() {
        // Names are opaque; inner whitespace and punctuation pass through.
        let user = Username::new("alice the 3rd").unwrap();
        assert_eq!(user.as_str(), "alice the 3rd");
    }

    #[test]
    fn test_invalid_username_display() {
        assert_eq!(InvalidUsername.to_string(), "username must not be empty");
    }
}
