//! Bus wire format.
//!
//! Payloads on the bus are plain text. Chat lines are colon-delimited
//! (`"<username>:<text>"`); join/leave announcements are unstructured
//! sentences. Subscribers print payloads verbatim, so parsing is only
//! needed by tooling and tests that want the sender back out.

use crate::user::Username;

/// One chat message in transit on the bus.
///
/// Ephemeral: value-copied across the bus, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Name of the sender as it appeared on the wire.
    pub sender: String,
    /// Message text; may be empty (empty input lines are broadcast as-is).
    pub body: String,
}

impl ChatMessage {
    pub fn new(sender: &Username, body: impl Into<String>) -> Self {
        Self {
            sender: sender.as_str().to_string(),
            body: body.into(),
        }
    }

    /// Wire encoding for chat lines: `"<sender>:<body>"`.
    pub fn to_wire(&self) -> String {
        format!("{}:{}", self.sender, self.body)
    }

    /// Parse a chat payload back into sender and body.
    ///
    /// Splits on the first colon; returns `None` for payloads without one
    /// (system announcements are colon-free).
    pub fn parse(payload: &str) -> Option<Self> {
        let (sender, body) = payload.split_once(':')?;
        Some(Self {
            sender: sender.to_string(),
            body: body.to_string(),
        })
    }
}

/// Announcement payload published when a user joins.
pub fn joined_announcement(user: &Username) -> String {
    format!("{user} has joined")
}

/// Announcement payload published when a user leaves.
pub fn left_announcement(user: &Username) -> String {
    format!("{user} has left")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Username {
        Username::new("alice").unwrap()
    }

    #[test]
    fn test_chat_wire_format() {
        let msg = ChatMessage::new(&alice(), "hello");
        assert_eq!(msg.to_wire(), "alice:hello");
    }

    #[test]
    fn test_empty_body_keeps_delimiter() {
        // Empty lines are broadcast as empty chat messages, no special-casing.
        let msg = ChatMessage::new(&alice(), "");
        assert_eq!(msg.to_wire(), "alice:");
    }

    #[test]
    fn test_parse_splits_on_first_colon() {
        let msg = ChatMessage::parse("alice:see you at 10:30").unwrap();
        assert_eq!(msg.sender, "alice");
        assert_eq!(msg.body, "see you at 10:30");
    }

    #[test]
    fn test_parse_rejects_announcements() {
        assert_eq!(ChatMessage::parse("alice has joined"), None);
    }

    #[test]
    fn test_announcements() {
        assert_eq!(joined_announcement(&alice()), "alice has joined");
        assert_eq!(left_announcement(&alice()), "alice has left");
    }
}
