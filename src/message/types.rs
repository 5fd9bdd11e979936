//! Message types for vimi.

use chrono::{DateTime, Utc};

use crate::crypto::Envelope;

/// Maximum length for a message title, in characters.
pub const MAX_TITLE_LENGTH: usize = 255;

/// Shown in the administrative listing to callers who may not read content.
pub const CONTENT_HIDDEN_TEXT: &str = "Content hidden (requires superuser privileges)";

/// A user taking part in a message, as sender or recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// User ID.
    pub id: i64,
    /// Username.
    pub username: String,
}

/// A stored private message.
///
/// `content` is the persisted form: an envelope, or legacy plaintext for
/// rows written before encryption was introduced.
#[derive(Debug, Clone)]
pub struct Message {
    /// Message ID.
    pub id: i64,
    /// Author of the message.
    pub sender: Participant,
    /// Recipients, ordered by username.
    pub recipients: Vec<Participant>,
    /// Message title.
    pub title: String,
    /// Stored content.
    pub content: String,
    /// Whether a recipient has opened the message.
    pub is_read: bool,
    /// When the message was sent.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Check if `user_id` authored this message.
    pub fn is_sender(&self, user_id: i64) -> bool {
        self.sender.id == user_id
    }

    /// Check if `user_id` is among the recipients.
    pub fn is_recipient(&self, user_id: i64) -> bool {
        self.recipients.iter().any(|r| r.id == user_id)
    }

    /// Check if `user_id` may read this message.
    pub fn is_participant(&self, user_id: i64) -> bool {
        self.is_sender(user_id) || self.is_recipient(user_id)
    }

    /// Replace the stored content with its readable form.
    pub fn with_content(self, content: String) -> DecryptedMessage {
        DecryptedMessage {
            id: self.id,
            sender: self.sender,
            recipients: self.recipients,
            title: self.title,
            content,
            is_read: self.is_read,
            created_at: self.created_at,
        }
    }
}

/// New message for creation.
///
/// Content is already sealed; plaintext cannot reach the store.
#[derive(Debug, Clone)]
pub struct NewMessage {
    /// Sender user ID.
    pub sender_id: i64,
    /// Recipient user IDs (non-empty, no duplicates).
    pub recipient_ids: Vec<i64>,
    /// Message title.
    pub title: String,
    /// Sealed content.
    pub content: Envelope,
}

impl NewMessage {
    /// Create a new message.
    pub fn new(
        sender_id: i64,
        recipient_ids: Vec<i64>,
        title: impl Into<String>,
        content: Envelope,
    ) -> Self {
        Self {
            sender_id,
            recipient_ids,
            title: title.into(),
            content,
        }
    }
}

/// A message with readable content.
///
/// `content` holds the plaintext, the decryption sentinel, or the hidden
/// marker depending on how it was produced.
#[derive(Debug, Clone)]
pub struct DecryptedMessage {
    /// Message ID.
    pub id: i64,
    /// Author of the message.
    pub sender: Participant,
    /// Recipients, ordered by username.
    pub recipients: Vec<Participant>,
    /// Message title.
    pub title: String,
    /// Readable content.
    pub content: String,
    /// Whether a recipient has opened the message.
    pub is_read: bool,
    /// When the message was sent.
    pub created_at: DateTime<Utc>,
}

/// A user's mailbox.
#[derive(Debug, Clone, Default)]
pub struct Inbox {
    /// Messages addressed to the user, newest first.
    pub received: Vec<DecryptedMessage>,
    /// Messages the user sent, newest first.
    pub sent: Vec<DecryptedMessage>,
    /// Number of unread messages in `received`.
    pub unread_count: i64,
}

/// Split a comma separated recipient field into usernames.
///
/// Names are trimmed, empty segments dropped and duplicates collapsed,
/// keeping the first occurrence.
pub fn parse_recipients(input: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(id: i64, username: &str) -> Participant {
        Participant {
            id,
            username: username.to_string(),
        }
    }

    fn sample_message() -> Message {
        Message {
            id: 1,
            sender: participant(1, "alice"),
            recipients: vec![participant(2, "bob"), participant(3, "carol")],
            title: "Hi".to_string(),
            content: "ENC:...".to_string(),
            is_read: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_participant_checks() {
        let message = sample_message();

        assert!(message.is_sender(1));
        assert!(!message.is_recipient(1));
        assert!(message.is_recipient(3));
        assert!(message.is_participant(2));
        assert!(!message.is_participant(4));
    }

    #[test]
    fn test_with_content_keeps_metadata() {
        let message = sample_message();
        let created_at = message.created_at;
        let decrypted = message.with_content("Hello".to_string());

        assert_eq!(decrypted.id, 1);
        assert_eq!(decrypted.content, "Hello");
        assert_eq!(decrypted.recipients.len(), 2);
        assert_eq!(decrypted.created_at, created_at);
    }

    #[test]
    fn test_parse_recipients() {
        assert_eq!(parse_recipients("bob"), vec!["bob"]);
        assert_eq!(parse_recipients("bob, carol"), vec!["bob", "carol"]);
        assert_eq!(parse_recipients(" bob ,, carol , "), vec!["bob", "carol"]);
    }

    #[test]
    fn test_parse_recipients_dedupes_in_order() {
        assert_eq!(
            parse_recipients("carol,bob,carol,bob"),
            vec!["carol", "bob"]
        );
    }

    #[test]
    fn test_parse_recipients_empty() {
        assert!(parse_recipients("").is_empty());
        assert!(parse_recipients(" , ,").is_empty());
    }

    #[test]
    fn test_parse_recipients_is_case_sensitive() {
        assert_eq!(parse_recipients("Bob,bob"), vec!["Bob", "bob"]);
    }
}
