//! Message service for vimi.
//!
//! High-level messaging operations: recipient resolution, sealing content
//! on send, decrypting for display, read-on-view and access control.

use tracing::{info, warn};

use crate::crypto::{open, Envelope, KeyProvider, MessageKey, DECRYPTION_ERROR_TEXT};
use crate::db::{Database, UserRepository};
use crate::identity::Identity;
use crate::{Result, VimiError};

use super::repository::MessageRepository;
use super::types::{
    parse_recipients, DecryptedMessage, Inbox, Message, NewMessage, CONTENT_HIDDEN_TEXT,
    MAX_TITLE_LENGTH,
};

/// Request to send a message.
#[derive(Debug, Clone)]
pub struct SendMessageRequest {
    /// Sender user ID.
    pub sender_id: i64,
    /// Recipient usernames.
    pub recipients: Vec<String>,
    /// Message title.
    pub title: String,
    /// Plaintext content.
    pub content: String,
}

impl SendMessageRequest {
    /// Create a new send request.
    pub fn new(
        sender_id: i64,
        recipients: Vec<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            sender_id,
            recipients,
            title: title.into(),
            content: content.into(),
        }
    }

    /// Create a request from a comma separated recipient field.
    pub fn from_recipient_field(
        sender_id: i64,
        recipients: &str,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::new(sender_id, parse_recipients(recipients), title, content)
    }
}

/// Service for private messaging.
pub struct MessageService<'a> {
    db: &'a Database,
    keys: &'a dyn KeyProvider,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService.
    pub fn new(db: &'a Database, keys: &'a dyn KeyProvider) -> Self {
        Self { db, keys }
    }

    /// Send a message.
    ///
    /// Nothing is persisted unless every recipient resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Title is blank or too long, or content is blank
    /// - No recipient is given
    /// - Any recipient username is unknown (all of them are reported)
    /// - The sender is not in the user directory
    /// - The encryption key cannot be resolved
    pub async fn send(&self, request: &SendMessageRequest) -> Result<Message> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(VimiError::Validation("title is required".to_string()));
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(VimiError::Validation(format!(
                "title must be at most {MAX_TITLE_LENGTH} characters"
            )));
        }
        if request.content.trim().is_empty() {
            return Err(VimiError::Validation("content is required".to_string()));
        }

        let mut usernames: Vec<String> = Vec::new();
        for name in request.recipients.iter().map(|n| n.trim()) {
            if !name.is_empty() && !usernames.iter().any(|u| u == name) {
                usernames.push(name.to_string());
            }
        }
        if usernames.is_empty() {
            return Err(VimiError::Validation(
                "at least one recipient is required".to_string(),
            ));
        }

        let user_repo = UserRepository::new(self.db.pool());
        if user_repo.get_by_id(request.sender_id).await?.is_none() {
            return Err(VimiError::Auth("sender account not found".to_string()));
        }

        let found = user_repo.find_by_usernames(&usernames).await?;
        let unknown: Vec<String> = usernames
            .iter()
            .filter(|name| !found.iter().any(|u| &u.username == *name))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(VimiError::UnknownRecipients(unknown));
        }

        let key = self.keys.resolve_key()?;
        let recipient_ids: Vec<i64> = usernames
            .iter()
            .filter_map(|name| found.iter().find(|u| &u.username == name).map(|u| u.id))
            .collect();
        let new_message = NewMessage::new(
            request.sender_id,
            recipient_ids,
            title,
            Envelope::seal(&request.content, &key),
        );

        let message = MessageRepository::new(self.db.pool())
            .create(&new_message)
            .await?;

        info!(
            message_id = message.id,
            sender_id = message.sender.id,
            recipients = message.recipients.len(),
            "Private message sent"
        );
        Ok(message)
    }

    /// List the caller's received and sent messages with decrypted content.
    ///
    /// A message that cannot be decrypted shows the decryption sentinel
    /// instead of failing the whole listing.
    pub async fn list_inbox(&self, user: &Identity) -> Result<Inbox> {
        let key = self.keys.resolve_key()?;
        let repo = MessageRepository::new(self.db.pool());

        let received = repo.list_received(user.id).await?;
        let sent = repo.list_sent(user.id).await?;
        let unread_count = repo.count_unread(user.id).await?;

        Ok(Inbox {
            received: received.into_iter().map(|m| decrypt(m, &key)).collect(),
            sent: sent.into_iter().map(|m| decrypt(m, &key)).collect(),
            unread_count,
        })
    }

    /// Number of unread messages addressed to the caller.
    pub async fn unread_count(&self, user: &Identity) -> Result<i64> {
        MessageRepository::new(self.db.pool())
            .count_unread(user.id)
            .await
    }

    /// View a single message.
    ///
    /// A recipient's first view marks the message read. The sender's view
    /// never changes the read state.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Message doesn't exist
    /// - Caller is neither sender nor recipient
    /// - The encryption key cannot be resolved
    pub async fn view(&self, message_id: i64, caller: &Identity) -> Result<DecryptedMessage> {
        let repo = MessageRepository::new(self.db.pool());
        let mut message = repo
            .get_by_id(message_id)
            .await?
            .ok_or_else(|| VimiError::NotFound("message".to_string()))?;

        if !message.is_participant(caller.id) {
            warn!(
                message_id,
                user_id = caller.id,
                "Rejected view of a message by a non-participant"
            );
            return Err(VimiError::Permission(
                "you are not allowed to view this message".to_string(),
            ));
        }

        let key = self.keys.resolve_key()?;

        if message.is_recipient(caller.id) && !message.is_read {
            repo.mark_as_read(message_id).await?;
            message.is_read = true;
        }

        Ok(decrypt(message, &key))
    }

    /// Administrative listing of every message.
    ///
    /// Staff may list; only superusers see decrypted content, everyone else
    /// gets [`CONTENT_HIDDEN_TEXT`].
    pub async fn list_all(&self, caller: &Identity) -> Result<Vec<DecryptedMessage>> {
        if !caller.is_privileged() {
            return Err(VimiError::Permission(
                "staff privileges are required".to_string(),
            ));
        }

        let messages = MessageRepository::new(self.db.pool()).list_all().await?;

        if caller.can_read_all_content() {
            let key = self.keys.resolve_key()?;
            Ok(messages.into_iter().map(|m| decrypt(m, &key)).collect())
        } else {
            Ok(messages
                .into_iter()
                .map(|m| m.with_content(CONTENT_HIDDEN_TEXT.to_string()))
                .collect())
        }
    }
}

fn decrypt(message: Message, key: &MessageKey) -> DecryptedMessage {
    let content = match open(&message.content, key) {
        Ok(text) => text,
        Err(e) => {
            warn!(message_id = message.id, error = %e, "Failed to decrypt message content");
            DECRYPTION_ERROR_TEXT.to_string()
        }
    };
    message.with_content(content)
}
