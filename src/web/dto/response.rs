//! Response DTOs for the vimi web API.

use serde::Serialize;
use utoipa::ToSchema;

use crate::message::{DecryptedMessage, Inbox, Message, Participant};

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

// ============================================================================
// Message DTOs
// ============================================================================

/// A sender or recipient.
#[derive(Debug, Serialize, ToSchema)]
pub struct ParticipantInfo {
    /// User ID.
    pub id: i64,
    /// Username.
    pub username: String,
}

impl From<Participant> for ParticipantInfo {
    fn from(p: Participant) -> Self {
        Self {
            id: p.id,
            username: p.username,
        }
    }
}

/// Result of sending a message.
#[derive(Debug, Serialize, ToSchema)]
pub struct SentMessageResponse {
    /// Message ID.
    pub id: i64,
    /// Message title.
    pub title: String,
    /// Recipient usernames.
    pub recipients: Vec<String>,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
}

impl From<Message> for SentMessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            title: m.title,
            recipients: m.recipients.into_iter().map(|r| r.username).collect(),
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

/// A message with readable content.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Message ID.
    pub id: i64,
    /// Sender info.
    pub sender: ParticipantInfo,
    /// Recipient info.
    pub recipients: Vec<ParticipantInfo>,
    /// Message title.
    pub title: String,
    /// Message content, or a placeholder when it cannot be shown.
    pub content: String,
    /// Whether a recipient has opened the message.
    pub is_read: bool,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
}

impl From<DecryptedMessage> for MessageResponse {
    fn from(m: DecryptedMessage) -> Self {
        Self {
            id: m.id,
            sender: m.sender.into(),
            recipients: m.recipients.into_iter().map(Into::into).collect(),
            title: m.title,
            content: m.content,
            is_read: m.is_read,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

/// Inbox response.
#[derive(Debug, Serialize, ToSchema)]
pub struct InboxResponse {
    /// Received messages, newest first.
    pub received: Vec<MessageResponse>,
    /// Sent messages, newest first.
    pub sent: Vec<MessageResponse>,
    /// Unread received messages.
    pub unread_count: i64,
}

impl From<Inbox> for InboxResponse {
    fn from(inbox: Inbox) -> Self {
        Self {
            received: inbox.received.into_iter().map(Into::into).collect(),
            sent: inbox.sent.into_iter().map(Into::into).collect(),
            unread_count: inbox.unread_count,
        }
    }
}

/// Unread count response.
#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCountResponse {
    /// Unread message count.
    pub count: i64,
}
