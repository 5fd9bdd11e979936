//! Private messaging for vimi.
//!
//! This module provides:
//! - Sending a message to one or more users by username
//! - Inbox and sent listings with decrypted content
//! - Read tracking on recipient view
//! - An administrative listing gated by role

mod repository;
mod service;
mod types;

pub use repository::MessageRepository;
pub use service::{MessageService, SendMessageRequest};
pub use types::{
    parse_recipients, DecryptedMessage, Inbox, Message, NewMessage, Participant,
    CONTENT_HIDDEN_TEXT, MAX_TITLE_LENGTH,
};
