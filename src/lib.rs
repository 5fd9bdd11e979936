//! vimi - encrypted private messaging for a web forum.
//!
//! Message content is sealed with AES before it reaches the database and
//! opened again only for the sender, the recipients and superusers.

pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod identity;
pub mod logging;
pub mod message;
pub mod web;

pub use config::Config;
pub use crypto::{EnvKeyProvider, Envelope, KeyProvider, MessageKey, StaticKeyProvider};
pub use db::{Database, NewUser, Role, User, UserRepository};
pub use error::{Result, VimiError};
pub use identity::Identity;
pub use message::{
    DecryptedMessage, Inbox, Message, MessageRepository, MessageService, SendMessageRequest,
};
pub use web::WebServer;
