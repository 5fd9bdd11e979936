//! Encryption at rest for private message content.
//!
//! - [`key`]: resolving the process-wide message key
//! - [`envelope`]: encoding content into (and out of) stored envelopes

pub mod envelope;
pub mod key;

pub use envelope::{
    is_envelope, open, open_or_sentinel, DecryptResult, DecryptionFailure, Envelope,
    DECRYPTION_ERROR_TEXT, ENVELOPE_PREFIX,
};
pub use key::{EnvKeyProvider, KeyProvider, MessageKey, StaticKeyProvider};
