//! Message key resolution.
//!
//! The key is a single process-wide AES key supplied from outside the
//! process as a hex string. Both encryption and decryption use the key
//! returned by the same [`KeyProvider`].

use std::fmt;

use zeroize::Zeroize;

use crate::config::MessagingConfig;
use crate::{Result, VimiError};

/// A validated AES key for message envelopes.
///
/// The variant is chosen by the decoded key length. Key bytes are wiped
/// on drop and never printed.
#[derive(Clone, PartialEq, Eq)]
pub enum MessageKey {
    /// 128-bit key.
    Aes128([u8; 16]),
    /// 192-bit key.
    Aes192([u8; 24]),
    /// 256-bit key.
    Aes256([u8; 32]),
}

impl MessageKey {
    /// Build a key from raw bytes (16, 24 or 32 of them).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match bytes.len() {
            16 => Ok(Self::Aes128(copy_array(bytes))),
            24 => Ok(Self::Aes192(copy_array(bytes))),
            32 => Ok(Self::Aes256(copy_array(bytes))),
            n => Err(VimiError::Config(format!(
                "message key must be 16, 24 or 32 bytes, got {n}"
            ))),
        }
    }

    /// Parse a hex encoded key. Case does not matter, surrounding
    /// whitespace is ignored.
    pub fn from_hex(hex_key: &str) -> Result<Self> {
        let mut bytes = hex::decode(hex_key.trim())
            .map_err(|e| VimiError::Config(format!("message key is not valid hex: {e}")))?;
        let key = Self::from_bytes(&bytes);
        bytes.zeroize();
        key
    }

    /// Key size in bits.
    pub fn bits(&self) -> usize {
        self.as_bytes().len() * 8
    }

    fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Aes128(k) => k.as_slice(),
            Self::Aes192(k) => k.as_slice(),
            Self::Aes256(k) => k.as_slice(),
        }
    }
}

fn copy_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}

impl Drop for MessageKey {
    fn drop(&mut self) {
        match self {
            Self::Aes128(k) => k.zeroize(),
            Self::Aes192(k) => k.zeroize(),
            Self::Aes256(k) => k.zeroize(),
        }
    }
}

impl fmt::Debug for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageKey(AES-{}, <redacted>)", self.bits())
    }
}

/// Source of the message key.
pub trait KeyProvider: Send + Sync {
    /// Resolve the current key.
    ///
    /// Fails with [`VimiError::Config`] when no usable key is available.
    fn resolve_key(&self) -> Result<MessageKey>;
}

/// Reads the key from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvKeyProvider {
    var: String,
}

impl EnvKeyProvider {
    /// Create a provider reading `var`.
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Create a provider for the variable named in the messaging config.
    pub fn from_config(config: &MessagingConfig) -> Self {
        Self::new(config.key_env.clone())
    }

    /// Name of the variable this provider reads.
    pub fn var_name(&self) -> &str {
        &self.var
    }
}

impl KeyProvider for EnvKeyProvider {
    fn resolve_key(&self) -> Result<MessageKey> {
        let value = std::env::var(&self.var).unwrap_or_default();
        if value.trim().is_empty() {
            return Err(VimiError::Config(format!(
                "encryption key not set, please set the {} environment variable",
                self.var
            )));
        }
        MessageKey::from_hex(&value)
    }
}

/// Holds an already resolved key.
#[derive(Debug, Clone)]
pub struct StaticKeyProvider {
    key: MessageKey,
}

impl StaticKeyProvider {
    /// Wrap a resolved key.
    pub fn new(key: MessageKey) -> Self {
        Self { key }
    }

    /// Resolve `inner` once and keep the result for the process lifetime.
    pub fn resolve_once(inner: &dyn KeyProvider) -> Result<Self> {
        Ok(Self::new(inner.resolve_key()?))
    }
}

impl KeyProvider for StaticKeyProvider {
    fn resolve_key(&self) -> Result<MessageKey> {
        Ok(self.key.clone())
    }
}
