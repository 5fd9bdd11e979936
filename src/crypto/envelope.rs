//! Encrypted content envelopes.
//!
//! Stored message content has the form
//!
//! ```text
//! "ENC:" + base64(iv[16] || ciphertext[N])    N % 16 == 0
//! ```
//!
//! The plaintext is right-padded with ASCII spaces to a multiple of 16 bytes
//! and encrypted with AES in CFB mode using 8-bit feedback segments. Content
//! without the `ENC:` prefix predates encryption and is returned as-is.

use aes::{Aes128, Aes192, Aes256};
use base64::engine::{general_purpose::STANDARD, Engine};
use cfb8::cipher::{AsyncStreamCipher, KeyIvInit};
use rand::RngCore;
use thiserror::Error;

use super::key::MessageKey;

/// Marker prefix of an encoded envelope.
pub const ENVELOPE_PREFIX: &str = "ENC:";

/// Length of the initialization vector in bytes.
pub const IV_LEN: usize = 16;

/// Plaintext is padded to a multiple of this many bytes.
pub const BLOCK_LEN: usize = 16;

/// Text shown in place of content that could not be decrypted.
pub const DECRYPTION_ERROR_TEXT: &str = "Decryption error";

/// Why an envelope could not be opened.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecryptionFailure {
    /// The body after the prefix is not valid base64.
    #[error("envelope is not valid base64")]
    InvalidBase64,

    /// Fewer bytes than an IV after decoding.
    #[error("envelope is shorter than its IV")]
    Truncated,

    /// Decrypted bytes are not UTF-8 (wrong key or corrupted ciphertext).
    #[error("decrypted content is not valid UTF-8")]
    InvalidUtf8,
}

/// Outcome of opening stored content.
pub type DecryptResult = std::result::Result<String, DecryptionFailure>;

/// Sealed message content, always in envelope form.
///
/// The only way to obtain one is [`Envelope::seal`], so anything typed as
/// `Envelope` is safe to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope(String);

impl Envelope {
    /// Encrypt `plaintext` under `key` with a fresh random IV.
    pub fn seal(plaintext: &str, key: &MessageKey) -> Self {
        let mut iv = [0u8; IV_LEN];
        rand::rng().fill_bytes(&mut iv);
        Self::seal_with_iv(plaintext, key, iv)
    }

    fn seal_with_iv(plaintext: &str, key: &MessageKey, iv: [u8; IV_LEN]) -> Self {
        let mut buf = pad(plaintext);
        encrypt_in_place(key, &iv, &mut buf);

        let mut raw = Vec::with_capacity(IV_LEN + buf.len());
        raw.extend_from_slice(&iv);
        raw.extend_from_slice(&buf);

        Self(format!("{ENVELOPE_PREFIX}{}", STANDARD.encode(raw)))
    }

    /// The encoded envelope.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Whether `stored` carries the envelope marker.
pub fn is_envelope(stored: &str) -> bool {
    stored.starts_with(ENVELOPE_PREFIX)
}

/// Recover the plaintext of stored content.
///
/// Unprefixed content is returned unchanged. Trailing spaces are stripped
/// from decrypted text, so plaintext that itself ends in spaces loses them.
///
/// The format carries no authentication tag: a tampered envelope that still
/// decodes to UTF-8 yields garbage text rather than an error.
pub fn open(stored: &str, key: &MessageKey) -> DecryptResult {
    let Some(encoded) = stored.strip_prefix(ENVELOPE_PREFIX) else {
        return Ok(stored.to_string());
    };

    let raw = STANDARD
        .decode(encoded.trim())
        .map_err(|_| DecryptionFailure::InvalidBase64)?;
    if raw.len() < IV_LEN {
        return Err(DecryptionFailure::Truncated);
    }

    let (iv, ciphertext) = raw.split_at(IV_LEN);
    let iv: [u8; IV_LEN] = iv.try_into().map_err(|_| DecryptionFailure::Truncated)?;
    let mut buf = ciphertext.to_vec();
    decrypt_in_place(key, &iv, &mut buf);

    let text = String::from_utf8(buf).map_err(|_| DecryptionFailure::InvalidUtf8)?;
    Ok(text.trim_end_matches(' ').to_string())
}

/// Like [`open`], but substitutes [`DECRYPTION_ERROR_TEXT`] on failure.
pub fn open_or_sentinel(stored: &str, key: &MessageKey) -> String {
    open(stored, key).unwrap_or_else(|_| DECRYPTION_ERROR_TEXT.to_string())
}

fn pad(plaintext: &str) -> Vec<u8> {
    let mut buf = plaintext.as_bytes().to_vec();
    let padded_len = buf.len().div_ceil(BLOCK_LEN) * BLOCK_LEN;
    buf.resize(padded_len, b' ');
    buf
}

fn encrypt_in_place(key: &MessageKey, iv: &[u8; IV_LEN], buf: &mut [u8]) {
    match key {
        MessageKey::Aes128(k) => cfb8::Encryptor::<Aes128>::new(k.into(), iv.into()).encrypt(buf),
        MessageKey::Aes192(k) => cfb8::Encryptor::<Aes192>::new(k.into(), iv.into()).encrypt(buf),
        MessageKey::Aes256(k) => cfb8::Encryptor::<Aes256>::new(k.into(), iv.into()).encrypt(buf),
    }
}

fn decrypt_in_place(key: &MessageKey, iv: &[u8; IV_LEN], buf: &mut [u8]) {
    match key {
        MessageKey::Aes128(k) => cfb8::Decryptor::<Aes128>::new(k.into(), iv.into()).decrypt(buf),
        MessageKey::Aes192(k) => cfb8::Decryptor::<Aes192>::new(k.into(), iv.into()).decrypt(buf),
        MessageKey::Aes256(k) => cfb8::Decryptor::<Aes256>::new(k.into(), iv.into()).decrypt(buf),
    }
}
