//! The process-wide HMAC signing key.

use std::fmt;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use jsonwebtoken::DecodingKey;
#[cfg(any(test, feature = "test-utils"))]
use jsonwebtoken::EncodingKey;

use edgeguard_config::JwtConfig;
use edgeguard_core::fingerprint;

/// Minimum decoded key length. HMAC-SHA256 keys shorter than the digest
/// size are refused.
pub const MIN_KEY_BYTES: usize = 32;

/// Standard base64 alphabet; padding may be present or omitted.
const KEY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("signing key is not valid base64: {0}")]
    InvalidBase64(String),

    #[error("signing key decodes to {len} bytes, at least {min} are required", min = MIN_KEY_BYTES)]
    TooShort { len: usize },
}

/// Symmetric key used to verify token signatures.
///
/// Built once at startup from the configured base64 value. A process that
/// cannot build its key must not start.
#[derive(Clone)]
pub struct SigningKey {
    decoding: DecodingKey,
    #[cfg(any(test, feature = "test-utils"))]
    encoding: EncodingKey,
    len: usize,
    fingerprint: String,
}

impl SigningKey {
    pub fn from_base64(encoded: &str) -> Result<Self, KeyError> {
        let bytes = KEY_ENGINE
            .decode(encoded)
            .map_err(|e| KeyError::InvalidBase64(e.to_string()))?;

        if bytes.len() < MIN_KEY_BYTES {
            return Err(KeyError::TooShort { len: bytes.len() });
        }

        Ok(Self {
            decoding: DecodingKey::from_secret(&bytes),
            #[cfg(any(test, feature = "test-utils"))]
            encoding: EncodingKey::from_secret(&bytes),
            len: bytes.len(),
            fingerprint: fingerprint(&bytes),
        })
    }

    pub fn from_config(config: &JwtConfig) -> Result<Self, KeyError> {
        Self::from_base64(&config.secret_key)
    }

    /// Decoded key length in bytes.
    pub fn byte_len(&self) -> usize {
        self.len
    }

    /// Log-safe fingerprint of the key material.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }

    #[cfg(any(test, feature = "test-utils"))]
    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("len", &self.len)
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}
