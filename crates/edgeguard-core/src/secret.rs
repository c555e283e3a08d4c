//! Secret handling: the internal shared secret and log-safe fingerprints.

use std::fmt;
use std::sync::Arc;

use sha2::{Digest, Sha256};

/// Non-reversible fingerprint of secret material: the first 8 bytes of its
/// SHA-256 digest, hex encoded.
///
/// This is the only form in which signing keys, shared secrets, or tokens
/// may appear in logs.
pub fn fingerprint(value: &[u8]) -> String {
    let digest = Sha256::digest(value);
    hex::encode(&digest[..8])
}

/// Static secret shared between the gateway and internal services.
///
/// Compared by exact byte equality. No trimming, no case folding.
#[derive(Clone)]
pub struct SharedSecret(Arc<str>);

impl SharedSecret {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self(secret.into())
    }

    pub fn matches(&self, presented: &[u8]) -> bool {
        self.0.as_bytes() == presented
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn byte_len(&self) -> usize {
        self.0.len()
    }

    pub fn fingerprint(&self) -> String {
        fingerprint(self.0.as_bytes())
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSecret")
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}
