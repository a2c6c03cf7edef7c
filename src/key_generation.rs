//! Signing key pair generation.
//!
//! Keys are Ed25519 (via `ring`) and travel as text:
//! - private key: base64 of the PKCS#8 v2 document,
//! - public key: base64 of the 32 raw public-key bytes.
//!
//! Both halves are always produced, stored and replaced together through
//! [`KeyPair`].

use std::fmt;

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use ring::digest::{digest, SHA256};
use ring::rand::SystemRandom;
use ring::signature::{Ed25519KeyPair, KeyPair as _};
use serde::{Deserialize, Serialize};

use crate::errors::{ProjectError, ProjectResult};

/// Number of digest bytes shown in a fingerprint.
const FINGERPRINT_LEN: usize = 16;

/// Public and private key text, owned as one unit.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawKeyPair")]
pub struct KeyPair {
    public_key: String,
    private_key: String,
}

#[derive(Deserialize)]
struct RawKeyPair {
    public_key: String,
    private_key: String,
}

impl TryFrom<RawKeyPair> for KeyPair {
    type Error = ProjectError;

    fn try_from(raw: RawKeyPair) -> ProjectResult<Self> {
        KeyPair::new(raw.public_key, raw.private_key)
    }
}

impl KeyPair {
    /// Pair two key texts. Both halves must be non-blank.
    pub fn new(
        public_key: impl Into<String>,
        private_key: impl Into<String>,
    ) -> ProjectResult<Self> {
        let pair = Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
        };
        if !pair.is_complete() {
            return Err(ProjectError::InvalidKey(
                "public and private key must both be present".to_string(),
            ));
        }
        Ok(pair)
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    /// True when neither half is blank.
    pub fn is_complete(&self) -> bool {
        !self.public_key.trim().is_empty() && !self.private_key.trim().is_empty()
    }

    /// Short hex identifier of the public key, safe to log and display.
    pub fn fingerprint(&self) -> String {
        let bytes = B64
            .decode(self.public_key.trim())
            .unwrap_or_else(|_| self.public_key.as_bytes().to_vec());
        let hash = digest(&SHA256, &bytes);
        hex::encode(&hash.as_ref()[..FINGERPRINT_LEN])
    }
}

// Keeps the private key out of logs and panic messages.
impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("fingerprint", &self.fingerprint())
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Source of fresh key pairs.
pub trait KeyPairGenerator {
    /// Produce a new key pair. Failures are not retried.
    fn generate(&self) -> ProjectResult<KeyPair>;
}

/// Production generator backed by the operating system's entropy source.
pub struct Ed25519Generator {
    rng: SystemRandom,
}

impl Ed25519Generator {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }
}

impl Default for Ed25519Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyPairGenerator for Ed25519Generator {
    fn generate(&self) -> ProjectResult<KeyPair> {
        let pkcs8 = Ed25519KeyPair::generate_pkcs8(&self.rng).map_err(|e| {
            ProjectError::KeyGeneration(format!("entropy source unavailable: {e}"))
        })?;

        let signing_key = Ed25519KeyPair::from_pkcs8(pkcs8.as_ref())
            .map_err(|e| ProjectError::KeyGeneration(format!("generated key rejected: {e}")))?;

        let pair = KeyPair::new(
            B64.encode(signing_key.public_key().as_ref()),
            B64.encode(pkcs8.as_ref()),
        )?;
        log::debug!("Generated Ed25519 key pair {}", pair.fingerprint());

        Ok(pair)
    }
}

/// Re-import the private key and check it matches the stored public key.
pub fn verify_key_pair(pair: &KeyPair) -> ProjectResult<()> {
    let pkcs8 = B64
        .decode(pair.private_key().trim())
        .map_err(|e| ProjectError::InvalidKey(format!("private key is not base64: {e}")))?;
    let public = B64
        .decode(pair.public_key().trim())
        .map_err(|e| ProjectError::InvalidKey(format!("public key is not base64: {e}")))?;

    let signing_key = Ed25519KeyPair::from_pkcs8(&pkcs8)
        .map_err(|e| ProjectError::InvalidKey(format!("private key rejected: {e}")))?;

    if signing_key.public_key().as_ref() != public.as_slice() {
        return Err(ProjectError::InvalidKey(
            "public key does not belong to private key".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_complete_verifiable_pair() {
        let pair = Ed25519Generator::new()
            .generate()
            .expect("key generation should succeed");

        assert!(pair.is_complete());
        assert_eq!(B64.decode(pair.public_key()).unwrap().len(), 32);
        verify_key_pair(&pair).expect("fresh pair should re-import");
    }

    #[test]
    fn successive_pairs_differ() {
        let generator = Ed25519Generator::default();
        let a = generator.generate().unwrap();
        let b = generator.generate().unwrap();
        assert_ne!(a.public_key(), b.public_key());
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn rejects_mismatched_halves() {
        let generator = Ed25519Generator::new();
        let a = generator.generate().unwrap();
        let b = generator.generate().unwrap();
        let mixed = KeyPair::new(a.public_key(), b.private_key()).unwrap();

        assert!(matches!(
            verify_key_pair(&mixed),
            Err(ProjectError::InvalidKey(_))
        ));
    }

    #[test]
    fn rejects_garbage_private_key() {
        let pair = KeyPair::new("AAAA", "not base64 at all!").unwrap();
        assert!(verify_key_pair(&pair).is_err());
    }

    #[test]
    fn debug_output_hides_private_key() {
        let pair = Ed25519Generator::new().generate().unwrap();
        let debug = format!("{pair:?}");
        assert!(!debug.contains(pair.private_key()));
        assert!(debug.contains(&pair.fingerprint()));
    }

    #[test]
    fn constructor_rejects_blank_half() {
        assert!(matches!(
            KeyPair::new("pub", ""),
            Err(ProjectError::InvalidKey(_))
        ));
        assert!(KeyPair::new("  ", "priv").is_err());
        assert!(KeyPair::new("pub", "priv").unwrap().is_complete());
    }

    #[test]
    fn deserializing_blank_half_fails() {
        let err = serde_json::from_str::<KeyPair>(r#"{"public_key": "abc", "private_key": ""}"#)
            .unwrap_err();
        assert!(err.to_string().contains("must both be present"));

        let pair: KeyPair =
            serde_json::from_str(r#"{"public_key": "abc", "private_key": "def"}"#).unwrap();
        assert_eq!(pair.private_key(), "def");
    }
}
