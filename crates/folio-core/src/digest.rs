//! # Content Digest — Content-Addressed Document References
//!
//! Defines `ContentDigest`, the content-addressed reference stored in
//! place of raw document bytes, and the `ObjectStore` collaborator
//! interface the registry persists documents through.
//!
//! The registry never stores document bytes: parcels and requests carry
//! only digests plus type tags, and the object store resolves a digest
//! back to bytes on demand.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ValidationError;

/// A SHA-256 content digest rendered as `sha256:<64 lowercase hex>`.
///
/// Produced either by hashing bytes ([`ContentDigest::from_bytes()`]) or
/// by parsing a reference received from a collaborator
/// ([`ContentDigest::parse()`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Compute the digest of raw document bytes.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hash);
        Self(bytes)
    }

    /// Parse a `sha256:<hex>` reference string.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MalformedDigest` unless the input is the
    /// `sha256:` prefix followed by exactly 64 hexadecimal digits.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let hex = s
            .strip_prefix("sha256:")
            .ok_or_else(|| ValidationError::MalformedDigest(s.to_string()))?;
        if hex.len() != 64 {
            return Err(ValidationError::MalformedDigest(s.to_string()));
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk)
                .map_err(|_| ValidationError::MalformedDigest(s.to_string()))?;
            bytes[i] = u8::from_str_radix(pair, 16)
                .map_err(|_| ValidationError::MalformedDigest(s.to_string()))?;
        }
        Ok(Self(bytes))
    }

    /// The raw 32-byte digest value.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the digest as a lowercase hex string (no prefix).
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl TryFrom<String> for ContentDigest {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ContentDigest> for String {
    fn from(d: ContentDigest) -> String {
        d.to_string()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

// ─── Object Store ────────────────────────────────────────────────────

/// Content-addressed object store collaborator.
///
/// The core consumes this interface; production deployments back it with
/// an external blob service. Only digests cross into registry state.
pub trait ObjectStore: Send + Sync {
    /// Persist bytes and return their content digest.
    fn put(&self, data: &[u8]) -> ContentDigest;

    /// Resolve a digest back to bytes, if present.
    fn get(&self, digest: &ContentDigest) -> Option<Vec<u8>>;
}

/// In-memory object store used by tests and the CLI.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: std::sync::RwLock<std::collections::BTreeMap<ContentDigest, Vec<u8>>>,
}

impl MemoryObjectStore {
    /// Create an empty in-memory object store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObjectStore for MemoryObjectStore {
    fn put(&self, data: &[u8]) -> ContentDigest {
        let digest = ContentDigest::from_bytes(data);
        if let Ok(mut objects) = self.objects.write() {
            objects.insert(digest.clone(), data.to_vec());
        }
        digest
    }

    fn get(&self, digest: &ContentDigest) -> Option<Vec<u8>> {
        self.objects.read().ok()?.get(digest).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_deterministic() {
        let a = ContentDigest::from_bytes(b"deed scan");
        let b = ContentDigest::from_bytes(b"deed scan");
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_inputs_different_digests() {
        assert_ne!(
            ContentDigest::from_bytes(b"deed"),
            ContentDigest::from_bytes(b"survey")
        );
    }

    #[test]
    fn test_display_and_parse_roundtrip() {
        let digest = ContentDigest::from_bytes(b"consent form");
        let rendered = digest.to_string();
        assert!(rendered.starts_with("sha256:"));
        assert_eq!(rendered.len(), 7 + 64);
        assert_eq!(ContentDigest::parse(&rendered).unwrap(), digest);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(ContentDigest::parse("").is_err());
        assert!(ContentDigest::parse("sha256:abcd").is_err());
        assert!(ContentDigest::parse(&format!("md5:{}", "0".repeat(64))).is_err());
        assert!(ContentDigest::parse(&format!("sha256:{}", "z".repeat(64))).is_err());
    }

    #[test]
    fn test_known_sha256_vector() {
        // Verified against Python hashlib.sha256(b"").hexdigest()
        let digest = ContentDigest::from_bytes(b"");
        assert_eq!(
            digest.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryObjectStore::new();
        let digest = store.put(b"survey report");
        assert_eq!(store.get(&digest), Some(b"survey report".to_vec()));
        assert_eq!(store.get(&ContentDigest::from_bytes(b"missing")), None);
    }
}
