//! # Domain Identity Newtypes
//!
//! Newtype wrappers for all domain identifiers in the Folio Registry
//! Stack. These prevent accidental identifier confusion — you cannot pass
//! a `RequestId` where a `GrantId` is expected, or an unvalidated string
//! where a folio number is expected.
//!
//! ## Invariants
//!
//! - `Identity` is stored lowercase-normalized, so equality, hashing, and
//!   ordering are case-insensitive everywhere in the stack.
//! - `FolioNumber` matches `NSW-XXX-YYYY-NNN` (three uppercase letters,
//!   four digits, three digits) and is immutable once issued.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

// ─── Identity ────────────────────────────────────────────────────────

/// A verified caller or owner identity.
///
/// The stack treats identities as opaque verified strings in the
/// `0x` + 40-hex-digit address format. Construction goes through
/// [`Identity::parse()`], which validates the format and normalizes to
/// lowercase — all downstream comparisons are therefore case-insensitive
/// by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Parse and normalize an identity string.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MalformedIdentity` unless the input is
    /// `0x` followed by exactly 40 hexadecimal digits.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let rest = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| ValidationError::MalformedIdentity(s.to_string()))?;
        if rest.len() != 40 || !rest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::MalformedIdentity(s.to_string()));
        }
        Ok(Self(format!("0x{}", rest.to_ascii_lowercase())))
    }

    /// The normalized (lowercase) identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identity {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Identity> for String {
    fn from(id: Identity) -> String {
        id.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Folio Number ────────────────────────────────────────────────────

/// A land parcel's unique, immutable folio number.
///
/// Format: `NSW-XXX-YYYY-NNN` where `XXX` is a three-letter location
/// code, `YYYY` a four-digit year, and `NNN` a three-digit sequence
/// number. Lowercase location codes are accepted and normalized to
/// uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FolioNumber(String);

impl FolioNumber {
    /// Parse and validate a folio number.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MalformedFolio` if any segment is
    /// missing or malformed.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let malformed = || ValidationError::MalformedFolio(s.to_string());

        let mut parts = s.split('-');
        let prefix = parts.next().ok_or_else(malformed)?;
        let location = parts.next().ok_or_else(malformed)?;
        let year = parts.next().ok_or_else(malformed)?;
        let sequence = parts.next().ok_or_else(malformed)?;
        if parts.next().is_some() || !prefix.eq_ignore_ascii_case("NSW") {
            return Err(malformed());
        }
        if location.len() != 3 || !location.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(malformed());
        }
        if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
            return Err(malformed());
        }
        if sequence.len() != 3 || !sequence.chars().all(|c| c.is_ascii_digit()) {
            return Err(malformed());
        }

        Ok(Self(format!(
            "NSW-{}-{year}-{sequence}",
            location.to_ascii_uppercase()
        )))
    }

    /// The normalized folio number string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FolioNumber {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<FolioNumber> for String {
    fn from(folio: FolioNumber) -> String {
        folio.0
    }
}

impl std::fmt::Display for FolioNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Request and Grant Identifiers ───────────────────────────────────

/// Unique identifier for a transfer or renewal request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct RequestId(pub Uuid);

/// Unique identifier for an agent grant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GrantId(pub Uuid);

impl RequestId {
    /// Generate a new random request identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl GrantId {
    /// Generate a new random grant identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for GrantId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "request:{}", self.0)
    }
}

impl std::fmt::Display for GrantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "grant:{}", self.0)
    }
}
