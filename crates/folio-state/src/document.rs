//! # Typed Document Manifests
//!
//! A parcel or request never carries document bytes — only a
//! `DocumentRef`: the bundle digest plus a manifest of typed entries,
//! each pointing at a content-addressed blob in the object store.
//!
//! Document kinds split into two families:
//!
//! - **Primary documents** (`Deed`, `Survey`, `Supporting`) — the
//!   parcel's own file set, replaced wholesale on transfer.
//! - **Transfer-process documents** (`TransferAgreement`, `OwnerConsent`,
//!   `LegalAttachment`) — evidence of the transfer itself, archived under
//!   the parcel's `transfer_records` metadata rather than kept as the
//!   primary set.
//!
//! The immediate-execution transfer submits one combined manifest and the
//! workflow partitions it on this split.

use serde::{Deserialize, Serialize};

use folio_core::{ContentDigest, ValidationError};

/// The type tag attached to each document in a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Property deed.
    Deed,
    /// Survey report.
    Survey,
    /// Supporting document (photos, certificates).
    Supporting,
    /// The signed transfer agreement.
    TransferAgreement,
    /// The outgoing owner's consent/authorization.
    OwnerConsent,
    /// Additional legal attachment to a transfer.
    LegalAttachment,
}

impl DocumentKind {
    /// Whether this kind documents the transfer process itself, as
    /// opposed to being part of the parcel's primary file set.
    pub fn is_transfer_process(&self) -> bool {
        matches!(
            self,
            Self::TransferAgreement | Self::OwnerConsent | Self::LegalAttachment
        )
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Deed => "DEED",
            Self::Survey => "SURVEY",
            Self::Supporting => "SUPPORTING",
            Self::TransferAgreement => "TRANSFER_AGREEMENT",
            Self::OwnerConsent => "OWNER_CONSENT",
            Self::LegalAttachment => "LEGAL_ATTACHMENT",
        };
        f.write_str(s)
    }
}

/// One entry in a document manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    /// Original file name (display only, not identity).
    pub name: String,
    /// Document type tag.
    pub kind: DocumentKind,
    /// Content digest of the stored blob.
    pub digest: ContentDigest,
}

/// A content-addressed document reference: bundle digest + manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Digest over the ordered entry digests — identifies the bundle.
    pub digest: ContentDigest,
    /// The typed entries making up the bundle.
    pub manifest: Vec<DocumentEntry>,
}

impl DocumentRef {
    /// Build a document reference from a non-empty manifest.
    ///
    /// The bundle digest is computed over the concatenated entry digests
    /// in manifest order, so the same files in the same order always
    /// produce the same reference.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyDocuments` for an empty manifest.
    pub fn new(manifest: Vec<DocumentEntry>) -> Result<Self, ValidationError> {
        if manifest.is_empty() {
            return Err(ValidationError::EmptyDocuments);
        }
        let mut concatenated = Vec::with_capacity(manifest.len() * 32);
        for entry in &manifest {
            concatenated.extend_from_slice(entry.digest.as_bytes());
        }
        Ok(Self {
            digest: ContentDigest::from_bytes(&concatenated),
            manifest,
        })
    }

    /// Split the manifest into (transfer-process, replacement) entries.
    pub fn partition_transfer(&self) -> (Vec<DocumentEntry>, Vec<DocumentEntry>) {
        self.manifest
            .iter()
            .cloned()
            .partition(|e| e.kind.is_transfer_process())
    }

    /// Whether the manifest contains at least one entry of the kind.
    pub fn contains_kind(&self, kind: DocumentKind) -> bool {
        self.manifest.iter().any(|e| e.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, kind: DocumentKind) -> DocumentEntry {
        DocumentEntry {
            name: name.to_string(),
            kind,
            digest: ContentDigest::from_bytes(name.as_bytes()),
        }
    }

    #[test]
    fn test_empty_manifest_rejected() {
        assert!(matches!(
            DocumentRef::new(vec![]),
            Err(ValidationError::EmptyDocuments)
        ));
    }

    #[test]
    fn test_bundle_digest_deterministic() {
        let a = DocumentRef::new(vec![entry("deed.pdf", DocumentKind::Deed)]).unwrap();
        let b = DocumentRef::new(vec![entry("deed.pdf", DocumentKind::Deed)]).unwrap();
        assert_eq!(a.digest, b.digest);
    }

    #[test]
    fn test_bundle_digest_order_sensitive() {
        let deed = entry("deed.pdf", DocumentKind::Deed);
        let survey = entry("survey.pdf", DocumentKind::Survey);
        let ab = DocumentRef::new(vec![deed.clone(), survey.clone()]).unwrap();
        let ba = DocumentRef::new(vec![survey, deed]).unwrap();
        assert_ne!(ab.digest, ba.digest);
    }

    #[test]
    fn test_partition_transfer() {
        let bundle = DocumentRef::new(vec![
            entry("agreement.pdf", DocumentKind::TransferAgreement),
            entry("consent.pdf", DocumentKind::OwnerConsent),
            entry("new-deed.pdf", DocumentKind::Deed),
            entry("new-survey.pdf", DocumentKind::Survey),
            entry("easement.pdf", DocumentKind::LegalAttachment),
        ])
        .unwrap();

        let (process, replacement) = bundle.partition_transfer();
        assert_eq!(process.len(), 3);
        assert_eq!(replacement.len(), 2);
        assert!(process.iter().all(|e| e.kind.is_transfer_process()));
        assert!(replacement.iter().all(|e| !e.kind.is_transfer_process()));
    }

    #[test]
    fn test_contains_kind() {
        let bundle = DocumentRef::new(vec![entry("deed.pdf", DocumentKind::Deed)]).unwrap();
        assert!(bundle.contains_kind(DocumentKind::Deed));
        assert!(!bundle.contains_kind(DocumentKind::Survey));
    }

    #[test]
    fn test_kind_serde_snake_case() {
        let json = serde_json::to_string(&DocumentKind::TransferAgreement).unwrap();
        assert_eq!(json, "\"transfer_agreement\"");
    }
}
