//! # Parcel Lifecycle
//!
//! Models a registered land parcel and its status lifecycle.
//!
//! ## States
//!
//! ```text
//! Pending ──▶ Active ──▶ Expired ──▶ Transferred (terminal)
//!    ▲          │ │
//!    └──────────┘ └────▶ Transferred
//!   (admin override)
//! ```
//!
//! Status moves are one-directional with a single exception: an
//! administrator may demote `Active` back to `Pending` while paperwork is
//! re-examined. `Transferred` is terminal and marks a retired folio.
//!
//! Ownership and the document reference change only through
//! [`Parcel::apply_transfer_effect()`]; expiry changes only through
//! [`Parcel::apply_renewal_effect()`]. Both deferred approval and
//! immediate execution funnel through the same effect methods.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use folio_core::{ConflictError, FolioNumber, Identity, Timestamp};

use crate::document::DocumentRef;

/// The lifecycle status of a parcel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParcelStatus {
    /// Registered, awaiting administrative activation.
    Pending,
    /// Active and operational.
    Active,
    /// Term expired (set administratively; the sweep only reports).
    Expired,
    /// Folio retired after ownership moved off the register (terminal).
    Transferred,
}

impl ParcelStatus {
    /// Whether a direct `set_status` move between the two statuses is
    /// permitted.
    pub fn can_transition(from: ParcelStatus, to: ParcelStatus) -> bool {
        use ParcelStatus::*;
        matches!(
            (from, to),
            (Pending, Active)
                | (Active, Pending)
                | (Active, Expired)
                | (Active, Transferred)
                | (Expired, Transferred)
        )
    }

    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Transferred)
    }
}

impl std::fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::Expired => "EXPIRED",
            Self::Transferred => "TRANSFERRED",
        };
        f.write_str(s)
    }
}

/// A registered land parcel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    /// Unique, immutable folio number.
    pub folio: FolioNumber,
    /// Current owner identity.
    pub owner: Identity,
    /// Lifecycle status.
    pub status: ParcelStatus,
    /// Term expiry.
    pub expiry: Timestamp,
    /// Primary document set.
    pub documents: DocumentRef,
    /// Free-form metadata (location, zone, archived transfer records).
    pub metadata: Map<String, Value>,
    /// When the parcel was registered.
    pub registered_at: Timestamp,
    /// Last mutation time.
    pub updated_at: Timestamp,
}

impl Parcel {
    /// Create a new parcel in the `Pending` status.
    pub fn new(
        folio: FolioNumber,
        owner: Identity,
        expiry: Timestamp,
        documents: DocumentRef,
        metadata: Map<String, Value>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            folio,
            owner,
            status: ParcelStatus::Pending,
            expiry,
            documents,
            metadata,
            registered_at: now,
            updated_at: now,
        }
    }

    /// Administrative status change, validated against the lifecycle.
    pub fn set_status(&mut self, to: ParcelStatus) -> Result<(), ConflictError> {
        if !ParcelStatus::can_transition(self.status, to) {
            return Err(ConflictError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        self.status = to;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Apply an approved transfer: new owner, replacement document set,
    /// status forced back to `Active` for the incoming owner.
    pub fn apply_transfer_effect(&mut self, new_owner: Identity, new_documents: DocumentRef) {
        self.owner = new_owner;
        self.documents = new_documents;
        self.status = ParcelStatus::Active;
        self.updated_at = Timestamp::now();
    }

    /// Apply an approved renewal: extend the expiry. Status is untouched;
    /// only an administrator moves a parcel out of `Expired`.
    pub fn apply_renewal_effect(&mut self, new_expiry: Timestamp) {
        self.expiry = new_expiry;
        self.updated_at = Timestamp::now();
    }

    /// Append an archived transfer record to the `transfer_records`
    /// metadata section, creating the section on first use.
    pub fn archive_transfer_record(&mut self, record: Value) {
        let records = self
            .metadata
            .entry("transfer_records".to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(items) = records {
            items.push(record);
        }
        self.updated_at = Timestamp::now();
    }

    /// Whether the parcel's term has lapsed relative to `now`.
    pub fn is_lapsed(&self, now: Timestamp) -> bool {
        self.expiry < now
    }
}

/// Advisory report row produced by the expiry sweep.
///
/// The sweep never transitions status — only an approved renewal may
/// legitimately extend a term, so lapsed parcels are reported, not moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryAlert {
    /// The lapsed parcel.
    pub folio: FolioNumber,
    /// Its current owner.
    pub owner: Identity,
    /// The expiry that has passed.
    pub expiry: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentEntry, DocumentKind};
    use folio_core::ContentDigest;

    fn identity(n: u8) -> Identity {
        Identity::parse(&format!("0x{:040x}", n)).unwrap()
    }

    fn documents(label: &str) -> DocumentRef {
        DocumentRef::new(vec![DocumentEntry {
            name: format!("{label}.pdf"),
            kind: DocumentKind::Deed,
            digest: ContentDigest::from_bytes(label.as_bytes()),
        }])
        .unwrap()
    }

    fn make_parcel() -> Parcel {
        Parcel::new(
            FolioNumber::parse("NSW-SYD-2024-001").unwrap(),
            identity(1),
            Timestamp::parse("2027-01-01T00:00:00Z").unwrap(),
            documents("deed"),
            Map::new(),
        )
    }

    #[test]
    fn test_new_parcel_is_pending() {
        let p = make_parcel();
        assert_eq!(p.status, ParcelStatus::Pending);
    }

    #[test]
    fn test_pending_to_active() {
        let mut p = make_parcel();
        p.set_status(ParcelStatus::Active).unwrap();
        assert_eq!(p.status, ParcelStatus::Active);
    }

    #[test]
    fn test_admin_override_active_to_pending() {
        let mut p = make_parcel();
        p.set_status(ParcelStatus::Active).unwrap();
        p.set_status(ParcelStatus::Pending).unwrap();
        assert_eq!(p.status, ParcelStatus::Pending);
    }

    #[test]
    fn test_invalid_transitions_rejected() {
        let mut p = make_parcel();
        assert!(p.set_status(ParcelStatus::Expired).is_err());
        assert!(p.set_status(ParcelStatus::Transferred).is_err());

        p.set_status(ParcelStatus::Active).unwrap();
        p.set_status(ParcelStatus::Transferred).unwrap();
        // Terminal: nothing moves a retired folio.
        assert!(p.set_status(ParcelStatus::Active).is_err());
        assert!(p.set_status(ParcelStatus::Pending).is_err());
    }

    #[test]
    fn test_transfer_effect_replaces_owner_and_documents() {
        let mut p = make_parcel();
        p.set_status(ParcelStatus::Active).unwrap();
        let new_docs = documents("new-deed");
        p.apply_transfer_effect(identity(2), new_docs.clone());
        assert_eq!(p.owner, identity(2));
        assert_eq!(p.documents, new_docs);
        assert_eq!(p.status, ParcelStatus::Active);
    }

    #[test]
    fn test_renewal_effect_only_moves_expiry() {
        let mut p = make_parcel();
        let owner_before = p.owner.clone();
        let new_expiry = Timestamp::parse("2028-01-01T00:00:00Z").unwrap();
        p.apply_renewal_effect(new_expiry);
        assert_eq!(p.expiry, new_expiry);
        assert_eq!(p.owner, owner_before);
    }

    #[test]
    fn test_archive_transfer_record_appends() {
        let mut p = make_parcel();
        p.archive_transfer_record(serde_json::json!({"to": "0xabc"}));
        p.archive_transfer_record(serde_json::json!({"to": "0xdef"}));
        let records = p.metadata.get("transfer_records").unwrap();
        assert_eq!(records.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_is_lapsed() {
        let p = make_parcel();
        let before = Timestamp::parse("2026-12-31T23:59:59Z").unwrap();
        let after = Timestamp::parse("2027-01-01T00:00:01Z").unwrap();
        assert!(!p.is_lapsed(before));
        assert!(p.is_lapsed(after));
    }
}
