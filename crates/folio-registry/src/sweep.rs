//! # Advisory Expiry Sweep
//!
//! Reports active parcels whose term has lapsed. The sweep never mutates:
//! only an approved renewal may legitimately extend a term, and status
//! changes stay administrative, so the sweep produces alerts for the
//! oversight surface instead of flipping records behind the registry's
//! back.

use folio_core::Timestamp;
use folio_state::{ExpiryAlert, ParcelStatus};
use folio_store::Tables;

/// Active parcels with `expiry < now`, in folio order.
pub fn scan_expired(tables: &Tables, now: Timestamp) -> Vec<ExpiryAlert> {
    tables
        .parcels
        .values()
        .filter(|p| p.status == ParcelStatus::Active && p.is_lapsed(now))
        .map(|p| ExpiryAlert {
            folio: p.folio.clone(),
            owner: p.owner.clone(),
            expiry: p.expiry,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{Caller, ContentDigest, FolioNumber, Identity};
    use folio_state::{DocumentEntry, DocumentKind, DocumentRef};
    use serde_json::Map;

    fn identity(n: u8) -> Identity {
        Identity::parse(&format!("0x{:040x}", n)).unwrap()
    }

    fn folio(seq: u32) -> FolioNumber {
        FolioNumber::parse(&format!("NSW-SYD-2024-{seq:03}")).unwrap()
    }

    fn documents() -> DocumentRef {
        DocumentRef::new(vec![DocumentEntry {
            name: "deed.pdf".to_string(),
            kind: DocumentKind::Deed,
            digest: ContentDigest::from_bytes(b"deed"),
        }])
        .unwrap()
    }

    fn seed(tables: &mut Tables, seq: u32, expiry: &str, activate: bool) {
        let expiry = Timestamp::parse(expiry).unwrap();
        crate::registry::register(
            tables,
            &Caller::agent(identity(2)),
            folio(seq),
            identity(1),
            expiry,
            documents(),
            Map::new(),
        )
        .unwrap();
        if activate {
            crate::registry::set_status(
                tables,
                &Caller::admin(identity(9)),
                &folio(seq),
                ParcelStatus::Active,
            )
            .unwrap();
        }
    }

    #[test]
    fn test_sweep_reports_only_lapsed_active_parcels() {
        let mut tables = Tables::default();
        seed(&mut tables, 1, "2025-01-01T00:00:00Z", true); // lapsed, active
        seed(&mut tables, 2, "2027-01-01T00:00:00Z", true); // current, active
        seed(&mut tables, 3, "2025-01-01T00:00:00Z", false); // lapsed, pending

        let now = Timestamp::parse("2026-01-01T00:00:00Z").unwrap();
        let before = tables.clone();
        let alerts = scan_expired(&tables, now);

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].folio, folio(1));
        // Advisory only: the sweep changed nothing.
        assert_eq!(
            serde_json::to_value(&tables).unwrap(),
            serde_json::to_value(&before).unwrap()
        );
    }

    #[test]
    fn test_boundary_expiry_not_lapsed() {
        let mut tables = Tables::default();
        seed(&mut tables, 1, "2026-01-01T00:00:00Z", true);
        let now = Timestamp::parse("2026-01-01T00:00:00Z").unwrap();
        assert!(scan_expired(&tables, now).is_empty());
    }
}
