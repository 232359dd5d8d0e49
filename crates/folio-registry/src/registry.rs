//! # Parcel Registry
//!
//! Registration, lookup, and administrative status control for parcels.
//! Ownership and expiry mutations are deliberately *not* public service
//! operations: they exist only as table-level effect primitives invoked
//! by the transfer and renewal workflows inside their own transactions.

use serde_json::{Map, Value};

use folio_core::{
    AuthorizationError, Caller, ConflictError, FolioNumber, Identity, NotFoundError,
    RegistryError, Timestamp,
};
use folio_state::{DocumentRef, Parcel, ParcelStatus};
use folio_store::{DomainEvent, LandStore, Tables};

// ─── Table-Level Operations ──────────────────────────────────────────

/// Register a new parcel. Agent or administrator only; the folio must be
/// unused. The parcel starts `Pending` and a `ParcelRegistered` event is
/// appended in the same transaction.
pub fn register(
    tables: &mut Tables,
    caller: &Caller,
    folio: FolioNumber,
    owner: Identity,
    expiry: Timestamp,
    documents: DocumentRef,
    metadata: Map<String, Value>,
) -> Result<Parcel, RegistryError> {
    if !caller.is_agent() && !caller.is_admin() {
        return Err(AuthorizationError::NotAgent.into());
    }
    if tables.parcels.contains_key(&folio) {
        return Err(ConflictError::DuplicateParcel {
            folio: folio.to_string(),
        }
        .into());
    }

    let parcel = Parcel::new(folio.clone(), owner.clone(), expiry, documents, metadata);
    tables.parcels.insert(folio.clone(), parcel.clone());
    tables.append_event(DomainEvent::ParcelRegistered { folio, owner });
    Ok(parcel)
}

/// Look up a parcel by folio number.
pub fn get(tables: &Tables, folio: &FolioNumber) -> Result<Parcel, RegistryError> {
    tables
        .parcels
        .get(folio)
        .cloned()
        .ok_or_else(|| NotFoundError::Parcel(folio.to_string()).into())
}

/// All parcels, in folio order.
pub fn list(tables: &Tables) -> Vec<Parcel> {
    tables.parcels.values().cloned().collect()
}

/// All parcels currently held by one owner.
pub fn parcels_of_owner(tables: &Tables, owner: &Identity) -> Vec<Parcel> {
    tables
        .parcels
        .values()
        .filter(|p| p.owner == *owner)
        .cloned()
        .collect()
}

/// Administrative status change, validated against the parcel lifecycle.
pub fn set_status(
    tables: &mut Tables,
    caller: &Caller,
    folio: &FolioNumber,
    status: ParcelStatus,
) -> Result<Parcel, RegistryError> {
    if !caller.is_admin() {
        return Err(AuthorizationError::NotAdmin.into());
    }
    let parcel = tables
        .parcels
        .get_mut(folio)
        .ok_or_else(|| NotFoundError::Parcel(folio.to_string()))?;
    parcel.set_status(status)?;
    Ok(parcel.clone())
}

/// Apply an approved transfer to the parcel record. Workflow-internal:
/// authorization and request-state checks happen in the calling workflow,
/// inside the same transaction.
pub fn apply_transfer_effect(
    tables: &mut Tables,
    folio: &FolioNumber,
    new_owner: Identity,
    new_documents: DocumentRef,
) -> Result<(), RegistryError> {
    let parcel = tables
        .parcels
        .get_mut(folio)
        .ok_or_else(|| NotFoundError::Parcel(folio.to_string()))?;
    parcel.apply_transfer_effect(new_owner, new_documents);
    Ok(())
}

/// Apply an approved renewal to the parcel record. Workflow-internal.
pub fn apply_renewal_effect(
    tables: &mut Tables,
    folio: &FolioNumber,
    new_expiry: Timestamp,
) -> Result<(), RegistryError> {
    let parcel = tables
        .parcels
        .get_mut(folio)
        .ok_or_else(|| NotFoundError::Parcel(folio.to_string()))?;
    parcel.apply_renewal_effect(new_expiry);
    Ok(())
}

// ─── Transactional Service ───────────────────────────────────────────

/// One-transaction-per-call wrapper over the table-level operations.
pub struct ParcelRegistry<'a> {
    store: &'a LandStore,
}

impl<'a> ParcelRegistry<'a> {
    /// A registry over the given store.
    pub fn new(store: &'a LandStore) -> Self {
        Self { store }
    }

    /// See [`register`].
    #[allow(clippy::too_many_arguments)]
    pub fn register(
        &self,
        caller: &Caller,
        folio: FolioNumber,
        owner: Identity,
        expiry: Timestamp,
        documents: DocumentRef,
        metadata: Map<String, Value>,
    ) -> Result<Parcel, RegistryError> {
        let parcel = self.store.transaction(|tables| {
            register(
                tables,
                caller,
                folio.clone(),
                owner.clone(),
                expiry,
                documents.clone(),
                metadata.clone(),
            )
        })?;
        tracing::info!(folio = %parcel.folio, owner = %parcel.owner, "parcel registered");
        Ok(parcel)
    }

    /// See [`get`].
    pub fn get(&self, folio: &FolioNumber) -> Result<Parcel, RegistryError> {
        self.store.read(|tables| get(tables, folio))
    }

    /// See [`list`].
    pub fn list(&self) -> Vec<Parcel> {
        self.store.read(list)
    }

    /// See [`parcels_of_owner`].
    pub fn parcels_of_owner(&self, owner: &Identity) -> Vec<Parcel> {
        self.store.read(|tables| parcels_of_owner(tables, owner))
    }

    /// See [`set_status`].
    pub fn set_status(
        &self,
        caller: &Caller,
        folio: &FolioNumber,
        status: ParcelStatus,
    ) -> Result<Parcel, RegistryError> {
        let parcel = self
            .store
            .transaction(|tables| set_status(tables, caller, folio, status))?;
        tracing::info!(%folio, status = %parcel.status, "parcel status changed");
        Ok(parcel)
    }

    /// Run the advisory expiry sweep against the current table state.
    pub fn scan_expired(&self, now: Timestamp) -> Vec<folio_state::ExpiryAlert> {
        let alerts = self.store.read(|tables| crate::sweep::scan_expired(tables, now));
        for alert in &alerts {
            tracing::info!(folio = %alert.folio, expiry = %alert.expiry, "parcel term lapsed");
        }
        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::ContentDigest;
    use folio_state::{DocumentEntry, DocumentKind};

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

    fn expiry() -> Timestamp {
        Timestamp::parse("2027-01-01T00:00:00Z").unwrap()
    }

    #[test]
    fn test_register_requires_agent_or_admin() {
        let mut tables = Tables::default();
        let result = register(
            &mut tables,
            &Caller::user(identity(1)),
            folio(1),
            identity(1),
            expiry(),
            documents(),
            Map::new(),
        );
        assert!(matches!(
            result,
            Err(RegistryError::Authorization(AuthorizationError::NotAgent))
        ));
        assert!(tables.parcels.is_empty());
    }

    #[test]
    fn test_register_starts_pending_and_emits_event() {
        let mut tables = Tables::default();
        let parcel = register(
            &mut tables,
            &Caller::agent(identity(2)),
            folio(1),
            identity(1),
            expiry(),
            documents(),
            Map::new(),
        )
        .unwrap();
        assert_eq!(parcel.status, ParcelStatus::Pending);
        assert_eq!(tables.outbox.len(), 1);
        assert_eq!(tables.outbox[0].event.action(), "parcel_registered");
    }

    #[test]
    fn test_duplicate_folio_rejected() {
        let mut tables = Tables::default();
        let agent = Caller::agent(identity(2));
        register(
            &mut tables,
            &agent,
            folio(1),
            identity(1),
            expiry(),
            documents(),
            Map::new(),
        )
        .unwrap();
        let result = register(
            &mut tables,
            &agent,
            folio(1),
            identity(3),
            expiry(),
            documents(),
            Map::new(),
        );
        assert!(matches!(
            result,
            Err(RegistryError::Conflict(ConflictError::DuplicateParcel { .. }))
        ));
        // The original registration is untouched.
        assert_eq!(get(&tables, &folio(1)).unwrap().owner, identity(1));
    }

    #[test]
    fn test_set_status_admin_only_and_validated() {
        let mut tables = Tables::default();
        register(
            &mut tables,
            &Caller::agent(identity(2)),
            folio(1),
            identity(1),
            expiry(),
            documents(),
            Map::new(),
        )
        .unwrap();

        let result = set_status(
            &mut tables,
            &Caller::user(identity(1)),
            &folio(1),
            ParcelStatus::Active,
        );
        assert!(matches!(
            result,
            Err(RegistryError::Authorization(AuthorizationError::NotAdmin))
        ));

        let admin = Caller::admin(identity(9));
        set_status(&mut tables, &admin, &folio(1), ParcelStatus::Active).unwrap();
        let result = set_status(&mut tables, &admin, &folio(1), ParcelStatus::Active);
        assert!(matches!(
            result,
            Err(RegistryError::Conflict(
                ConflictError::InvalidStatusTransition { .. }
            ))
        ));
    }

    #[test]
    fn test_unknown_folio_not_found() {
        let tables = Tables::default();
        assert!(matches!(
            get(&tables, &folio(1)),
            Err(RegistryError::NotFound(NotFoundError::Parcel(_)))
        ));
    }

    #[test]
    fn test_parcels_of_owner_filters() {
        let mut tables = Tables::default();
        let agent = Caller::agent(identity(2));
        for (seq, owner) in [(1u32, identity(1)), (2, identity(1)), (3, identity(3))] {
            register(
                &mut tables,
                &agent,
                folio(seq),
                owner,
                expiry(),
                documents(),
                Map::new(),
            )
            .unwrap();
        }
        assert_eq!(parcels_of_owner(&tables, &identity(1)).len(), 2);
        assert_eq!(parcels_of_owner(&tables, &identity(3)).len(), 1);
    }

    #[test]
    fn test_service_register_commits() {
        let store = LandStore::new();
        let registry = ParcelRegistry::new(&store);
        registry
            .register(
                &Caller::agent(identity(2)),
                folio(1),
                identity(1),
                expiry(),
                documents(),
                Map::new(),
            )
            .unwrap();
        assert_eq!(registry.list().len(), 1);
        assert_eq!(store.read(|t| t.pending_outbox().len()), 1);
    }
}
