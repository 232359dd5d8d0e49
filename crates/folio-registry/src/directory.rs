//! # Authorization Directory
//!
//! Who may act on which parcel. Owners manage scoped grants on their own
//! parcels; administrators manage global grants. The workflows consult
//! [`is_authorized`] inside their transactions, so an authorization check
//! and the mutation it guards observe the same table state.
//!
//! Table-level operations take `&mut Tables` and run inside whatever
//! transaction the caller holds; the [`AuthorizationDirectory`] wrapper
//! opens one transaction per call for standalone use.
//!
//! ## Revocation asymmetry
//!
//! Owner revocation of a scoped grant hard-deletes the row; administrative
//! revocation of a global grant soft-deactivates it with a note. Scoped
//! grants are owner-managed delegation with no registry-level audit
//! requirement, while a global grant marks a vetted professional whose
//! standing history the registry must retain.

use folio_core::{
    AuthorizationError, Caller, ConflictError, FolioNumber, Identity, NotFoundError,
    RegistryError,
};
use folio_state::{AgentGrant, GrantScope, Parcel};
use folio_store::{LandStore, Tables};

// ─── Table-Level Operations ──────────────────────────────────────────

/// Issue (or reactivate) a global grant. Administrator only.
pub fn grant_global(
    tables: &mut Tables,
    caller: &Caller,
    agent: Identity,
) -> Result<AgentGrant, RegistryError> {
    if !caller.is_admin() {
        return Err(AuthorizationError::NotAdmin.into());
    }

    if let Some(existing) = tables
        .grants
        .iter_mut()
        .find(|g| g.is_global() && g.agent == agent)
    {
        if existing.active {
            return Err(ConflictError::AlreadyAuthorized {
                agent: agent.to_string(),
            }
            .into());
        }
        existing.reactivate(caller.identity.clone());
        return Ok(existing.clone());
    }

    let grant = AgentGrant::new(GrantScope::Global, agent, caller.identity.clone());
    tables.grants.push(grant.clone());
    Ok(grant)
}

/// Issue (or reactivate) a scoped grant on one parcel. Owner only, and
/// only for an agent that already holds some active grant — owners
/// delegate to vetted agents, they do not mint new ones.
pub fn grant_scoped(
    tables: &mut Tables,
    caller: &Caller,
    folio: &FolioNumber,
    agent: Identity,
) -> Result<AgentGrant, RegistryError> {
    let parcel = tables
        .parcels
        .get(folio)
        .ok_or_else(|| NotFoundError::Parcel(folio.to_string()))?;
    if parcel.owner != caller.identity {
        return Err(AuthorizationError::NotOwner {
            folio: folio.to_string(),
        }
        .into());
    }

    if !tables.grants.iter().any(|g| g.agent == agent && g.active) {
        return Err(AuthorizationError::UnverifiedAgent {
            agent: agent.to_string(),
        }
        .into());
    }

    if let Some(existing) = tables
        .grants
        .iter_mut()
        .find(|g| g.agent == agent && g.is_scoped_to(folio))
    {
        if existing.active {
            return Err(ConflictError::AlreadyAuthorized {
                agent: agent.to_string(),
            }
            .into());
        }
        existing.reactivate(caller.identity.clone());
        return Ok(existing.clone());
    }

    let grant = AgentGrant::new(
        GrantScope::Parcel(folio.clone()),
        agent,
        caller.identity.clone(),
    );
    tables.grants.push(grant.clone());
    Ok(grant)
}

/// Revoke a scoped grant: owner only, hard delete.
pub fn revoke_scoped(
    tables: &mut Tables,
    caller: &Caller,
    folio: &FolioNumber,
    agent: &Identity,
) -> Result<(), RegistryError> {
    let parcel = tables
        .parcels
        .get(folio)
        .ok_or_else(|| NotFoundError::Parcel(folio.to_string()))?;
    if parcel.owner != caller.identity {
        return Err(AuthorizationError::NotOwner {
            folio: folio.to_string(),
        }
        .into());
    }

    let position = tables
        .grants
        .iter()
        .position(|g| g.agent == *agent && g.is_scoped_to(folio) && g.active)
        .ok_or_else(|| NotFoundError::Grant(agent.to_string()))?;
    tables.grants.remove(position);
    Ok(())
}

/// Revoke a global grant: administrator only, soft deactivate.
pub fn revoke_global(
    tables: &mut Tables,
    caller: &Caller,
    agent: &Identity,
) -> Result<(), RegistryError> {
    if !caller.is_admin() {
        return Err(AuthorizationError::NotAdmin.into());
    }

    let grant = tables
        .grants
        .iter_mut()
        .find(|g| g.is_global() && g.agent == *agent && g.active)
        .ok_or_else(|| NotFoundError::Grant(agent.to_string()))?;
    grant.deactivate("revoked by administrator");
    Ok(())
}

/// Whether `identity` may act on `folio`: the owner, or the holder of an
/// active grant covering the parcel. Case-insensitivity comes from
/// `Identity` normalization, not from folding here.
pub fn is_authorized(tables: &Tables, folio: &FolioNumber, identity: &Identity) -> bool {
    let is_owner = tables
        .parcels
        .get(folio)
        .is_some_and(|p| p.owner == *identity);
    is_owner
        || tables
            .grants
            .iter()
            .any(|g| g.agent == *identity && g.authorizes(folio))
}

/// All grants (active and deactivated) scoped to one parcel.
pub fn grants_for_parcel(tables: &Tables, folio: &FolioNumber) -> Vec<AgentGrant> {
    tables
        .grants
        .iter()
        .filter(|g| g.is_scoped_to(folio))
        .cloned()
        .collect()
}

/// All grants (active and deactivated) held by one agent.
pub fn grants_for_agent(tables: &Tables, agent: &Identity) -> Vec<AgentGrant> {
    tables
        .grants
        .iter()
        .filter(|g| g.agent == *agent)
        .cloned()
        .collect()
}

/// The parcels an agent may currently act on. A global grant covers the
/// whole register; otherwise the active scoped grants decide.
pub fn parcels_for_agent(tables: &Tables, agent: &Identity) -> Vec<Parcel> {
    let global = tables
        .grants
        .iter()
        .any(|g| g.agent == *agent && g.active && g.is_global());
    if global {
        return tables.parcels.values().cloned().collect();
    }
    tables
        .parcels
        .values()
        .filter(|p| {
            tables
                .grants
                .iter()
                .any(|g| g.agent == *agent && g.active && g.is_scoped_to(&p.folio))
        })
        .cloned()
        .collect()
}

// ─── Transactional Service ───────────────────────────────────────────

/// One-transaction-per-call wrapper over the table-level operations.
pub struct AuthorizationDirectory<'a> {
    store: &'a LandStore,
}

impl<'a> AuthorizationDirectory<'a> {
    /// A directory over the given store.
    pub fn new(store: &'a LandStore) -> Self {
        Self { store }
    }

    /// See [`grant_global`].
    pub fn grant_global(
        &self,
        caller: &Caller,
        agent: Identity,
    ) -> Result<AgentGrant, RegistryError> {
        let grant = self
            .store
            .transaction(|tables| grant_global(tables, caller, agent.clone()))?;
        tracing::info!(agent = %grant.agent, grant = %grant.id, "global grant issued");
        Ok(grant)
    }

    /// See [`grant_scoped`].
    pub fn grant_scoped(
        &self,
        caller: &Caller,
        folio: &FolioNumber,
        agent: Identity,
    ) -> Result<AgentGrant, RegistryError> {
        let grant = self
            .store
            .transaction(|tables| grant_scoped(tables, caller, folio, agent.clone()))?;
        tracing::info!(agent = %grant.agent, %folio, grant = %grant.id, "scoped grant issued");
        Ok(grant)
    }

    /// See [`revoke_scoped`].
    pub fn revoke_scoped(
        &self,
        caller: &Caller,
        folio: &FolioNumber,
        agent: &Identity,
    ) -> Result<(), RegistryError> {
        self.store
            .transaction(|tables| revoke_scoped(tables, caller, folio, agent))?;
        tracing::info!(%agent, %folio, "scoped grant revoked");
        Ok(())
    }

    /// See [`revoke_global`].
    pub fn revoke_global(&self, caller: &Caller, agent: &Identity) -> Result<(), RegistryError> {
        self.store
            .transaction(|tables| revoke_global(tables, caller, agent))?;
        tracing::info!(%agent, "global grant deactivated");
        Ok(())
    }

    /// See [`is_authorized`].
    pub fn is_authorized(&self, folio: &FolioNumber, identity: &Identity) -> bool {
        self.store.read(|tables| is_authorized(tables, folio, identity))
    }

    /// See [`grants_for_parcel`].
    pub fn grants_for_parcel(&self, folio: &FolioNumber) -> Vec<AgentGrant> {
        self.store.read(|tables| grants_for_parcel(tables, folio))
    }

    /// See [`grants_for_agent`].
    pub fn grants_for_agent(&self, agent: &Identity) -> Vec<AgentGrant> {
        self.store.read(|tables| grants_for_agent(tables, agent))
    }

    /// See [`parcels_for_agent`].
    pub fn parcels_for_agent(&self, agent: &Identity) -> Vec<Parcel> {
        self.store.read(|tables| parcels_for_agent(tables, agent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{ContentDigest, Timestamp};
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

    fn seed_parcel(tables: &mut Tables, seq: u32, owner: Identity) {
        let parcel = Parcel::new(
            folio(seq),
            owner,
            Timestamp::parse("2027-01-01T00:00:00Z").unwrap(),
            documents(),
            Map::new(),
        );
        tables.parcels.insert(parcel.folio.clone(), parcel);
    }

    // owner = 1, agent = 2, admin = 9
    fn seeded() -> Tables {
        let mut tables = Tables::default();
        seed_parcel(&mut tables, 1, identity(1));
        seed_parcel(&mut tables, 2, identity(1));
        tables
    }

    #[test]
    fn test_grant_global_requires_admin() {
        let mut tables = seeded();
        let result = grant_global(&mut tables, &Caller::user(identity(1)), identity(2));
        assert!(matches!(
            result,
            Err(RegistryError::Authorization(AuthorizationError::NotAdmin))
        ));
    }

    #[test]
    fn test_grant_global_duplicate_active_conflicts() {
        let mut tables = seeded();
        let admin = Caller::admin(identity(9));
        grant_global(&mut tables, &admin, identity(2)).unwrap();
        let result = grant_global(&mut tables, &admin, identity(2));
        assert!(matches!(
            result,
            Err(RegistryError::Conflict(ConflictError::AlreadyAuthorized { .. }))
        ));
    }

    #[test]
    fn test_grant_global_reactivates_instead_of_duplicating() {
        let mut tables = seeded();
        let admin = Caller::admin(identity(9));
        grant_global(&mut tables, &admin, identity(2)).unwrap();
        revoke_global(&mut tables, &admin, &identity(2)).unwrap();
        grant_global(&mut tables, &admin, identity(2)).unwrap();
        // Reactivation, not a second row.
        assert_eq!(tables.grants.len(), 1);
        assert!(tables.grants[0].active);
    }

    #[test]
    fn test_grant_scoped_requires_owner() {
        let mut tables = seeded();
        grant_global(&mut tables, &Caller::admin(identity(9)), identity(2)).unwrap();
        let result = grant_scoped(
            &mut tables,
            &Caller::user(identity(3)),
            &folio(1),
            identity(2),
        );
        assert!(matches!(
            result,
            Err(RegistryError::Authorization(AuthorizationError::NotOwner { .. }))
        ));
    }

    #[test]
    fn test_grant_scoped_rejects_unvetted_agent() {
        let mut tables = seeded();
        let result = grant_scoped(
            &mut tables,
            &Caller::user(identity(1)),
            &folio(1),
            identity(5),
        );
        assert!(matches!(
            result,
            Err(RegistryError::Authorization(
                AuthorizationError::UnverifiedAgent { .. }
            ))
        ));
    }

    #[test]
    fn test_scoped_grant_from_prior_scoped_grant() {
        let mut tables = seeded();
        let owner = Caller::user(identity(1));
        grant_global(&mut tables, &Caller::admin(identity(9)), identity(2)).unwrap();
        grant_scoped(&mut tables, &owner, &folio(1), identity(2)).unwrap();
        // An active scoped grant elsewhere also counts as vetting.
        revoke_global(&mut tables, &Caller::admin(identity(9)), &identity(2)).unwrap();
        grant_scoped(&mut tables, &owner, &folio(2), identity(2)).unwrap();
    }

    #[test]
    fn test_revoke_scoped_hard_deletes() {
        let mut tables = seeded();
        let owner = Caller::user(identity(1));
        grant_global(&mut tables, &Caller::admin(identity(9)), identity(2)).unwrap();
        grant_scoped(&mut tables, &owner, &folio(1), identity(2)).unwrap();
        assert_eq!(tables.grants.len(), 2);

        revoke_scoped(&mut tables, &owner, &folio(1), &identity(2)).unwrap();
        // The scoped row is gone; the global row remains.
        assert_eq!(tables.grants.len(), 1);
        assert!(tables.grants[0].is_global());
    }

    #[test]
    fn test_revoke_global_soft_deactivates() {
        let mut tables = seeded();
        let admin = Caller::admin(identity(9));
        grant_global(&mut tables, &admin, identity(2)).unwrap();
        revoke_global(&mut tables, &admin, &identity(2)).unwrap();
        // The row survives, deactivated, with a note.
        assert_eq!(tables.grants.len(), 1);
        assert!(!tables.grants[0].active);
        assert!(tables.grants[0].metadata.contains_key("deactivation_reason"));
    }

    #[test]
    fn test_is_authorized_owner_grant_and_stranger() {
        let mut tables = seeded();
        grant_global(&mut tables, &Caller::admin(identity(9)), identity(2)).unwrap();

        assert!(is_authorized(&tables, &folio(1), &identity(1))); // owner
        assert!(is_authorized(&tables, &folio(1), &identity(2))); // global agent
        assert!(!is_authorized(&tables, &folio(1), &identity(5))); // stranger
    }

    #[test]
    fn test_deactivated_grant_no_longer_authorizes() {
        let mut tables = seeded();
        let admin = Caller::admin(identity(9));
        grant_global(&mut tables, &admin, identity(2)).unwrap();
        revoke_global(&mut tables, &admin, &identity(2)).unwrap();
        assert!(!is_authorized(&tables, &folio(1), &identity(2)));
    }

    #[test]
    fn test_parcels_for_agent_global_covers_all() {
        let mut tables = seeded();
        grant_global(&mut tables, &Caller::admin(identity(9)), identity(2)).unwrap();
        assert_eq!(parcels_for_agent(&tables, &identity(2)).len(), 2);
    }

    #[test]
    fn test_parcels_for_agent_scoped_covers_one() {
        let mut tables = seeded();
        let owner = Caller::user(identity(1));
        grant_global(&mut tables, &Caller::admin(identity(9)), identity(2)).unwrap();
        grant_scoped(&mut tables, &owner, &folio(1), identity(2)).unwrap();
        revoke_global(&mut tables, &Caller::admin(identity(9)), &identity(2)).unwrap();

        let parcels = parcels_for_agent(&tables, &identity(2));
        assert_eq!(parcels.len(), 1);
        assert_eq!(parcels[0].folio, folio(1));
    }

    #[test]
    fn test_service_wrapper_round_trip() {
        let store = LandStore::new();
        store
            .transaction(|tables| {
                seed_parcel(tables, 1, identity(1));
                Ok(())
            })
            .unwrap();

        let directory = AuthorizationDirectory::new(&store);
        directory
            .grant_global(&Caller::admin(identity(9)), identity(2))
            .unwrap();
        assert!(directory.is_authorized(&folio(1), &identity(2)));
        assert_eq!(directory.grants_for_agent(&identity(2)).len(), 1);
    }
}
