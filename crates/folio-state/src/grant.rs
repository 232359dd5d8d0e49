//! # Agent Grants
//!
//! An agent grant authorizes an identity to act on an owner's behalf,
//! either for every parcel (global, administrator-issued) or for one
//! parcel (scoped, owner-issued).
//!
//! Grants carry an active flag rather than being deleted on
//! deactivation, so authorization history stays queryable. The one
//! exception is owner-initiated revocation of a scoped grant, which
//! hard-deletes the row — that asymmetry is intentional and enforced by
//! the authorization directory, not here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use folio_core::{FolioNumber, GrantId, Identity, Timestamp};

/// The scope of an agent grant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantScope {
    /// Authorizes the agent for every parcel.
    Global,
    /// Authorizes the agent for one parcel.
    Parcel(FolioNumber),
}

impl std::fmt::Display for GrantScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Global => f.write_str("GLOBAL"),
            Self::Parcel(folio) => write!(f, "PARCEL:{folio}"),
        }
    }
}

/// An agent authorization record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentGrant {
    /// Unique grant identifier.
    pub id: GrantId,
    /// Global or parcel-scoped.
    pub scope: GrantScope,
    /// The authorized agent.
    pub agent: Identity,
    /// Who issued the grant (owner for scoped, administrator for global).
    pub granted_by: Identity,
    /// Whether the grant currently authorizes the agent.
    pub active: bool,
    /// When the grant was issued.
    pub granted_at: Timestamp,
    /// Last activation/deactivation time.
    pub updated_at: Timestamp,
    /// Free-form metadata (deactivation reasons, notes).
    pub metadata: Map<String, Value>,
}

impl AgentGrant {
    /// Issue a new active grant.
    pub fn new(scope: GrantScope, agent: Identity, granted_by: Identity) -> Self {
        let now = Timestamp::now();
        Self {
            id: GrantId::new(),
            scope,
            agent,
            granted_by,
            active: true,
            granted_at: now,
            updated_at: now,
            metadata: Map::new(),
        }
    }

    /// Soft-deactivate, recording the reason in metadata.
    pub fn deactivate(&mut self, reason: &str) {
        self.active = false;
        self.metadata.insert(
            "deactivation_reason".to_string(),
            Value::String(reason.to_string()),
        );
        self.updated_at = Timestamp::now();
    }

    /// Reactivate a previously deactivated grant, recording the new
    /// grantor. Used instead of inserting a duplicate row.
    pub fn reactivate(&mut self, granted_by: Identity) {
        self.active = true;
        self.granted_by = granted_by;
        self.metadata.remove("deactivation_reason");
        self.updated_at = Timestamp::now();
    }

    /// Whether this is an active grant covering the given parcel
    /// (globally or by matching scope).
    pub fn authorizes(&self, folio: &FolioNumber) -> bool {
        self.active
            && match &self.scope {
                GrantScope::Global => true,
                GrantScope::Parcel(scoped) => scoped == folio,
            }
    }

    /// Whether this grant is scoped to exactly the given parcel.
    pub fn is_scoped_to(&self, folio: &FolioNumber) -> bool {
        matches!(&self.scope, GrantScope::Parcel(scoped) if scoped == folio)
    }

    /// Whether this is a global grant.
    pub fn is_global(&self) -> bool {
        matches!(self.scope, GrantScope::Global)
    }
}
