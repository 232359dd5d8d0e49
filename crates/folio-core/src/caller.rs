//! # Caller Context
//!
//! The verified identity and coarse role set supplied to every
//! state-changing operation. Bearer-token verification happens outside
//! the core; by the time a `Caller` exists, the identity has already been
//! verified and the directory-derived roles resolved.
//!
//! `OWNER` is not a role — ownership is implicit from parcel data and is
//! checked per parcel by the authorization directory.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// Coarse directory-derived roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Holds at least one active agent grant (global or scoped).
    Agent,
    /// Registry administrator.
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Agent => "AGENT",
            Self::Admin => "ADMIN",
        };
        f.write_str(s)
    }
}

/// A verified caller: identity plus role set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    /// The verified identity.
    pub identity: Identity,
    /// Directory-derived roles held by this identity.
    pub roles: BTreeSet<Role>,
}

impl Caller {
    /// A caller with no roles (an ordinary owner/user).
    pub fn user(identity: Identity) -> Self {
        Self {
            identity,
            roles: BTreeSet::new(),
        }
    }

    /// A caller holding the agent role.
    pub fn agent(identity: Identity) -> Self {
        Self {
            identity,
            roles: BTreeSet::from([Role::Agent]),
        }
    }

    /// A caller holding the administrator role.
    pub fn admin(identity: Identity) -> Self {
        Self {
            identity,
            roles: BTreeSet::from([Role::Admin]),
        }
    }

    /// Whether the caller holds the administrator role.
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }

    /// Whether the caller holds the agent role.
    pub fn is_agent(&self) -> bool {
        self.roles.contains(&Role::Agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(n: u8) -> Identity {
        Identity::parse(&format!("0x{:040x}", n)).unwrap()
    }

    #[test]
    fn test_role_checks() {
        let admin = Caller::admin(identity(1));
        assert!(admin.is_admin());
        assert!(!admin.is_agent());

        let agent = Caller::agent(identity(2));
        assert!(agent.is_agent());
        assert!(!agent.is_admin());

        let user = Caller::user(identity(3));
        assert!(!user.is_admin());
        assert!(!user.is_agent());
    }

    #[test]
    fn test_caller_serde_roundtrip() {
        let caller = Caller::admin(identity(9));
        let json = serde_json::to_string(&caller).unwrap();
        let parsed: Caller = serde_json::from_str(&json).unwrap();
        assert_eq!(caller, parsed);
    }
}
