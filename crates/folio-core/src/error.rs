//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error taxonomy used throughout the Folio Registry Stack.
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Validation and authorization errors are detected before any mutation
//!   and abort with no side effects.
//! - Conflict errors are detected inside the mutating transaction and roll
//!   that transaction back in full.
//! - Ledger synchronization failures are *not* part of this taxonomy: the
//!   store is the source of truth, so a committed operation never surfaces
//!   a ledger error to its caller (see `folio-ledger`).
//!
//! Every variant renders a human-readable reason; decision flows store
//! these reasons as part of the audit trail.

use thiserror::Error;

/// Top-level error type for registry, directory, and workflow operations.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Malformed input rejected before any mutation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Caller lacks the required relationship to the parcel or role.
    #[error("authorization error: {0}")]
    Authorization(#[from] AuthorizationError),

    /// State conflict detected inside the mutating transaction.
    #[error("conflict: {0}")]
    Conflict(#[from] ConflictError),

    /// Referenced parcel, request, or grant does not exist.
    #[error("not found: {0}")]
    NotFound(#[from] NotFoundError),
}

/// Malformed identifier, identity, date, or document input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Identity string is not a well-formed address.
    #[error("malformed identity: {0:?}")]
    MalformedIdentity(String),

    /// Folio number does not match the `NSW-XXX-YYYY-NNN` format.
    #[error("malformed folio number: {0:?}")]
    MalformedFolio(String),

    /// Content digest is not a well-formed `sha256:<hex>` reference.
    #[error("malformed content digest: {0:?}")]
    MalformedDigest(String),

    /// Timestamp string rejected (non-UTC offset or unparseable).
    #[error("invalid timestamp: {0}")]
    BadTimestamp(String),

    /// Transfer source and destination identities are equal.
    #[error("from and to identities cannot be the same")]
    SelfTransfer,

    /// Requested renewal expiry does not extend the current expiry.
    #[error("new expiry {requested} must be later than current expiry {current}")]
    ExpiryNotExtended {
        /// The parcel's current expiry.
        current: String,
        /// The requested new expiry.
        requested: String,
    },

    /// A document manifest was required but empty.
    #[error("document manifest must not be empty")]
    EmptyDocuments,
}

/// Caller lacks the required relationship to the parcel or role.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    /// Caller is not the owner of the parcel.
    #[error("caller is not the owner of parcel {folio}")]
    NotOwner {
        /// The parcel in question.
        folio: String,
    },

    /// Operation requires the administrator role.
    #[error("operation requires the administrator role")]
    NotAdmin,

    /// Operation requires the agent or administrator role.
    #[error("operation requires the agent or administrator role")]
    NotAgent,

    /// Caller is neither the owner nor an active agent for the parcel.
    #[error("{identity} is not authorized on parcel {folio}")]
    NotAuthorized {
        /// The parcel in question.
        folio: String,
        /// The identity that failed the check.
        identity: String,
    },

    /// Target agent has never been vetted (no global grant and no scoped
    /// grant anywhere), so an owner cannot scope-grant it.
    #[error("agent {agent} holds no prior grant and cannot be scoped to a parcel")]
    UnverifiedAgent {
        /// The unvetted agent identity.
        agent: String,
    },
}

/// State conflict detected inside a mutating transaction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConflictError {
    /// A parcel with this folio number is already registered.
    #[error("parcel {folio} is already registered")]
    DuplicateParcel {
        /// The duplicate folio number.
        folio: String,
    },

    /// The parcel already has a pending transfer request.
    #[error("parcel {folio} already has a pending transfer request")]
    PendingTransferExists {
        /// The parcel in question.
        folio: String,
    },

    /// The agent already holds an active grant of this scope.
    #[error("agent {agent} is already authorized")]
    AlreadyAuthorized {
        /// The already-authorized agent.
        agent: String,
    },

    /// Decision or cancellation attempted on a request that is no longer
    /// pending (typically the loser of a decide/cancel race).
    #[error("request {request} is not pending")]
    NotPending {
        /// The request identifier.
        request: String,
    },

    /// Parcel status transition rejected.
    #[error("invalid parcel status transition: {from} -> {to}")]
    InvalidStatusTransition {
        /// Current status name.
        from: String,
        /// Attempted target status name.
        to: String,
    },
}

/// Referenced entity does not exist.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotFoundError {
    /// Unknown folio number.
    #[error("parcel {0} not found")]
    Parcel(String),

    /// Unknown transfer or renewal request identifier.
    #[error("request {0} not found")]
    Request(String),

    /// Unknown agent grant.
    #[error("no matching grant for agent {0}")]
    Grant(String),
}

impl RegistryError {
    /// Whether this error is a conflict (useful for retry decisions in
    /// callers that race, e.g. concurrent decide/cancel).
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}
