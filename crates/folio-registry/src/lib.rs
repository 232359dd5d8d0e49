//! # folio-registry — Parcel Registry and Authorization Directory
//!
//! Two services over the transactional store:
//!
//! - **Parcel Registry** (`registry`): registration, lookup,
//!   administrative status control, and the effect primitives the
//!   workflows apply on approval.
//! - **Authorization Directory** (`directory`): global and scoped agent
//!   grants, the `is_authorized` predicate, and the directory queries.
//!
//! Each module exposes its operations twice: as table-level functions over
//! `&mut Tables`/`&Tables` for use inside a workflow's transaction, and as
//! a thin service struct that opens one transaction per call. The
//! workflows compose the table-level functions so a multi-step mutation
//! (check authorization, apply effect, reset grants, append event) commits
//! or rolls back as one unit.
//!
//! The advisory expiry sweep (`sweep`) reports lapsed active parcels and
//! never mutates.

pub mod directory;
pub mod registry;
pub mod sweep;

pub use directory::AuthorizationDirectory;
pub use registry::ParcelRegistry;
pub use sweep::scan_expired;
