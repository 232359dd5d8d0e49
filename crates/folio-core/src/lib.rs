//! # folio-core — Foundational Types for the Folio Registry Stack
//!
//! This crate is the bedrock of the Folio Registry Stack. It defines the
//! validated domain primitives every other crate builds on. Every other
//! crate in the workspace depends on `folio-core`; it depends on nothing
//! internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `Identity`, `FolioNumber`,
//!    `RequestId`, `GrantId`, `ContentDigest` — all newtypes with validated
//!    constructors. No bare strings for identifiers.
//!
//! 2. **Case-insensitive identities by construction.** `Identity` normalizes
//!    to lowercase at parse time, so every equality check in the stack is
//!    case-insensitive without callers having to remember to fold case.
//!
//! 3. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision. Non-UTC inputs are rejected, not
//!    silently converted.
//!
//! 4. **One error taxonomy.** Validation, authorization, conflict, and
//!    not-found errors are distinct enums wrapped by `RegistryError`, so
//!    callers can always tell a precondition failure from a race.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `folio-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod caller;
pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

pub use caller::{Caller, Role};
pub use digest::{ContentDigest, MemoryObjectStore, ObjectStore};
pub use error::{
    AuthorizationError, ConflictError, NotFoundError, RegistryError, ValidationError,
};
pub use identity::{FolioNumber, GrantId, Identity, RequestId};
pub use temporal::Timestamp;
