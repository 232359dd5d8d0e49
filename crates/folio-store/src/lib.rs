//! # folio-store — Transactional Store and Outbox
//!
//! The mutable heart of the Folio Registry Stack: one `RwLock<Tables>`
//! with closure-based transactions (commit on `Ok`, total rollback on
//! `Err`) and an outbox of committed domain events for the ledger
//! synchronizer.
//!
//! ## Design
//!
//! - **One lock, whole-state transactions.** Cross-table invariants (the
//!   single-pending-transfer rule, duplicate-folio rejection) are checked
//!   and enforced inside the same critical section that mutates.
//! - **Outbox over direct calls.** Registry operations never talk to the
//!   ledger; they append events. Mirroring is someone else's problem
//!   (`folio-ledger`), which is why a ledger outage can never fail or
//!   roll back a registry operation.

pub mod outbox;
pub mod store;
pub mod tables;

pub use outbox::{DomainEvent, OutboxEntry, OutboxStatus};
pub use store::LandStore;
pub use tables::Tables;
