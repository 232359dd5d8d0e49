//! # folio-ledger — Ledger Mirroring
//!
//! Best-effort mirroring of committed registry facts onto a distributed
//! ledger. The store is the source of truth; the ledger is a mirror that
//! may lag, time out, or be down entirely without ever failing a registry
//! operation.
//!
//! - [`LedgerClient`] is the seam implementations plug into.
//! - [`LedgerTransaction::from_event`] builds the transaction for a
//!   committed event deterministically, carrying a natural idempotency
//!   key so replays are harmless.
//! - [`Synchronizer`] drains the outbox with bounded retries and marks
//!   entries `Synced` or `Degraded`; degraded entries stay queryable for
//!   reconciliation.
//! - [`MemoryLedger`] is the in-memory idempotent implementation used by
//!   tests and the CLI, with injectable failure and timeout modes.

pub mod client;
pub mod memory;
pub mod sync;

pub use client::{LedgerClient, LedgerError, LedgerOutcome, LedgerTransaction, TxHandle};
pub use memory::MemoryLedger;
pub use sync::{DrainReport, Synchronizer, DEFAULT_CONFIRMATION_TIMEOUT, MAX_SUBMIT_ATTEMPTS};
