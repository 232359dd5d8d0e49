//! # Ledger Client Abstraction
//!
//! The registry mirrors committed facts to a distributed ledger through
//! the [`LedgerClient`] trait: submit a transaction, then await its
//! confirmation under a timeout. Implementations wrap whatever ledger the
//! deployment uses; tests and the CLI use the in-memory one.
//!
//! [`LedgerTransaction::from_event`] is pure: the same committed event
//! always produces the same transaction with the same natural key. That
//! is the whole reconciliation contract — a degraded entry can be
//! resubmitted at any later time and an idempotent ledger will treat the
//! replay as a no-op.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use folio_store::DomainEvent;

/// Failure modes of ledger submission and confirmation.
///
/// These never escape the synchronizer: they are converted to `Degraded`
/// outbox status and logged, because the store — not the ledger — is the
/// source of truth.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Submission could not reach the ledger.
    #[error("ledger submission failed: {0}")]
    Submission(String),

    /// The ledger accepted the submission but never confirmed in time.
    #[error("ledger confirmation timed out after {0:?}")]
    Timeout(Duration),

    /// The ledger actively rejected the transaction.
    #[error("ledger rejected transaction: {0}")]
    Rejected(String),
}

/// A ledger transaction built deterministically from a committed event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    /// Natural idempotency key (`folio:request-id:action`).
    pub key: String,
    /// The committed event being mirrored.
    pub event: DomainEvent,
}

impl LedgerTransaction {
    /// Build the transaction for a committed event. Pure and replayable:
    /// no clocks, no randomness, no store access.
    pub fn from_event(event: &DomainEvent) -> Self {
        Self {
            key: event.natural_key(),
            event: event.clone(),
        }
    }
}

/// Opaque handle returned by a submission, used to await confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxHandle(pub String);

impl std::fmt::Display for TxHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A confirmed ledger transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerOutcome {
    /// The ledger's reference for the confirmed transaction.
    pub ledger_ref: String,
}

/// A ledger the synchronizer can mirror committed events to.
pub trait LedgerClient: Send + Sync {
    /// Submit a transaction. Resubmitting a transaction whose key the
    /// ledger has already recorded must be a no-op on ledger state.
    fn submit(&self, tx: &LedgerTransaction) -> Result<TxHandle, LedgerError>;

    /// Await confirmation of a submitted transaction, bounded by
    /// `timeout`.
    fn await_confirmation(
        &self,
        handle: &TxHandle,
        timeout: Duration,
    ) -> Result<LedgerOutcome, LedgerError>;
}
