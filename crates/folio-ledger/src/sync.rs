//! # Outbox Synchronizer
//!
//! Drains committed `Pending` outbox entries to the ledger, best-effort.
//! Each entry gets at most [`MAX_SUBMIT_ATTEMPTS`] submissions, each with
//! a bounded confirmation wait; entries that exhaust the budget are marked
//! `Degraded` and stay queryable for the out-of-band reconciliation job.
//!
//! The drain never returns an error for ledger failure and never holds a
//! store lock while talking to the ledger: pending entries are cloned out
//! under the read lock, submitted lock-free, and status updates go back
//! in short write transactions.

use std::time::Duration;

use folio_store::{LandStore, OutboxEntry, OutboxStatus};

use crate::client::{LedgerClient, LedgerError, LedgerTransaction};

/// Submission attempts per entry before marking it degraded.
pub const MAX_SUBMIT_ATTEMPTS: u32 = 3;

/// Default per-attempt confirmation wait.
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(30);

/// What one drain pass accomplished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Sequence numbers newly marked `Synced`.
    pub synced: Vec<u64>,
    /// Sequence numbers newly marked `Degraded`.
    pub degraded: Vec<u64>,
}

impl DrainReport {
    /// Whether every drained entry synced.
    pub fn is_clean(&self) -> bool {
        self.degraded.is_empty()
    }
}

/// Best-effort mirror of the outbox onto a ledger.
pub struct Synchronizer<C> {
    client: C,
    confirmation_timeout: Duration,
}

impl<C: LedgerClient> Synchronizer<C> {
    /// A synchronizer with the default confirmation timeout.
    pub fn new(client: C) -> Self {
        Self::with_timeout(client, DEFAULT_CONFIRMATION_TIMEOUT)
    }

    /// A synchronizer with an explicit per-attempt confirmation timeout.
    pub fn with_timeout(client: C, confirmation_timeout: Duration) -> Self {
        Self {
            client,
            confirmation_timeout,
        }
    }

    /// Access the wrapped client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Drain all pending outbox entries.
    ///
    /// Ledger failure degrades entries; it is never an error. The only
    /// way this can misreport is a concurrent drain racing on the same
    /// entries, which the idempotent ledger keys make harmless.
    pub fn drain(&self, store: &LandStore) -> DrainReport {
        let pending = store.read(|tables| tables.pending_outbox());
        let mut report = DrainReport::default();

        for entry in pending {
            match self.mirror(&entry) {
                Ok(ledger_ref) => {
                    let _ = store.transaction(|tables| {
                        tables.set_outbox_status(
                            entry.seq,
                            OutboxStatus::Synced {
                                ledger_ref: ledger_ref.clone(),
                            },
                        );
                        Ok(())
                    });
                    report.synced.push(entry.seq);
                }
                Err((attempts, err)) => {
                    tracing::warn!(
                        seq = entry.seq,
                        key = %entry.event.natural_key(),
                        attempts,
                        error = %err,
                        "ledger sync degraded"
                    );
                    let _ = store.transaction(|tables| {
                        tables.set_outbox_status(
                            entry.seq,
                            OutboxStatus::Degraded {
                                attempts,
                                reason: err.to_string(),
                            },
                        );
                        Ok(())
                    });
                    report.degraded.push(entry.seq);
                }
            }
        }
        report
    }

    /// Degraded entries awaiting reconciliation.
    pub fn degraded_entries(&self, store: &LandStore) -> Vec<OutboxEntry> {
        store.read(|tables| tables.degraded_outbox())
    }

    /// Submit one entry with bounded retries. Returns the ledger
    /// reference, or the attempt count and final error.
    fn mirror(&self, entry: &OutboxEntry) -> Result<String, (u32, LedgerError)> {
        let tx = LedgerTransaction::from_event(&entry.event);
        let mut attempts = 0;
        loop {
            attempts += 1;
            let outcome = self
                .client
                .submit(&tx)
                .and_then(|handle| self.client.await_confirmation(&handle, self.confirmation_timeout));
            match outcome {
                Ok(confirmed) => return Ok(confirmed.ledger_ref),
                Err(err) if attempts < MAX_SUBMIT_ATTEMPTS => {
                    tracing::debug!(key = %tx.key, attempts, error = %err, "ledger attempt failed, retrying");
                }
                Err(err) => return Err((attempts, err)),
            }
        }
    }
}
