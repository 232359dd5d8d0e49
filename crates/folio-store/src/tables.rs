//! # Store Tables
//!
//! All registry state lives in one `Tables` value: parcels keyed by folio,
//! grants, the two request tables, and the outbox. Table-level operations
//! in `folio-registry` and the workflows mutate a `&mut Tables` handed to
//! them by the enclosing transaction, so a cross-table mutation (insert
//! request + append event) is atomic by construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use folio_core::{FolioNumber, RequestId, Timestamp};
use folio_state::{AgentGrant, Parcel, RenewalRequest, TransferRequest};

use crate::outbox::{DomainEvent, OutboxEntry, OutboxStatus};

/// The complete mutable state of the register.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tables {
    /// Registered parcels, keyed by folio number.
    pub parcels: BTreeMap<FolioNumber, Parcel>,
    /// Agent grants, global and scoped, active and deactivated.
    pub grants: Vec<AgentGrant>,
    /// Transfer requests across all statuses.
    pub transfers: BTreeMap<RequestId, TransferRequest>,
    /// Renewal requests across all statuses.
    pub renewals: BTreeMap<RequestId, RenewalRequest>,
    /// Committed domain events awaiting or finished with ledger mirroring.
    pub outbox: Vec<OutboxEntry>,
    next_seq: u64,
}

impl Tables {
    /// Append a committed event to the outbox, assigning the next
    /// sequence number. Called inside the committing transaction so the
    /// event and the mutation it records land together or not at all.
    pub fn append_event(&mut self, event: DomainEvent) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.outbox.push(OutboxEntry {
            seq,
            event,
            status: OutboxStatus::Pending,
            created_at: Timestamp::now(),
        });
        seq
    }

    /// Clone out the entries still awaiting ledger mirroring, in
    /// sequence order.
    pub fn pending_outbox(&self) -> Vec<OutboxEntry> {
        self.outbox.iter().filter(|e| e.is_pending()).cloned().collect()
    }

    /// Clone out the entries that gave up after bounded retries.
    pub fn degraded_outbox(&self) -> Vec<OutboxEntry> {
        self.outbox.iter().filter(|e| e.is_degraded()).cloned().collect()
    }

    /// Update the status of one outbox entry. Returns `false` when the
    /// sequence number is unknown.
    pub fn set_outbox_status(&mut self, seq: u64, status: OutboxStatus) -> bool {
        match self.outbox.iter_mut().find(|e| e.seq == seq) {
            Some(entry) => {
                entry.status = status;
                true
            }
            None => false,
        }
    }
}
