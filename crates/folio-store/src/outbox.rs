//! # Outbox of Committed Domain Events
//!
//! Every committed mutation appends a `DomainEvent` to the outbox inside
//! the same transaction that performed the mutation. The ledger
//! synchronizer later drains `Pending` entries and marks them `Synced` or
//! `Degraded`. The store is the source of truth; the outbox is what makes
//! the ledger mirror eventually consistent without ever blocking or
//! failing a registry operation.

use serde::{Deserialize, Serialize};

use folio_core::{FolioNumber, Identity, RequestId, Timestamp};

/// A fact committed to the store, destined for the ledger mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A new parcel entered the register.
    ParcelRegistered {
        /// The registered folio.
        folio: FolioNumber,
        /// Initial owner.
        owner: Identity,
    },
    /// A transfer request was submitted.
    TransferRequested {
        /// The parcel under transfer.
        folio: FolioNumber,
        /// The request identifier.
        request: RequestId,
        /// Outgoing owner.
        from: Identity,
        /// Incoming owner.
        to: Identity,
    },
    /// A pending transfer was approved and its effect applied.
    TransferApproved {
        /// The parcel transferred.
        folio: FolioNumber,
        /// The decided request.
        request: RequestId,
        /// The new owner.
        to: Identity,
    },
    /// A pending transfer was rejected.
    TransferRejected {
        /// The parcel in question.
        folio: FolioNumber,
        /// The decided request.
        request: RequestId,
    },
    /// A pending transfer was withdrawn.
    TransferCancelled {
        /// The parcel in question.
        folio: FolioNumber,
        /// The cancelled request.
        request: RequestId,
    },
    /// A transfer was executed immediately, skipping the pending stage.
    TransferExecuted {
        /// The parcel transferred.
        folio: FolioNumber,
        /// The audit request row.
        request: RequestId,
        /// Outgoing owner.
        from: Identity,
        /// Incoming owner.
        to: Identity,
    },
    /// A renewal request was submitted.
    RenewalRequested {
        /// The parcel under renewal.
        folio: FolioNumber,
        /// The request identifier.
        request: RequestId,
        /// Requested new expiry.
        new_expiry: Timestamp,
    },
    /// A pending renewal was approved and the expiry extended.
    RenewalApproved {
        /// The parcel renewed.
        folio: FolioNumber,
        /// The decided request.
        request: RequestId,
        /// The granted new expiry.
        new_expiry: Timestamp,
    },
    /// A pending renewal was rejected.
    RenewalRejected {
        /// The parcel in question.
        folio: FolioNumber,
        /// The decided request.
        request: RequestId,
    },
}

impl DomainEvent {
    /// The short action name for this event.
    pub fn action(&self) -> &'static str {
        match self {
            Self::ParcelRegistered { .. } => "parcel_registered",
            Self::TransferRequested { .. } => "transfer_requested",
            Self::TransferApproved { .. } => "transfer_approved",
            Self::TransferRejected { .. } => "transfer_rejected",
            Self::TransferCancelled { .. } => "transfer_cancelled",
            Self::TransferExecuted { .. } => "transfer_executed",
            Self::RenewalRequested { .. } => "renewal_requested",
            Self::RenewalApproved { .. } => "renewal_approved",
            Self::RenewalRejected { .. } => "renewal_rejected",
        }
    }

    /// The folio this event concerns.
    pub fn folio(&self) -> &FolioNumber {
        match self {
            Self::ParcelRegistered { folio, .. }
            | Self::TransferRequested { folio, .. }
            | Self::TransferApproved { folio, .. }
            | Self::TransferRejected { folio, .. }
            | Self::TransferCancelled { folio, .. }
            | Self::TransferExecuted { folio, .. }
            | Self::RenewalRequested { folio, .. }
            | Self::RenewalApproved { folio, .. }
            | Self::RenewalRejected { folio, .. } => folio,
        }
    }

    /// Natural idempotency key: the same committed fact always produces
    /// the same key, so ledger resubmission after a partial failure is
    /// harmless.
    pub fn natural_key(&self) -> String {
        match self {
            Self::ParcelRegistered { folio, .. } => {
                format!("{folio}:registration:{}", self.action())
            }
            Self::TransferRequested { folio, request, .. }
            | Self::TransferApproved { folio, request, .. }
            | Self::TransferRejected { folio, request }
            | Self::TransferCancelled { folio, request }
            | Self::TransferExecuted { folio, request, .. }
            | Self::RenewalRequested { folio, request, .. }
            | Self::RenewalApproved { folio, request, .. }
            | Self::RenewalRejected { folio, request } => {
                format!("{folio}:{request}:{}", self.action())
            }
        }
    }
}

/// Synchronization status of an outbox entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutboxStatus {
    /// Not yet mirrored to the ledger.
    Pending,
    /// Confirmed on the ledger.
    Synced {
        /// The ledger's reference for the confirmed transaction.
        ledger_ref: String,
    },
    /// Gave up after bounded retries; awaiting reconciliation.
    Degraded {
        /// Submission attempts made before giving up.
        attempts: u32,
        /// The final failure reason.
        reason: String,
    },
}

/// One committed event awaiting (or finished with) ledger mirroring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboxEntry {
    /// Monotonic sequence number assigned at commit.
    pub seq: u64,
    /// The committed event.
    pub event: DomainEvent,
    /// Mirroring status.
    pub status: OutboxStatus,
    /// When the event was committed.
    pub created_at: Timestamp,
}

impl OutboxEntry {
    /// Whether this entry still awaits mirroring.
    pub fn is_pending(&self) -> bool {
        matches!(self.status, OutboxStatus::Pending)
    }

    /// Whether this entry gave up after bounded retries.
    pub fn is_degraded(&self) -> bool {
        matches!(self.status, OutboxStatus::Degraded { .. })
    }
}
