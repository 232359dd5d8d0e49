//! # Admin Oversight
//!
//! Read-only aggregation over the register plus bulk decision helpers.
//! Nothing here mutates directly: the bulk operations delegate to the
//! workflow `decide` methods one request at a time and collect per-id
//! outcomes instead of aborting on the first failure, so one bad id in a
//! batch never blocks the rest.

use std::collections::BTreeSet;

use serde::Serialize;

use folio_core::{Caller, FolioNumber, Identity, RegistryError, RequestId, Timestamp};
use folio_state::{
    Decision, ParcelStatus, RenewalRequest, RequestKind, RequestStatus, TransferRequest,
};
use folio_store::{LandStore, Tables};
use folio_ledger::{LedgerClient, Synchronizer};

use crate::renewal::RenewalWorkflow;
use crate::transfer::TransferWorkflow;

/// Register-wide totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    /// All registered parcels, any status.
    pub parcels: usize,
    /// Parcels currently `Active`.
    pub active_parcels: usize,
    /// Transfer requests awaiting decision.
    pub pending_transfers: usize,
    /// Renewal requests awaiting decision.
    pub pending_renewals: usize,
    /// Distinct current owners.
    pub owners: usize,
    /// Distinct agents holding at least one active grant.
    pub active_agents: usize,
}

/// One row of the merged transfer/renewal feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityRecord {
    /// Transfer or renewal.
    pub kind: RequestKind,
    /// The request identifier.
    pub id: RequestId,
    /// The parcel concerned.
    pub folio: FolioNumber,
    /// Current request status.
    pub status: RequestStatus,
    /// Who submitted the request.
    pub requested_by: Identity,
    /// Submission time.
    pub requested_at: Timestamp,
    /// Decision record, once terminal.
    pub decision: Option<Decision>,
}

impl From<&TransferRequest> for ActivityRecord {
    fn from(r: &TransferRequest) -> Self {
        Self {
            kind: RequestKind::Transfer,
            id: r.id,
            folio: r.folio.clone(),
            status: r.status,
            requested_by: r.requested_by.clone(),
            requested_at: r.requested_at,
            decision: r.decision.clone(),
        }
    }
}

impl From<&RenewalRequest> for ActivityRecord {
    fn from(r: &RenewalRequest) -> Self {
        Self {
            kind: RequestKind::Renewal,
            id: r.id,
            folio: r.folio.clone(),
            status: r.status,
            requested_by: r.requested_by.clone(),
            requested_at: r.requested_at,
            decision: r.decision.clone(),
        }
    }
}

/// Outcome of one request in a bulk decision.
#[derive(Debug)]
pub struct BulkOutcome {
    /// The request decided (or attempted).
    pub id: RequestId,
    /// The per-request result; a failure here never aborts the batch.
    pub outcome: Result<(), RegistryError>,
}

/// The oversight surface: stats, feeds, and bulk decisions.
pub struct Oversight<'a, C> {
    store: &'a LandStore,
    sync: &'a Synchronizer<C>,
}

impl<'a, C: LedgerClient> Oversight<'a, C> {
    /// An oversight view over the given store and synchronizer.
    pub fn new(store: &'a LandStore, sync: &'a Synchronizer<C>) -> Self {
        Self { store, sync }
    }

    /// Register-wide totals.
    pub fn stats(&self) -> RegistryStats {
        self.store.read(|tables| RegistryStats {
            parcels: tables.parcels.len(),
            active_parcels: tables
                .parcels
                .values()
                .filter(|p| p.status == ParcelStatus::Active)
                .count(),
            pending_transfers: tables
                .transfers
                .values()
                .filter(|r| r.status == RequestStatus::Pending)
                .count(),
            pending_renewals: tables
                .renewals
                .values()
                .filter(|r| r.status == RequestStatus::Pending)
                .count(),
            owners: tables
                .parcels
                .values()
                .map(|p| &p.owner)
                .collect::<BTreeSet<_>>()
                .len(),
            active_agents: tables
                .grants
                .iter()
                .filter(|g| g.active)
                .map(|g| &g.agent)
                .collect::<BTreeSet<_>>()
                .len(),
        })
    }

    /// Pending requests of one kind, oldest first.
    pub fn list_pending(&self, kind: RequestKind) -> Vec<ActivityRecord> {
        let mut records = self.store.read(|tables| match kind {
            RequestKind::Transfer => tables
                .transfers
                .values()
                .filter(|r| r.status == RequestStatus::Pending)
                .map(ActivityRecord::from)
                .collect::<Vec<_>>(),
            RequestKind::Renewal => tables
                .renewals
                .values()
                .filter(|r| r.status == RequestStatus::Pending)
                .map(ActivityRecord::from)
                .collect::<Vec<_>>(),
        });
        records.sort_by(|a, b| a.requested_at.cmp(&b.requested_at).then(a.id.cmp(&b.id)));
        records
    }

    /// The merged transfer and renewal feed, newest first, truncated to
    /// `limit` rows.
    pub fn recent_activity(&self, limit: usize) -> Vec<ActivityRecord> {
        let mut records = self.store.read(merged_feed);
        records.sort_by(|a, b| b.requested_at.cmp(&a.requested_at).then(b.id.cmp(&a.id)));
        records.truncate(limit);
        records
    }

    /// Every transfer and renewal ever raised against one parcel, oldest
    /// first.
    pub fn history(&self, folio: &FolioNumber) -> Vec<ActivityRecord> {
        let mut records = self.store.read(merged_feed);
        records.retain(|r| r.folio == *folio);
        records.sort_by(|a, b| a.requested_at.cmp(&b.requested_at).then(a.id.cmp(&b.id)));
        records
    }

    /// Decide a batch of transfer requests, collecting per-id outcomes.
    pub fn decide_transfers(
        &self,
        caller: &Caller,
        ids: &[RequestId],
        approve: bool,
        reason: Option<String>,
    ) -> Vec<BulkOutcome> {
        let workflow = TransferWorkflow::new(self.store, self.sync);
        ids.iter()
            .map(|&id| BulkOutcome {
                id,
                outcome: workflow
                    .decide(caller, id, approve, reason.clone())
                    .map(|_| ()),
            })
            .collect()
    }

    /// Decide a batch of renewal requests, collecting per-id outcomes.
    pub fn decide_renewals(
        &self,
        caller: &Caller,
        ids: &[RequestId],
        approve: bool,
        reason: Option<String>,
    ) -> Vec<BulkOutcome> {
        let workflow = RenewalWorkflow::new(self.store, self.sync);
        ids.iter()
            .map(|&id| BulkOutcome {
                id,
                outcome: workflow
                    .decide(caller, id, approve, reason.clone())
                    .map(|_| ()),
            })
            .collect()
    }
}

fn merged_feed(tables: &Tables) -> Vec<ActivityRecord> {
    tables
        .transfers
        .values()
        .map(ActivityRecord::from)
        .chain(tables.renewals.values().map(ActivityRecord::from))
        .collect()
}
