//! # Transfer Workflow
//!
//! Ownership transfers in two shapes:
//!
//! - **Deferred**: `request` parks a `Pending` row; an administrator
//!   later `decide`s it; the requester or owner may `cancel` it first.
//! - **Immediate**: `execute_immediate` applies the ownership change in
//!   one transaction when the submitted documentation is self-certifying
//!   (agreement + owner consent + replacement file set).
//!
//! Both shapes funnel through the same parcel effect primitive, emit an
//! outbox event in the committing transaction, and trigger a ledger drain
//! after commit. Drain outcomes never propagate: a dead ledger degrades
//! the mirror, not the transfer.
//!
//! Grant reset on ownership change is deliberately asymmetric. Deferred
//! approval soft-deactivates the parcel's scoped grants (the outgoing
//! owner's delegations stay on record); immediate execution hard-deletes
//! them along with the wholesale file-set replacement.

use folio_core::{
    AuthorizationError, Caller, ConflictError, FolioNumber, Identity, NotFoundError,
    RegistryError, RequestId, Timestamp, ValidationError,
};
use folio_state::{Decision, DocumentEntry, DocumentRef, TransferRequest};
use folio_store::{DomainEvent, LandStore, Tables};
use folio_ledger::{LedgerClient, Synchronizer};
use folio_registry::{directory, registry};

/// The deferred and immediate transfer operations.
pub struct TransferWorkflow<'a, C> {
    store: &'a LandStore,
    sync: &'a Synchronizer<C>,
}

impl<'a, C: LedgerClient> TransferWorkflow<'a, C> {
    /// A workflow over the given store and synchronizer.
    pub fn new(store: &'a LandStore, sync: &'a Synchronizer<C>) -> Self {
        Self { store, sync }
    }

    /// Submit a deferred transfer request.
    ///
    /// `from` must be the parcel's current owner; the caller must be the
    /// owner or an authorized agent. At most one pending request may
    /// exist per parcel — the check and the insert share the transaction,
    /// so concurrent submissions cannot both pass.
    pub fn request(
        &self,
        caller: &Caller,
        folio: &FolioNumber,
        from: &Identity,
        to: &Identity,
        documents: DocumentRef,
    ) -> Result<TransferRequest, RegistryError> {
        if from == to {
            return Err(ValidationError::SelfTransfer.into());
        }

        let request = self.store.transaction(|tables| {
            let parcel = registry::get(tables, folio)?;
            if parcel.owner != *from {
                return Err(AuthorizationError::NotOwner {
                    folio: folio.to_string(),
                }
                .into());
            }
            ensure_authorized(tables, folio, caller)?;
            ensure_no_pending_transfer(tables, folio)?;

            let request = TransferRequest::new(
                folio.clone(),
                from.clone(),
                to.clone(),
                documents.clone(),
                caller.identity.clone(),
            );
            tables.transfers.insert(request.id, request.clone());
            tables.append_event(DomainEvent::TransferRequested {
                folio: folio.clone(),
                request: request.id,
                from: from.clone(),
                to: to.clone(),
            });
            Ok(request)
        })?;

        tracing::info!(%folio, request = %request.id, %from, %to, "transfer requested");
        self.sync.drain(self.store);
        Ok(request)
    }

    /// Decide a pending transfer request. Administrator only.
    ///
    /// Approval applies the ownership change, replaces the parcel's
    /// document set with the request's, and soft-deactivates the parcel's
    /// scoped grants. Rejection records the decision and touches nothing
    /// else. A request that is no longer pending yields `NotPending`.
    pub fn decide(
        &self,
        caller: &Caller,
        request_id: RequestId,
        approve: bool,
        reason: Option<String>,
    ) -> Result<TransferRequest, RegistryError> {
        let request = self.store.transaction(|tables| {
            if !caller.is_admin() {
                return Err(AuthorizationError::NotAdmin.into());
            }
            let decision = Decision::now(caller.identity.clone(), reason.clone());
            let request = tables
                .transfers
                .get_mut(&request_id)
                .ok_or_else(|| NotFoundError::Request(request_id.to_string()))?;

            if approve {
                request.approve(decision)?;
                let (folio, to, documents) = (
                    request.folio.clone(),
                    request.to.clone(),
                    request.documents.clone(),
                );
                let updated = request.clone();

                registry::apply_transfer_effect(tables, &folio, to.clone(), documents)?;
                for grant in tables
                    .grants
                    .iter_mut()
                    .filter(|g| g.active && g.is_scoped_to(&folio))
                {
                    grant.deactivate("ownership transferred");
                }
                tables.append_event(DomainEvent::TransferApproved {
                    folio,
                    request: request_id,
                    to,
                });
                Ok(updated)
            } else {
                request.reject(decision)?;
                let updated = request.clone();
                tables.append_event(DomainEvent::TransferRejected {
                    folio: updated.folio.clone(),
                    request: request_id,
                });
                Ok(updated)
            }
        })?;

        tracing::info!(
            folio = %request.folio,
            request = %request.id,
            status = %request.status,
            "transfer decided"
        );
        self.sync.drain(self.store);
        Ok(request)
    }

    /// Withdraw a pending transfer request. Only the original requester
    /// or the parcel's current owner may cancel. A race with `decide`
    /// resolves by first transaction wins; the loser gets `NotPending`.
    pub fn cancel(
        &self,
        caller: &Caller,
        request_id: RequestId,
    ) -> Result<TransferRequest, RegistryError> {
        let request = self.store.transaction(|tables| {
            let owner = tables
                .transfers
                .get(&request_id)
                .and_then(|r| tables.parcels.get(&r.folio))
                .map(|p| p.owner.clone());
            let request = tables
                .transfers
                .get_mut(&request_id)
                .ok_or_else(|| NotFoundError::Request(request_id.to_string()))?;

            let may_cancel = caller.identity == request.requested_by
                || owner.is_some_and(|o| o == caller.identity);
            if !may_cancel {
                return Err(AuthorizationError::NotAuthorized {
                    folio: request.folio.to_string(),
                    identity: caller.identity.to_string(),
                }
                .into());
            }

            request.cancel(Decision::now(caller.identity.clone(), None))?;
            let updated = request.clone();
            tables.append_event(DomainEvent::TransferCancelled {
                folio: updated.folio.clone(),
                request: request_id,
            });
            Ok(updated)
        })?;

        tracing::info!(folio = %request.folio, request = %request.id, "transfer cancelled");
        self.sync.drain(self.store);
        Ok(request)
    }

    /// Execute a transfer immediately, in one transaction.
    ///
    /// The combined manifest is partitioned: transfer-process documents
    /// (agreement, consent, legal attachments) are archived under the
    /// parcel's `transfer_records` metadata; the remainder becomes the new
    /// owner's primary document set and must be non-empty. All grants on
    /// the parcel are hard-deleted. An already-`Approved` request row is
    /// inserted for audit continuity.
    pub fn execute_immediate(
        &self,
        caller: &Caller,
        folio: &FolioNumber,
        to: &Identity,
        documents: DocumentRef,
    ) -> Result<TransferRequest, RegistryError> {
        let request = self.store.transaction(|tables| {
            let parcel = registry::get(tables, folio)?;
            let from = parcel.owner.clone();
            if from == *to {
                return Err(ValidationError::SelfTransfer.into());
            }
            ensure_authorized(tables, folio, caller)?;
            ensure_no_pending_transfer(tables, folio)?;

            let (process, replacement) = documents.partition_transfer();
            let replacement = DocumentRef::new(replacement).map_err(|_| {
                // A transfer that leaves the parcel with no primary
                // documents is malformed input, not a conflict.
                RegistryError::from(ValidationError::EmptyDocuments)
            })?;

            let request = TransferRequest::executed(
                folio.clone(),
                from.clone(),
                to.clone(),
                documents.clone(),
                caller.identity.clone(),
            );

            if let Some(parcel) = tables.parcels.get_mut(folio) {
                parcel.archive_transfer_record(transfer_record(&request, &process));
            }
            registry::apply_transfer_effect(tables, folio, to.clone(), replacement)?;
            tables.grants.retain(|g| !g.is_scoped_to(folio));

            tables.transfers.insert(request.id, request.clone());
            tables.append_event(DomainEvent::TransferExecuted {
                folio: folio.clone(),
                request: request.id,
                from,
                to: to.clone(),
            });
            Ok(request)
        })?;

        tracing::info!(%folio, request = %request.id, %to, "transfer executed");
        self.sync.drain(self.store);
        Ok(request)
    }
}

/// Caller must be the parcel owner or hold an active covering grant.
fn ensure_authorized(
    tables: &Tables,
    folio: &FolioNumber,
    caller: &Caller,
) -> Result<(), RegistryError> {
    if directory::is_authorized(tables, folio, &caller.identity) {
        return Ok(());
    }
    Err(AuthorizationError::NotAuthorized {
        folio: folio.to_string(),
        identity: caller.identity.to_string(),
    }
    .into())
}

/// At most one pending transfer request per parcel.
fn ensure_no_pending_transfer(tables: &Tables, folio: &FolioNumber) -> Result<(), RegistryError> {
    let pending = tables
        .transfers
        .values()
        .any(|r| r.folio == *folio && !r.status.is_terminal());
    if pending {
        return Err(ConflictError::PendingTransferExists {
            folio: folio.to_string(),
        }
        .into());
    }
    Ok(())
}

/// The archived record of an immediate execution: who, when, and the
/// transfer-process documents that evidenced it.
fn transfer_record(request: &TransferRequest, process: &[DocumentEntry]) -> serde_json::Value {
    serde_json::json!({
        "request": request.id.to_string(),
        "from": request.from.to_string(),
        "to": request.to.to_string(),
        "executed_by": request.requested_by.to_string(),
        "executed_at": Timestamp::now().to_iso8601(),
        "documents": process
            .iter()
            .map(|e| serde_json::json!({
                "name": e.name,
                "kind": e.kind.to_string(),
                "digest": e.digest.to_string(),
            }))
            .collect::<Vec<_>>(),
    })
}
