//! # Renewal Workflow
//!
//! Term extension is always deferred: a request parks `Pending` and an
//! administrator decides it. There is no immediate-execution variant —
//! extending a term is a registry concession, not a documented fact
//! between two parties.
//!
//! The extension validation (`new_expiry > parcel.expiry`) runs inside
//! the requesting transaction, against the parcel's expiry at that
//! moment; a failed validation inserts nothing. Approval applies the
//! stored `new_expiry` as requested, without re-validating it.

use folio_core::{
    AuthorizationError, Caller, FolioNumber, NotFoundError, RegistryError, RequestId, Timestamp,
    ValidationError,
};
use folio_state::{Decision, DocumentRef, RenewalRequest};
use folio_store::{DomainEvent, LandStore};
use folio_ledger::{LedgerClient, Synchronizer};
use folio_registry::{directory, registry};

/// The renewal request and decision operations.
pub struct RenewalWorkflow<'a, C> {
    store: &'a LandStore,
    sync: &'a Synchronizer<C>,
}

impl<'a, C: LedgerClient> RenewalWorkflow<'a, C> {
    /// A workflow over the given store and synchronizer.
    pub fn new(store: &'a LandStore, sync: &'a Synchronizer<C>) -> Self {
        Self { store, sync }
    }

    /// Submit a renewal request. The caller must be the owner or an
    /// authorized agent, and the requested expiry must strictly extend
    /// the parcel's current expiry.
    pub fn request(
        &self,
        caller: &Caller,
        folio: &FolioNumber,
        new_expiry: Timestamp,
        reason: String,
        documents: DocumentRef,
    ) -> Result<RenewalRequest, RegistryError> {
        let request = self.store.transaction(|tables| {
            let parcel = registry::get(tables, folio)?;
            if !directory::is_authorized(tables, folio, &caller.identity) {
                return Err(AuthorizationError::NotAuthorized {
                    folio: folio.to_string(),
                    identity: caller.identity.to_string(),
                }
                .into());
            }
            if new_expiry <= parcel.expiry {
                return Err(ValidationError::ExpiryNotExtended {
                    current: parcel.expiry.to_iso8601(),
                    requested: new_expiry.to_iso8601(),
                }
                .into());
            }

            let request = RenewalRequest::new(
                folio.clone(),
                caller.identity.clone(),
                new_expiry,
                reason.clone(),
                documents.clone(),
            );
            tables.renewals.insert(request.id, request.clone());
            tables.append_event(DomainEvent::RenewalRequested {
                folio: folio.clone(),
                request: request.id,
                new_expiry,
            });
            Ok(request)
        })?;

        tracing::info!(%folio, request = %request.id, new_expiry = %new_expiry, "renewal requested");
        self.sync.drain(self.store);
        Ok(request)
    }

    /// Decide a pending renewal request. Administrator only. Approval
    /// extends the parcel's expiry to the requested date; rejection
    /// records the decision and touches nothing else.
    pub fn decide(
        &self,
        caller: &Caller,
        request_id: RequestId,
        approve: bool,
        reason: Option<String>,
    ) -> Result<RenewalRequest, RegistryError> {
        let request = self.store.transaction(|tables| {
            if !caller.is_admin() {
                return Err(AuthorizationError::NotAdmin.into());
            }
            let decision = Decision::now(caller.identity.clone(), reason.clone());
            let request = tables
                .renewals
                .get_mut(&request_id)
                .ok_or_else(|| NotFoundError::Request(request_id.to_string()))?;

            if approve {
                request.approve(decision)?;
                let (folio, new_expiry) = (request.folio.clone(), request.new_expiry);
                let updated = request.clone();

                registry::apply_renewal_effect(tables, &folio, new_expiry)?;
                tables.append_event(DomainEvent::RenewalApproved {
                    folio,
                    request: request_id,
                    new_expiry,
                });
                Ok(updated)
            } else {
                request.reject(decision)?;
                let updated = request.clone();
                tables.append_event(DomainEvent::RenewalRejected {
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
            "renewal decided"
        );
        self.sync.drain(self.store);
        Ok(request)
    }
}
