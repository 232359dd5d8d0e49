//! # Workflow Request Records
//!
//! Transfer and renewal requests share one status shape:
//!
//! ```text
//! Pending ──▶ Approved | Rejected | Cancelled   (all terminal)
//! ```
//!
//! A request that has left `Pending` is never reopened. Decision methods
//! validate the current status and return `ConflictError::NotPending`
//! otherwise — the loser of a concurrent decide/cancel race lands here
//! instead of double-applying an effect.

use serde::{Deserialize, Serialize};

use folio_core::{ConflictError, FolioNumber, Identity, RequestId, Timestamp};

use crate::document::DocumentRef;

/// The status of a workflow request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Awaiting administrative decision.
    Pending,
    /// Approved; the effect has been applied.
    Approved,
    /// Rejected with a recorded reason; parcel untouched.
    Rejected,
    /// Withdrawn by the requester or owner before decision.
    Cancelled,
}

impl RequestStatus {
    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// Which workflow a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Ownership transfer.
    Transfer,
    /// Term renewal.
    Renewal,
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Transfer => "TRANSFER",
            Self::Renewal => "RENEWAL",
        };
        f.write_str(s)
    }
}

/// The recorded outcome of a decision or cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Who decided (administrator) or cancelled (requester/owner).
    pub by: Identity,
    /// When the decision was recorded.
    pub at: Timestamp,
    /// Human-readable reason; part of the audit trail.
    pub reason: Option<String>,
}

impl Decision {
    /// A decision recorded now.
    pub fn now(by: Identity, reason: Option<String>) -> Self {
        Self {
            by,
            at: Timestamp::now(),
            reason,
        }
    }
}

// ─── Transfer Request ────────────────────────────────────────────────

/// An ownership transfer request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Unique request identifier.
    pub id: RequestId,
    /// The parcel being transferred.
    pub folio: FolioNumber,
    /// Current owner (source of the transfer).
    pub from: Identity,
    /// Incoming owner.
    pub to: Identity,
    /// Request status.
    pub status: RequestStatus,
    /// Submitted transfer documents.
    pub documents: DocumentRef,
    /// Who submitted the request (owner or agent).
    pub requested_by: Identity,
    /// Submission time.
    pub requested_at: Timestamp,
    /// Decision/cancellation record, once terminal.
    pub decision: Option<Decision>,
}

impl TransferRequest {
    /// Create a new pending transfer request.
    pub fn new(
        folio: FolioNumber,
        from: Identity,
        to: Identity,
        documents: DocumentRef,
        requested_by: Identity,
    ) -> Self {
        Self {
            id: RequestId::new(),
            folio,
            from,
            to,
            status: RequestStatus::Pending,
            documents,
            requested_by,
            requested_at: Timestamp::now(),
            decision: None,
        }
    }

    /// Create a request already in `Approved` status, recording who
    /// executed it. Used by immediate execution for audit continuity.
    pub fn executed(
        folio: FolioNumber,
        from: Identity,
        to: Identity,
        documents: DocumentRef,
        executed_by: Identity,
    ) -> Self {
        let mut request = Self::new(folio, from, to, documents, executed_by.clone());
        request.status = RequestStatus::Approved;
        request.decision = Some(Decision::now(
            executed_by,
            Some("executed immediately on self-certifying documentation".to_string()),
        ));
        request
    }

    /// Approve a pending request.
    pub fn approve(&mut self, decision: Decision) -> Result<(), ConflictError> {
        self.require_pending()?;
        self.status = RequestStatus::Approved;
        self.decision = Some(decision);
        Ok(())
    }

    /// Reject a pending request.
    pub fn reject(&mut self, decision: Decision) -> Result<(), ConflictError> {
        self.require_pending()?;
        self.status = RequestStatus::Rejected;
        self.decision = Some(decision);
        Ok(())
    }

    /// Cancel a pending request.
    pub fn cancel(&mut self, decision: Decision) -> Result<(), ConflictError> {
        self.require_pending()?;
        self.status = RequestStatus::Cancelled;
        self.decision = Some(decision);
        Ok(())
    }

    fn require_pending(&self) -> Result<(), ConflictError> {
        if self.status != RequestStatus::Pending {
            return Err(ConflictError::NotPending {
                request: self.id.to_string(),
            });
        }
        Ok(())
    }
}

// ─── Renewal Request ─────────────────────────────────────────────────

/// A term renewal request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenewalRequest {
    /// Unique request identifier.
    pub id: RequestId,
    /// The parcel being renewed.
    pub folio: FolioNumber,
    /// Who submitted the request (owner or agent).
    pub requested_by: Identity,
    /// Requested new expiry; strictly later than the parcel's expiry at
    /// request time.
    pub new_expiry: Timestamp,
    /// Requester's stated reason.
    pub reason: String,
    /// Supporting documents.
    pub documents: DocumentRef,
    /// Request status.
    pub status: RequestStatus,
    /// Submission time.
    pub requested_at: Timestamp,
    /// Decision record, once terminal.
    pub decision: Option<Decision>,
}

impl RenewalRequest {
    /// Create a new pending renewal request.
    pub fn new(
        folio: FolioNumber,
        requested_by: Identity,
        new_expiry: Timestamp,
        reason: String,
        documents: DocumentRef,
    ) -> Self {
        Self {
            id: RequestId::new(),
            folio,
            requested_by,
            new_expiry,
            reason,
            documents,
            status: RequestStatus::Pending,
            requested_at: Timestamp::now(),
            decision: None,
        }
    }

    /// Approve a pending request.
    pub fn approve(&mut self, decision: Decision) -> Result<(), ConflictError> {
        self.require_pending()?;
        self.status = RequestStatus::Approved;
        self.decision = Some(decision);
        Ok(())
    }

    /// Reject a pending request.
    pub fn reject(&mut self, decision: Decision) -> Result<(), ConflictError> {
        self.require_pending()?;
        self.status = RequestStatus::Rejected;
        self.decision = Some(decision);
        Ok(())
    }

    fn require_pending(&self) -> Result<(), ConflictError> {
        if self.status != RequestStatus::Pending {
            return Err(ConflictError::NotPending {
                request: self.id.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentEntry, DocumentKind};
    use folio_core::ContentDigest;

    fn identity(n: u8) -> Identity {
        Identity::parse(&format!("0x{:040x}", n)).unwrap()
    }

    fn folio() -> FolioNumber {
        FolioNumber::parse("NSW-SYD-2024-001").unwrap()
    }

    fn documents() -> DocumentRef {
        DocumentRef::new(vec![DocumentEntry {
            name: "agreement.pdf".to_string(),
            kind: DocumentKind::TransferAgreement,
            digest: ContentDigest::from_bytes(b"agreement"),
        }])
        .unwrap()
    }

    fn make_transfer() -> TransferRequest {
        TransferRequest::new(folio(), identity(1), identity(2), documents(), identity(1))
    }

    #[test]
    fn test_new_transfer_is_pending() {
        assert_eq!(make_transfer().status, RequestStatus::Pending);
    }

    #[test]
    fn test_approve_then_cancel_conflicts() {
        let mut request = make_transfer();
        request
            .approve(Decision::now(identity(9), Some("ok".into())))
            .unwrap();
        let result = request.cancel(Decision::now(identity(1), None));
        assert!(matches!(result, Err(ConflictError::NotPending { .. })));
        assert_eq!(request.status, RequestStatus::Approved);
    }

    #[test]
    fn test_cancel_then_approve_conflicts() {
        let mut request = make_transfer();
        request.cancel(Decision::now(identity(1), None)).unwrap();
        let result = request.approve(Decision::now(identity(9), Some("late".into())));
        assert!(matches!(result, Err(ConflictError::NotPending { .. })));
        assert_eq!(request.status, RequestStatus::Cancelled);
    }

    #[test]
    fn test_reject_records_reason() {
        let mut request = make_transfer();
        request
            .reject(Decision::now(identity(9), Some("missing consent".into())))
            .unwrap();
        assert_eq!(request.status, RequestStatus::Rejected);
        let decision = request.decision.unwrap();
        assert_eq!(decision.reason.as_deref(), Some("missing consent"));
    }

    #[test]
    fn test_executed_is_terminal_from_birth() {
        let request = TransferRequest::executed(
            folio(),
            identity(1),
            identity(2),
            documents(),
            identity(3),
        );
        assert_eq!(request.status, RequestStatus::Approved);
        assert!(request.decision.is_some());
    }

    #[test]
    fn test_renewal_terminal_discipline() {
        let mut request = RenewalRequest::new(
            folio(),
            identity(2),
            Timestamp::parse("2028-01-01T00:00:00Z").unwrap(),
            "extend lease".to_string(),
            documents(),
        );
        request
            .approve(Decision::now(identity(9), None))
            .unwrap();
        assert!(request.reject(Decision::now(identity(9), None)).is_err());
        assert_eq!(request.status, RequestStatus::Approved);
    }

    #[test]
    fn test_status_terminality() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
        assert!(RequestStatus::Cancelled.is_terminal());
    }
}
