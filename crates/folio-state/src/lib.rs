//! # folio-state — Records and Status State Machines
//!
//! Defines the record types owned by the registry, directory, and
//! workflows, together with their status lifecycles. Transitions are
//! methods that validate the current status and reject invalid moves with
//! structured conflict errors.
//!
//! ## State Machines
//!
//! - **Parcel** (`parcel.rs`): `Pending → Active → Expired/Transferred`,
//!   with `Active → Pending` as the single administrative-override
//!   back-edge. Transfer and renewal effects are record-level methods so
//!   the deferred and immediate transfer paths share one primitive.
//!
//! - **AgentGrant** (`grant.rs`): global and parcel-scoped grants with an
//!   active flag; deactivation and reactivation preserve grant history.
//!
//! - **Requests** (`request.rs`): `Pending → Approved/Rejected/Cancelled`,
//!   all terminal. A decided or cancelled request is never reopened.
//!
//! Documents (`document.rs`) are typed manifests of content digests; the
//! transfer-process / replacement split drives the immediate-execution
//! document merge.

pub mod document;
pub mod grant;
pub mod parcel;
pub mod request;

pub use document::{DocumentEntry, DocumentKind, DocumentRef};
pub use grant::{AgentGrant, GrantScope};
pub use parcel::{ExpiryAlert, Parcel, ParcelStatus};
pub use request::{Decision, RenewalRequest, RequestKind, RequestStatus, TransferRequest};
