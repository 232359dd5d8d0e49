//! # folio-workflow — Transfer, Renewal, and Oversight
//!
//! The state-changing workflows of the register, composed from the
//! table-level operations in `folio-registry` so each operation is one
//! transaction:
//!
//! - **Transfer** (`transfer`): deferred request/decide/cancel plus the
//!   single-transaction immediate execution path.
//! - **Renewal** (`renewal`): deferred request/decide; no immediate
//!   variant.
//! - **Oversight** (`oversight`): stats, pending lists, activity feeds,
//!   per-parcel history, and bulk decisions with per-id outcomes.
//!
//! Every committed mutation appends its domain event in the same
//! transaction and triggers an outbox drain afterwards; ledger failures
//! degrade the mirror and are never workflow errors.

pub mod oversight;
pub mod renewal;
pub mod transfer;

pub use oversight::{ActivityRecord, BulkOutcome, Oversight, RegistryStats};
pub use renewal::RenewalWorkflow;
pub use transfer::TransferWorkflow;
