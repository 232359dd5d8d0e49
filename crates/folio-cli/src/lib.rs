//! # folio-cli — Folio Registry Stack Command-Line Interface
//!
//! A thin binary over the domain crates, backed by a JSON state file.
//!
//! ## Subcommands
//!
//! - `parcel` — register, show, list, set-status, sweep
//! - `agent` — grant/revoke global and scoped authorizations, queries
//! - `transfer` — request, decide, cancel, execute
//! - `renewal` — request, decide
//! - `admin` — stats, pending lists, activity, history, ledger sync
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to domain crates — no business logic here.

pub mod admin;
pub mod agent;
pub mod context;
pub mod parcel;
pub mod renewal;
pub mod transfer;
