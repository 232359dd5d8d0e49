//! # Parcel Subcommand
//!
//! Registration, lookup, administrative status control, and the expiry
//! sweep.

use std::path::Path;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};

use folio_core::{FolioNumber, Identity, Timestamp};
use folio_registry::ParcelRegistry;
use folio_state::ParcelStatus;

use crate::context::{document_ref, emit, CallerArgs, Session};

/// Arguments for the parcel subcommand.
#[derive(Args, Debug)]
pub struct ParcelArgs {
    #[command(subcommand)]
    command: ParcelCommand,
}

#[derive(Subcommand, Debug)]
enum ParcelCommand {
    /// Register a new parcel (agent or admin caller).
    Register {
        /// Folio number (NSW-XXX-YYYY-NNN).
        #[arg(long)]
        folio: String,
        /// Initial owner identity.
        #[arg(long)]
        owner: String,
        /// Term expiry (ISO8601, Z suffix).
        #[arg(long)]
        expiry: String,
        /// Documents as kind:path, repeatable.
        #[arg(long = "document", required = true)]
        documents: Vec<String>,
        #[command(flatten)]
        caller: CallerArgs,
    },
    /// Show one parcel.
    Show {
        /// Folio number.
        #[arg(long)]
        folio: String,
    },
    /// List parcels, optionally filtered by owner.
    List {
        /// Filter by owner identity.
        #[arg(long)]
        owner: Option<String>,
    },
    /// Administrative status change.
    SetStatus {
        /// Folio number.
        #[arg(long)]
        folio: String,
        /// Target status (pending, active, expired, transferred).
        #[arg(long)]
        status: String,
        #[command(flatten)]
        caller: CallerArgs,
    },
    /// Report active parcels whose term has lapsed.
    Sweep {
        /// Clock override (ISO8601, Z suffix); defaults to now.
        #[arg(long)]
        now: Option<String>,
    },
}

/// Dispatch the parcel subcommand.
pub fn run(args: ParcelArgs, state: &Path) -> Result<()> {
    let session = Session::open(state)?;
    let registry = ParcelRegistry::new(&session.store);

    match args.command {
        ParcelCommand::Register {
            folio,
            owner,
            expiry,
            documents,
            caller,
        } => {
            let parcel = registry.register(
                &caller.resolve()?,
                FolioNumber::parse(&folio)?,
                Identity::parse(&owner)?,
                Timestamp::parse(&expiry)?,
                document_ref(&documents)?,
                serde_json::Map::new(),
            )?;
            session.sync.drain(&session.store);
            session.save()?;
            emit(&parcel)
        }
        ParcelCommand::Show { folio } => emit(&registry.get(&FolioNumber::parse(&folio)?)?),
        ParcelCommand::List { owner } => match owner {
            Some(owner) => emit(&registry.parcels_of_owner(&Identity::parse(&owner)?)),
            None => emit(&registry.list()),
        },
        ParcelCommand::SetStatus {
            folio,
            status,
            caller,
        } => {
            let parcel = registry.set_status(
                &caller.resolve()?,
                &FolioNumber::parse(&folio)?,
                parse_status(&status)?,
            )?;
            session.save()?;
            emit(&parcel)
        }
        ParcelCommand::Sweep { now } => {
            let now = match now {
                Some(s) => Timestamp::parse(&s)?,
                None => Timestamp::now(),
            };
            emit(&registry.scan_expired(now))
        }
    }
}

fn parse_status(s: &str) -> Result<ParcelStatus> {
    Ok(match s {
        "pending" => ParcelStatus::Pending,
        "active" => ParcelStatus::Active,
        "expired" => ParcelStatus::Expired,
        "transferred" => ParcelStatus::Transferred,
        other => bail!("unknown parcel status {other:?}"),
    })
}
