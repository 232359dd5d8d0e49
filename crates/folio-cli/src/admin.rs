//! # Admin Subcommand
//!
//! Oversight queries and the ledger sync drain.

use std::path::Path;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};

use folio_core::FolioNumber;
use folio_state::RequestKind;
use folio_workflow::Oversight;

use crate::context::{emit, Session};

/// Arguments for the admin subcommand.
#[derive(Args, Debug)]
pub struct AdminArgs {
    #[command(subcommand)]
    command: AdminCommand,
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// Register-wide totals.
    Stats,
    /// Pending requests of one kind, oldest first.
    Pending {
        /// transfer or renewal.
        #[arg(long)]
        kind: String,
    },
    /// Merged transfer/renewal feed, newest first.
    Activity {
        /// Maximum rows.
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Every request ever raised against one parcel.
    History {
        /// Folio number.
        #[arg(long)]
        folio: String,
    },
    /// Drain pending outbox entries to the ledger and report degraded
    /// entries awaiting reconciliation.
    Sync,
}

/// Dispatch the admin subcommand.
pub fn run(args: AdminArgs, state: &Path) -> Result<()> {
    let session = Session::open(state)?;
    let oversight = Oversight::new(&session.store, &session.sync);

    match args.command {
        AdminCommand::Stats => emit(&oversight.stats()),
        AdminCommand::Pending { kind } => {
            let kind = match kind.as_str() {
                "transfer" => RequestKind::Transfer,
                "renewal" => RequestKind::Renewal,
                other => bail!("unknown request kind {other:?} (expected transfer or renewal)"),
            };
            emit(&oversight.list_pending(kind))
        }
        AdminCommand::Activity { limit } => emit(&oversight.recent_activity(limit)),
        AdminCommand::History { folio } => emit(&oversight.history(&FolioNumber::parse(&folio)?)),
        AdminCommand::Sync => {
            let report = session.sync.drain(&session.store);
            session.save()?;
            println!(
                "synced {} entries, {} degraded",
                report.synced.len(),
                report.degraded.len()
            );
            for entry in session.sync.degraded_entries(&session.store) {
                println!("  degraded seq {}: {}", entry.seq, entry.event.natural_key());
            }
            Ok(())
        }
    }
}
