//! # Renewal Subcommand
//!
//! Term extension requests and decisions.

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};

use folio_core::{FolioNumber, Timestamp};
use folio_workflow::RenewalWorkflow;

use crate::context::{document_ref, emit, parse_request_id, CallerArgs, Session};

/// Arguments for the renewal subcommand.
#[derive(Args, Debug)]
pub struct RenewalArgs {
    #[command(subcommand)]
    command: RenewalCommand,
}

#[derive(Subcommand, Debug)]
enum RenewalCommand {
    /// Submit a renewal request.
    Request {
        /// Folio number.
        #[arg(long)]
        folio: String,
        /// Requested new expiry (ISO8601, Z suffix); must extend the
        /// current term.
        #[arg(long)]
        new_expiry: String,
        /// Requester's stated reason.
        #[arg(long)]
        reason: String,
        /// Documents as kind:path, repeatable.
        #[arg(long = "document", required = true)]
        documents: Vec<String>,
        #[command(flatten)]
        caller: CallerArgs,
    },
    /// Approve or reject a pending request (admin caller).
    Decide {
        /// Request UUID.
        #[arg(long)]
        request: String,
        /// Approve instead of reject.
        #[arg(long)]
        approve: bool,
        /// Decision reason.
        #[arg(long)]
        reason: Option<String>,
        #[command(flatten)]
        caller: CallerArgs,
    },
}

/// Dispatch the renewal subcommand.
pub fn run(args: RenewalArgs, state: &Path) -> Result<()> {
    let session = Session::open(state)?;
    let workflow = RenewalWorkflow::new(&session.store, &session.sync);

    match args.command {
        RenewalCommand::Request {
            folio,
            new_expiry,
            reason,
            documents,
            caller,
        } => {
            let request = workflow.request(
                &caller.resolve()?,
                &FolioNumber::parse(&folio)?,
                Timestamp::parse(&new_expiry)?,
                reason,
                document_ref(&documents)?,
            )?;
            session.save()?;
            emit(&request)
        }
        RenewalCommand::Decide {
            request,
            approve,
            reason,
            caller,
        } => {
            let request =
                workflow.decide(&caller.resolve()?, parse_request_id(&request)?, approve, reason)?;
            session.save()?;
            emit(&request)
        }
    }
}
