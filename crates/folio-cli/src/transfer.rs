//! # Transfer Subcommand
//!
//! Deferred request/decide/cancel and immediate execution.

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};

use folio_core::{FolioNumber, Identity};
use folio_workflow::TransferWorkflow;

use crate::context::{document_ref, emit, parse_request_id, CallerArgs, Session};

/// Arguments for the transfer subcommand.
#[derive(Args, Debug)]
pub struct TransferArgs {
    #[command(subcommand)]
    command: TransferCommand,
}

#[derive(Subcommand, Debug)]
enum TransferCommand {
    /// Submit a deferred transfer request.
    Request {
        /// Folio number.
        #[arg(long)]
        folio: String,
        /// Outgoing owner identity.
        #[arg(long)]
        from: String,
        /// Incoming owner identity.
        #[arg(long)]
        to: String,
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
    /// Withdraw a pending request (requester or owner caller).
    Cancel {
        /// Request UUID.
        #[arg(long)]
        request: String,
        #[command(flatten)]
        caller: CallerArgs,
    },
    /// Execute a transfer immediately on self-certifying documents.
    Execute {
        /// Folio number.
        #[arg(long)]
        folio: String,
        /// Incoming owner identity.
        #[arg(long)]
        to: String,
        /// Combined manifest as kind:path, repeatable (process documents
        /// plus the replacement file set).
        #[arg(long = "document", required = true)]
        documents: Vec<String>,
        #[command(flatten)]
        caller: CallerArgs,
    },
}

/// Dispatch the transfer subcommand.
pub fn run(args: TransferArgs, state: &Path) -> Result<()> {
    let session = Session::open(state)?;
    let workflow = TransferWorkflow::new(&session.store, &session.sync);

    match args.command {
        TransferCommand::Request {
            folio,
            from,
            to,
            documents,
            caller,
        } => {
            let request = workflow.request(
                &caller.resolve()?,
                &FolioNumber::parse(&folio)?,
                &Identity::parse(&from)?,
                &Identity::parse(&to)?,
                document_ref(&documents)?,
            )?;
            session.save()?;
            emit(&request)
        }
        TransferCommand::Decide {
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
        TransferCommand::Cancel { request, caller } => {
            let request = workflow.cancel(&caller.resolve()?, parse_request_id(&request)?)?;
            session.save()?;
            emit(&request)
        }
        TransferCommand::Execute {
            folio,
            to,
            documents,
            caller,
        } => {
            let request = workflow.execute_immediate(
                &caller.resolve()?,
                &FolioNumber::parse(&folio)?,
                &Identity::parse(&to)?,
                document_ref(&documents)?,
            )?;
            session.save()?;
            emit(&request)
        }
    }
}
