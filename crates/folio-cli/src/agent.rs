//! # Agent Subcommand
//!
//! Grant and revoke agent authorizations, and query the directory.

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};

use folio_core::{FolioNumber, Identity};
use folio_registry::AuthorizationDirectory;

use crate::context::{emit, CallerArgs, Session};

/// Arguments for the agent subcommand.
#[derive(Args, Debug)]
pub struct AgentArgs {
    #[command(subcommand)]
    command: AgentCommand,
}

#[derive(Subcommand, Debug)]
enum AgentCommand {
    /// Issue a global grant (admin caller).
    GrantGlobal {
        /// Agent identity.
        #[arg(long)]
        agent: String,
        #[command(flatten)]
        caller: CallerArgs,
    },
    /// Issue a parcel-scoped grant (owner caller).
    Grant {
        /// Folio number.
        #[arg(long)]
        folio: String,
        /// Agent identity.
        #[arg(long)]
        agent: String,
        #[command(flatten)]
        caller: CallerArgs,
    },
    /// Revoke a scoped grant (owner caller; removes the record).
    Revoke {
        /// Folio number.
        #[arg(long)]
        folio: String,
        /// Agent identity.
        #[arg(long)]
        agent: String,
        #[command(flatten)]
        caller: CallerArgs,
    },
    /// Revoke a global grant (admin caller; deactivates the record).
    RevokeGlobal {
        /// Agent identity.
        #[arg(long)]
        agent: String,
        #[command(flatten)]
        caller: CallerArgs,
    },
    /// List an agent's grants, or the parcels it may act on.
    List {
        /// Agent identity.
        #[arg(long)]
        agent: String,
        /// Show coverable parcels instead of grant rows.
        #[arg(long)]
        parcels: bool,
    },
    /// List the grants scoped to one parcel.
    Grants {
        /// Folio number.
        #[arg(long)]
        folio: String,
    },
}

/// Dispatch the agent subcommand.
pub fn run(args: AgentArgs, state: &Path) -> Result<()> {
    let session = Session::open(state)?;
    let directory = AuthorizationDirectory::new(&session.store);

    match args.command {
        AgentCommand::GrantGlobal { agent, caller } => {
            let grant = directory.grant_global(&caller.resolve()?, Identity::parse(&agent)?)?;
            session.save()?;
            emit(&grant)
        }
        AgentCommand::Grant {
            folio,
            agent,
            caller,
        } => {
            let grant = directory.grant_scoped(
                &caller.resolve()?,
                &FolioNumber::parse(&folio)?,
                Identity::parse(&agent)?,
            )?;
            session.save()?;
            emit(&grant)
        }
        AgentCommand::Revoke {
            folio,
            agent,
            caller,
        } => {
            directory.revoke_scoped(
                &caller.resolve()?,
                &FolioNumber::parse(&folio)?,
                &Identity::parse(&agent)?,
            )?;
            session.save()?;
            println!("revoked");
            Ok(())
        }
        AgentCommand::RevokeGlobal { agent, caller } => {
            directory.revoke_global(&caller.resolve()?, &Identity::parse(&agent)?)?;
            session.save()?;
            println!("deactivated");
            Ok(())
        }
        AgentCommand::List { agent, parcels } => {
            let agent = Identity::parse(&agent)?;
            if parcels {
                emit(&directory.parcels_for_agent(&agent))
            } else {
                emit(&directory.grants_for_agent(&agent))
            }
        }
        AgentCommand::Grants { folio } => {
            emit(&directory.grants_for_parcel(&FolioNumber::parse(&folio)?))
        }
    }
}
