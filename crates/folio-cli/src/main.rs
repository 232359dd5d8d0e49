//! # folio CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use std::path::PathBuf;

use clap::Parser;

/// Folio Registry Stack CLI — land parcel register toolchain.
///
/// Registers parcels, manages agent authorizations, runs the transfer and
/// renewal workflows, and mirrors committed facts to the ledger.
#[derive(Parser, Debug)]
#[command(name = "folio", version, about)]
struct Cli {
    /// Path to the JSON state file.
    #[arg(long, global = true, default_value = "folio-registry.json")]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Parcel registration, lookup, status, and the expiry sweep.
    Parcel(folio_cli::parcel::ParcelArgs),
    /// Agent grants and directory queries.
    Agent(folio_cli::agent::AgentArgs),
    /// Transfer workflow: request, decide, cancel, execute.
    Transfer(folio_cli::transfer::TransferArgs),
    /// Renewal workflow: request, decide.
    Renewal(folio_cli::renewal::RenewalArgs),
    /// Oversight queries and ledger sync.
    Admin(folio_cli::admin::AdminArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parcel(args) => folio_cli::parcel::run(args, &cli.state),
        Commands::Agent(args) => folio_cli::agent::run(args, &cli.state),
        Commands::Transfer(args) => folio_cli::transfer::run(args, &cli.state),
        Commands::Renewal(args) => folio_cli::renewal::run(args, &cli.state),
        Commands::Admin(args) => folio_cli::admin::run(args, &cli.state),
    }
}
