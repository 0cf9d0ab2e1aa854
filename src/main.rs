//! bible-fetcher CLI
//!
//! Fetches Bible passages from ChatGPT or BibleGateway via the retrieval
//! server, one concurrent lookup per reference row.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod archive;
mod bundle;
mod error;
mod export;
mod fetch;
mod lookup;
mod parse;
mod schema;

use export::{run_export, ExportArgs};
use fetch::{run_fetch, FetchArgs};

#[derive(Parser)]
#[command(name = "bible-fetcher")]
#[command(version)]
#[command(about = "Fetches Bible passages from ChatGPT or BibleGateway")]
#[command(long_about = "Looks up scripture references against a retrieval server.\n\nCommands:\n  fetch    Look up references (flags, batch file, or stdin)\n  export   Package a saved fetch report as text files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up scripture references
    Fetch(FetchArgs),
    /// Package a saved fetch report as text files
    Export(ExportArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch(args) => run_fetch(args).await,
        Commands::Export(args) => run_export(args).await,
    }
}
