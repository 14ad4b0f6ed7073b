//! Command implementations for the UST importer CLI

pub mod import;
pub mod shared;

use crate::Result;
use crate::app::models::ImportStats;
use crate::cli::args::{Args, Commands};
use tokio_util::sync::CancellationToken;

/// Dispatch the selected subcommand
///
/// The caller (`main`) has already handled the no-subcommand case by
/// showing help.
pub async fn run(args: Args, cancellation_token: CancellationToken) -> Result<ImportStats> {
    match args.command {
        Some(Commands::Import(import_args)) => {
            import::run_import(&import_args, cancellation_token).await
        }
        None => Err(crate::Error::configuration("No command provided")),
    }
}
