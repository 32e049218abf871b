//! Command implementations for the verification-statistics loader CLI
//!
//! Each command is implemented in its own module; shared logging and
//! progress-bar helpers live in [`shared`].

pub mod load;
pub mod scan;
pub mod shared;

use tokio_util::sync::CancellationToken;

use crate::cli::args::{Args, Commands};
use crate::{Error, Result};

/// Main command runner
///
/// Dispatches to the appropriate subcommand handler based on CLI args:
/// - `load`: discover verification files and run the parallel load
/// - `scan`: discover and classify input files without loading them
pub async fn run(args: Args, cancellation_token: CancellationToken) -> Result<()> {
    match args.get_command() {
        Some(Commands::Load(load_args)) => {
            load::run_load_command(load_args, cancellation_token).await
        }
        Some(Commands::Scan(scan_args)) => scan::run_scan(scan_args).await,
        None => Err(Error::configuration(
            "No command specified; use --help for usage".to_string(),
        )),
    }
}
