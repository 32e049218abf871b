use clap::Parser;
use std::process;
use tokio_util::sync::CancellationToken;
use vxstat_loader::cli::{args::Args, commands};

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Create cancellation token for coordinating graceful shutdown
        let cancellation_token = CancellationToken::new();

        // Set up graceful shutdown handling
        let shutdown_signal = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("Failed to install CTRL+C signal handler: {}", e);
                return;
            }

            // Cancel all operations when Ctrl+C is received
            cancellation_token.cancel();
        };

        // Run the main command with cancellation support
        tokio::select! {
            result = commands::run(args, cancellation_token.clone()) => {
                result
            }
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                Err(vxstat_loader::Error::processing_interrupted(
                    "Load interrupted by user".to_string()
                ))
            }
        }
    });

    match result {
        Ok(()) => {
            // Success - the summary has already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("vxstat-loader - Forecast Verification Statistics Loader");
    println!("=======================================================");
    println!();
    println!("Normalize forecast-verification output files (.stat, .vsdb, and");
    println!("object-based verification files) into canonical staging tables or");
    println!("aggregate JSON documents.");
    println!();
    println!("USAGE:");
    println!("    vxstat-loader <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    load    Load verification files into the configured sinks (main command)");
    println!("    scan    Discover and classify input files without loading them");
    println!("    help    Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Stage everything under a directory for a bulk relational load:");
    println!("    vxstat-loader load --input /data/verification --staging ./staging");
    println!();
    println!("    # Build aggregate documents for selected line types only:");
    println!("    vxstat-loader load --input /data/verification --sink document \\");
    println!("                       --line-types SL1L2,CTC --documents ./documents");
    println!();
    println!("    # Preview what a load would pick up:");
    println!("    vxstat-loader scan --input /data/verification --detailed");
    println!();
    println!("For detailed help on any command, use:");
    println!("    vxstat-loader <COMMAND> --help");
}
