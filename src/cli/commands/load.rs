//! Load command: discover verification files and run the parallel load

use colored::*;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::app::services::loader::{LoadSummary, discover_files, run_load};
use crate::cli::args::LoadArgs;
use crate::cli::commands::shared::{create_progress_bar, setup_logging};
use crate::config::Config;
use crate::{Error, Result};

/// Run the load command
pub async fn run_load_command(
    args: LoadArgs,
    cancellation_token: CancellationToken,
) -> Result<()> {
    args.validate()?;
    setup_logging(args.get_log_level(), args.quiet)?;

    let config = args.to_config();
    config.validate()?;
    config.ensure_output_directories()?;

    info!(
        "Loading verification files from {}",
        config.input_path.display()
    );

    let files = discover_files(&config)?;
    if files.is_empty() {
        return Err(Error::configuration(format!(
            "No loadable verification files found under: {}",
            config.input_path.display()
        )));
    }

    let progress = if args.show_progress() {
        Some(create_progress_bar(
            files.len() as u64,
            "Loading verification files...",
        ))
    } else {
        None
    };

    let summary = run_load(&config, files, cancellation_token, progress).await?;

    if !args.quiet {
        print_summary(&summary, &config);
    }

    Ok(())
}

/// Print the run summary to stdout
fn print_summary(summary: &LoadSummary, config: &Config) {
    println!("\n{}", "Load Summary".bright_green().bold());
    println!(
        "  {} {:.2}s",
        "Time elapsed:".bright_cyan(),
        summary.duration.as_secs_f64()
    );
    println!(
        "  {} {}",
        "Files processed:".bright_cyan(),
        summary.files_processed.to_string().bright_white()
    );
    if summary.files_failed > 0 {
        println!(
            "  {} {}",
            "Files failed:".bright_red(),
            summary.files_failed.to_string().bright_red().bold()
        );
    }
    println!(
        "  {} {}",
        "Records loaded:".bright_cyan(),
        summary.records_loaded.to_string().bright_white().bold()
    );
    if summary.records_filtered > 0 {
        println!(
            "  {} {}",
            "Records filtered:".bright_cyan(),
            summary.records_filtered.to_string().bright_white()
        );
    }
    if summary.records_failed > 0 {
        println!(
            "  {} {}",
            "Records dropped:".bright_red(),
            summary.records_failed.to_string().bright_red()
        );
    }
    if summary.object_records > 0 {
        println!(
            "  {} {}",
            "Object records:".bright_cyan(),
            summary.object_records.to_string().bright_white()
        );
    }
    if config.sink_mode.writes_documents() {
        println!(
            "  {} {}",
            "Documents written:".bright_cyan(),
            summary.documents_written.to_string().bright_white().bold()
        );
    }
    if summary.header_disagreements > 0 {
        println!(
            "  {} {}",
            "Header disagreements:".bright_yellow(),
            summary.header_disagreements.to_string().bright_white()
        );
    }
    println!(
        "  {} {:.1}%",
        "Line success rate:".bright_cyan(),
        summary.stats.success_rate()
    );

    if config.sink_mode.writes_tables() {
        println!(
            "  {} {}",
            "Staging directory:".bright_cyan(),
            config.staging_dir.display()
        );
    }
    if config.sink_mode.writes_documents() {
        println!(
            "  {} {}",
            "Document directory:".bright_cyan(),
            config.document_dir.display()
        );
    }
}
