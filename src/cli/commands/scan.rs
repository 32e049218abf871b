//! Scan command: discover and classify input files without loading them

use std::collections::BTreeMap;

use colored::*;
use tracing::info;

use crate::app::services::loader::discover_files;
use crate::cli::args::ScanArgs;
use crate::cli::commands::shared::{format_size, setup_logging};
use crate::config::Config;
use crate::Result;

/// Run the scan command
pub async fn run_scan(args: ScanArgs) -> Result<()> {
    args.validate()?;
    setup_logging(args.get_log_level(), false)?;

    let config = Config::new(args.input_path.clone());
    info!("Scanning {}", config.input_path.display());

    let files = discover_files(&config)?;

    println!("{}", "Discovered verification files:".bright_green().bold());

    let mut counts: BTreeMap<&'static str, (usize, u64)> = BTreeMap::new();
    for file in &files {
        let entry = counts.entry(file.format.label()).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += file.size;
    }

    for (label, (count, bytes)) in &counts {
        println!(
            "  {:10} {} files ({})",
            label.bright_cyan(),
            count.to_string().bright_white().bold(),
            format_size(*bytes)
        );
    }

    if files.is_empty() {
        println!("  {}", "(none)".bright_yellow());
    } else if args.detailed {
        println!();
        for file in &files {
            println!(
                "  {:10} {:>10}  {}",
                file.format.label().bright_cyan(),
                format_size(file.size),
                file.path.display()
            );
        }
    }

    println!(
        "\n{} {}",
        "Total:".bright_cyan(),
        files.len().to_string().bright_white().bold()
    );

    Ok(())
}
