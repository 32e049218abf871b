//! Command-line argument definitions for the verification-statistics loader

use crate::app::models::LineType;
use crate::config::{Config, LoadFlags, SinkMode, SystemProfile};
use crate::constants::LINE_TYPE_TOKENS;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the verification-statistics loader
///
/// Normalizes forecast-verification output files (current .stat and legacy
/// .vsdb formats plus object-based verification files) into relational
/// staging tables or aggregate JSON documents.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "vxstat-loader",
    version,
    about = "Load forecast-verification statistics files into canonical staging tables or documents",
    long_about = "Normalizes heterogeneous forecast-verification output files into a single \
                  canonical record model. Current-format (.stat) and legacy-format (.vsdb) \
                  statistics files and object-based verification files are discovered \
                  recursively, parsed in parallel, and written either as CSV staging files \
                  for a bulk relational load or as JSON-lines aggregate documents."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the loader
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Load verification files into the configured sinks (main command)
    Load(LoadArgs),
    /// Discover and classify input files without loading them
    Scan(ScanArgs),
}

/// Arguments for the load command
#[derive(Debug, Clone, Parser)]
pub struct LoadArgs {
    /// Input root searched recursively for verification files
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATH",
        help = "Input root searched recursively for verification files"
    )]
    pub input_path: PathBuf,

    /// Output directory for CSV staging files
    ///
    /// Defaults to a staging/ directory under the user cache location.
    #[arg(
        short = 'o',
        long = "staging",
        value_name = "PATH",
        help = "Output directory for CSV staging files"
    )]
    pub staging_dir: Option<PathBuf>,

    /// Output directory for JSON-lines document files
    ///
    /// Defaults to a documents/ directory under the user cache location.
    #[arg(
        long = "documents",
        value_name = "PATH",
        help = "Output directory for JSON-lines document files"
    )]
    pub document_dir: Option<PathBuf>,

    /// Which output path(s) to feed
    #[arg(
        short = 's',
        long = "sink",
        value_enum,
        default_value = "relational",
        help = "Output sink selection"
    )]
    pub sink: SinkArg,

    /// Explicit line-type allow list (comma-separated tokens)
    ///
    /// If not specified, every supported line type is loaded.
    #[arg(
        short = 't',
        long = "line-types",
        value_name = "LIST",
        help = "Comma-separated list of line types to load (e.g. SL1L2,CTC)"
    )]
    pub line_types: Option<LineTypeList>,

    /// Skip current-format (.stat) statistics files
    #[arg(long = "skip-stat", help = "Skip current-format (.stat) files")]
    pub skip_stat: bool,

    /// Skip legacy-format (.vsdb) statistics files
    #[arg(long = "skip-vsdb", help = "Skip legacy-format (.vsdb) files")]
    pub skip_vsdb: bool,

    /// Skip object-based verification files
    #[arg(long = "skip-object", help = "Skip object-based verification files")]
    pub skip_object: bool,

    /// Drop matched-pair (MPR) records
    #[arg(long = "skip-mpr", help = "Drop matched-pair (MPR) records")]
    pub skip_mpr: bool,

    /// Drop observation-rank (ORANK) records
    #[arg(long = "skip-orank", help = "Drop observation-rank (ORANK) records")]
    pub skip_orank: bool,

    /// Number of parallel workers
    ///
    /// Controls how many files are loaded concurrently. Zero sizes the pool
    /// from the detected physical core count.
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        default_value_t = 0,
        help = "Number of parallel workers (0 = auto-detect)"
    )]
    pub workers: usize,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings and hides the progress
    /// bar.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the scan command
#[derive(Debug, Clone, Parser)]
pub struct ScanArgs {
    /// Input root searched recursively for verification files
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATH",
        help = "Input root searched recursively for verification files"
    )]
    pub input_path: PathBuf,

    /// List every discovered file instead of the per-format counts
    #[arg(long = "detailed", help = "List every discovered file")]
    pub detailed: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

/// Sink selection on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SinkArg {
    /// CSV staging files for a bulk relational load
    Relational,
    /// JSON-lines aggregate documents
    Document,
    /// Both staging files and documents
    Both,
}

impl SinkArg {
    /// Map onto the configuration sink mode
    pub fn to_sink_mode(self) -> SinkMode {
        match self {
            SinkArg::Relational => SinkMode::Relational,
            SinkArg::Document => SinkMode::Document,
            SinkArg::Both => SinkMode::Both,
        }
    }
}

/// Wrapper for parsing comma-separated line-type lists
#[derive(Debug, Clone)]
pub struct LineTypeList {
    pub tokens: Vec<String>,
}

impl FromStr for LineTypeList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let tokens: Vec<String> = s
            .split(',')
            .map(|t| t.trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .collect();

        if tokens.is_empty() {
            return Err(Error::configuration(
                "Line-type list cannot be empty".to_string(),
            ));
        }

        for token in &tokens {
            if token.parse::<LineType>().is_err() {
                return Err(Error::configuration(format!(
                    "Unknown line type '{}'. Supported line types: {}",
                    token,
                    LINE_TYPE_TOKENS.join(", ")
                )));
            }
        }

        Ok(LineTypeList { tokens })
    }
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Option<Commands> {
        self.command.clone()
    }
}

impl LoadArgs {
    /// Validate the load command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.input_path.exists() {
            return Err(Error::configuration(format!(
                "Input path does not exist: {}",
                self.input_path.display()
            )));
        }

        if !self.input_path.is_dir() {
            return Err(Error::configuration(format!(
                "Input path is not a directory: {}",
                self.input_path.display()
            )));
        }

        if self.workers > 100 {
            return Err(Error::configuration(
                "Number of workers cannot exceed 100".to_string(),
            ));
        }

        if self.skip_stat && self.skip_vsdb && self.skip_object {
            return Err(Error::configuration(
                "All file families are skipped; nothing to load".to_string(),
            ));
        }

        Ok(())
    }

    /// Build the run configuration from these arguments
    pub fn to_config(&self) -> Config {
        let workers = if self.workers == 0 {
            SystemProfile::detect().recommended_workers()
        } else {
            self.workers
        };

        let flags = LoadFlags {
            load_stat: !self.skip_stat,
            load_vsdb: !self.skip_vsdb,
            load_object: !self.skip_object,
            load_mpr: !self.skip_mpr,
            load_orank: !self.skip_orank,
            line_type_allow: self.line_types.as_ref().map(|list| list.tokens.clone()),
        };

        let mut config = Config::new(self.input_path.clone())
            .with_sink_mode(self.sink.to_sink_mode())
            .with_workers(workers)
            .with_flags(flags);

        if let Some(staging_dir) = &self.staging_dir {
            config = config.with_staging_dir(staging_dir.clone());
        }
        if let Some(document_dir) = &self.document_dir {
            config = config.with_document_dir(document_dir.clone());
        }
        if self.quiet {
            config = config.without_progress();
        }

        config
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl ScanArgs {
    /// Validate the scan command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.input_path.exists() {
            return Err(Error::configuration(format!(
                "Input path does not exist: {}",
                self.input_path.display()
            )));
        }

        if !self.input_path.is_dir() {
            return Err(Error::configuration(format!(
                "Input path is not a directory: {}",
                self.input_path.display()
            )));
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
