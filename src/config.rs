//! Configuration management and validation.
//!
//! Provides configuration structures for load runs: input location, sink
//! selection, file and line-type filtering flags, and performance tuning
//! sized from the host via [`SystemProfile`].

use crate::app::models::LineType;
use crate::constants::DEFAULT_PARALLEL_WORKERS;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which output path(s) a load run feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkMode {
    /// CSV staging files for a bulk relational load
    Relational,
    /// JSON-lines aggregate documents
    Document,
    /// Both staging files and documents
    Both,
}

impl SinkMode {
    /// Whether this mode writes relational staging tables
    pub fn writes_tables(&self) -> bool {
        matches!(self, SinkMode::Relational | SinkMode::Both)
    }

    /// Whether this mode writes aggregate documents
    pub fn writes_documents(&self) -> bool {
        matches!(self, SinkMode::Document | SinkMode::Both)
    }
}

/// Load flags filtering the discovered file set and its records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadFlags {
    /// Load current-format (.stat) statistics files
    pub load_stat: bool,

    /// Load legacy-format (.vsdb) statistics files
    pub load_vsdb: bool,

    /// Load object-based verification files
    pub load_object: bool,

    /// Keep matched-pair (MPR) records
    pub load_mpr: bool,

    /// Keep observation-rank (ORANK) records
    pub load_orank: bool,

    /// Explicit allow list of line-type tokens; `None` loads every type
    pub line_type_allow: Option<Vec<String>>,
}

impl Default for LoadFlags {
    fn default() -> Self {
        Self {
            load_stat: true,
            load_vsdb: true,
            load_object: true,
            load_mpr: true,
            load_orank: true,
            line_type_allow: None,
        }
    }
}

impl LoadFlags {
    /// Whether records of `line_type` survive the configured filters
    pub fn allows_line_type(&self, line_type: LineType) -> bool {
        if line_type == LineType::Mpr && !self.load_mpr {
            return false;
        }
        if line_type == LineType::Orank && !self.load_orank {
            return false;
        }
        match &self.line_type_allow {
            Some(allowed) => allowed.iter().any(|t| t == line_type.as_str()),
            None => true,
        }
    }
}

/// Performance tuning for the worker pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceConfig {
    /// Number of parallel workers pulling files from the work queue
    pub parallel_workers: usize,

    /// Show a progress bar over the file count
    pub show_progress: bool,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            parallel_workers: DEFAULT_PARALLEL_WORKERS,
            show_progress: true,
        }
    }
}

/// System profiling information for sizing the worker pool
#[derive(Debug, Clone)]
pub struct SystemProfile {
    /// Number of CPU cores available
    pub cpu_cores: usize,
    /// Total memory in MB
    pub memory_mb: usize,
    /// Physical cores (for systems with efficiency cores)
    pub performance_cores: usize,
}

impl SystemProfile {
    /// Auto-detect system capabilities
    pub fn detect() -> Self {
        use sysinfo::System;

        let cpu_cores = num_cpus::get();
        let performance_cores = num_cpus::get_physical();

        let mut system = System::new();
        system.refresh_memory();
        let memory_mb = (system.total_memory() / 1024 / 1024) as usize;

        Self {
            cpu_cores,
            memory_mb,
            performance_cores,
        }
    }

    /// Worker count sized to the physical cores, clamped to a sane range
    pub fn recommended_workers(&self) -> usize {
        self.performance_cores.clamp(1, 8)
    }
}

/// Global configuration for a load run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory searched recursively for input files
    pub input_path: PathBuf,

    /// Directory receiving CSV staging files
    pub staging_dir: PathBuf,

    /// Directory receiving JSON-lines document files
    pub document_dir: PathBuf,

    /// Which output path(s) to feed
    pub sink_mode: SinkMode,

    /// File and record filtering flags
    pub flags: LoadFlags,

    /// Worker-pool tuning
    pub performance: PerformanceConfig,
}

impl Config {
    /// Configuration for `input_path` with default output locations
    pub fn new(input_path: PathBuf) -> Self {
        let output_root = Self::default_output_root();
        Self {
            input_path,
            staging_dir: output_root.join("staging"),
            document_dir: output_root.join("documents"),
            sink_mode: SinkMode::Relational,
            flags: LoadFlags::default(),
            performance: PerformanceConfig::default(),
        }
    }

    /// Default output root under the user cache directory
    fn default_output_root() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("vxstat-loader")
    }

    /// Set the staging directory
    pub fn with_staging_dir(mut self, staging_dir: PathBuf) -> Self {
        self.staging_dir = staging_dir;
        self
    }

    /// Set the document output directory
    pub fn with_document_dir(mut self, document_dir: PathBuf) -> Self {
        self.document_dir = document_dir;
        self
    }

    /// Set the sink mode
    pub fn with_sink_mode(mut self, sink_mode: SinkMode) -> Self {
        self.sink_mode = sink_mode;
        self
    }

    /// Set the worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.performance.parallel_workers = workers;
        self
    }

    /// Set the load flags
    pub fn with_flags(mut self, flags: LoadFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Disable the progress bar
    pub fn without_progress(mut self) -> Self {
        self.performance.show_progress = false;
        self
    }

    /// Validate the configuration for consistency
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

        if self.performance.parallel_workers == 0 {
            return Err(Error::configuration(
                "Number of workers must be greater than 0".to_string(),
            ));
        }

        if self.performance.parallel_workers > 100 {
            return Err(Error::configuration(
                "Number of workers cannot exceed 100".to_string(),
            ));
        }

        if !self.flags.load_stat && !self.flags.load_vsdb && !self.flags.load_object {
            return Err(Error::configuration(
                "All file families are disabled; nothing to load".to_string(),
            ));
        }

        Ok(())
    }

    /// Create the configured output directories
    pub fn ensure_output_directories(&self) -> Result<()> {
        if self.sink_mode.writes_tables() {
            std::fs::create_dir_all(&self.staging_dir).map_err(|e| {
                Error::io(
                    format!(
                        "Failed to create staging directory '{}'",
                        self.staging_dir.display()
                    ),
                    e,
                )
            })?;
        }
        if self.sink_mode.writes_documents() {
            std::fs::create_dir_all(&self.document_dir).map_err(|e| {
                Error::io(
                    format!(
                        "Failed to create document directory '{}'",
                        self.document_dir.display()
                    ),
                    e,
                )
            })?;
        }
        Ok(())
    }
}
