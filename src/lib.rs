//! Verification Statistics Loader Library
//!
//! A Rust library for normalizing heterogeneous forecast-verification output
//! files into a single canonical tabular record model, loaded either row-wise
//! into relational staging tables or aggregated into hierarchical documents.
//!
//! This library provides tools for:
//! - Classifying input files by extension into the current (.stat) and legacy
//!   (.vsdb) statistics families plus object-based verification files
//! - Parsing positional whitespace-separated lines, tolerating the truncated
//!   records that are common in legacy files
//! - Canonicalizing every record kind into a fixed-width column set, including
//!   the per-line-type numeric derivations the legacy bridge requires
//! - Grouping canonical records by their natural composite key into aggregate
//!   documents (header plus ordered per-lead sub-records)
//! - Writing CSV staging files for bulk relational loads or JSON-lines
//!   document output for upsert-style document stores
//! - Comprehensive error handling and recovery

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod document_builder;
        pub mod line_parser;
        pub mod loader;
        pub mod record_transformer;
        pub mod sink_writer;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{CanonicalRecord, FileFormat, LineType, NaturalKey, StatDocument};
pub use config::Config;

/// Result type alias for the verification statistics loader
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for verification-statistics loading operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Input file cannot be used (unreadable, empty, or unrecognized format)
    #[error("File error for '{file}': {message}")]
    FileFormat { file: String, message: String },

    /// A physical line could not be parsed into its mandatory identity fields
    #[error("Line parse error in '{file}' line {line}: {message}")]
    LineParse {
        file: String,
        line: usize,
        message: String,
    },

    /// A per-record numeric derivation failed
    #[error("Derivation error for {line_type} record: {message}")]
    Derivation { line_type: String, message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Date/time parsing error
    #[error("Date/time parsing error: {message}")]
    DateTimeParsing {
        message: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Sink write failure (staging CSV or document output)
    #[error("Sink write error: {message}")]
    SinkWrite {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Directory traversal error during input discovery
    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a file format error
    pub fn file_format(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileFormat {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a line parse error
    pub fn line_parse(
        file: impl Into<String>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::LineParse {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a derivation error
    pub fn derivation(line_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Derivation {
            line_type: line_type.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a date/time parsing error
    pub fn datetime_parsing(message: impl Into<String>, source: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: message.into(),
            source,
        }
    }

    /// Create a sink write error without an underlying source
    pub fn sink_write(message: impl Into<String>) -> Self {
        Self::SinkWrite {
            message: message.into(),
            source: None,
        }
    }

    /// Create a directory traversal error
    pub fn directory_traversal(message: impl Into<String>, source: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: message.into(),
            source,
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<chrono::ParseError> for Error {
    fn from(error: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: "Date/time parsing failed".to_string(),
            source: error,
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: "Directory traversal failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::SinkWrite {
            message: "CSV staging write failed".to_string(),
            source: Some(Box::new(error)),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::SinkWrite {
            message: "Document serialization failed".to_string(),
            source: Some(Box::new(error)),
        }
    }
}
