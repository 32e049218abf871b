//! Line parser for verification-statistics files
//!
//! This module turns classified input files into positional records. It covers
//! the current fixed-header family, the legacy compact family with its
//! `=`-joined lines and embedded threshold suffixes, and the object-based
//! verification files that carry their own header line.
//!
//! ## Architecture
//!
//! The parser is organized into logical components:
//! - [`classify`] - Header-variant sniffing and line-type token splitting
//! - [`current`] - Current-format (.stat) file parsing
//! - [`legacy`] - Legacy-format (.vsdb) file parsing
//! - [`object`] - Object-based verification file parsing
//! - [`stats`] - Parsing statistics

pub mod classify;
pub mod current;
pub mod legacy;
pub mod object;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use classify::{detect_header_variant, split_line_type_token};
pub use current::{CurrentParseResult, parse_stat_file};
pub use legacy::{LegacyParseResult, parse_vsdb_file};
pub use object::{ObjectParseResult, parse_object_file};
pub use stats::ParseStats;
