//! Current-format (.stat) file parsing
//!
//! A `.stat` file opens with a column-name line followed by one record per
//! line. The header variant is sniffed from the column names and every data
//! line is normalized to the full 24-field header, with the `NA` sentinel
//! materialized at the documented indices for the short variants.

use std::path::Path;

use tracing::warn;

use super::classify::detect_header_variant;
use super::stats::ParseStats;
use crate::app::models::{HeaderVariant, ParsedRecord};
use crate::constants::{DESCR_INDEX, FCST_UNITS_INDEX, MISSING_NA, OBS_UNITS_INDEX};
use crate::{Error, Result};

/// Result of parsing one current-format file
#[derive(Debug, Clone)]
pub struct CurrentParseResult {
    /// Detected header variant
    pub variant: HeaderVariant,

    /// Successfully parsed records, in file order
    pub records: Vec<ParsedRecord>,

    /// Parsing statistics
    pub stats: ParseStats,
}

/// Parse a current-format statistics file into positional records
pub async fn parse_stat_file(path: &Path) -> Result<CurrentParseResult> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::io(format!("Failed to read '{}'", path.display()), e))?;

    let mut lines = content.lines().enumerate();

    let (_, header_line) = lines
        .next()
        .ok_or_else(|| Error::file_format(path.display().to_string(), "File is empty"))?;
    let variant = detect_header_variant(header_line);

    let mut records = Vec::new();
    let mut stats = ParseStats::new();

    for (index, line) in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        stats.total_lines += 1;
        let line_num = index + 1;

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < variant.field_count() {
            warn!(
                "Skipping line {} of '{}': {} tokens, {} header fields required",
                line_num,
                path.display(),
                tokens.len(),
                variant.field_count()
            );
            stats.lines_skipped += 1;
            stats
                .errors
                .push(format!("line {}: too few header tokens", line_num));
            continue;
        }

        let header = normalize_header(&tokens[..variant.field_count()], variant);
        let data = tokens[variant.field_count()..]
            .iter()
            .map(|t| Some((*t).to_string()))
            .collect();

        records.push(ParsedRecord {
            header,
            data,
            line_num,
        });
        stats.records_parsed += 1;
    }

    Ok(CurrentParseResult {
        variant,
        records,
        stats,
    })
}

/// Expand a variant's header tokens to the full 24-field shape
///
/// Missing columns are materialized with the `NA` sentinel at their canonical
/// positions, in ascending index order so later insertions see final indices.
fn normalize_header(tokens: &[&str], variant: HeaderVariant) -> Vec<String> {
    let mut header: Vec<String> = tokens.iter().map(|t| (*t).to_string()).collect();

    match variant {
        HeaderVariant::Short => {
            header.insert(DESCR_INDEX, MISSING_NA.to_string());
            header.insert(FCST_UNITS_INDEX, MISSING_NA.to_string());
            header.insert(OBS_UNITS_INDEX, MISSING_NA.to_string());
        }
        HeaderVariant::Mid => {
            header.insert(FCST_UNITS_INDEX, MISSING_NA.to_string());
            header.insert(OBS_UNITS_INDEX, MISSING_NA.to_string());
        }
        HeaderVariant::Long => {}
    }

    header
}
