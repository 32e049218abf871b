//! Legacy-format (.vsdb) file parsing
//!
//! Legacy files carry no header line. Each line is 9 identity fields, then an
//! `=` separator, then the data half. The `=` may abut its neighbors, and a
//! negative threshold in the data half can abut the previous number, so the
//! line is repaired before whitespace tokenization.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use super::classify::split_line_type_token;
use super::stats::ParseStats;
use crate::app::models::LegacyRecord;
use crate::constants::LEGACY_HEADER;
use crate::{Error, Result};

/// Result of parsing one legacy-format file
#[derive(Debug, Clone)]
pub struct LegacyParseResult {
    /// Successfully parsed records, in file order
    pub records: Vec<LegacyRecord>,

    /// Parsing statistics
    pub stats: ParseStats,
}

/// Digit-hyphen-digit sequences hide a token boundary before a negative number
fn digit_hyphen_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d)-(\d)").unwrap())
}

/// Parse a legacy-format statistics file into positional records
pub async fn parse_vsdb_file(path: &Path) -> Result<LegacyParseResult> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::io(format!("Failed to read '{}'", path.display()), e))?;

    let mut records = Vec::new();
    let mut stats = ParseStats::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        stats.total_lines += 1;
        let line_num = index + 1;

        let tokens = tokenize_line(line);
        if tokens.len() < LEGACY_HEADER.len() {
            warn!(
                "Skipping line {} of '{}': {} tokens, {} identity fields required",
                line_num,
                path.display(),
                tokens.len(),
                LEGACY_HEADER.len()
            );
            stats.lines_skipped += 1;
            stats
                .errors
                .push(format!("line {}: too few identity tokens", line_num));
            continue;
        }

        let (line_type_token, embedded_threshold) = split_line_type_token(&tokens[6]);

        records.push(LegacyRecord {
            version: tokens[0].clone(),
            model: tokens[1].clone(),
            fcst_lead: tokens[2].clone(),
            fcst_valid_beg: tokens[3].clone(),
            obtype: tokens[4].clone(),
            vx_mask: tokens[5].clone(),
            line_type_token,
            fcst_var: tokens[7].clone(),
            fcst_lev: tokens[8].clone(),
            embedded_threshold,
            data: tokens[9..].to_vec(),
            line_num,
        });
        stats.records_parsed += 1;
    }

    Ok(LegacyParseResult { records, stats })
}

/// Split a legacy line into tokens, repairing the `=` join first
///
/// The identity half and data half are split at the first `=`; digit-hyphen
/// runs in the data half get a space forced before the hyphen so abutted
/// negative numbers separate; the halves are rejoined with a space and
/// whitespace-split.
fn tokenize_line(line: &str) -> Vec<String> {
    let repaired = match line.split_once('=') {
        Some((identity, data)) => {
            let data = digit_hyphen_regex().replace_all(data, "$1 -$2");
            format!("{} {}", identity.trim(), data.trim())
        }
        None => line.to_string(),
    };

    repaired.split_whitespace().map(|t| t.to_string()).collect()
}
