//! Object-based verification file parsing
//!
//! Contingency (`cts.txt`) and attribute (`obj.txt`) files carry their own
//! column-name line, so columns are dynamic. Column names are lowercased,
//! historical gaps are materialized at their documented positions, and the
//! percentile column following `intensity_90` is renamed to a stable name.

use std::path::Path;

use tracing::warn;

use super::stats::ParseStats;
use crate::app::models::{FileFormat, ObjectFileData, ObjectKind, ObjectRecord};
use crate::constants::{
    ASPECT_DIFF, CURV_RATIO, DESCR, FCST_UNITS, GRID_RES, INTENSITY_90, INTENSITY_NN, MISSING_NA,
    MISSING_VALUE, N_VALID, OBS_UNITS,
};
use crate::{Error, Result};

/// Result of parsing one object-based verification file
#[derive(Debug, Clone)]
pub struct ObjectParseResult {
    pub data: ObjectFileData,
    pub stats: ParseStats,
}

/// Parse an object-based verification file into dynamic-column records
pub async fn parse_object_file(
    path: &Path,
    format: FileFormat,
    file_row: usize,
) -> Result<ObjectParseResult> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::io(format!("Failed to read '{}'", path.display()), e))?;

    let mut lines = content.lines().enumerate();
    let (_, header_line) = lines
        .next()
        .ok_or_else(|| Error::file_format(path.display().to_string(), "File is empty"))?;

    let mut columns: Vec<String> = header_line
        .split_whitespace()
        .map(|c| {
            let c = c.to_lowercase();
            // the file names this column "desc"; canonical name is "descr"
            if c == "desc" { DESCR.to_string() } else { c }
        })
        .collect();
    rename_intensity_column(&mut columns);
    let insertions = missing_column_insertions(&columns);

    for (position, name, _) in &insertions {
        if *position <= columns.len() {
            columns.insert(*position, (*name).to_string());
        } else {
            columns.push((*name).to_string());
        }
    }

    let object_id_index = columns.iter().position(|c| c == "object_id");

    let mut records = Vec::new();
    let mut stats = ParseStats::new();

    for (index, line) in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        stats.total_lines += 1;
        let line_num = index + 1;

        let mut values: Vec<Option<String>> = line
            .split_whitespace()
            .map(|t| Some(t.to_string()))
            .collect();
        if values.is_empty() {
            continue;
        }

        for (position, _, fill) in &insertions {
            if *position <= values.len() {
                values.insert(*position, fill.clone());
            } else {
                values.push(fill.clone());
            }
        }
        if values.len() > columns.len() {
            warn!(
                "Line {} of '{}' carries {} values for {} columns, truncating",
                line_num,
                path.display(),
                values.len(),
                columns.len()
            );
            values.truncate(columns.len());
        }
        values.resize(columns.len(), None);

        let kind = classify_record(format, object_id_index, &values);
        records.push(ObjectRecord {
            kind,
            values,
            line_num,
        });
        stats.records_parsed += 1;
    }

    Ok(ObjectParseResult {
        data: ObjectFileData {
            columns,
            records,
            file_row,
        },
        stats,
    })
}

/// The percentile after intensity_90 varies by configuration; give it a
/// stable name
fn rename_intensity_column(columns: &mut [String]) {
    if let Some(position) = columns.iter().position(|c| c == INTENSITY_90) {
        if let Some(next) = columns.get_mut(position + 1) {
            *next = INTENSITY_NN.to_string();
        }
    }
}

/// Plan the insertions that bring a historical header up to the full column
/// set, in ascending position order
fn missing_column_insertions(columns: &[String]) -> Vec<(usize, &'static str, Option<String>)> {
    let mut insertions: Vec<(usize, &'static str, Option<String>)> = Vec::new();

    let has = |name: &str| columns.iter().any(|c| c == name);

    if !has(N_VALID) {
        insertions.push((2, N_VALID, None));
    }
    if !has(GRID_RES) {
        insertions.push((3, GRID_RES, None));
    }
    if !has(DESCR) {
        insertions.push((4, DESCR, Some(MISSING_NA.to_string())));
    }
    if !has(FCST_UNITS) {
        insertions.push((16, FCST_UNITS, Some(MISSING_NA.to_string())));
    }
    if !has(OBS_UNITS) {
        insertions.push((19, OBS_UNITS, Some(MISSING_NA.to_string())));
    }
    if !has(ASPECT_DIFF) {
        insertions.push((columns.len() + insertions.len(), ASPECT_DIFF, Some(MISSING_VALUE.to_string())));
    }
    if !has(CURV_RATIO) {
        insertions.push((columns.len() + insertions.len(), CURV_RATIO, Some(MISSING_VALUE.to_string())));
    }

    insertions
}

/// Tag a record as contingency, paired-object, or single-object
fn classify_record(
    format: FileFormat,
    object_id_index: Option<usize>,
    values: &[Option<String>],
) -> ObjectKind {
    if format == FileFormat::ObjectCts {
        return ObjectKind::Contingency;
    }

    let object_id = object_id_index
        .and_then(|i| values.get(i))
        .and_then(|v| v.as_deref())
        .unwrap_or("");
    if object_id.contains('_') {
        ObjectKind::Pair
    } else {
        ObjectKind::Single
    }
}
