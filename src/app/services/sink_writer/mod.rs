//! Sink adapters for canonical records and aggregate documents
//!
//! The relational path stages one CSV file per (line-type table, worker) for
//! a bulk load; the document path appends JSON lines whose replay order gives
//! last-write-wins upsert semantics. In-memory implementations of both
//! traits back the tests. Every worker owns its own sink instances; nothing
//! is shared.
//!
//! ## Architecture
//!
//! - [`staging`] - CSV staging sink for the relational path
//! - [`document`] - JSON-lines sink for the document path
//! - [`memory`] - In-memory sinks for tests

pub mod document;
pub mod memory;
pub mod staging;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use document::JsonlDocumentSink;
pub use memory::{MemoryDocumentSink, MemoryTableSink};
pub use staging::CsvStagingSink;

use crate::Result;
use crate::app::models::{CanonicalRecord, ObjectFileData, StatDocument, format_numeric};
use crate::constants::{
    CURRENT_HEADER, DATA_SLOT_NAMES, DERIVED_HEADER_COLUMNS, MISSING_NA, MISSING_VALUE,
    STAGING_TS_FORMAT,
};

/// Receives canonical rows for the relational path
pub trait TableSink: Send {
    /// Write one batch of canonical records, grouped into per-line-type tables
    fn write_records(&mut self, records: &[CanonicalRecord]) -> Result<()>;

    /// Write one object-based verification file's records
    fn write_object_file(&mut self, data: &ObjectFileData) -> Result<()>;

    /// Flush buffered output
    fn flush(&mut self) -> Result<()>;
}

/// Receives finished aggregate documents for the document path
pub trait DocumentSink: Send {
    /// Write one batch of finished documents (upsert keyed by document id)
    fn write_documents(&mut self, documents: &[StatDocument]) -> Result<()>;

    /// Flush buffered output
    fn flush(&mut self) -> Result<()>;
}

/// Ordered column list of every canonical staging table: the 24 header
/// fields, the derived fields, then the 96 data slots
pub fn relational_columns() -> Vec<String> {
    CURRENT_HEADER
        .iter()
        .chain(DERIVED_HEADER_COLUMNS.iter())
        .chain(DATA_SLOT_NAMES.iter())
        .map(|c| (*c).to_string())
        .collect()
}

/// Flatten one canonical record into a staging row matching
/// [`relational_columns`]
pub fn relational_row(record: &CanonicalRecord) -> Vec<String> {
    let h = &record.header;
    let mut row = Vec::with_capacity(CURRENT_HEADER.len() + DERIVED_HEADER_COLUMNS.len() + 96);

    row.push(h.version.clone());
    row.push(h.model.clone());
    row.push(h.descr.clone());
    row.push(h.fcst_lead.to_string());
    row.push(h.fcst_valid_beg.format(STAGING_TS_FORMAT).to_string());
    row.push(h.fcst_valid_end.format(STAGING_TS_FORMAT).to_string());
    row.push(h.obs_lead.to_string());
    row.push(h.obs_valid_beg.format(STAGING_TS_FORMAT).to_string());
    row.push(h.obs_valid_end.format(STAGING_TS_FORMAT).to_string());
    row.push(h.fcst_var.clone());
    row.push(h.fcst_units.clone());
    row.push(h.fcst_lev.clone());
    row.push(h.obs_var.clone());
    row.push(h.obs_units.clone());
    row.push(h.obs_lev.clone());
    row.push(h.obtype.clone());
    row.push(h.vx_mask.clone());
    row.push(h.interp_mthd.clone());
    row.push(h.interp_pnts.to_string());
    row.push(h.fcst_thresh.clone());
    row.push(h.obs_thresh.clone());
    row.push(h.cov_thresh.clone());
    row.push(h.alpha.clone());
    row.push(h.line_type.as_str().to_string());

    row.push(h.fcst_lead_hr.to_string());
    row.push(h.fcst_init_beg.format(STAGING_TS_FORMAT).to_string());
    row.push(optional_numeric(h.fcst_perc));
    row.push(optional_numeric(h.obs_perc));

    for slot in record.data.flatten() {
        row.push(staged_value(slot.as_deref()));
    }

    row
}

/// Missing and not-available values both stage as the output sentinel
pub fn staged_value(value: Option<&str>) -> String {
    match value {
        None => MISSING_VALUE.to_string(),
        Some(v) if v == MISSING_NA => MISSING_VALUE.to_string(),
        Some(v) => v.to_string(),
    }
}

fn optional_numeric(value: Option<f64>) -> String {
    match value {
        Some(v) => format_numeric(v),
        None => MISSING_VALUE.to_string(),
    }
}
