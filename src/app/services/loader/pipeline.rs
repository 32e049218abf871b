//! Per-file processing pipeline
//!
//! One pipeline instance per worker: parse the file, canonicalize every
//! record, apply the record-level load filters, then hand the results to the
//! worker's sinks. Line- and derivation-level failures are logged and
//! counted; they never fail the file.

use tracing::{debug, warn};

use crate::app::models::{CanonicalRecord, DataFileInfo, FileFormat};
use crate::app::services::document_builder::Aggregator;
use crate::app::services::line_parser::{
    ParseStats, parse_object_file, parse_stat_file, parse_vsdb_file,
};
use crate::app::services::record_transformer::{
    CurrentTransformer, DateParser, LegacyTransformer, derive_object_init, ensemble_suffix,
};
use crate::app::services::sink_writer::{DocumentSink, TableSink};
use crate::config::LoadFlags;
use crate::{Error, Result};

/// Outcome of processing one input file
#[derive(Debug, Clone, Default)]
pub struct FileOutcome {
    /// Canonical records written to the sinks
    pub records_loaded: usize,

    /// Records dropped by the line-type load filters
    pub records_filtered: usize,

    /// Records dropped by failed canonical derivation
    pub records_failed: usize,

    /// Aggregate documents written
    pub documents_written: usize,

    /// Object records written (relational path only)
    pub object_records: usize,

    /// Line-level parsing statistics
    pub stats: ParseStats,

    /// Header snapshot disagreements observed during aggregation
    pub header_disagreements: usize,
}

/// Per-worker pipeline: transformers, date cache, and aggregator state
pub struct FilePipeline {
    flags: LoadFlags,
    current: CurrentTransformer,
    legacy: LegacyTransformer,
    dates: DateParser,
    aggregator: Aggregator,
}

impl FilePipeline {
    pub fn new(flags: LoadFlags) -> Self {
        Self {
            flags,
            current: CurrentTransformer::new(),
            legacy: LegacyTransformer::new(),
            dates: DateParser::new(),
            aggregator: Aggregator::new(),
        }
    }

    /// Process one file wholesale into the given sinks
    ///
    /// Statistics files feed whichever sinks are present; object files feed
    /// the relational path only.
    pub async fn process_file(
        &mut self,
        file: &DataFileInfo,
        mut table_sink: Option<&mut dyn TableSink>,
        mut document_sink: Option<&mut dyn DocumentSink>,
    ) -> Result<FileOutcome> {
        let mut outcome = FileOutcome::default();

        match file.format {
            FileFormat::Stat | FileFormat::Vsdb => {
                let records = self.canonicalize_statistics(file, &mut outcome).await?;

                if let Some(sink) = table_sink.as_deref_mut() {
                    sink.write_records(&records)?;
                }

                if let Some(sink) = document_sink.as_deref_mut() {
                    let before = self.aggregator.header_disagreements;
                    let documents = self
                        .aggregator
                        .build_documents(records, &file.file_name());
                    outcome.header_disagreements =
                        self.aggregator.header_disagreements - before;
                    outcome.documents_written = documents.len();
                    sink.write_documents(&documents)?;
                }
            }
            FileFormat::ObjectCts | FileFormat::ObjectObj => {
                let result = parse_object_file(&file.path, file.format, file.file_row).await?;
                outcome.stats = result.stats;

                let mut data = result.data;
                derive_object_init(&mut data, &mut self.dates)?;

                outcome.object_records = data.records.len();
                if let Some(sink) = table_sink.as_deref_mut() {
                    sink.write_object_file(&data)?;
                } else {
                    debug!(
                        "No relational sink configured; object file '{}' produced no output",
                        file.file_name()
                    );
                }
            }
            FileFormat::TimeDomain => {
                return Err(Error::file_format(
                    file.path.display().to_string(),
                    "Time-domain files are recognized but not supported",
                ));
            }
        }

        Ok(outcome)
    }

    /// Parse and canonicalize one statistics file, applying the record-level
    /// load filters
    async fn canonicalize_statistics(
        &mut self,
        file: &DataFileInfo,
        outcome: &mut FileOutcome,
    ) -> Result<Vec<CanonicalRecord>> {
        let mut records = Vec::new();

        match file.format {
            FileFormat::Stat => {
                let result = parse_stat_file(&file.path).await?;
                outcome.stats = result.stats;

                for parsed in &result.records {
                    match self.current.transform(parsed, file.file_row) {
                        Ok(record) => self.filter_record(record, &mut records, outcome),
                        Err(e) => {
                            outcome.records_failed += 1;
                            warn!(
                                "Dropping record at {}:{}: {}",
                                file.file_name(),
                                parsed.line_num,
                                e
                            );
                        }
                    }
                }
            }
            FileFormat::Vsdb => {
                let suffix = ensemble_suffix(&file.path);
                let result = parse_vsdb_file(&file.path).await?;
                outcome.stats = result.stats;

                for parsed in &result.records {
                    match self
                        .legacy
                        .transform(parsed, suffix.as_deref(), file.file_row)
                    {
                        Ok(record) => self.filter_record(record, &mut records, outcome),
                        Err(e) => {
                            outcome.records_failed += 1;
                            warn!(
                                "Dropping record at {}:{}: {}",
                                file.file_name(),
                                parsed.line_num,
                                e
                            );
                        }
                    }
                }
            }
            _ => {}
        }

        outcome.records_loaded = records.len();
        Ok(records)
    }

    fn filter_record(
        &self,
        record: CanonicalRecord,
        records: &mut Vec<CanonicalRecord>,
        outcome: &mut FileOutcome,
    ) {
        if self.flags.allows_line_type(record.header.line_type) {
            records.push(record);
        } else {
            outcome.records_filtered += 1;
        }
    }
}
