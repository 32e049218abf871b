//! CSV staging sink for the relational path
//!
//! Writes one staging file per (table, worker), named `{table}_{worker}.csv`,
//! with the ordered column list as the header row. The files mirror a bulk
//! load flow: each table's rows can be loaded wholesale once the run ends.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::app::models::{CanonicalRecord, ObjectFileData, ObjectKind};
use crate::constants::{OBJECT_CTS_TABLE, OBJECT_OBJ_TABLE};
use crate::{Error, Result};

use super::{TableSink, relational_columns, relational_row, staged_value};

/// CSV staging sink; one instance per worker
pub struct CsvStagingSink {
    staging_dir: PathBuf,
    worker_id: usize,
    writers: HashMap<String, csv::Writer<File>>,
}

impl CsvStagingSink {
    pub fn new(staging_dir: &Path, worker_id: usize) -> Self {
        Self {
            staging_dir: staging_dir.to_path_buf(),
            worker_id,
            writers: HashMap::new(),
        }
    }

    /// Writer for one staging table, creating the file and header row on
    /// first use
    fn writer_for(&mut self, table: &str, columns: &[String]) -> Result<&mut csv::Writer<File>> {
        if !self.writers.contains_key(table) {
            let path = self
                .staging_dir
                .join(format!("{}_{}.csv", table, self.worker_id));
            let file = File::create(&path).map_err(|e| {
                Error::io(format!("Failed to create staging file '{}'", path.display()), e)
            })?;
            let mut writer = csv::Writer::from_writer(file);
            writer.write_record(columns)?;
            self.writers.insert(table.to_string(), writer);
        }
        // the entry was just inserted if it was missing
        self.writers
            .get_mut(table)
            .ok_or_else(|| Error::sink_write(format!("No staging writer for '{}'", table)))
    }
}

impl TableSink for CsvStagingSink {
    fn write_records(&mut self, records: &[CanonicalRecord]) -> Result<()> {
        let columns = relational_columns();
        for record in records {
            let table = record.header.line_type.table_name();
            let writer = self.writer_for(&table, &columns)?;
            writer.write_record(&relational_row(record))?;
        }
        Ok(())
    }

    fn write_object_file(&mut self, data: &ObjectFileData) -> Result<()> {
        for record in &data.records {
            let table = match record.kind {
                ObjectKind::Contingency => OBJECT_CTS_TABLE,
                ObjectKind::Pair | ObjectKind::Single => OBJECT_OBJ_TABLE,
            };
            let writer = self.writer_for(table, &data.columns)?;
            let row: Vec<String> = record
                .values
                .iter()
                .map(|v| staged_value(v.as_deref()))
                .collect();
            writer.write_record(&row)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        for writer in self.writers.values_mut() {
            writer.flush().map_err(|e| Error::io("Failed to flush staging file", e))?;
        }
        Ok(())
    }
}
