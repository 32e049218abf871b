//! In-memory sinks backing tests

use std::collections::HashMap;

use crate::Result;
use crate::app::models::{CanonicalRecord, ObjectFileData, ObjectKind, StatDocument};
use crate::constants::{OBJECT_CTS_TABLE, OBJECT_OBJ_TABLE};

use super::{DocumentSink, TableSink, relational_row, staged_value};

/// In-memory relational sink: rows keyed by staging table name
#[derive(Debug, Default)]
pub struct MemoryTableSink {
    pub rows: HashMap<String, Vec<Vec<String>>>,
}

impl MemoryTableSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.rows.values().map(|rows| rows.len()).sum()
    }
}

impl TableSink for MemoryTableSink {
    fn write_records(&mut self, records: &[CanonicalRecord]) -> Result<()> {
        for record in records {
            self.rows
                .entry(record.header.line_type.table_name())
                .or_default()
                .push(relational_row(record));
        }
        Ok(())
    }

    fn write_object_file(&mut self, data: &ObjectFileData) -> Result<()> {
        for record in &data.records {
            let table = match record.kind {
                ObjectKind::Contingency => OBJECT_CTS_TABLE,
                ObjectKind::Pair | ObjectKind::Single => OBJECT_OBJ_TABLE,
            };
            self.rows.entry(table.to_string()).or_default().push(
                record
                    .values
                    .iter()
                    .map(|v| staged_value(v.as_deref()))
                    .collect(),
            );
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// In-memory document sink with upsert semantics keyed by document id
#[derive(Debug, Default)]
pub struct MemoryDocumentSink {
    pub documents: HashMap<String, StatDocument>,
}

impl MemoryDocumentSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentSink for MemoryDocumentSink {
    fn write_documents(&mut self, documents: &[StatDocument]) -> Result<()> {
        for document in documents {
            self.documents
                .insert(document.id.clone(), document.clone());
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
