//! JSON-lines sink for the document path
//!
//! Appends one document per line to `documents_{worker}.jsonl`. Replaying a
//! file in order into an upsert-capable store gives last-write-wins
//! semantics keyed by the document id.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::app::models::StatDocument;
use crate::{Error, Result};

use super::DocumentSink;

/// JSON-lines document sink; one instance per worker
pub struct JsonlDocumentSink {
    writer: BufWriter<File>,
}

impl JsonlDocumentSink {
    pub fn new(output_dir: &Path, worker_id: usize) -> Result<Self> {
        let path = output_dir.join(format!("documents_{}.jsonl", worker_id));
        let file = File::create(&path).map_err(|e| {
            Error::io(format!("Failed to create document file '{}'", path.display()), e)
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl DocumentSink for JsonlDocumentSink {
    fn write_documents(&mut self, documents: &[StatDocument]) -> Result<()> {
        for document in documents {
            let line = serde_json::to_string(document)?;
            self.writer
                .write_all(line.as_bytes())
                .and_then(|_| self.writer.write_all(b"\n"))
                .map_err(|e| Error::io("Failed to write document line", e))?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| Error::io("Failed to flush document file", e))
    }
}
