//! Aggregate-document builder
//!
//! Groups canonical records sharing a natural key into aggregate documents:
//! a header snapshot from the first record of the group plus one ordered
//! sub-record per occurrence. Records are consumed per processing unit (one
//! file); the unit is sorted into key-contiguous order first so out-of-order
//! input cannot silently split a key. At most one aggregate is open at a
//! time; it is finalized the instant the key changes or the unit ends.

use serde_json::Value;
use tracing::debug;

use crate::app::models::{CanonicalRecord, NaturalKey, StatDocument, SubRecord};
use crate::constants::{DOCUMENT_TS_FORMAT, DOCUMENT_TYPE, MISSING_NA};

#[cfg(test)]
pub mod tests;

/// Streaming aggregator over one processing unit's canonical records
#[derive(Debug, Default)]
pub struct Aggregator {
    open: Option<OpenAggregate>,
    finished: Vec<StatDocument>,

    /// Records whose header fields disagreed with their group's snapshot
    pub header_disagreements: usize,
}

#[derive(Debug)]
struct OpenAggregate {
    key: NaturalKey,
    document: StatDocument,
    // snapshot fields used only for disagreement detection
    fcst_units: String,
}

impl Aggregator {
    pub fn new() -> Self {
        Self {
            open: None,
            finished: Vec::new(),
            header_disagreements: 0,
        }
    }

    /// Aggregate one unit's records into finished documents
    ///
    /// Sorts the unit by natural key (stable, so occurrences keep their
    /// input order within a key), then streams it through the open-aggregate
    /// state machine.
    pub fn build_documents(
        &mut self,
        mut records: Vec<CanonicalRecord>,
        data_file_id: &str,
    ) -> Vec<StatDocument> {
        records.sort_by(|a, b| a.natural_key().cmp(&b.natural_key()));

        for record in &records {
            self.push(record, data_file_id);
        }
        self.finish();

        std::mem::take(&mut self.finished)
    }

    /// Feed one record, finalizing the open aggregate on key change
    fn push(&mut self, record: &CanonicalRecord, data_file_id: &str) {
        let key = record.natural_key();

        let rotate = match &self.open {
            Some(open) => open.key != key,
            None => true,
        };
        if rotate {
            self.finish();
            self.open = Some(OpenAggregate {
                document: new_document(record, &key, data_file_id),
                fcst_units: record.header.fcst_units.clone(),
                key,
            });
        }

        if let Some(open) = self.open.as_mut() {
            // first header wins; later disagreements are only counted
            if open.fcst_units != record.header.fcst_units {
                debug!(
                    "Header disagreement within {}: fcst_units '{}' vs '{}'",
                    open.document.id, open.fcst_units, record.header.fcst_units
                );
                self.header_disagreements += 1;
            }
            open.document.data.push(sub_record(record));
        }
    }

    /// Finalize the open aggregate, if any
    fn finish(&mut self) {
        if let Some(open) = self.open.take() {
            self.finished.push(open.document);
        }
    }
}

fn new_document(record: &CanonicalRecord, key: &NaturalKey, data_file_id: &str) -> StatDocument {
    let header = &record.header;
    StatDocument {
        id: key.document_id(),
        doc_type: DOCUMENT_TYPE.to_string(),
        data_type: record.kind.data_type_label(),
        data_file_id: data_file_id.to_string(),
        version: header.version.clone(),
        model: header.model.clone(),
        geo_location_id: header.vx_mask.clone(),
        obtype: header.obtype.clone(),
        fcst_valid_beg: header.fcst_valid_beg.format(DOCUMENT_TS_FORMAT).to_string(),
        fcst_var: header.fcst_var.clone(),
        fcst_units: header.fcst_units.clone(),
        fcst_lev: header.fcst_lev.clone(),
        data: Vec::new(),
    }
}

/// One per-occurrence sub-record: fcst_lead plus the named data fields in
/// registry order, null for fields lost to truncation
fn sub_record(record: &CanonicalRecord) -> SubRecord {
    let mut fields = serde_json::Map::new();
    for (i, name) in record.source_fields.iter().enumerate() {
        let value = record
            .source_data
            .get(i)
            .and_then(|v| v.as_deref())
            .map(token_value)
            .unwrap_or(Value::Null);
        fields.insert((*name).to_string(), value);
    }

    SubRecord {
        fcst_lead: record.header.fcst_lead.to_string(),
        fields,
    }
}

/// Numeric tokens become JSON numbers; the missing sentinel becomes null
fn token_value(token: &str) -> Value {
    if token == MISSING_NA {
        return Value::Null;
    }
    match token.parse::<f64>() {
        Ok(value) => serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(token.to_string())),
        Err(_) => Value::String(token.to_string()),
    }
}
