//! Tests for the sink adapters

use tempfile::TempDir;

use crate::app::services::document_builder::Aggregator;
use crate::app::services::record_transformer::CurrentTransformer;
use crate::app::services::record_transformer::tests::make_parsed;
use crate::app::services::sink_writer::{
    CsvStagingSink, DocumentSink, JsonlDocumentSink, MemoryDocumentSink, MemoryTableSink,
    TableSink, relational_columns, staged_value,
};
use crate::constants::DATA_SLOT_COUNT;

fn sample_records() -> Vec<crate::app::models::CanonicalRecord> {
    let mut transformer = CurrentTransformer::new();
    vec![
        transformer
            .transform(&make_parsed("CTC", &["100", "20", "30", "10", "40"]), 0)
            .unwrap(),
        transformer
            .transform(
                &make_parsed("SL1L2", &["10", "1", "2", "3", "4", "5", "6"]),
                0,
            )
            .unwrap(),
    ]
}

#[test]
fn test_relational_columns_shape() {
    let columns = relational_columns();
    assert_eq!(columns.len(), 24 + 4 + DATA_SLOT_COUNT);
    assert_eq!(columns[0], "version");
    assert_eq!(columns[23], "line_type");
    assert_eq!(columns[24], "fcst_lead_hr");
    assert_eq!(columns[28], "0");
    assert_eq!(columns[123], "95");
}

#[test]
fn test_staged_value_sentinels() {
    assert_eq!(staged_value(None), "-9999");
    assert_eq!(staged_value(Some("NA")), "-9999");
    assert_eq!(staged_value(Some("1.5")), "1.5");
}

#[test]
fn test_memory_sink_groups_by_table() {
    let mut sink = MemoryTableSink::new();
    sink.write_records(&sample_records()).unwrap();

    assert_eq!(sink.rows["line_data_ctc"].len(), 1);
    assert_eq!(sink.rows["line_data_sl1l2"].len(), 1);
    assert_eq!(sink.row_count(), 2);

    let row = &sink.rows["line_data_ctc"][0];
    assert_eq!(row.len(), relational_columns().len());
    assert_eq!(row[0], "V8.0");
    assert_eq!(row[23], "CTC");
    assert_eq!(row[24], "12"); // fcst_lead_hr
    assert_eq!(row[25], "2019-06-01 00:00:00"); // fcst_init_beg
    assert_eq!(row[28], "100");
    // unpopulated slots stage as the sentinel
    assert_eq!(row[33], "-9999");
}

#[test]
fn test_csv_staging_writes_one_file_per_table_and_worker() {
    let dir = TempDir::new().unwrap();
    let mut sink = CsvStagingSink::new(dir.path(), 2);
    sink.write_records(&sample_records()).unwrap();
    sink.flush().unwrap();

    let ctc = std::fs::read_to_string(dir.path().join("line_data_ctc_2.csv")).unwrap();
    let mut lines = ctc.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("version,model,descr,"));
    let row = lines.next().unwrap();
    assert!(row.starts_with("V8.0,GFS,"));
    assert!(dir.path().join("line_data_sl1l2_2.csv").exists());
}

#[test]
fn test_jsonl_sink_appends_documents() {
    let records = sample_records();
    let mut aggregator = Aggregator::new();
    let documents = aggregator.build_documents(records, "f.stat");

    let dir = TempDir::new().unwrap();
    let mut sink = JsonlDocumentSink::new(dir.path(), 0).unwrap();
    sink.write_documents(&documents).unwrap();
    sink.flush().unwrap();

    let content = std::fs::read_to_string(dir.path().join("documents_0.jsonl")).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), documents.len());

    let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(parsed["type"], "DataDocument");
    assert!(parsed["id"].as_str().unwrap().starts_with("DD::"));
    assert!(parsed["data"].is_array());
}

#[test]
fn test_memory_document_sink_upserts_by_id() {
    let records = sample_records();
    let mut aggregator = Aggregator::new();
    let documents = aggregator.build_documents(records, "f.stat");

    let mut sink = MemoryDocumentSink::new();
    sink.write_documents(&documents).unwrap();
    // a second write of the same ids replaces, not duplicates
    sink.write_documents(&documents).unwrap();
    assert_eq!(sink.documents.len(), documents.len());
}
