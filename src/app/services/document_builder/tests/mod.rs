//! Tests for the aggregate-document builder

use serde_json::Value;

use crate::app::services::document_builder::Aggregator;
use crate::app::services::record_transformer::tests::{make_legacy, make_parsed};
use crate::app::services::record_transformer::{CurrentTransformer, LegacyTransformer};
use crate::app::models::CanonicalRecord;

/// A CTC record with the given lead and forecast variable
fn ctc_record(lead: &str, fcst_var: &str, file_row: usize) -> CanonicalRecord {
    let mut parsed = make_parsed("CTC", &["100", "20", "30", "10", "40"]);
    parsed.header[3] = lead.to_string();
    parsed.header[9] = fcst_var.to_string();
    let mut transformer = CurrentTransformer::new();
    transformer.transform(&parsed, file_row).unwrap()
}

#[test]
fn test_key_change_finalizes_aggregate() {
    // three records under one key, then one under another
    let records = vec![
        ctc_record("060000", "TMP", 0),
        ctc_record("120000", "TMP", 0),
        ctc_record("240000", "TMP", 0),
        ctc_record("120000", "UGRD", 0),
    ];

    let mut aggregator = Aggregator::new();
    let documents = aggregator.build_documents(records, "test.stat");

    assert_eq!(documents.len(), 2);
    let tmp_doc = documents.iter().find(|d| d.fcst_var == "TMP").unwrap();
    let ugrd_doc = documents.iter().find(|d| d.fcst_var == "UGRD").unwrap();
    assert_eq!(tmp_doc.data.len(), 3);
    assert_eq!(ugrd_doc.data.len(), 1);

    // sub-records keep input order within the key
    let leads: Vec<&str> = tmp_doc.data.iter().map(|s| s.fcst_lead.as_str()).collect();
    assert_eq!(leads, vec!["60000", "120000", "240000"]);
}

#[test]
fn test_out_of_order_input_does_not_split_a_key() {
    let records = vec![
        ctc_record("060000", "TMP", 0),
        ctc_record("120000", "UGRD", 0),
        ctc_record("120000", "TMP", 0),
    ];

    let mut aggregator = Aggregator::new();
    let documents = aggregator.build_documents(records, "test.stat");

    assert_eq!(documents.len(), 2);
    let tmp_doc = documents.iter().find(|d| d.fcst_var == "TMP").unwrap();
    assert_eq!(tmp_doc.data.len(), 2);
}

#[test]
fn test_document_body_fields() {
    let records = vec![ctc_record("120000", "TMP", 0)];
    let mut aggregator = Aggregator::new();
    let documents = aggregator.build_documents(records, "point_stat.stat");

    let doc = &documents[0];
    assert_eq!(
        doc.id,
        "DD::V8.0::CTC::GFS::G2::TMP::ANALYS::P500::2019-06-01T12:00:00Z"
    );
    assert_eq!(doc.doc_type, "DataDocument");
    assert_eq!(doc.data_type, "STAT_V8.0_CTC");
    assert_eq!(doc.data_file_id, "point_stat.stat");
    assert_eq!(doc.geo_location_id, "G2");
    assert_eq!(doc.fcst_valid_beg, "2019-06-01T12:00:00Z");
}

#[test]
fn test_sub_record_named_fields_and_truncation_nulls() {
    let parsed = make_parsed("CTC", &["100", "20", "30"]);
    let mut transformer = CurrentTransformer::new();
    let record = transformer.transform(&parsed, 0).unwrap();

    let mut aggregator = Aggregator::new();
    let documents = aggregator.build_documents(vec![record], "f.stat");

    let fields = &documents[0].data[0].fields;
    assert_eq!(fields.get("total"), Some(&Value::from(100.0)));
    assert_eq!(fields.get("fy_oy"), Some(&Value::from(20.0)));
    assert_eq!(fields.get("fy_on"), Some(&Value::from(30.0)));
    // fields lost to truncation are null, never omitted
    assert_eq!(fields.get("fn_oy"), Some(&Value::Null));
    assert_eq!(fields.get("fn_on"), Some(&Value::Null));
}

#[test]
fn test_first_header_wins_on_disagreement() {
    let mut first = make_parsed("CTC", &["100", "20", "30", "10", "40"]);
    first.header[10] = "K".to_string();
    let mut second = make_parsed("CTC", &["90", "18", "27", "9", "36"]);
    second.header[3] = "240000".to_string();
    second.header[10] = "C".to_string();

    let mut transformer = CurrentTransformer::new();
    let records = vec![
        transformer.transform(&first, 0).unwrap(),
        transformer.transform(&second, 0).unwrap(),
    ];

    let mut aggregator = Aggregator::new();
    let documents = aggregator.build_documents(records, "f.stat");

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].fcst_units, "K");
    assert_eq!(documents[0].data.len(), 2);
    assert_eq!(aggregator.header_disagreements, 1);
}

#[test]
fn test_legacy_document_identity_is_deterministic() {
    let record = make_legacy("FHO", "GFS", &["100", "0.5", "0.2", "0.3"]);
    let mut transformer = LegacyTransformer::new();

    let first = transformer.transform(&record, None, 0).unwrap();
    let second = transformer.transform(&record, None, 0).unwrap();

    let mut aggregator = Aggregator::new();
    let docs_a = aggregator.build_documents(vec![first], "a.vsdb");
    let docs_b = aggregator.build_documents(vec![second], "a.vsdb");

    assert_eq!(docs_a[0].id, docs_b[0].id);
    assert_eq!(docs_a[0].data_type, "VSDB_V01_CTC");
}
