//! Test fixtures for transform-engine testing

use crate::app::models::{LegacyRecord, ParsedRecord};

mod legacy_tests;

/// Build a full 24-field parsed record for the given line type and data
pub fn make_parsed(line_type: &str, data: &[&str]) -> ParsedRecord {
    let header = vec![
        "V8.0".to_string(),
        "GFS".to_string(),
        "NA".to_string(),
        "120000".to_string(),
        "20190601_120000".to_string(),
        "20190601_120000".to_string(),
        "000000".to_string(),
        "20190601_120000".to_string(),
        "20190601_120000".to_string(),
        "TMP".to_string(),
        "K".to_string(),
        "P500".to_string(),
        "TMP".to_string(),
        "K".to_string(),
        "P500".to_string(),
        "ANALYS".to_string(),
        "G2".to_string(),
        "NEAREST".to_string(),
        "1".to_string(),
        "NA".to_string(),
        "NA".to_string(),
        "NA".to_string(),
        "NA".to_string(),
        line_type.to_string(),
    ];
    ParsedRecord {
        header,
        data: data.iter().map(|t| Some((*t).to_string())).collect(),
        line_num: 2,
    }
}

/// Build a legacy record for the given line-type token, model, and data
pub fn make_legacy(line_type_token: &str, model: &str, data: &[&str]) -> LegacyRecord {
    LegacyRecord {
        version: "V01".to_string(),
        model: model.to_string(),
        fcst_lead: "12".to_string(),
        fcst_valid_beg: "2019060112".to_string(),
        obtype: "ANLYS".to_string(),
        vx_mask: "G2".to_string(),
        line_type_token: line_type_token.to_string(),
        fcst_var: "TMP".to_string(),
        fcst_lev: "P500".to_string(),
        embedded_threshold: None,
        data: data.iter().map(|t| (*t).to_string()).collect(),
        line_num: 1,
    }
}
