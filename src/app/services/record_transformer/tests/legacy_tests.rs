//! Tests for legacy bridging, derivations, and slot layouts

use std::path::Path;

use chrono::{TimeZone, Utc};

use super::make_legacy;
use crate::app::models::{DataPayload, LineType};
use crate::app::services::record_transformer::{LegacyTransformer, ensemble_suffix};
use crate::constants::DATA_SLOT_COUNT;

#[test]
fn test_contingency_derivation() {
    let record = make_legacy("FHO", "GFS", &["100", "0.5", "0.2", "0.3"]);
    let mut transformer = LegacyTransformer::new();
    let canonical = transformer.transform(&record, None, 0).unwrap();

    assert_eq!(canonical.header.line_type, LineType::Ctc);
    let flat = canonical.data.flatten();
    assert_eq!(flat[0].as_deref(), Some("100"));
    assert_eq!(flat[1].as_deref(), Some("20")); // hits
    assert_eq!(flat[2].as_deref(), Some("30")); // false alarms
    assert_eq!(flat[3].as_deref(), Some("10")); // misses
    assert_eq!(flat[4].as_deref(), Some("40")); // correct negatives
    // cell counts recompose the total
    let cells: f64 = flat[1..5]
        .iter()
        .map(|v| v.as_deref().unwrap().parse::<f64>().unwrap())
        .sum();
    assert!((cells - 100.0).abs() < 1e-9);
}

#[test]
fn test_contingency_null_observed_rate_is_zero() {
    let record = make_legacy("FHO", "GFS", &["100", "0.5", "0.2"]);
    let mut transformer = LegacyTransformer::new();
    let canonical = transformer.transform(&record, None, 0).unwrap();

    let flat = canonical.data.flatten();
    // oy = 0, so misses go negative of hits and correct negatives absorb
    assert_eq!(flat[1].as_deref(), Some("20"));
    assert_eq!(flat[3].as_deref(), Some("-20"));
}

#[test]
fn test_embedded_threshold_lands_in_both_threshold_fields() {
    let mut record = make_legacy("FHO", "GFS", &["100", "0.5", "0.2", "0.3"]);
    record.embedded_threshold = Some(">0.5".to_string());

    let mut transformer = LegacyTransformer::new();
    let canonical = transformer.transform(&record, None, 0).unwrap();

    assert_eq!(canonical.header.fcst_thresh, ">0.5");
    assert_eq!(canonical.header.obs_thresh, ">0.5");
}

#[test]
fn test_header_bridging_defaults() {
    let record = make_legacy("SL1L2", "GFS", &["10", "1", "2", "3", "4", "5"]);
    let mut transformer = LegacyTransformer::new();
    let canonical = transformer.transform(&record, None, 0).unwrap();

    let header = &canonical.header;
    assert_eq!(header.descr, "NA");
    assert_eq!(header.fcst_units, "NA");
    assert_eq!(header.interp_mthd, "NA");
    assert_eq!(header.interp_pnts, 0);
    assert_eq!(header.alpha, "-9999");
    assert_eq!(header.cov_thresh, "-9999");
    assert_eq!(header.obs_lead, 0);
    assert_eq!(header.obs_var, header.fcst_var);
    assert_eq!(header.obs_lev, header.fcst_lev);
    assert_eq!(header.fcst_valid_end, header.fcst_valid_beg);
    assert_eq!(header.obs_valid_beg, header.fcst_valid_beg);
    assert_eq!(
        header.fcst_valid_beg,
        Utc.with_ymd_and_hms(2019, 6, 1, 12, 0, 0).unwrap()
    );
    assert_eq!(
        header.fcst_init_beg,
        Utc.with_ymd_and_hms(2019, 6, 1, 0, 0, 0).unwrap()
    );
}

#[test]
fn test_sl1l2_missing_mae_token_is_null() {
    let record = make_legacy("SL1L2", "GFS", &["10", "1", "2", "3", "4", "5"]);
    let mut transformer = LegacyTransformer::new();
    let canonical = transformer.transform(&record, None, 0).unwrap();

    let flat = canonical.data.flatten();
    assert_eq!(flat[5].as_deref(), Some("5"));
    assert_eq!(flat[6], None);
    assert_eq!(flat.len(), DATA_SLOT_COUNT);
}

#[test]
fn test_percentile_expansion_three_bins() {
    // model suffix /2 plus one gives 3 bins: counts then subtotals
    let record = make_legacy("RELI", "GFS/2", &["2", "5", "3", "10", "20", "12"]);
    let mut transformer = LegacyTransformer::new();
    let canonical = transformer.transform(&record, None, 0).unwrap();

    assert_eq!(canonical.header.line_type, LineType::Pct);
    assert_eq!(canonical.header.fcst_thresh, "==1/3");

    let DataPayload::Bins { total, bins } = &canonical.data else {
        panic!("expected percentile bins");
    };
    assert_eq!(*total, 42.0);
    assert_eq!(bins.len(), 3);
    assert_eq!(bins[0].thresh, 0.0);
    assert_eq!(bins[1].thresh, 0.5);
    assert_eq!(bins[2].thresh, 1.0);
    assert_eq!(bins[1].oy, 5.0);
    assert_eq!(bins[1].on, 15.0);

    // 3 populated columns per bin plus total and count, the rest null
    let flat = canonical.data.flatten();
    assert_eq!(flat.len(), DATA_SLOT_COUNT);
    let populated = flat.iter().filter(|v| v.is_some()).count();
    assert_eq!(populated, 2 + 3 * 3);
}

#[test]
fn test_percentile_expansion_five_bins() {
    let record = make_legacy(
        "RELI",
        "GFS/4",
        &["1", "2", "3", "4", "5", "10", "10", "10", "10", "10"],
    );
    let mut transformer = LegacyTransformer::new();
    let canonical = transformer.transform(&record, None, 0).unwrap();

    let DataPayload::Bins { total, bins } = &canonical.data else {
        panic!("expected percentile bins");
    };
    assert_eq!(*total, 50.0);
    assert_eq!(bins.len(), 5);
    assert_eq!(bins[4].thresh, 1.0);

    let populated = canonical.data.flatten().iter().filter(|v| v.is_some()).count();
    assert_eq!(populated, 2 + 5 * 3);
}

#[test]
fn test_rank_counts_rescaled() {
    // model suffix /3 plus one gives 4 ranks
    let record = make_legacy("HIST", "ENS/3", &["0.1", "0.2", "0.3", "0.4"]);
    let mut transformer = LegacyTransformer::new();
    let canonical = transformer.transform(&record, None, 0).unwrap();

    assert_eq!(canonical.header.line_type, LineType::Rhist);
    let flat = canonical.data.flatten();
    assert_eq!(flat[0].as_deref(), Some("0"));
    assert_eq!(flat[1].as_deref(), Some("4"));
    assert_eq!(flat[2].as_deref(), Some("10"));
    assert_eq!(flat[3].as_deref(), Some("20"));
    assert_eq!(flat[4].as_deref(), Some("30"));
    assert_eq!(flat[5].as_deref(), Some("40"));
}

#[test]
fn test_economic_curve_doubling() {
    let values: Vec<String> = (1..=18).map(|i| format!("0.{:02}", i)).collect();
    let refs: Vec<&str> = values.iter().map(|s| s.as_str()).collect();
    let record = make_legacy("ECON", "GFS", &refs);
    let mut transformer = LegacyTransformer::new();
    let canonical = transformer.transform(&record, None, 0).unwrap();

    assert_eq!(canonical.header.line_type, LineType::Eclv);
    let flat = canonical.data.flatten();
    assert_eq!(flat[0].as_deref(), Some("0"));
    assert_eq!(flat[1], None);
    assert_eq!(flat[2], None);
    assert_eq!(flat[3].as_deref(), Some("18"));
    // pairs of (cost-loss point, value) fill slots 4..39
    assert_eq!(flat[4].as_deref(), Some("0.952381"));
    assert_eq!(flat[5].as_deref(), Some("0.01"));
    assert_eq!(flat[38].as_deref(), Some("0.0001"));
    assert_eq!(flat[39].as_deref(), Some("0.18"));
    assert_eq!(flat[40], None);
}

#[test]
fn test_probability_scores_relayout() {
    let record = make_legacy(
        "BSS",
        "ENS/20",
        &["0.11", "0.22", "0.33", "0.44", "0.55", "0.66"],
    );
    let mut transformer = LegacyTransformer::new();
    let canonical = transformer.transform(&record, None, 0).unwrap();

    assert_eq!(canonical.header.line_type, LineType::Pstd);
    let flat = canonical.data.flatten();
    assert_eq!(flat[0].as_deref(), Some("0"));
    assert_eq!(flat[1].as_deref(), Some("0"));
    assert_eq!(flat[5].as_deref(), Some("0.44")); // reliability
    assert_eq!(flat[6].as_deref(), Some("0.55")); // resolution
    assert_eq!(flat[7].as_deref(), Some("0.66")); // uncertainty
    assert_eq!(flat[9].as_deref(), Some("0.11")); // brier
    assert_eq!(flat[12].as_deref(), Some("0.22")); // climatological brier
    assert_eq!(flat[15].as_deref(), Some("0.33")); // skill score
}

#[test]
fn test_continuous_scores_relayout() {
    let record = make_legacy("RMSE", "GFS", &["1.1", "2.2", "3.3", "4.4", "5.5"]);
    let mut transformer = LegacyTransformer::new();
    let canonical = transformer.transform(&record, None, 0).unwrap();

    assert_eq!(canonical.header.line_type, LineType::Cnt);
    let flat = canonical.data.flatten();
    assert_eq!(flat[0].as_deref(), Some("0"));
    assert_eq!(flat[28].as_deref(), Some("0"));
    assert_eq!(flat[29].as_deref(), Some("0"));
    assert_eq!(flat[30].as_deref(), Some("0"));
    assert_eq!(flat[31].as_deref(), Some("3.3")); // mean error
    assert_eq!(flat[36].as_deref(), Some("1.1")); // error standard deviation
    assert_eq!(flat[44].as_deref(), Some("4.4")); // mean absolute error
    assert_eq!(flat[53].as_deref(), Some("2.2")); // root mean squared error
    assert_eq!(flat[77].as_deref(), Some("5.5")); // anomaly correlation
}

#[test]
fn test_ensemble_counts_spread_every_fifth_slot() {
    let record = make_legacy("FSO", "ENS", &["1", "2", "3", "4", "5", "6"]);
    let mut transformer = LegacyTransformer::new();
    let canonical = transformer.transform(&record, None, 0).unwrap();

    assert_eq!(canonical.header.line_type, LineType::Enscnt);
    let flat = canonical.data.flatten();
    for (i, expected) in ["1", "2", "3", "4", "5", "6"].iter().enumerate() {
        assert_eq!(flat[i * 5].as_deref(), Some(*expected));
    }
    assert_eq!(flat[1], None);
}

#[test]
fn test_fractions_skill_score_derived() {
    let record = make_legacy("FSS", "GFS", &["100", "0.4", "0.8", "0.1"]);
    let mut transformer = LegacyTransformer::new();
    let canonical = transformer.transform(&record, None, 0).unwrap();

    assert_eq!(canonical.header.line_type, LineType::Nbrcnt);
    let flat = canonical.data.flatten();
    assert_eq!(flat[0].as_deref(), Some("100"));
    assert_eq!(flat[1].as_deref(), Some("0.4"));
    // 1 - 0.4/0.8 + 0.1
    let fss: f64 = flat[4].as_deref().unwrap().parse().unwrap();
    assert!((fss - 0.6).abs() < 1e-12);
}

#[test]
fn test_ensemble_suffix_from_directory() {
    assert_eq!(
        ensemble_suffix(Path::new("/data/GEFS_P01/scores.vsdb")).as_deref(),
        Some("_P01")
    );
    assert_eq!(ensemble_suffix(Path::new("/data/GEFS/scores.vsdb")), None);
}

#[test]
fn test_ensemble_model_takes_directory_suffix() {
    let record = make_legacy("BSS", "GEFS/20", &["1", "2", "3", "4", "5", "6"]);
    let mut transformer = LegacyTransformer::new();
    let canonical = transformer.transform(&record, Some("_P01"), 0).unwrap();
    assert_eq!(canonical.header.model, "GEFS_P01");
}

#[test]
fn test_non_ensemble_model_unchanged() {
    let record = make_legacy("SL1L2", "GFS", &["10", "1", "2", "3", "4", "5", "6"]);
    let mut transformer = LegacyTransformer::new();
    let canonical = transformer.transform(&record, Some("_P01"), 0).unwrap();
    assert_eq!(canonical.header.model, "GFS");
}

#[test]
fn test_variable_width_without_size_is_error() {
    let record = make_legacy("RELI", "GFS", &["1", "2", "3"]);
    let mut transformer = LegacyTransformer::new();
    assert!(transformer.transform(&record, None, 0).is_err());
}

#[test]
fn test_non_numeric_derivation_input_is_error() {
    let record = make_legacy("FHO", "GFS", &["100", "abc", "0.2", "0.3"]);
    let mut transformer = LegacyTransformer::new();
    assert!(transformer.transform(&record, None, 0).is_err());
}
