//! Legacy-format record bridging
//!
//! Rewrites the 9-field legacy header into the full canonical header and lays
//! the data tokens out into the canonical 96-slot payload. Each legacy line
//! type has its own layout rule: direct copies for the partial-sums types,
//! contingency derivation for FHO, percentile expansion for RELI, rank
//! rescaling for HIST, and the economic-curve doubling for ECON.

use std::path::Path;

use crate::app::models::{
    CanonicalRecord, DataPayload, LegacyRecord, LineType, PctBin, RecordKind, StatHeader,
    format_numeric,
};
use crate::constants::{
    DATA_SLOT_COUNT, ECON_EVALUATION_POINTS, LEGACY_ENSEMBLE_TYPES, MISSING_NA, MISSING_VALUE,
    ZERO_VALUE,
};
use crate::{Error, FileFormat, Result};

use super::current::lead_hours;
use super::dates::DateParser;

/// Transformer for legacy-format (.vsdb) records
#[derive(Debug, Default)]
pub struct LegacyTransformer {
    dates: DateParser,
}

impl LegacyTransformer {
    pub fn new() -> Self {
        Self {
            dates: DateParser::new(),
        }
    }

    /// Bridge one legacy record into canonical form
    ///
    /// `ens_suffix` is the ensemble-member suffix carried by the source
    /// directory name, if any (see [`ensemble_suffix`]).
    pub fn transform(
        &mut self,
        record: &LegacyRecord,
        ens_suffix: Option<&str>,
        file_row: usize,
    ) -> Result<CanonicalRecord> {
        let base = record.line_type_token.as_str();
        let line_type = LineType::from_legacy_token(base).ok_or_else(|| {
            Error::derivation(base, "no canonical mapping for legacy line type")
        })?;

        let (model, mut n_var) = split_model(record, ens_suffix);

        let mut fcst_thresh = record
            .embedded_threshold
            .clone()
            .unwrap_or_else(|| MISSING_NA.to_string());

        // the variable-width kinds size themselves from the model suffix
        match base {
            "RELI" => {
                let n = n_var.ok_or_else(|| {
                    Error::derivation(base, "percentile record without an ensemble size")
                })? + 1;
                n_var = Some(n);
                fcst_thresh = format!("==1/{}", n);
            }
            "HIST" => {
                let n = n_var.ok_or_else(|| {
                    Error::derivation(base, "rank record without an ensemble size")
                })? + 1;
                n_var = Some(n);
            }
            "ECON" => {
                n_var = Some(ECON_EVALUATION_POINTS.len());
            }
            _ => {}
        }

        let fcst_valid_beg = self.dates.parse_legacy(&record.fcst_valid_beg)?;
        let fcst_lead = record.fcst_lead.parse::<i64>().map_err(|_| {
            Error::derivation(base, format!("bad lead '{}'", record.fcst_lead))
        })?;
        let fcst_lead_hr = lead_hours(fcst_lead);
        let fcst_init_beg = fcst_valid_beg - chrono::Duration::hours(fcst_lead_hr);

        let data = layout_data(base, record, n_var)?;

        let header = StatHeader {
            version: record.version.clone(),
            model,
            descr: MISSING_NA.to_string(),
            fcst_lead,
            fcst_valid_beg,
            fcst_valid_end: fcst_valid_beg,
            obs_lead: 0,
            obs_valid_beg: fcst_valid_beg,
            obs_valid_end: fcst_valid_beg,
            fcst_var: record.fcst_var.clone(),
            fcst_units: MISSING_NA.to_string(),
            fcst_lev: record.fcst_lev.clone(),
            obs_var: record.fcst_var.clone(),
            obs_units: MISSING_NA.to_string(),
            obs_lev: record.fcst_lev.clone(),
            obtype: record.obtype.clone(),
            vx_mask: record.vx_mask.clone(),
            interp_mthd: MISSING_NA.to_string(),
            interp_pnts: 0,
            obs_thresh: fcst_thresh.clone(),
            fcst_thresh,
            cov_thresh: MISSING_VALUE.to_string(),
            alpha: MISSING_VALUE.to_string(),
            line_type,
            fcst_lead_hr,
            fcst_init_beg,
            fcst_perc: None,
            obs_perc: None,
        };

        Ok(CanonicalRecord {
            kind: RecordKind {
                format: FileFormat::Vsdb,
                version: record.version.clone(),
                line_type,
            },
            header,
            data,
            source_data: record.data.iter().map(|t| Some(t.clone())).collect(),
            source_fields: crate::constants::legacy_data_field_names(base).unwrap_or(&[]),
            file_row,
            line_num: record.line_num,
        })
    }
}

/// Ensemble-member suffix of a source directory
///
/// Text from the last underscore of the final path component, underscore
/// included, so `.../GEFS_P01/file.vsdb` yields `_P01`.
pub fn ensemble_suffix(path: &Path) -> Option<String> {
    let dir = path.parent()?.file_name()?.to_str()?;
    dir.rfind('_').map(|i| dir[i..].to_string())
}

/// Split the model field: ensemble types take the directory suffix and shed
/// the `/N` ensemble size, which becomes the width driver
fn split_model(record: &LegacyRecord, ens_suffix: Option<&str>) -> (String, Option<usize>) {
    let base = record.line_type_token.as_str();
    let is_ensemble = LEGACY_ENSEMBLE_TYPES.contains(&base);

    let (model_base, slash_value) = match record.model.split_once('/') {
        Some((m, n)) => (m, Some(n)),
        None => (record.model.as_str(), None),
    };
    let n_var = slash_value.and_then(|n| n.parse::<usize>().ok());

    let model = if is_ensemble {
        match ens_suffix {
            Some(suffix) => format!("{}{}", model_base, suffix),
            None => model_base.to_string(),
        }
    } else {
        record.model.clone()
    };

    (model, n_var)
}

/// Lay the data tokens of one legacy record out into the canonical payload
fn layout_data(base: &str, record: &LegacyRecord, n_var: Option<usize>) -> Result<DataPayload> {
    let mut slots: Vec<Option<String>> = vec![None; DATA_SLOT_COUNT];
    let tok = |i: usize| record.token(i).map(|t| t.to_string());

    match base {
        // direct copies, trailing tokens optional
        "SL1L2" | "SAL1L2" => {
            for i in 0..7 {
                slots[i] = tok(i);
            }
        }
        "VL1L2" | "GRAD" => {
            for i in 0..10 {
                slots[i] = tok(i);
            }
        }
        "VAL1L2" => {
            for i in 0..8 {
                slots[i] = tok(i);
            }
        }

        // rank counts rescale by 100
        "HIST" => {
            let n = required_n(base, n_var)?;
            slots[0] = Some(ZERO_VALUE.to_string());
            slots[1] = Some(format!("{}", n));
            for i in 0..n.min(DATA_SLOT_COUNT - 2) {
                let count = parse_value(base, record, i)?;
                slots[2 + i] = Some(format_numeric(count * 100.0));
            }
        }

        // member frequencies copy straight across
        "RELP" => {
            let n = required_n(base, n_var)?;
            slots[0] = Some(ZERO_VALUE.to_string());
            slots[1] = Some(format!("{}", n));
            for i in 0..n.min(DATA_SLOT_COUNT - 2) {
                slots[2 + i] = tok(i);
            }
        }

        // percentile expansion: counts then subtotals become
        // (threshold, oy, on) triples with a per-row total
        "RELI" => {
            let n = required_n(base, n_var)?;
            if n < 2 {
                return Err(Error::derivation(base, "percentile record needs 2+ bins"));
            }
            let mut total = 0.0;
            let mut bins = Vec::with_capacity(n);
            for i in 0..n {
                let count = parse_value(base, record, i)?;
                let subtotal = parse_value(base, record, i + n)?;
                total += subtotal;
                bins.push(PctBin {
                    thresh: i as f64 / (n - 1) as f64,
                    oy: count,
                    on: subtotal - count,
                });
            }
            return Ok(DataPayload::Bins { total, bins });
        }

        // double the curve values against the fixed cost-loss points
        "ECON" => {
            slots[0] = Some(ZERO_VALUE.to_string());
            slots[3] = Some(format!("{}", ECON_EVALUATION_POINTS.len()));
            for (i, point) in ECON_EVALUATION_POINTS.iter().enumerate() {
                slots[4 + 2 * i] = Some(format_numeric(*point));
                slots[5 + 2 * i] = tok(i);
            }
        }

        "BSS" => {
            slots[0] = Some(ZERO_VALUE.to_string());
            slots[1] = Some(ZERO_VALUE.to_string());
            slots[5] = tok(3);
            slots[6] = tok(4);
            slots[7] = tok(5);
            slots[9] = tok(0);
            slots[12] = tok(1);
            slots[15] = tok(2);
        }

        "RMSE" => {
            slots[0] = Some(ZERO_VALUE.to_string());
            slots[28] = Some(ZERO_VALUE.to_string());
            slots[29] = Some(ZERO_VALUE.to_string());
            slots[30] = Some(ZERO_VALUE.to_string());
            slots[31] = tok(2);
            slots[36] = tok(0);
            slots[44] = tok(3);
            slots[53] = tok(1);
            slots[77] = tok(4);
        }

        "FSO" => {
            for i in 0..6 {
                slots[i * 5] = tok(i);
            }
        }

        // contingency derivation from total and the three rates
        "FHO" => {
            let total = parse_value(base, record, 0)?;
            let f_rate = parse_value(base, record, 1)?;
            let h_rate = parse_value(base, record, 2)?;
            // a null observed rate counts as zero
            let o_rate = match record.token(3) {
                Some(t) if t != MISSING_NA => t.parse::<f64>().map_err(|_| {
                    Error::derivation(base, format!("non-numeric rate '{}'", t))
                })?,
                _ => 0.0,
            };
            let fy = total * f_rate;
            let oy = total * o_rate;
            let fy_oy = total * h_rate;
            slots[0] = tok(0);
            slots[1] = Some(format_numeric(fy_oy));
            slots[2] = Some(format_numeric(fy - fy_oy));
            slots[3] = Some(format_numeric(oy - fy_oy));
            slots[4] = Some(format_numeric(total - fy - oy + fy_oy));
        }

        // the fractions skill score is recomputed from its parts
        "FSS" => {
            let t1 = parse_value(base, record, 1)?;
            let t2 = parse_value(base, record, 2)?;
            let t3 = parse_value(base, record, 3)?;
            if t2 == 0.0 {
                return Err(Error::derivation(base, "zero worst-case score"));
            }
            slots[0] = tok(0);
            slots[1] = tok(1);
            slots[4] = Some(format_numeric(1.0 - t1 / t2 + t3));
        }

        _ => {
            return Err(Error::derivation(base, "no layout rule for legacy line type"));
        }
    }

    Ok(DataPayload::Slots(slots))
}

fn required_n(base: &str, n_var: Option<usize>) -> Result<usize> {
    n_var.ok_or_else(|| Error::derivation(base, "variable-width record without a size"))
}

fn parse_value(base: &str, record: &LegacyRecord, index: usize) -> Result<f64> {
    let token = record
        .token(index)
        .ok_or_else(|| Error::derivation(base, format!("missing data token {}", index)))?;
    token
        .parse::<f64>()
        .map_err(|_| Error::derivation(base, format!("non-numeric token '{}'", token)))
}
