//! Current-format record transformation
//!
//! Current-format lines already carry the canonical header shape, so the
//! transform is value fixes plus typing: percentile extraction from the
//! threshold fields, sentinel normalization for alpha/cov_thresh/interp_pnts,
//! the PCT bin-count decrement, the RPS complement fill, and the derived
//! lead-hour and initialization-time fields.

use crate::app::models::{
    CanonicalRecord, DataPayload, LineType, ParsedRecord, RecordKind, StatHeader, format_numeric,
};
use crate::constants::{LEAD_HHMMSS_THRESHOLD, MISSING_NA, MISSING_VALUE};
use crate::{Error, FileFormat, Result};

use super::dates::DateParser;

/// Transformer for current-format (.stat) records
///
/// Owns the per-worker date cache; one instance per pipeline.
#[derive(Debug, Default)]
pub struct CurrentTransformer {
    dates: DateParser,
}

impl CurrentTransformer {
    pub fn new() -> Self {
        Self {
            dates: DateParser::new(),
        }
    }

    /// Transform one parsed record into canonical form
    ///
    /// Returns an error for unknown line types and failed derivations; the
    /// caller logs and drops the record, the batch continues.
    pub fn transform(&mut self, record: &ParsedRecord, file_row: usize) -> Result<CanonicalRecord> {
        let h = &record.header;
        let line_type: LineType = h[23].parse()?;

        let (fcst_thresh, fcst_perc) = split_percentile(&h[19]);
        let (obs_thresh, obs_perc) = split_percentile(&h[20]);

        let fcst_lead = parse_lead(&h[3], line_type)?;
        let obs_lead = parse_lead(&h[6], line_type)?;
        let fcst_valid_beg = self.dates.parse_current(&h[4])?;
        let fcst_valid_end = self.dates.parse_current(&h[5])?;
        let obs_valid_beg = self.dates.parse_current(&h[7])?;
        let obs_valid_end = self.dates.parse_current(&h[8])?;

        let fcst_lead_hr = lead_hours(fcst_lead);
        let fcst_init_beg = fcst_valid_beg - chrono::Duration::hours(fcst_lead_hr);

        let interp_pnts = if h[18] == MISSING_NA {
            0
        } else {
            h[18].parse::<i64>().map_err(|_| {
                Error::derivation(line_type.as_str(), format!("bad interp_pnts '{}'", h[18]))
            })?
        };

        let mut data = record.data.clone();
        apply_data_fixes(line_type, &mut data)?;

        let header = StatHeader {
            version: h[0].clone(),
            model: h[1].clone(),
            descr: h[2].clone(),
            fcst_lead,
            fcst_valid_beg,
            fcst_valid_end,
            obs_lead,
            obs_valid_beg,
            obs_valid_end,
            fcst_var: h[9].clone(),
            fcst_units: h[10].clone(),
            fcst_lev: h[11].clone(),
            obs_var: h[12].clone(),
            obs_units: h[13].clone(),
            obs_lev: h[14].clone(),
            obtype: h[15].clone(),
            vx_mask: h[16].clone(),
            interp_mthd: h[17].clone(),
            interp_pnts,
            fcst_thresh,
            obs_thresh,
            cov_thresh: normalize_sentinel(&h[21]),
            alpha: normalize_alpha(&h[22]),
            line_type,
            fcst_lead_hr,
            fcst_init_beg,
            fcst_perc,
            obs_perc,
        };

        Ok(CanonicalRecord {
            kind: RecordKind {
                format: FileFormat::Stat,
                version: header.version.clone(),
                line_type,
            },
            header,
            data: DataPayload::Slots(data.clone()),
            source_data: data,
            source_fields: crate::constants::data_field_names(line_type.as_str()).unwrap_or(&[]),
            file_row,
            line_num: record.line_num,
        })
    }
}

/// Split a parenthesized percentile out of a threshold token
///
/// `>0.5(25.0)` becomes the threshold `>0.5` and the percentile 25.0.
pub fn split_percentile(thresh: &str) -> (String, Option<f64>) {
    if let (Some(open), Some(close)) = (thresh.find('('), thresh.find(')')) {
        if open < close {
            let perc = thresh[open + 1..close].parse::<f64>().ok();
            return (thresh[..open].to_string(), perc);
        }
    }
    (thresh.to_string(), None)
}

/// Unpack a lead token; values over the HHMMSS threshold are packed
pub fn lead_hours(lead: i64) -> i64 {
    if lead > LEAD_HHMMSS_THRESHOLD {
        lead / 10000
    } else {
        lead
    }
}

fn parse_lead(token: &str, line_type: LineType) -> Result<i64> {
    token
        .parse::<i64>()
        .map_err(|_| Error::derivation(line_type.as_str(), format!("bad lead '{}'", token)))
}

fn normalize_sentinel(token: &str) -> String {
    if token == MISSING_NA {
        MISSING_VALUE.to_string()
    } else {
        token.to_string()
    }
}

/// alpha: sentinel normalization plus trailing-zero-free numeric formatting
fn normalize_alpha(token: &str) -> String {
    let token = normalize_sentinel(token);
    match token.parse::<f64>() {
        Ok(value) => format_numeric(value),
        Err(_) => token,
    }
}

/// Line-type-specific value fixes applied to the data half
fn apply_data_fixes(line_type: LineType, data: &mut Vec<Option<String>>) -> Result<()> {
    match line_type {
        // the physical line has one more threshold than it has bins
        LineType::Pct => {
            if let Some(Some(n_thresh)) = data.get(1) {
                if n_thresh != MISSING_NA {
                    let n = n_thresh.parse::<f64>().map_err(|_| {
                        Error::derivation("PCT", format!("bad bin count '{}'", n_thresh))
                    })?;
                    data[1] = Some(format_numeric(n - 1.0));
                }
            }
        }
        // older files omit the complement; fill it from rps when present
        LineType::Rps => {
            let rps = data.get(5).and_then(|v| v.as_deref());
            let rps_comp = data.get(8).and_then(|v| v.as_deref());
            if rps_comp.is_none() {
                if let Some(rps) = rps {
                    if let Ok(value) = rps.parse::<f64>() {
                        if data.len() <= 8 {
                            data.resize(9, None);
                        }
                        data[8] = Some(format_numeric(1.0 - value));
                    }
                }
            }
        }
        _ => {}
    }
    Ok(())
}
