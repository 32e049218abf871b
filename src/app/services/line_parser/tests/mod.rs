//! Test fixtures for line-parser testing

use std::io::Write;
use tempfile::NamedTempFile;


/// Full 24-field current-format header line
pub const FULL_STAT_HEADER: &str = "VERSION MODEL DESC FCST_LEAD FCST_VALID_BEG FCST_VALID_END \
OBS_LEAD OBS_VALID_BEG OBS_VALID_END FCST_VAR FCST_UNITS FCST_LEV OBS_VAR OBS_UNITS OBS_LEV \
OBTYPE VX_MASK INTERP_MTHD INTERP_PNTS FCST_THRESH OBS_THRESH COV_THRESH ALPHA LINE_TYPE";

/// 21-field variant header, lacking DESC and both units columns
pub const SHORT_STAT_HEADER: &str = "VERSION MODEL FCST_LEAD FCST_VALID_BEG FCST_VALID_END \
OBS_LEAD OBS_VALID_BEG OBS_VALID_END FCST_VAR FCST_LEV OBS_VAR OBS_LEV \
OBTYPE VX_MASK INTERP_MTHD INTERP_PNTS FCST_THRESH OBS_THRESH COV_THRESH ALPHA LINE_TYPE";

/// 22-field variant header, lacking only the units columns
pub const MID_STAT_HEADER: &str = "VERSION MODEL DESC FCST_LEAD FCST_VALID_BEG FCST_VALID_END \
OBS_LEAD OBS_VALID_BEG OBS_VALID_END FCST_VAR FCST_LEV OBS_VAR OBS_LEV \
OBTYPE VX_MASK INTERP_MTHD INTERP_PNTS FCST_THRESH OBS_THRESH COV_THRESH ALPHA LINE_TYPE";

/// A full-header SL1L2 data line with six data tokens
pub const FULL_SL1L2_LINE: &str = "V8.0 GFS NA 120000 20190601_120000 20190601_120000 000000 \
20190601_120000 20190601_120000 TMP K P500 TMP K P500 ANALYS G2 NEAREST 1 NA NA NA NA SL1L2 \
3456 273.1 272.9 74562.1 74580.2 74544.9";

/// Helper to create a temporary file with given content
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", content).unwrap();
    temp_file.flush().unwrap();
    temp_file
}
